use std::path::PathBuf;

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ReportError – everything that can go wrong while building a report
// ---------------------------------------------------------------------------

/// Failures surfaced by the loader and the report composer.
///
/// Each variant maps onto an HTTP status so the handler can tell a missing
/// result file apart from a broken one.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no {predictor} results for '{entity}' ({})", path.display())]
    NotFound {
        predictor: String,
        entity: String,
        path: PathBuf,
    },

    #[error("{}: missing '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} line {line}: {reason}", path.display())]
    InvalidRow { path: PathBuf, line: u64, reason: String },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("worker pool unavailable: {0}")]
    Blocking(#[from] BlockingError),
}

impl ReportError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ReportError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::NotFound { .. } => StatusCode::NOT_FOUND,
            ReportError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            ReportError::MissingColumn { .. }
            | ReportError::Parse { .. }
            | ReportError::InvalidRow { .. }
            | ReportError::Io { .. }
            | ReportError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
