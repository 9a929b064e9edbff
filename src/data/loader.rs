use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::model::{Prediction, ResultSet, MAX_POSITION};
use crate::error::{ReportError, ReportResult};

/// Columns every result file must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["peptide", "pos", "score", "allele"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Location of the result file for one predictor and entity.
pub fn result_path(base: &Path, predictor: &str, entity: &str) -> PathBuf {
    base.join(predictor).join(format!("{entity}.csv"))
}

/// Load `base/<predictor>/<entity>.csv`.
///
/// A missing file is reported as [`ReportError::NotFound`] so the caller can
/// answer with a 404 instead of a generic failure.
pub fn load(base: &Path, predictor: &str, entity: &str) -> ReportResult<ResultSet> {
    let path = result_path(base, predictor, entity);
    let file = File::open(&path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ReportError::NotFound {
            predictor: predictor.to_string(),
            entity: entity.to_string(),
            path: path.clone(),
        },
        _ => ReportError::Io {
            path: path.clone(),
            source,
        },
    })?;

    let rows = read_csv(file, &path)?;
    log::debug!("loaded {} rows from {}", rows.len(), path.display());

    Ok(ResultSet {
        predictor: predictor.to_string(),
        rows,
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with at least `peptide,pos,score,allele`.
/// Extra columns (pandas index, `name`, `rank`, …) are skipped.
fn read_csv<R: std::io::Read>(input: R, path: &Path) -> ReportResult<Vec<Prediction>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = reader
        .headers()
        .map_err(|source| ReportError::Parse {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let parse = |source| ReportError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse)?;
        let row: Prediction = record.deserialize(Some(&headers)).map_err(parse)?;
        if !(0..=MAX_POSITION).contains(&row.pos) {
            return Err(ReportError::InvalidRow {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                reason: format!("position {} outside 0..={MAX_POSITION}", row.pos),
            });
        }
        rows.push(row);
    }
    Ok(rows)
}
