use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{ReportError, ReportResult};

// ---------------------------------------------------------------------------
// Query binding
// ---------------------------------------------------------------------------

/// Raw query string of `GET /`; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ControlsQuery {
    pub path: Option<String>,
    pub name: Option<String>,
    pub cutoff: Option<String>,
    pub n: Option<String>,
}

/// Validated display parameters of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controls {
    pub path: String,
    pub name: String,
    pub cutoff: f64,
    pub n: usize,
}

impl Controls {
    /// Request defaults, used when binding fails.
    pub fn defaults(settings: &Settings) -> Self {
        Self {
            path: settings.results.display().to_string(),
            name: settings.default_name.clone(),
            cutoff: settings.default_cutoff,
            n: settings.default_n,
        }
    }

    /// Apply `query` on top of the defaults. Blank values fall back to the
    /// default; malformed numbers are rejected.
    pub fn bind(query: &ControlsQuery, settings: &Settings) -> ReportResult<Self> {
        let mut controls = Self::defaults(settings);

        if let Some(path) = non_blank(&query.path) {
            controls.path = path.to_string();
        }
        if let Some(name) = non_blank(&query.name) {
            controls.name = name.to_string();
        }
        if let Some(raw) = non_blank(&query.cutoff) {
            controls.cutoff = parse_cutoff(raw)?;
        }
        if let Some(raw) = non_blank(&query.n) {
            controls.n = parse_n(raw)?;
        }
        Ok(controls)
    }

    /// Like [`Controls::bind`], but a malformed value falls back to its
    /// default instead of failing. Used to re-fill the form of a rejected
    /// request.
    pub fn from_query(query: &ControlsQuery, settings: &Settings) -> Self {
        let defaults = Self::defaults(settings);
        Self {
            path: non_blank(&query.path).map_or(defaults.path, str::to_string),
            name: non_blank(&query.name).map_or(defaults.name, str::to_string),
            cutoff: non_blank(&query.cutoff)
                .and_then(|raw| parse_cutoff(raw).ok())
                .unwrap_or(defaults.cutoff),
            n: non_blank(&query.n)
                .and_then(|raw| parse_n(raw).ok())
                .unwrap_or(defaults.n),
        }
    }

    pub fn base_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_cutoff(raw: &str) -> ReportResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|c| c.is_finite())
        .ok_or_else(|| ReportError::invalid("cutoff", format!("'{raw}' is not a number")))
}

fn parse_n(raw: &str) -> ReportResult<usize> {
    raw.parse::<usize>()
        .map_err(|_| ReportError::invalid("n", format!("'{raw}' is not a non-negative integer")))
}

// ---------------------------------------------------------------------------
// Form view model
// ---------------------------------------------------------------------------

/// The selection form as rendered: current values plus the entity choices.
#[derive(Debug, Clone, Serialize)]
pub struct ControlsForm {
    pub path: String,
    pub name: String,
    pub cutoff: f64,
    pub n: usize,
    pub choices: Vec<String>,
}

impl ControlsForm {
    /// Pre-fill the form. The current name is kept selectable even when it
    /// has no files, so the user sees what was asked for. `choices` is
    /// sorted and stays sorted.
    pub fn new(controls: &Controls, mut choices: Vec<String>) -> Self {
        if let Err(at) = choices.binary_search(&controls.name) {
            choices.insert(at, controls.name.clone());
        }
        Self {
            path: controls.path.clone(),
            name: controls.name.clone(),
            cutoff: controls.cutoff,
            n: controls.n,
            choices,
        }
    }
}
