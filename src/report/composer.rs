use std::path::{Component, Path};

use serde::Serialize;

use super::figure::Figure;
use crate::color::ColorMap;
use crate::config::{SequenceWindow, Settings};
use crate::data::loader;
use crate::data::model::{Prediction, ResultSet};
use crate::data::sequence::{summarize, SequenceSummary};
use crate::error::{ReportError, ReportResult};

/// Rows shown in the top binders table.
pub const TOP_BINDERS: usize = 10;

// ---------------------------------------------------------------------------
// Report – everything the page shows for one entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub name: String,
    /// Summary of the first predictor's result set.
    pub summary: SequenceSummary,
    /// `None` when no peptide passes the cutoff and run length.
    pub figure: Option<Figure>,
    pub top_binders: Vec<Prediction>,
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Loads every predictor's results for an entity and composes the report.
#[derive(Debug, Clone)]
pub struct Composer {
    predictors: Vec<String>,
    window: SequenceWindow,
    colors: ColorMap,
}

impl Composer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            predictors: settings.predictors.clone(),
            window: settings.window,
            colors: ColorMap::new(&settings.predictors),
        }
    }

    /// Load one result set per known predictor, in configured order.
    ///
    /// Fails on the first missing file; no partial set is returned.
    pub fn load_all(&self, base: &Path, entity: &str) -> ReportResult<Vec<ResultSet>> {
        validate_entity(entity)?;
        self.predictors
            .iter()
            .map(|predictor| loader::load(base, predictor, entity))
            .collect()
    }

    pub fn compose(&self, base: &Path, entity: &str, cutoff: f64, min_run: usize) -> ReportResult<Report> {
        if !cutoff.is_finite() {
            return Err(ReportError::invalid("cutoff", "must be a finite number"));
        }

        let sets = self.load_all(base, entity)?;
        let first = sets.first().ok_or_else(|| ReportError::invalid("predictors", "none configured"))?;

        if first.is_empty() {
            log::warn!("{entity}: {} result file has no rows", first.predictor);
        }

        let summary = summarize(first, self.window);
        let top_binders = first.top_scoring(TOP_BINDERS);
        let figure = Figure::build(entity, &sets, &self.colors, cutoff, min_run, self.window.stride);

        match &figure {
            Some(fig) => log::info!(
                "{entity}: {} tracks, {} segments (cutoff {cutoff}, n {min_run})",
                fig.tracks.len(),
                fig.tracks.iter().map(|t| t.segment_count()).sum::<usize>()
            ),
            None => log::info!("{entity}: nothing passes cutoff {cutoff} with n {min_run}"),
        }

        Ok(Report {
            name: entity.to_string(),
            summary,
            figure,
            top_binders,
        })
    }
}

/// Entity names become file names; reject anything that could leave the
/// predictor directory.
fn validate_entity(entity: &str) -> ReportResult<()> {
    let mut components = Path::new(entity).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if entity.is_empty() || !single_normal || entity.contains(['/', '\\']) {
        return Err(ReportError::invalid("name", format!("'{entity}' is not a valid entity name")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "peptide,pos,score,allele\n";

    fn write(base: &Path, predictor: &str, entity: &str, rows: &[(&str, i64, f64)]) {
        let dir = base.join(predictor);
        fs::create_dir_all(&dir).unwrap();
        let mut body = HEADER.to_string();
        for (peptide, pos, score) in rows {
            body.push_str(&format!("{peptide},{pos},{score},DRB1*0101\n"));
        }
        fs::write(dir.join(format!("{entity}.csv")), body).unwrap();
    }

    fn settings() -> Settings {
        Settings {
            predictors: vec!["predictorA".into(), "predictorB".into()],
            ..Settings::default()
        }
    }

    const ROWS: &[(&str, i64, f64)] = &[("MKLV", 1, 6.0), ("KLVA", 2, 7.0), ("LVAT", 3, 2.0)];

    #[test]
    fn test_compose_builds_figure_and_summary() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "predictorA", "seq1", ROWS);
        write(tmp.path(), "predictorB", "seq1", ROWS);

        let report = Composer::new(&settings()).compose(tmp.path(), "seq1", 5.0, 2).unwrap();
        assert_eq!(report.name, "seq1");
        assert_eq!(report.summary.sequence.as_deref(), Some("MKLVAT"));
        assert_eq!(report.top_binders[0].peptide, "KLVA");

        let figure = report.figure.unwrap();
        assert_eq!(figure.tracks.len(), 2);
        assert_eq!(figure.tracks[0].predictor, "predictorA");
        assert_eq!(figure.tracks[1].predictor, "predictorB");
    }

    #[test]
    fn test_missing_predictor_file_fails_whole_report() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "predictorA", "seq1", ROWS);
        write(tmp.path(), "predictorB", "seq1", ROWS);
        write(tmp.path(), "predictorA", "seq2", ROWS);

        let err = Composer::new(&settings()).compose(tmp.path(), "seq2", 5.0, 2).unwrap_err();
        match err {
            ReportError::NotFound { predictor, entity, .. } => {
                assert_eq!(predictor, "predictorB");
                assert_eq!(entity, "seq2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_entity_fails_at_first_load() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "predictorA", "seq1", ROWS);

        let err = Composer::new(&settings()).compose(tmp.path(), "ghost", 5.0, 2).unwrap_err();
        assert!(matches!(err, ReportError::NotFound { ref predictor, .. } if predictor == "predictorA"));
    }

    #[test]
    fn test_high_cutoff_gives_empty_figure() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "predictorA", "seq1", ROWS);
        write(tmp.path(), "predictorB", "seq1", ROWS);

        let report = Composer::new(&settings()).compose(tmp.path(), "seq1", 100.0, 2).unwrap();
        assert!(report.figure.is_none());
        assert_eq!(report.summary.rows, 3);
    }

    #[test]
    fn test_path_like_names_rejected() {
        let composer = Composer::new(&settings());
        for name in ["", "..", "../etc/passwd", "a/b", "/abs", "a\\b"] {
            let err = composer.compose(Path::new("results"), name, 5.0, 2).unwrap_err();
            assert!(matches!(err, ReportError::InvalidParameter { name: "name", .. }), "{name}");
        }
    }
}
