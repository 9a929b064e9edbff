use serde::Serialize;

use crate::color::ColorMap;
use crate::data::filter::{binder_runs, BinderRun};
use crate::data::model::ResultSet;

// ---------------------------------------------------------------------------
// Figure model: tracks → lanes → segments on one position axis
// ---------------------------------------------------------------------------

/// One allele row inside a predictor track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    pub allele: String,
    pub segments: Vec<BinderRun>,
}

/// One predictor's strip of the figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub predictor: String,
    pub color: String,
    pub lanes: Vec<Lane>,
}

impl Track {
    pub fn segment_count(&self) -> usize {
        self.lanes.iter().map(|l| l.segments.len()).sum()
    }
}

/// The composed multi-track figure. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    /// First residue on the shared axis.
    pub axis_start: i64,
    /// One past the last residue on the shared axis.
    pub axis_end: i64,
    pub cutoff: f64,
    pub min_run: usize,
    pub tracks: Vec<Track>,
}

impl Figure {
    /// Build the figure for `sets`, or `None` when nothing passes the filters.
    ///
    /// Predictors without any run are left out; the axis still spans every
    /// loaded result set so tracks line up across requests.
    pub fn build(
        title: &str,
        sets: &[ResultSet],
        colors: &ColorMap,
        cutoff: f64,
        min_run: usize,
        stride: usize,
    ) -> Option<Figure> {
        let tracks: Vec<Track> = sets
            .iter()
            .filter_map(|set| {
                let lanes: Vec<Lane> = binder_runs(set, cutoff, min_run, stride)
                    .into_iter()
                    .map(|(allele, segments)| Lane { allele, segments })
                    .collect();
                if lanes.is_empty() {
                    return None;
                }
                Some(Track {
                    predictor: set.predictor.clone(),
                    color: colors.color_for(&set.predictor).to_string(),
                    lanes,
                })
            })
            .collect();

        if tracks.is_empty() {
            return None;
        }

        let axis_start = sets.iter().filter_map(ResultSet::span_start).min()?;
        let axis_end = sets.iter().filter_map(ResultSet::span_end).max()?;

        Some(Figure {
            title: title.to_string(),
            axis_start,
            axis_end,
            cutoff,
            min_run,
            tracks,
        })
    }

    pub fn lane_count(&self) -> usize {
        self.tracks.iter().map(|t| t.lanes.len()).sum()
    }
}
