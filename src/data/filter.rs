use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{Prediction, ResultSet};

// ---------------------------------------------------------------------------
// Binder runs: consecutive peptides scoring at or above the cutoff
// ---------------------------------------------------------------------------

/// A stretch of consecutive binders for one allele.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinderRun {
    /// First residue covered (start of the first peptide).
    pub start: i64,
    /// One past the last residue covered.
    pub end: i64,
    /// Number of binding peptides in the run.
    pub peptides: usize,
    pub best_score: f64,
}

/// allele → runs, alleles in sorted order.
pub type RunsByAllele = BTreeMap<String, Vec<BinderRun>>;

/// Whether a row counts as a binder.
pub fn is_binder(row: &Prediction, cutoff: f64) -> bool {
    row.score >= cutoff
}

/// Group the binders of every allele into runs of consecutive positions.
///
/// Two binders are consecutive when their positions differ by exactly
/// `stride`. Runs with fewer than `min_run` peptides are dropped; a
/// `min_run` of 0 behaves like 1. Alleles left without runs are omitted.
pub fn binder_runs(set: &ResultSet, cutoff: f64, min_run: usize, stride: usize) -> RunsByAllele {
    let min_run = min_run.max(1);
    let stride = stride.max(1) as i64;

    // allele → pos → (residue end, score); duplicate positions keep the best score.
    let mut binders: BTreeMap<&str, BTreeMap<i64, (i64, f64)>> = BTreeMap::new();
    for row in set.rows.iter().filter(|r| is_binder(r, cutoff)) {
        let end = row.end();
        binders
            .entry(row.allele.as_str())
            .or_default()
            .entry(row.pos)
            .and_modify(|(e, s)| {
                *e = (*e).max(end);
                *s = s.max(row.score);
            })
            .or_insert((end, row.score));
    }

    let mut out = RunsByAllele::new();
    for (allele, positions) in binders {
        let mut runs = Vec::new();
        let mut current: Option<(i64, BinderRun)> = None;

        for (pos, (end, score)) in positions {
            match current.as_mut() {
                Some((last, run)) if pos - *last == stride => {
                    *last = pos;
                    run.end = run.end.max(end);
                    run.peptides += 1;
                    run.best_score = run.best_score.max(score);
                }
                _ => {
                    if let Some((_, run)) = current.take() {
                        runs.push(run);
                    }
                    current = Some((
                        pos,
                        BinderRun {
                            start: pos,
                            end,
                            peptides: 1,
                            best_score: score,
                        },
                    ));
                }
            }
        }
        if let Some((_, run)) = current {
            runs.push(run);
        }

        runs.retain(|r| r.peptides >= min_run);
        if !runs.is_empty() {
            out.insert(allele.to_string(), runs);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(rows: &[(&str, i64, f64, &str)]) -> ResultSet {
        ResultSet {
            predictor: "tepitope".into(),
            rows: rows
                .iter()
                .map(|&(peptide, pos, score, allele)| Prediction {
                    peptide: peptide.into(),
                    pos,
                    score,
                    allele: allele.into(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_runs_split_on_gaps_and_low_scores() {
        let s = set(&[
            ("AAAA", 1, 6.0, "A1"),
            ("AAAC", 2, 7.0, "A1"),
            ("AACD", 3, 1.0, "A1"), // below cutoff, breaks the run
            ("ACDE", 4, 8.0, "A1"),
            ("CDEF", 5, 5.0, "A1"),
            ("DEFG", 6, 9.0, "A1"),
        ]);

        let runs = binder_runs(&s, 5.0, 2, 1);
        let a1 = &runs["A1"];
        assert_eq!(a1.len(), 2);
        assert_eq!(a1[0], BinderRun { start: 1, end: 6, peptides: 2, best_score: 7.0 });
        assert_eq!(a1[1], BinderRun { start: 4, end: 10, peptides: 3, best_score: 9.0 });
    }

    #[test]
    fn test_short_runs_dropped() {
        let s = set(&[
            ("AAAA", 1, 6.0, "A1"),
            ("AAAA", 3, 6.0, "A1"),
            ("AAAA", 1, 6.0, "A2"),
            ("AAAA", 2, 6.0, "A2"),
        ]);

        let runs = binder_runs(&s, 5.0, 2, 1);
        assert!(!runs.contains_key("A1"));
        assert_eq!(runs["A2"].len(), 1);

        // zero behaves like one: every binder is drawn
        let runs = binder_runs(&s, 5.0, 0, 1);
        assert_eq!(runs["A1"].len(), 2);
    }

    #[test]
    fn test_cutoff_above_all_scores_is_empty() {
        let s = set(&[("AAAA", 1, 6.0, "A1"), ("AAAA", 2, 6.0, "A1")]);
        assert!(binder_runs(&s, 100.0, 1, 1).is_empty());
    }

    #[test]
    fn test_stride_defines_consecutive() {
        let s = set(&[("AAAA", 1, 6.0, "A1"), ("AAAA", 3, 6.0, "A1"), ("AAAA", 5, 6.0, "A1")]);
        assert!(binder_runs(&s, 5.0, 2, 1).is_empty());
        assert_eq!(binder_runs(&s, 5.0, 2, 2)["A1"][0].peptides, 3);
    }
}
