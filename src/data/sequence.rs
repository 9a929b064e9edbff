use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::model::ResultSet;
use crate::config::SequenceWindow;

// ---------------------------------------------------------------------------
// Sequence reconstruction from sliding-window peptides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("no peptides")]
    Empty,
    #[error("first window starts at {found}, expected {expected}")]
    Origin { expected: i64, found: i64 },
    #[error("windows do not tile the sequence: expected position {expected}, found {found}")]
    Gap { expected: i64, found: i64 },
    #[error("peptide at position {pos} is shorter than the stride")]
    ShortPeptide { pos: i64 },
    #[error("peptides at positions {pos} and {next} disagree on shared residues")]
    Mismatch { pos: i64, next: i64 },
}

/// Rebuild the parent sequence from the peptides of a result set.
///
/// One peptide is taken per distinct position. Positions must run
/// `origin, origin + stride, …` without gaps; each window contributes its
/// first `stride` residues and the last window contributes all of them.
/// Consecutive windows must agree wherever they overlap.
pub fn reconstruct_sequence(set: &ResultSet, window: SequenceWindow) -> Result<String, SequenceError> {
    let stride = window.stride.max(1);

    let mut windows: BTreeMap<i64, Vec<char>> = BTreeMap::new();
    for row in &set.rows {
        windows
            .entry(row.pos)
            .or_insert_with(|| row.peptide.chars().collect());
    }

    let mut iter = windows.iter().peekable();
    let Some(&(&first, _)) = iter.peek() else {
        return Err(SequenceError::Empty);
    };
    if first != window.origin {
        return Err(SequenceError::Origin {
            expected: window.origin,
            found: first,
        });
    }

    let mut sequence = String::new();
    while let Some((&pos, peptide)) = iter.next() {
        match iter.peek() {
            Some(&(&next, following)) => {
                let expected = pos.saturating_add(stride as i64);
                if next != expected {
                    return Err(SequenceError::Gap { expected, found: next });
                }
                if peptide.len() < stride {
                    return Err(SequenceError::ShortPeptide { pos });
                }
                let shared = (peptide.len() - stride).min(following.len());
                if peptide[stride..stride + shared] != following[..shared] {
                    return Err(SequenceError::Mismatch { pos, next });
                }
                sequence.extend(&peptide[..stride]);
            }
            None => sequence.extend(peptide.iter()),
        }
    }
    Ok(sequence)
}

// ---------------------------------------------------------------------------
// SequenceSummary
// ---------------------------------------------------------------------------

/// Metadata shown next to the figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceSummary {
    pub rows: usize,
    /// Peptide length of the predictor (n-mer).
    pub peptide_length: usize,
    /// Reconstructed parent sequence, absent when the windows do not tile it.
    pub sequence: Option<String>,
    pub sequence_length: Option<usize>,
}

/// Summarize a result set. Pure function of its rows.
pub fn summarize(set: &ResultSet, window: SequenceWindow) -> SequenceSummary {
    let sequence = match reconstruct_sequence(set, window) {
        Ok(seq) => Some(seq),
        Err(e) => {
            log::warn!("{}: cannot reconstruct sequence: {e}", set.predictor);
            None
        }
    };
    SequenceSummary {
        rows: set.len(),
        peptide_length: set.peptide_length(),
        sequence_length: sequence.as_ref().map(|s| s.chars().count()),
        sequence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Prediction;

    const SEQ: &str = "MKLVATSGQW";

    /// Sliding windows over `SEQ`, two alleles per position like real output.
    fn windows(size: usize, stride: usize, origin: i64) -> ResultSet {
        let chars: Vec<char> = SEQ.chars().collect();
        let mut rows = Vec::new();
        let mut start = 0;
        while start + size <= chars.len() {
            for allele in ["A1", "A2"] {
                rows.push(Prediction {
                    peptide: chars[start..start + size].iter().collect(),
                    pos: origin + start as i64,
                    score: 1.0,
                    allele: allele.into(),
                });
            }
            start += stride;
        }
        ResultSet {
            predictor: "tepitope".into(),
            rows,
        }
    }

    #[test]
    fn test_unit_stride_rebuilds_full_sequence() {
        let set = windows(4, 1, 1);
        assert_eq!(reconstruct_sequence(&set, SequenceWindow::default()).unwrap(), SEQ);
    }

    #[test]
    fn test_wider_stride_and_zero_origin() {
        let set = windows(4, 2, 0);
        let window = SequenceWindow { stride: 2, origin: 0 };
        assert_eq!(reconstruct_sequence(&set, window).unwrap(), SEQ);
    }

    #[test]
    fn test_wrong_register_is_rejected() {
        let set = windows(4, 1, 0);
        let err = reconstruct_sequence(&set, SequenceWindow::default()).unwrap_err();
        assert_eq!(err, SequenceError::Origin { expected: 1, found: 0 });
    }

    #[test]
    fn test_gap_is_rejected() {
        let mut set = windows(4, 1, 1);
        set.rows.retain(|r| r.pos != 3);
        let err = reconstruct_sequence(&set, SequenceWindow::default()).unwrap_err();
        assert_eq!(err, SequenceError::Gap { expected: 3, found: 4 });
    }

    #[test]
    fn test_mismatched_overlap_is_rejected() {
        let mut set = windows(4, 1, 1);
        for row in set.rows.iter_mut().filter(|r| r.pos == 2) {
            row.peptide = "XXXX".into();
        }
        let err = reconstruct_sequence(&set, SequenceWindow::default()).unwrap_err();
        assert_eq!(err, SequenceError::Mismatch { pos: 1, next: 2 });
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let set = windows(4, 1, 1);
        let a = summarize(&set, SequenceWindow::default());
        let b = summarize(&set, SequenceWindow::default());
        assert_eq!(a, b);
        assert_eq!(a.rows, 14);
        assert_eq!(a.peptide_length, 4);
        assert_eq!(a.sequence.as_deref(), Some(SEQ));
        assert_eq!(a.sequence_length, Some(10));
    }

    #[test]
    fn test_summarize_without_sequence() {
        let set = windows(4, 1, 5);
        let summary = summarize(&set, SequenceWindow::default());
        assert_eq!(summary.sequence, None);
        assert_eq!(summary.peptide_length, 4);
    }
}
