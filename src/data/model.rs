use serde::{Deserialize, Serialize};

/// Largest start position a result file may contain.
pub const MAX_POSITION: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// Prediction – one row of a result file
// ---------------------------------------------------------------------------

/// A single scored peptide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub peptide: String,
    /// Start position of the peptide in the parent sequence.
    pub pos: i64,
    pub score: f64,
    pub allele: String,
}

impl Prediction {
    /// Number of residues covered by the peptide.
    pub fn residues(&self) -> usize {
        self.peptide.chars().count()
    }

    /// One past the last residue covered.
    pub fn end(&self) -> i64 {
        let residues = i64::try_from(self.residues()).unwrap_or(i64::MAX);
        self.pos.saturating_add(residues)
    }
}

// ---------------------------------------------------------------------------
// ResultSet – one predictor's output for one entity
// ---------------------------------------------------------------------------

/// All rows of one result file, in file order.
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub predictor: String,
    pub rows: Vec<Prediction>,
}

impl ResultSet {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the file had no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest peptide (the n-mer size of the predictor).
    pub fn peptide_length(&self) -> usize {
        self.rows.iter().map(Prediction::residues).max().unwrap_or(0)
    }

    /// One past the last residue covered by any peptide.
    pub fn span_end(&self) -> Option<i64> {
        self.rows.iter().map(Prediction::end).max()
    }

    /// Position of the first peptide.
    pub fn span_start(&self) -> Option<i64> {
        self.rows.iter().map(|r| r.pos).min()
    }

    /// Rows sorted by descending score, at most `limit` of them.
    pub fn top_scoring(&self, limit: usize) -> Vec<Prediction> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.pos.cmp(&b.pos)));
        rows.truncate(limit);
        rows
    }
}
