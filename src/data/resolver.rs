use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

// ---------------------------------------------------------------------------
// Resolver – which entities have results on disk
// ---------------------------------------------------------------------------

/// Finds the entity names available under a results directory.
#[derive(Debug, Clone)]
pub struct Resolver {
    predictors: Vec<String>,
}

impl Resolver {
    pub fn new(predictors: Vec<String>) -> Self {
        Self { predictors }
    }

    /// Sorted, deduplicated stems of every `base/<predictor>/*.csv`.
    ///
    /// Missing or unreadable directories contribute nothing.
    pub fn list_entities(&self, base: &Path) -> Vec<String> {
        let mut names = BTreeSet::new();
        for predictor in &self.predictors {
            let dir = base.join(predictor);
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::debug!("skipping {}: {e}", dir.display());
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() || path.extension().map_or(true, |ext| ext != "csv") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.insert(stem.to_string());
                }
            }
        }
        names.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(base: &Path, predictor: &str, file: &str) {
        let dir = base.join(predictor);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), "peptide,pos,score,allele\n").unwrap();
    }

    fn resolver() -> Resolver {
        Resolver::new(vec!["predictorA".into(), "predictorB".into()])
    }

    #[test]
    fn test_nonexistent_base_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(resolver().list_entities(&tmp.path().join("missing")).is_empty());
        assert!(resolver().list_entities(tmp.path()).is_empty());
    }

    #[test]
    fn test_union_is_sorted_and_deduplicated() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "predictorA", "seq2.csv");
        touch(tmp.path(), "predictorA", "seq1.csv");
        touch(tmp.path(), "predictorB", "seq1.csv");
        touch(tmp.path(), "predictorB", "seq3.csv");

        assert_eq!(resolver().list_entities(tmp.path()), vec!["seq1", "seq2", "seq3"]);
    }

    #[test]
    fn test_unknown_predictors_and_other_files_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "predictorA", "seq1.csv");
        touch(tmp.path(), "predictorA", "notes.txt");
        touch(tmp.path(), "other", "seq9.csv");
        fs::create_dir_all(tmp.path().join("predictorA").join("nested.csv")).unwrap();

        assert_eq!(resolver().list_entities(tmp.path()), vec!["seq1"]);
    }
}
