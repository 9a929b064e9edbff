//! Write a demo results tree: `<out>/<predictor>/<entity>.csv`.
//!
//! Usage: `generate_sample [OUT_DIR]` (default `results`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

const ENTITIES: &[(&str, usize)] = &[("Rv0011c", 99), ("Rv0012", 260), ("Rv3874", 180)];

/// (predictor, peptide length, alleles)
const PREDICTORS: &[(&str, usize, &[&str])] = &[
    ("tepitope", 15, &["HLA-DRB1*01:01", "HLA-DRB1*04:01", "HLA-DRB1*07:01"]),
    ("netmhciipan", 15, &["HLA-DRB1*01:01", "HLA-DRB1*15:01"]),
    ("iedbmhc1", 9, &["HLA-A*01:01", "HLA-A*02:01", "HLA-B*07:02"]),
    ("mhcflurry", 9, &["HLA-A*02:01", "HLA-B*07:02"]),
];

#[derive(Serialize)]
struct Row<'a> {
    peptide: String,
    pos: usize,
    score: f64,
    allele: &'a str,
    name: &'a str,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }
}

fn random_protein(len: usize, rng: &mut SimpleRng) -> String {
    (0..len)
        .map(|_| AMINO_ACIDS[rng.below(AMINO_ACIDS.len())] as char)
        .collect()
}

/// Score profile along the sequence: a few binding hot spots plus noise.
fn score_profile(windows: usize, rng: &mut SimpleRng) -> Vec<f64> {
    let peaks: Vec<(f64, f64, f64)> = (0..4)
        .map(|_| {
            let mu = rng.next_f64() * windows as f64;
            let sigma = 1.5 + rng.next_f64() * 3.0;
            let amp = 4.0 + rng.next_f64() * 5.0;
            (mu, sigma, amp)
        })
        .collect();

    (0..windows)
        .map(|i| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(i as f64, mu, sigma, amp))
                .sum();
            signal + rng.next_f64() * 2.0
        })
        .collect()
}

fn write_result(
    path: &Path,
    entity: &str,
    sequence: &str,
    peptide_len: usize,
    alleles: &[&str],
    rng: &mut SimpleRng,
) -> Result<usize> {
    let windows = sequence.len() + 1 - peptide_len;
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    let mut rows = 0;

    for &allele in alleles {
        let profile = score_profile(windows, rng);
        for (i, score) in profile.into_iter().enumerate() {
            writer.serialize(Row {
                peptide: sequence[i..i + peptide_len].to_string(),
                pos: i + 1,
                score: (score * 100.0).round() / 100.0,
                allele,
                name: entity,
            })?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let out: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("results"));

    let mut rng = SimpleRng::new(42);

    for &(entity, length) in ENTITIES {
        let sequence = random_protein(length, &mut rng);
        for &(predictor, peptide_len, alleles) in PREDICTORS {
            let dir = out.join(predictor);
            fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join(format!("{entity}.csv"));
            let rows = write_result(&path, entity, &sequence, peptide_len, alleles, &mut rng)?;
            println!("Wrote {} ({rows} rows)", path.display());
        }
    }
    Ok(())
}
