use crate::alphabet::{AMINO_ACID_COUNT, Letter, MAX_ALPHABET_SIZE};
use crate::error::{Error, Result};

#[rustfmt::skip]
const BLOSUM62: [i8; AMINO_ACID_COUNT * AMINO_ACID_COUNT] = [
//   A,  R,  N,  D,  C,  Q,  E,  G,  H,  I,  L,  K,  M,  F,  P,  S,  T,  W,  Y,  V,  B,  J,  Z,  X,  *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1, -1, -1, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1, -2,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  4, -3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4, -3,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -1, -3, -1, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0, -2,  4, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1, -3,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -4, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0, -3,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3,  3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4,  3, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0, -3,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3,  2, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3,  0, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -3, -1, -1, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0, -2,  0, -1, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1, -1, -1, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -2, -2, -1, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -1, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3,  2, -2, -1, -4, // V
    -2, -1,  4,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4, -3,  0, -1, -4, // B
    -1, -2, -3, -3, -1, -2, -3, -4, -3,  3,  3, -3,  2,  0, -3, -2, -1, -2, -1,  2, -3,  3, -3, -1, -4, // J
    -1,  0,  0,  1, -3,  4,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -2, -2, -2,  0, -3,  4, -1, -4, // Z
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];

/// Robinson & Robinson residue frequencies, zero for ambiguity codes and stop
#[rustfmt::skip]
const ROBINSON_FREQUENCIES: [f64; AMINO_ACID_COUNT] = [
    0.07805, 0.05129, 0.04487, 0.05364, 0.01925, 0.04264, 0.06295, 0.07377, 0.02199, 0.05142,
    0.09019, 0.05744, 0.02243, 0.03856, 0.05203, 0.07120, 0.05841, 0.01330, 0.03216, 0.06441,
    0.0, 0.0, 0.0, 0.0, 0.0,
];

/// Symmetric substitution scores over an alphabet of at most 31 letters, with the
/// background residue frequencies used by the composition correction
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    alphabet_size: usize,
    scores: Vec<i8>,
    background: Vec<f64>,
    min_score: i8,
    max_score: i8,
}

impl ScoreMatrix {
    /// Builds a matrix from row-major `scores`. Background frequencies are normalized to sum to 1.
    pub fn new(alphabet_size: usize, scores: Vec<i8>, background: Vec<f64>) -> Result<Self> {
        if alphabet_size == 0 || alphabet_size > MAX_ALPHABET_SIZE {
            return Err(Error::InvalidMatrix(format!(
                "alphabet size {alphabet_size} outside 1..={MAX_ALPHABET_SIZE}"
            )));
        }
        if scores.len() != alphabet_size * alphabet_size {
            return Err(Error::InvalidMatrix(format!(
                "expected {} scores, got {}",
                alphabet_size * alphabet_size,
                scores.len()
            )));
        }
        if background.len() != alphabet_size {
            return Err(Error::InvalidMatrix(format!(
                "expected {alphabet_size} background frequencies, got {}",
                background.len()
            )));
        }
        for a in 0..alphabet_size {
            for b in 0..a {
                if scores[a * alphabet_size + b] != scores[b * alphabet_size + a] {
                    return Err(Error::InvalidMatrix(format!(
                        "scores for letters {a} and {b} are not symmetric"
                    )));
                }
            }
        }

        let total: f64 = background.iter().sum();
        if background.iter().any(|p| !p.is_finite() || *p < 0.0) || total <= 0.0 {
            return Err(Error::InvalidMatrix(
                "background frequencies must be non-negative with a positive sum".into(),
            ));
        }
        let background = background.into_iter().map(|p| p / total).collect();

        let min_score = scores.iter().copied().min().unwrap_or(0);
        let max_score = scores.iter().copied().max().unwrap_or(0);
        Ok(Self {
            alphabet_size,
            scores,
            background,
            min_score,
            max_score,
        })
    }

    pub fn blosum62() -> Self {
        Self {
            alphabet_size: AMINO_ACID_COUNT,
            scores: BLOSUM62.to_vec(),
            background: ROBINSON_FREQUENCIES.to_vec(),
            min_score: -4,
            max_score: 11,
        }
        .normalized()
    }

    /// Identity scoring over the amino acid alphabet with a uniform background
    pub fn match_mismatch(match_score: i8, mismatch_score: i8) -> Self {
        let n = AMINO_ACID_COUNT;
        let scores = (0..n * n)
            .map(|i| if i / n == i % n { match_score } else { mismatch_score })
            .collect();
        Self {
            alphabet_size: n,
            scores,
            background: vec![1.0 / n as f64; n],
            min_score: match_score.min(mismatch_score),
            max_score: match_score.max(mismatch_score),
        }
    }

    fn normalized(mut self) -> Self {
        let total: f64 = self.background.iter().sum();
        self.background.iter_mut().for_each(|p| *p /= total);
        self
    }

    #[inline(always)]
    pub fn score(&self, a: Letter, b: Letter) -> i32 {
        debug_assert!((a as usize) < self.alphabet_size && (b as usize) < self.alphabet_size);
        self.scores[a as usize * self.alphabet_size + b as usize] as i32
    }

    pub fn row(&self, a: Letter) -> &[i8] {
        let start = a as usize * self.alphabet_size;
        &self.scores[start..start + self.alphabet_size]
    }

    /// Expected score of `a` against a residue drawn from the background
    pub fn expected_score(&self, a: Letter) -> f64 {
        self.row(a)
            .iter()
            .zip(&self.background)
            .map(|(&s, p)| s as f64 * p)
            .sum()
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn min_score(&self) -> i32 {
        self.min_score as i32
    }

    pub fn max_score(&self) -> i32 {
        self.max_score as i32
    }

    pub fn background(&self) -> &[f64] {
        &self.background
    }
}
