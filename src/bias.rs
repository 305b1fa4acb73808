use crate::alphabet::Letter;
use crate::r#const::BIAS_WINDOW;
use crate::score_matrix::ScoreMatrix;

/// Per query position score offset that removes the local compositional bias of the query.
///
/// For position `i` the correction is the expected score of `q[i]` against the background
/// minus the mean score of `q[i]` against its neighbours in a centred window of
/// `BIAS_WINDOW` residues (the residue itself excluded). Low complexity stretches, where
/// neighbours score highly against each other, receive a negative correction.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasCorrection {
    values: Vec<f32>,
    rounded: Vec<i8>,
}

impl BiasCorrection {
    pub fn new(query: &[Letter], matrix: &ScoreMatrix) -> Self {
        let half = BIAS_WINDOW / 2;
        let len = query.len();

        // residue counts inside the sliding window
        let mut counts = vec![0i32; matrix.alphabet_size()];
        let (mut begin, mut end) = (0, 0);

        let values: Vec<f32> = (0..len)
            .map(|i| {
                let (lo, hi) = (i.saturating_sub(half), (i + half + 1).min(len));
                while end < hi {
                    if let Some(count) = counts.get_mut(query[end] as usize) {
                        *count += 1;
                    }
                    end += 1;
                }
                while begin < lo {
                    if let Some(count) = counts.get_mut(query[begin] as usize) {
                        *count -= 1;
                    }
                    begin += 1;
                }

                let letter = query[i];
                let neighbours = hi - lo - 1;
                if neighbours == 0 || letter as usize >= matrix.alphabet_size() {
                    return 0.0;
                }
                let window_score: i32 = matrix
                    .row(letter)
                    .iter()
                    .zip(&counts)
                    .map(|(&score, &count)| score as i32 * count)
                    .sum::<i32>()
                    - matrix.score(letter, letter);

                (matrix.expected_score(letter) - window_score as f64 / neighbours as f64) as f32
            })
            .collect();

        let rounded = values.iter().map(|v| v.round() as i8).collect();
        Self { values, rounded }
    }

    /// No correction for a query of `len` residues
    pub fn zero(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
            rounded: vec![0; len],
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Corrections rounded half away from zero, as added to the substitution scores
    pub fn rounded(&self) -> &[i8] {
        &self.rounded
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
