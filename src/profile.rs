use crate::alphabet::Letter;
use crate::bias::BiasCorrection;
use crate::error::{Error, Result};
use crate::score_matrix::ScoreMatrix;
use crate::simd::{PROFILE_WIDTH, ProfileRow, Score};

/// Score of the padding letter in the exact rows, low enough that a padded cell never
/// starts an alignment
const PADDING_SCORE: i32 = -(1 << 16);

/// Substitution scores of every query position against every letter, with the composition
/// correction folded in. Kept in three forms: exact `i32` for the scalar path, saturated
/// `i8` for signed lanes and `u8` shifted up by [`QueryProfile::bias`] for unsigned lanes.
#[derive(Debug, Clone)]
pub struct QueryProfile {
    exact: Vec<ProfileRow<i32>>,
    signed: Vec<ProfileRow<i8>>,
    unsigned: Vec<ProfileRow<u8>>,
    bias: u8,
    alphabet_size: usize,
}

impl QueryProfile {
    pub fn new(
        query: &[Letter],
        matrix: &ScoreMatrix,
        correction: Option<&BiasCorrection>,
    ) -> Self {
        debug_assert!(correction.is_none_or(|c| c.len() == query.len()));
        let alphabet_size = matrix.alphabet_size();

        let exact: Vec<ProfileRow<i32>> = query
            .iter()
            .enumerate()
            .map(|(i, &q)| {
                let offset = correction.map_or(0, |c| c.rounded()[i] as i32);
                std::array::from_fn(|letter| {
                    if letter < alphabet_size && (q as usize) < alphabet_size {
                        matrix.score(q, letter as Letter) + offset
                    } else {
                        PADDING_SCORE
                    }
                })
            })
            .collect();

        // lift the lowest real score to zero in unsigned lanes
        let lowest = exact
            .iter()
            .flat_map(|row| row[..alphabet_size.min(PROFILE_WIDTH)].iter())
            .copied()
            .filter(|&score| score != PADDING_SCORE)
            .min()
            .unwrap_or(0);
        let bias = u8::saturate(-lowest);

        let signed = exact
            .iter()
            .map(|row| row.map(|score| if score == PADDING_SCORE { i8::MIN } else { i8::saturate(score) }))
            .collect();
        let unsigned = exact
            .iter()
            .map(|row| {
                row.map(|score| {
                    if score == PADDING_SCORE { 0 } else { u8::saturate(score + bias as i32) }
                })
            })
            .collect();

        Self {
            exact,
            signed,
            unsigned,
            bias,
            alphabet_size,
        }
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Corrected substitution score of query position `i` against `letter`
    #[inline(always)]
    pub fn score(&self, i: usize, letter: Letter) -> i32 {
        self.exact[i]
            .get(letter as usize)
            .copied()
            .unwrap_or(PADDING_SCORE)
    }

    pub fn signed_rows(&self) -> &[ProfileRow<i8>] {
        &self.signed
    }

    pub fn unsigned_rows(&self) -> &[ProfileRow<u8>] {
        &self.unsigned
    }

    /// Offset added to every unsigned entry so the lowest real score is zero
    pub fn bias(&self) -> u8 {
        self.bias
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Letters outside the alphabet score differently in each lane type, so targets holding
    /// one are refused
    pub fn check_target(&self, target: &[Letter]) -> Result<()> {
        match target
            .iter()
            .find(|&&letter| letter as usize >= self.alphabet_size)
        {
            Some(&letter) => Err(Error::LetterOutOfAlphabet {
                letter,
                alphabet_size: self.alphabet_size,
            }),
            None => Ok(()),
        }
    }

    /// Whether every real score fits a signed lane unchanged
    pub fn fits_signed(&self) -> bool {
        self.exact
            .iter()
            .flatten()
            .all(|&score| score == PADDING_SCORE || (i8::MIN as i32..=i8::MAX as i32).contains(&score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{PADDING_LETTER, Sequence, encode};

    #[test]
    fn test_rows_and_bias() {
        let query: Sequence = "AW".parse().unwrap();
        let profile = QueryProfile::new(&query, &ScoreMatrix::blosum62(), None);

        assert_eq!(profile.len(), 2);
        assert_eq!(profile.score(1, encode(b'W')), 11);
        assert_eq!(profile.bias(), 4);
        assert_eq!(profile.signed_rows()[0][encode(b'A') as usize], 4);
        assert_eq!(profile.unsigned_rows()[0][encode(b'A') as usize], 8);
        assert_eq!(profile.unsigned_rows()[1][encode(b'*') as usize], 0);
        assert!(profile.fits_signed());
    }

    #[test]
    fn test_check_target() {
        let query: Sequence = "MK".parse().unwrap();
        let profile = QueryProfile::new(&query, &ScoreMatrix::blosum62(), None);
        assert_eq!(profile.alphabet_size(), 25);
        assert_eq!(profile.check_target(&[0, 24, 3]), Ok(()));
        assert_eq!(
            profile.check_target(&[0, 25]),
            Err(Error::LetterOutOfAlphabet {
                letter: 25,
                alphabet_size: 25
            })
        );
        assert!(profile.check_target(&[PADDING_LETTER]).is_err());
    }

    #[test]
    fn test_padding_scores_lowest() {
        let query: Sequence = "MK".parse().unwrap();
        let profile = QueryProfile::new(&query, &ScoreMatrix::blosum62(), None);
        let pad = PADDING_LETTER as usize;
        assert_eq!(profile.signed_rows()[0][pad], i8::MIN);
        assert_eq!(profile.unsigned_rows()[0][pad], 0);
        assert!(profile.score(0, PADDING_LETTER) < -1000);
    }

    #[test]
    fn test_correction_is_folded_in() {
        let query: Sequence = "QQQQQQQQQQ".parse().unwrap();
        let matrix = ScoreMatrix::blosum62();
        let correction = BiasCorrection::new(&query, &matrix);
        let profile = QueryProfile::new(&query, &matrix, Some(&correction));
        let q = encode(b'Q');
        assert_eq!(
            profile.score(3, q),
            matrix.score(q, q) + correction.rounded()[3] as i32
        );
    }
}
