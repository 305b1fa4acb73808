use super::LaneScore;
use super::cell::{CellParams, cell_update};
use crate::Scoring;
use crate::alphabet::{Letter, PADDING_LETTER};
use crate::error::{Error, Result};
use crate::simd::transpose::{TILE, transpose_block};
use crate::simd::{ProfileRow, Score, ScoreVector};

/// A target restricted to the diagonals `lo..=hi`, where diagonal `d` holds the cells with
/// `query_pos - target_pos == d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpTarget<'a> {
    sequence: &'a [Letter],
    lo: i32,
    hi: i32,
}

impl<'a> DpTarget<'a> {
    pub fn new(sequence: &'a [Letter], lo: i32, hi: i32) -> Result<Self> {
        if lo > hi {
            return Err(Error::InvertedBand { lo, hi });
        }
        Ok(Self { sequence, lo, hi })
    }

    /// Band covering every diagonal of the matrix against a query of `query_len` residues
    pub fn full(sequence: &'a [Letter], query_len: usize) -> Self {
        Self {
            sequence,
            lo: -(sequence.len() as i32),
            hi: query_len as i32,
        }
    }

    pub fn sequence(&self) -> &'a [Letter] {
        self.sequence
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    /// Clips the band to the diagonals that exist in the matrix
    pub(crate) fn clip(&self, query_len: usize) -> Result<BandedLane<'a>> {
        if query_len == 0 || self.sequence.is_empty() {
            return Ok(BandedLane::empty());
        }
        let (min_diagonal, max_diagonal) = (1 - self.sequence.len() as i32, query_len as i32 - 1);
        if self.hi < min_diagonal || self.lo > max_diagonal {
            return Err(Error::BandOutOfRange {
                lo: self.lo,
                hi: self.hi,
                query_len,
                target_len: self.sequence.len(),
            });
        }
        let (lo, hi) = (self.lo.max(min_diagonal), self.hi.min(max_diagonal));
        Ok(BandedLane {
            sequence: self.sequence,
            lo,
            hi,
        })
    }
}

/// A band already clipped to the matrix, so `lo <= hi` lie inside it unless the lane is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BandedLane<'a> {
    pub sequence: &'a [Letter],
    pub lo: i32,
    pub hi: i32,
}

impl<'a> BandedLane<'a> {
    pub fn empty() -> Self {
        Self {
            sequence: &[],
            lo: 0,
            hi: -1,
        }
    }

    pub fn width(&self) -> usize {
        (self.hi - self.lo + 1).max(0) as usize
    }

    /// Query rows crossed by the band
    fn rows(&self) -> std::ops::Range<usize> {
        if self.width() == 0 {
            return 0..0;
        }
        let begin = self.lo.max(0) as usize;
        let end = (self.hi + self.sequence.len() as i32) as usize;
        begin..end
    }

    /// Writes the target letter of every band slot of query row `i`, slot `k` holding
    /// diagonal `hi - k`. Slots outside the target keep the padding letter.
    fn fill_slots(&self, i: usize, slots: &mut [u8]) {
        slots.fill(PADDING_LETTER);
        let width = self.width() as i64;
        if width == 0 {
            return;
        }
        let first = i as i64 - self.hi as i64;
        let begin = (-first).clamp(0, width);
        let end = (self.sequence.len() as i64 - first).clamp(begin, width);
        if begin < end {
            slots[begin as usize..end as usize].copy_from_slice(
                &self.sequence[(first + begin) as usize..(first + end) as usize],
            );
        }
    }
}

/// Smith-Waterman restricted to each lane's diagonal band.
///
/// Cells are stored per band slot rather than per target position. Moving down one query
/// row keeps the diagonal predecessor in the same slot, the horizontal predecessor sits in
/// the slot before and the vertical one in the slot after, so both buffers update in place
/// while `k` ascends. Cells outside a lane's band read the padding letter and have their
/// inputs cleared, which keeps them at zero.
///
/// # Safety
///
/// The target features of `V` must be available and `lanes.len() <= V::LANES`.
#[inline(always)]
pub(crate) unsafe fn banded_swipe<V: ScoreVector>(
    rows: &[ProfileRow<V::Score>],
    bias: V::Score,
    lanes: &[BandedLane],
    scoring: &Scoring,
) -> Vec<LaneScore> {
    debug_assert!(lanes.len() <= V::LANES);

    let band = lanes.iter().map(BandedLane::width).max().unwrap_or(0);
    if rows.is_empty() || band == 0 {
        return vec![LaneScore::default(); lanes.len()];
    }
    let row_begin = lanes
        .iter()
        .filter(|lane| lane.width() > 0)
        .map(|lane| lane.rows().start)
        .min()
        .unwrap_or(0);
    let row_end = lanes
        .iter()
        .map(|lane| lane.rows().end)
        .max()
        .unwrap_or(0)
        .min(rows.len());

    let stride = band.div_ceil(TILE) * TILE;

    unsafe {
        let params = CellParams::<V>::new(scoring, bias);
        let padding = V::splat(V::Score::from_bits(PADDING_LETTER));
        let mut cells = vec![V::zero(); band];
        let mut vertical_gaps = vec![V::zero(); band];
        let mut best = V::zero();

        let mut block = vec![PADDING_LETTER; V::LANES * stride];
        let mut letters = vec![PADDING_LETTER; stride * V::LANES];

        for (i, row) in rows.iter().enumerate().take(row_end).skip(row_begin) {
            for (lane, slots) in block.chunks_exact_mut(stride).enumerate() {
                match lanes.get(lane) {
                    Some(target) => target.fill_slots(i, slots),
                    None => slots.fill(PADDING_LETTER),
                }
            }
            transpose_block(&block, V::LANES, stride, &mut letters);

            let mut horizontal_gap = V::zero();
            for (k, column) in letters.chunks_exact(V::LANES).take(band).enumerate() {
                let scores = V::lookup(row, column.as_ptr());
                let outside = V::load_letters(column.as_ptr()).cmpeq(padding);

                let diagonal = cells[k].and_not(outside);
                horizontal_gap = horizontal_gap.and_not(outside);
                let mut vertical_gap = vertical_gaps[k].and_not(outside);

                cells[k] = cell_update(
                    diagonal,
                    scores,
                    &mut horizontal_gap,
                    &mut vertical_gap,
                    &mut best,
                    &params,
                );
                if k > 0 {
                    vertical_gaps[k - 1] = vertical_gap;
                }
            }
        }

        super::lane_scores(best, bias, lanes.len())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::profile::QueryProfile;
    use crate::score_matrix::ScoreMatrix;
    use crate::simd::PortableVector;
    use crate::smith_waterman::{reference, swipe::swipe};

    fn random_sequence(rng: &mut StdRng, len: usize) -> Vec<Letter> {
        (0..len).map(|_| rng.random_range(0..20)).collect()
    }

    #[test]
    fn test_rejects_inverted_band() {
        assert_eq!(
            DpTarget::new(&[0, 1, 2], 5, 2),
            Err(Error::InvertedBand { lo: 5, hi: 2 })
        );
    }

    #[test]
    fn test_clip() {
        let target = [0; 10];
        let lane = DpTarget::new(&target, -32, 32).unwrap().clip(6).unwrap();
        assert_eq!((lane.lo, lane.hi), (-9, 5));
        assert_eq!(lane.width(), 15);

        let err = DpTarget::new(&target, 6, 9).unwrap().clip(6).unwrap_err();
        assert!(matches!(err, Error::BandOutOfRange { .. }));
        let err = DpTarget::new(&target, -20, -10).unwrap().clip(6).unwrap_err();
        assert!(matches!(err, Error::BandOutOfRange { .. }));

        assert_eq!(DpTarget::new(&[], 3, 4).unwrap().clip(6).unwrap().width(), 0);
    }

    #[test]
    fn test_fill_slots() {
        let target = [1, 2, 3, 4];
        let lane = DpTarget::new(&target, -1, 1).unwrap().clip(4).unwrap();
        let mut slots = [0; 4];
        // row 0: slot 0 is diagonal 1 (target -1), slot 1 diagonal 0, slot 2 diagonal -1
        lane.fill_slots(0, &mut slots);
        assert_eq!(slots, [PADDING_LETTER, 1, 2, PADDING_LETTER]);
        lane.fill_slots(3, &mut slots);
        assert_eq!(slots, [3, 4, PADDING_LETTER, PADDING_LETTER]);
    }

    #[test]
    fn test_full_band_equals_swipe() {
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = ScoreMatrix::blosum62();
        let scoring = Scoring::default();
        for _ in 0..20 {
            let len = rng.random_range(1..50);
            let query = random_sequence(&mut rng, len);
            let profile = QueryProfile::new(&query, &matrix, None);
            let targets: Vec<Vec<Letter>> = (0..rng.random_range(1..=16))
                .map(|_| {
                    let len = rng.random_range(0..60);
                    random_sequence(&mut rng, len)
                })
                .collect();
            let views: Vec<&[Letter]> = targets.iter().map(|t| t.as_slice()).collect();
            let lanes: Vec<BandedLane> = views
                .iter()
                .map(|t| DpTarget::full(t, query.len()).clip(query.len()).unwrap())
                .collect();

            unsafe {
                let full = swipe::<PortableVector<i8, 16>>(profile.signed_rows(), 0, &views, &scoring);
                let banded =
                    banded_swipe::<PortableVector<i8, 16>>(profile.signed_rows(), 0, &lanes, &scoring);
                assert_eq!(full, banded);
            }
        }
    }

    #[test]
    fn test_narrow_bands_match_reference() {
        let mut rng = StdRng::seed_from_u64(5);
        let matrix = ScoreMatrix::blosum62();
        let scoring = Scoring::default();
        for _ in 0..30 {
            let len = rng.random_range(1..80);
            let query = random_sequence(&mut rng, len);
            let profile = QueryProfile::new(&query, &matrix, None);
            let targets: Vec<(Vec<Letter>, i32, i32)> = (0..rng.random_range(1..=16))
                .map(|_| {
                    let len = rng.random_range(1..80);
                    let lo = rng.random_range(-(len as i32) + 1..query.len() as i32);
                    let hi = lo + rng.random_range(0..12);
                    (random_sequence(&mut rng, len), lo, hi)
                })
                .collect();
            let lanes: Vec<BandedLane> = targets
                .iter()
                .map(|(t, lo, hi)| DpTarget::new(t, *lo, *hi).unwrap().clip(query.len()).unwrap())
                .collect();

            let scores = unsafe {
                banded_swipe::<PortableVector<u8, 16>>(
                    profile.unsigned_rows(),
                    profile.bias(),
                    &lanes,
                    &scoring,
                )
            };
            for (lane, score) in lanes.iter().zip(scores) {
                let expected =
                    reference::banded_smith_waterman(&profile, lane.sequence, lane.lo, lane.hi, &scoring);
                assert!(!score.overflow);
                assert_eq!(score.score, expected, "band [{}, {}]", lane.lo, lane.hi);
            }
        }
    }

    #[test]
    fn test_band_misses_optimal_path() {
        let matrix = ScoreMatrix::match_mismatch(3, -3);
        let scoring = Scoring::default();
        // the shared run sits on diagonal 4
        let query: Vec<Letter> = [19, 19, 19, 19, 0, 1, 2, 3, 4, 5].to_vec();
        let target: Vec<Letter> = [0, 1, 2, 3, 4, 5].to_vec();
        let profile = QueryProfile::new(&query, &matrix, None);

        let score = |lo, hi| {
            let lane = DpTarget::new(&target, lo, hi).unwrap().clip(query.len()).unwrap();
            unsafe {
                banded_swipe::<PortableVector<i8, 4>>(profile.signed_rows(), 0, &[lane], &scoring)[0]
                    .score
            }
        };
        assert_eq!(score(3, 5), 18);
        assert!(score(-2, 2) < 18);
    }
}
