use super::LaneScore;
use super::cell::{CellParams, cell_update};
use crate::Scoring;
use crate::alphabet::{Letter, PADDING_LETTER};
use crate::simd::transpose::{TILE, transpose_block};
use crate::simd::{ProfileRow, ScoreVector};

/// Full Smith-Waterman of one query against up to `V::LANES` targets, one per lane.
///
/// The matrix is walked column by column over the longest target. Target letters are
/// transposed `TILE` columns at a time so each column is a single vector load, and lanes
/// whose target already ended read [`PADDING_LETTER`].
///
/// # Safety
///
/// The target features of `V` must be available and `targets.len() <= V::LANES`.
#[inline(always)]
pub unsafe fn swipe<V: ScoreVector>(
    rows: &[ProfileRow<V::Score>],
    bias: V::Score,
    targets: &[&[Letter]],
    scoring: &Scoring,
) -> Vec<LaneScore> {
    debug_assert!(targets.len() <= V::LANES);

    let lanes = V::LANES;
    let columns = targets.iter().map(|target| target.len()).max().unwrap_or(0);
    if rows.is_empty() || columns == 0 {
        return vec![LaneScore::default(); targets.len()];
    }

    unsafe {
        let params = CellParams::<V>::new(scoring, bias);
        let mut cells = vec![V::zero(); rows.len()];
        let mut horizontal_gaps = vec![V::zero(); rows.len()];
        let mut best = V::zero();

        let mut block = vec![PADDING_LETTER; lanes * TILE];
        let mut letters = vec![PADDING_LETTER; TILE * lanes];

        for start in (0..columns).step_by(TILE) {
            for (lane, window) in block.chunks_exact_mut(TILE).enumerate() {
                let chunk = targets
                    .get(lane)
                    .and_then(|target| target.get(start..(start + TILE).min(target.len())))
                    .unwrap_or_default();
                window[..chunk.len()].copy_from_slice(chunk);
                window[chunk.len()..].fill(PADDING_LETTER);
            }
            transpose_block(&block, lanes, TILE, &mut letters);

            for column in letters.chunks_exact(lanes).take(columns - start) {
                let mut diagonal = V::zero();
                let mut vertical_gap = V::zero();
                for ((row, cell), horizontal_gap) in
                    rows.iter().zip(cells.iter_mut()).zip(horizontal_gaps.iter_mut())
                {
                    let scores = V::lookup(row, column.as_ptr());
                    let left = *cell;
                    *cell = cell_update(
                        diagonal,
                        scores,
                        horizontal_gap,
                        &mut vertical_gap,
                        &mut best,
                        &params,
                    );
                    diagonal = left;
                }
            }
        }

        super::lane_scores(best, bias, targets.len())
    }
}
