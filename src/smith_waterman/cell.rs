use crate::Scoring;
use crate::simd::{Score, ScoreVector};

/// Gap costs and lane bias broadcast once per batch
#[derive(Debug, Clone, Copy)]
pub struct CellParams<V: ScoreVector> {
    pub gap_open: V,
    pub gap_extend: V,
    /// Subtracted from every lookup, zero for signed lanes
    pub bias: V,
}

impl<V: ScoreVector> CellParams<V> {
    /// # Safety
    ///
    /// The target features of `V` must be available.
    #[inline(always)]
    pub unsafe fn new(scoring: &Scoring, bias: V::Score) -> Self {
        unsafe {
            Self {
                gap_open: V::splat(V::Score::saturate(scoring.gap_open_penalty as i32)),
                gap_extend: V::splat(V::Score::saturate(scoring.gap_extend_penalty as i32)),
                bias: V::splat(bias),
            }
        }
    }
}

/// Computes one matrix cell in every lane and prepares both gap states for the next cell.
///
/// ```text
/// cell  = max(diagonal + scores - bias, 0, horizontal_gap, vertical_gap)
/// best  = max(best, cell)
/// gap'  = max(gap - gap_extend, cell - gap_open)      for both gaps
/// ```
///
/// # Safety
///
/// The target features of `V` must be available.
#[inline(always)]
pub unsafe fn cell_update<V: ScoreVector>(
    diagonal: V,
    scores: V,
    horizontal_gap: &mut V,
    vertical_gap: &mut V,
    best: &mut V,
    params: &CellParams<V>,
) -> V {
    unsafe {
        let cell = diagonal.adds(scores).subs(params.bias).max(V::zero());
        let cell = cell.max(*horizontal_gap).max(*vertical_gap);
        *best = best.max(cell);

        let open = cell.subs(params.gap_open);
        *horizontal_gap = horizontal_gap.subs(params.gap_extend).max(open);
        *vertical_gap = vertical_gap.subs(params.gap_extend).max(open);
        cell
    }
}
