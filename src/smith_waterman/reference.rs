//! Scalar Smith-Waterman in 32-bit arithmetic. Never saturates, so it scores the lanes that
//! overflowed and checks the vector kernels in tests.

use crate::Scoring;
use crate::alphabet::Letter;
use crate::profile::QueryProfile;

pub fn smith_waterman(profile: &QueryProfile, target: &[Letter], scoring: &Scoring) -> i32 {
    align(profile, target, scoring, |_, _| true)
}

/// Only cells with `lo <= i - j <= hi` take part
pub fn banded_smith_waterman(
    profile: &QueryProfile,
    target: &[Letter],
    lo: i32,
    hi: i32,
    scoring: &Scoring,
) -> i32 {
    align(profile, target, scoring, |i, j| {
        (lo..=hi).contains(&(i as i32 - j as i32))
    })
}

fn align(
    profile: &QueryProfile,
    target: &[Letter],
    scoring: &Scoring,
    in_band: impl Fn(usize, usize) -> bool,
) -> i32 {
    let gap_open = scoring.gap_open_penalty as i32;
    let gap_extend = scoring.gap_extend_penalty as i32;

    let mut cells = vec![0; profile.len()];
    let mut horizontal_gaps = vec![0; profile.len()];
    let mut best = 0;

    for (j, &letter) in target.iter().enumerate() {
        let mut diagonal = 0;
        let mut vertical_gap = 0;
        for i in 0..profile.len() {
            let left = cells[i];
            if !in_band(i, j) {
                cells[i] = 0;
                horizontal_gaps[i] = 0;
                vertical_gap = 0;
                diagonal = left;
                continue;
            }

            let cell = (diagonal + profile.score(i, letter))
                .max(0)
                .max(horizontal_gaps[i])
                .max(vertical_gap);
            best = best.max(cell);

            horizontal_gaps[i] = (horizontal_gaps[i] - gap_extend).max(cell - gap_open);
            vertical_gap = (vertical_gap - gap_extend).max(cell - gap_open);
            cells[i] = cell;
            diagonal = left;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Sequence;
    use crate::score_matrix::ScoreMatrix;

    fn score(query: &str, target: &str, matrix: &ScoreMatrix, scoring: &Scoring) -> i32 {
        let query: Sequence = query.parse().unwrap();
        let target: Sequence = target.parse().unwrap();
        let profile = QueryProfile::new(&query, matrix, None);
        smith_waterman(&profile, &target, scoring)
    }

    #[test]
    fn test_basic() {
        let matrix = ScoreMatrix::match_mismatch(2, -1);
        let scoring = Scoring {
            gap_open_penalty: 3,
            gap_extend_penalty: 1,
        };
        assert_eq!(score("AAAA", "AAAA", &matrix, &scoring), 8);
        assert_eq!(score("AAAA", "AAAT", &matrix, &scoring), 6);
        assert_eq!(score("AAAA", "", &matrix, &scoring), 0);
        assert_eq!(score("", "AAAA", &matrix, &scoring), 0);
    }

    #[test]
    fn test_gap_cost_monotonic() {
        // raising either penalty never raises the score
        let matrix = ScoreMatrix::blosum62();
        let query = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEV";
        let target = "MKTAYIAKQRQISFVKGGGSHFSRQLEERLGLIEV";
        let mut previous = i32::MAX;
        for (open, extend) in [(1, 1), (3, 1), (6, 1), (6, 2), (12, 1), (12, 3), (20, 5)] {
            let scoring = Scoring {
                gap_open_penalty: open,
                gap_extend_penalty: extend,
            };
            let current = score(query, target, &matrix, &scoring);
            assert!(current <= previous, "{open}/{extend}: {current} > {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_no_wrapping() {
        let matrix = ScoreMatrix::blosum62();
        let query = "W".repeat(200);
        assert_eq!(score(&query, &query, &matrix, &Scoring::default()), 2200);
    }

    #[test]
    fn test_band_restricts_cells() {
        let matrix = ScoreMatrix::match_mismatch(2, -1);
        let scoring = Scoring::default();
        let query: Sequence = "CDEFGH".parse().unwrap();
        let target: Sequence = "CDEFGH".parse().unwrap();
        let profile = QueryProfile::new(&query, &matrix, None);
        assert_eq!(banded_smith_waterman(&profile, &target, 0, 0, &scoring), 12);
        assert_eq!(banded_smith_waterman(&profile, &target, 1, 3, &scoring), 0);
    }
}
