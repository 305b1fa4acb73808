//! Swipe is a lane-parallel SIMD local aligner for protein sequences written in Rust. One query is
//! scored against many targets at once by giving every target its own SIMD lane, following the
//! [SWIPE](https://doi.org/10.1186/1471-2105-12-221) layout of Rognes. Scores are computed
//! in 8-bit saturating lanes and only the targets whose score hits the lane ceiling are rescored
//! with wider arithmetic.
//!
//! The core is Smith-Waterman with affine (Gotoh) gaps. Besides the full matrix, targets may be
//! restricted to a band of diagonals, and an X-drop ungapped extension scores diagonal seeds
//! cheaply. The main properties of the aligner are:
//! - Always finds the best local alignment score within the band
//! - Scores are identical whichever instruction set runs them
//! - Optional composition based bias correction of the query profile
//!
//! # Example: using `Searcher`
//!
//! ```rust
//! use std::sync::Arc;
//! use swipe::{Config, ScoreMatrix, Searcher, Sequence};
//!
//! let query: Sequence = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ".parse().unwrap();
//! let targets: Vec<Sequence> = ["MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ", "GGGGGG"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//!
//! let searcher = Searcher::new(&query, Arc::new(ScoreMatrix::blosum62()), &Config::default())
//!     .unwrap();
//! let scores = searcher.score(&targets).unwrap();
//! assert!(scores[0] > scores[1]);
//!
//! // or only the hits above `min_score`, best first
//! let hits = searcher.search(&targets).unwrap();
//! assert_eq!(hits[0].index, 0);
//! ```
//!
//! # Example: banded alignment
//!
//! ```rust
//! use std::sync::Arc;
//! use swipe::{Config, DpTarget, Frame, ScoreMatrix, Searcher, Sequence};
//!
//! let query: Sequence = "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ".parse().unwrap();
//! let target: Sequence = "PPMKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ".parse().unwrap();
//!
//! let searcher = Searcher::new(&query, Arc::new(ScoreMatrix::blosum62()), &Config::default())
//!     .unwrap();
//! // the shared segment lies on diagonal query_pos - target_pos = -2
//! let band = DpTarget::new(&target, -4, 0).unwrap();
//! let hits = searcher.search_banded(&[band], Frame::default()).unwrap();
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! # Example: ungapped extension
//!
//! ```rust
//! use std::sync::Arc;
//! use swipe::{Anchor, Config, ScoreMatrix, Searcher, Sequence};
//!
//! let query: Sequence = "GGGGWKMYPPPP".parse().unwrap();
//! let target: Sequence = "DDWKMYEE".parse().unwrap();
//!
//! let searcher = Searcher::new(&query, Arc::new(ScoreMatrix::blosum62()), &Config::default())
//!     .unwrap();
//! let hit = searcher.ungapped(&target, Anchor { query: 6, target: 4 }).unwrap();
//! assert!(hit.score > 0);
//! ```

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod r#const;
mod error;
mod search;

pub mod alphabet;
pub mod bias;
pub mod profile;
pub mod score_matrix;
pub mod simd;
pub mod smith_waterman;
pub mod xdrop;

pub use alphabet::{Letter, Sequence};
pub use bias::BiasCorrection;
pub use error::{Error, Result};
pub use profile::QueryProfile;
pub use score_matrix::ScoreMatrix;
pub use search::Searcher;
pub use smith_waterman::{DpTarget, Engine, LaneScore, LaneType};
pub use xdrop::{Anchor, Extension, UngappedHit};

use r#const::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

/// Translated reading frame a target came from. Carried through to the hits untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    pub strand: Strand,
    /// 0, 1 or 2
    pub offset: u8,
}

impl Frame {
    pub fn new(strand: Strand, offset: u8) -> Self {
        Self {
            strand,
            offset: offset % 3,
        }
    }

    /// Frames are numbered 0..6, forward frames first
    pub fn from_index(index: usize) -> Self {
        let strand = if index % 6 < 3 {
            Strand::Forward
        } else {
            Strand::Reverse
        };
        Self::new(strand, (index % 3) as u8)
    }

    pub fn index(self) -> usize {
        match self.strand {
            Strand::Forward => self.offset as usize,
            Strand::Reverse => 3 + self.offset as usize,
        }
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    pub score: i32,
    /// Index of the target in the list passed to the searcher
    pub index: u32,
    pub frame: Frame,
}

impl Hit {
    pub fn from_index(index: usize) -> Self {
        debug_assert!(u32::try_from(index).is_ok(), "hit index {index} exceeds u32");
        Self {
            score: 0,
            index: index as u32,
            frame: Frame::default(),
        }
    }
}

impl PartialOrd for Hit {
    fn partial_cmp(&self, other: &Hit) -> Option<Ordering> {
        Some(std::cmp::Ord::cmp(self, other))
    }
}
impl Ord for Hit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .reverse()
            .then_with(|| self.index.cmp(&other.index))
    }
}
impl PartialEq for Hit {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.index == other.index
    }
}
impl Eq for Hit {}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Controls the gap penalties used by the smith waterman kernels
    pub scoring: Scoring,
    /// Adjust the query profile by the local composition of the query, which lowers the scores
    /// of low complexity regions
    pub bias_correction: bool,
    /// How far the ungapped extension may fall below its best score before stopping
    pub x_drop: i32,
    /// Targets scoring below this are left out of the hits
    pub min_score: i32,
    /// Sort the hits by score (descending)
    pub sort: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scoring: Scoring::default(),
            bias_correction: true,
            x_drop: X_DROP,
            min_score: MIN_SCORE,
            sort: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scoring {
    /// Penalty for the first residue of a gap. A gap of length k costs
    /// `gap_open_penalty + (k - 1) * gap_extend_penalty`.
    pub gap_open_penalty: u16,
    /// Penalty for every further residue of a gap
    pub gap_extend_penalty: u16,
}

impl Scoring {
    /// Penalties are subtracted inside 8-bit lanes, so neither may exceed `i8::MAX`
    pub fn validate(&self) -> Result<()> {
        for penalty in [self.gap_open_penalty, self.gap_extend_penalty] {
            if penalty > MAX_GAP_PENALTY {
                return Err(Error::GapPenaltyTooLarge(penalty));
            }
        }
        Ok(())
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Scoring {
            gap_open_penalty: GAP_OPEN_PENALTY,
            gap_extend_penalty: GAP_EXTEND_PENALTY,
        }
    }
}
