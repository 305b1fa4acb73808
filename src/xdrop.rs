//! X-drop ungapped extension. Walks both sequences in lockstep away from an anchor, summing
//! substitution scores, and stops once the running score falls more than `x_drop` below the
//! best seen so far.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::alphabet::Letter;
use crate::error::{Error, Result};
use crate::score_matrix::ScoreMatrix;

/// Matching query and target positions that seed an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anchor {
    pub query: usize,
    pub target: usize,
}

/// Outcome of extending in one direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extension {
    pub score: i32,
    /// Residues covered up to and including the best scoring one
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UngappedHit {
    pub score: i32,
    pub query_begin: usize,
    pub target_begin: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Extending,
    Stopped,
}

/// Running state of one extension
#[derive(Debug, Clone)]
pub struct XDrop {
    x_drop: i32,
    current: i32,
    best: i32,
    offset: usize,
    steps: usize,
    anchored: bool,
    state: State,
}

impl XDrop {
    /// The first residue is always kept, whatever it scores
    pub fn anchored(x_drop: i32) -> Result<Self> {
        Self::new(x_drop, true)
    }

    /// Keeping no residue at all scores zero
    pub fn unanchored(x_drop: i32) -> Result<Self> {
        Self::new(x_drop, false)
    }

    fn new(x_drop: i32, anchored: bool) -> Result<Self> {
        if x_drop <= 0 {
            return Err(Error::NonPositiveDropThreshold(x_drop));
        }
        Ok(Self {
            x_drop,
            current: 0,
            best: 0,
            offset: 0,
            steps: 0,
            anchored,
            state: State::Extending,
        })
    }

    pub fn step(&mut self, score: i32) -> State {
        debug_assert_eq!(self.state, State::Extending);
        self.current += score;
        self.steps += 1;
        if self.current > self.best || (self.anchored && self.steps == 1) {
            self.best = self.current;
            self.offset = self.steps;
        }
        if self.best - self.current > self.x_drop {
            self.state = State::Stopped;
        }
        self.state
    }

    /// Feeds scores until the drop-off triggers or the scores run out
    pub fn run(mut self, scores: impl IntoIterator<Item = i32>) -> Extension {
        for score in scores {
            if self.step(score) == State::Stopped {
                break;
            }
        }
        self.extension()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn extension(&self) -> Extension {
        Extension {
            score: self.best,
            offset: self.offset,
        }
    }
}

fn check_anchor(query: &[Letter], target: &[Letter], anchor: Anchor) -> Result<()> {
    if anchor.query >= query.len() || anchor.target >= target.len() {
        return Err(Error::AnchorOutOfRange {
            query: anchor.query,
            target: anchor.target,
            query_len: query.len(),
            target_len: target.len(),
        });
    }
    Ok(())
}

/// Extends from the anchor towards the sequence ends, the anchor residue included
pub fn extend_right(
    query: &[Letter],
    target: &[Letter],
    anchor: Anchor,
    matrix: &ScoreMatrix,
    x_drop: i32,
) -> Result<Extension> {
    let xdrop = XDrop::anchored(x_drop)?;
    if query.is_empty() || target.is_empty() {
        return Ok(Extension::default());
    }
    check_anchor(query, target, anchor)?;

    let scores = query[anchor.query..]
        .iter()
        .zip(&target[anchor.target..])
        .map(|(&q, &t)| matrix.score(q, t));
    Ok(xdrop.run(scores))
}

/// Extends from the residue before the anchor towards the sequence starts
pub fn extend_left(
    query: &[Letter],
    target: &[Letter],
    anchor: Anchor,
    matrix: &ScoreMatrix,
    x_drop: i32,
) -> Result<Extension> {
    let xdrop = XDrop::unanchored(x_drop)?;
    if query.is_empty() || target.is_empty() {
        return Ok(Extension::default());
    }
    check_anchor(query, target, anchor)?;

    let scores = query[..anchor.query]
        .iter()
        .rev()
        .zip(target[..anchor.target].iter().rev())
        .map(|(&q, &t)| matrix.score(q, t));
    Ok(xdrop.run(scores))
}

/// Extends both ways and joins the halves into one ungapped segment
pub fn extend(
    query: &[Letter],
    target: &[Letter],
    anchor: Anchor,
    matrix: &ScoreMatrix,
    x_drop: i32,
) -> Result<UngappedHit> {
    let right = extend_right(query, target, anchor, matrix, x_drop)?;
    if right.offset == 0 {
        return Ok(UngappedHit::default());
    }
    let left = extend_left(query, target, anchor, matrix, x_drop)?;
    Ok(UngappedHit {
        score: left.score + right.score,
        query_begin: anchor.query - left.offset,
        target_begin: anchor.target - left.offset,
        length: left.offset + right.offset,
    })
}
