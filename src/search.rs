use std::sync::Arc;

use itertools::Itertools;

use crate::alphabet::Letter;
use crate::bias::BiasCorrection;
use crate::error::{Error, Result};
use crate::profile::QueryProfile;
use crate::score_matrix::ScoreMatrix;
use crate::smith_waterman::{DpTarget, Engine, LaneScore, LaneType, reference};
use crate::xdrop::{self, Anchor, UngappedHit};
use crate::{Config, Frame, Hit};

/// One query prepared for scoring against any number of targets. Building the profile is the
/// expensive part, so reuse the searcher across target batches.
#[derive(Debug, Clone)]
pub struct Searcher {
    query: Vec<Letter>,
    matrix: Arc<ScoreMatrix>,
    config: Config,
    correction: BiasCorrection,
    profile: QueryProfile,
    engine: Engine,
}

impl Searcher {
    pub fn new(query: &[Letter], matrix: Arc<ScoreMatrix>, config: &Config) -> Result<Self> {
        config.scoring.validate()?;
        if config.x_drop <= 0 {
            return Err(Error::NonPositiveDropThreshold(config.x_drop));
        }
        if let Some(&letter) = query
            .iter()
            .find(|&&letter| letter as usize >= matrix.alphabet_size())
        {
            return Err(Error::LetterOutOfAlphabet {
                letter,
                alphabet_size: matrix.alphabet_size(),
            });
        }

        let correction = if config.bias_correction {
            BiasCorrection::new(query, &matrix)
        } else {
            BiasCorrection::zero(query.len())
        };
        let profile = QueryProfile::new(query, &matrix, Some(&correction));
        log::debug!(
            "prepared query of {} residues, profile bias {}, fits signed lanes: {}",
            query.len(),
            profile.bias(),
            profile.fits_signed()
        );

        Ok(Self {
            query: query.to_vec(),
            matrix,
            config: config.clone(),
            correction,
            profile,
            engine: Engine::detect(),
        })
    }

    /// Runs the kernels on `engine` instead of the detected one
    pub fn with_engine(mut self, engine: Engine) -> Result<Self> {
        if !engine.is_available() {
            return Err(Error::UnsupportedEngine(engine.name()));
        }
        self.engine = engine;
        Ok(self)
    }

    pub fn query(&self) -> &[Letter] {
        &self.query
    }

    pub fn matrix(&self) -> &ScoreMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn correction(&self) -> &BiasCorrection {
        &self.correction
    }

    pub fn profile(&self) -> &QueryProfile {
        &self.profile
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Local alignment score of the query against every target, in target order. Fails if a
    /// target holds a letter outside the matrix alphabet.
    pub fn score<T: AsRef<[Letter]>>(&self, targets: &[T]) -> Result<Vec<i32>> {
        let targets = targets.iter().map(AsRef::as_ref).collect::<Vec<_>>();
        for target in &targets {
            self.profile.check_target(target)?;
        }
        Ok(self.escalate(
            targets.len(),
            |index| targets[index].len(),
            |batch, lane_type| {
                let batch = batch.iter().map(|&index| targets[index]).collect::<Vec<_>>();
                self.engine
                    .swipe_unchecked(&self.profile, &batch, &self.config.scoring, lane_type)
            },
            |index| reference::smith_waterman(&self.profile, targets[index], &self.config.scoring),
        ))
    }

    /// Like [`Searcher::score`] with every target restricted to its band. Fails if any band
    /// misses the matrix.
    pub fn score_banded(&self, targets: &[DpTarget]) -> Result<Vec<i32>> {
        let lanes = targets
            .iter()
            .map(|target| {
                self.profile.check_target(target.sequence())?;
                target.clip(self.profile.len())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.escalate(
            lanes.len(),
            |index| lanes[index].width(),
            |batch, lane_type| {
                let batch = batch.iter().map(|&index| lanes[index]).collect::<Vec<_>>();
                self.engine.banded_swipe_unchecked(
                    &self.profile,
                    &batch,
                    &self.config.scoring,
                    lane_type,
                )
            },
            |index| {
                let lane = &lanes[index];
                reference::banded_smith_waterman(
                    &self.profile,
                    lane.sequence,
                    lane.lo,
                    lane.hi,
                    &self.config.scoring,
                )
            },
        ))
    }

    /// Targets scoring at least `min_score`, sorted best first unless disabled in the config
    pub fn search<T: AsRef<[Letter]>>(&self, targets: &[T]) -> Result<Vec<Hit>> {
        Ok(self.collect_hits(self.score(targets)?, Frame::default()))
    }

    pub fn search_banded(&self, targets: &[DpTarget], frame: Frame) -> Result<Vec<Hit>> {
        Ok(self.collect_hits(self.score_banded(targets)?, frame))
    }

    /// X-drop ungapped extension of the diagonal through `anchor`
    pub fn ungapped(&self, target: &[Letter], anchor: Anchor) -> Result<UngappedHit> {
        xdrop::extend(&self.query, target, anchor, &self.matrix, self.config.x_drop)
    }

    fn collect_hits(&self, scores: Vec<i32>, frame: Frame) -> Vec<Hit> {
        let mut hits = scores
            .into_iter()
            .enumerate()
            .filter(|&(_, score)| score >= self.config.min_score)
            .map(|(index, score)| {
                debug_assert!(u32::try_from(index).is_ok(), "hit index {index} exceeds u32");
                Hit {
                    score,
                    index: index as u32,
                    frame,
                }
            })
            .collect::<Vec<_>>();
        if self.config.sort {
            hits.sort_unstable();
        }
        hits
    }

    /// Scores `count` targets in lane sized batches, retrying the lanes that overflowed on the
    /// next wider lane type and finally in 32-bit arithmetic. Batches group targets of similar
    /// `cost` so short targets do not wait on long ones.
    fn escalate(
        &self,
        count: usize,
        cost: impl Fn(usize) -> usize,
        run: impl Fn(&[usize], LaneType) -> Vec<LaneScore>,
        fallback: impl Fn(usize) -> i32,
    ) -> Vec<i32> {
        let mut scores = vec![0; count];
        let mut pending = (0..count)
            .sorted_unstable_by_key(|&index| cost(index))
            .collect::<Vec<_>>();

        let lane_types: &[LaneType] = if self.profile.fits_signed() {
            &[LaneType::Signed8, LaneType::Unsigned8]
        } else {
            &[LaneType::Unsigned8]
        };
        for &lane_type in lane_types {
            if pending.is_empty() {
                break;
            }
            let mut overflowed = vec![];
            for batch in pending.chunks(self.engine.lanes()) {
                for (&index, lane) in batch.iter().zip(run(batch, lane_type)) {
                    if lane.overflow {
                        overflowed.push(index);
                    } else {
                        scores[index] = lane.score;
                    }
                }
            }
            if !overflowed.is_empty() {
                log::debug!(
                    "{} of {} targets overflowed {:?} lanes",
                    overflowed.len(),
                    pending.len(),
                    lane_type
                );
            }
            pending = overflowed;
        }

        for index in pending {
            scores[index] = fallback(index);
        }
        scores
    }
}
