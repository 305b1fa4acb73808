//! The [Smith Waterman algorithm](https://en.wikipedia.org/wiki/Smith%E2%80%93Waterman_algorithm) scores the best local alignment of two sequences with affine gaps. Its O(nm) cost makes parallelization the whole game when one query is compared against a database.
//!
//! We use the inter-sequence layout of [SWIPE](https://doi.org/10.1186/1471-2105-12-221): every SIMD lane holds a different target, so all lanes walk the same (query position, target position) cell at the same time and no lane ever depends on another. The query is turned into a profile ahead of time, one 32-entry lookup row per query position, and a single table shuffle reads the substitution score of every lane's letter at once.
//!
//! ```text
//! query: "MKV", 4 lanes for simplicity (16 with SSE and NEON, 32 with AVX2)
//!
//! targets            transposed, one vector per target position
//! lane 0: M K V      pos 0: [M  K  M  V]
//! lane 1: K V _      pos 1: [K  V  L  _]
//! lane 2: M L V      pos 2: [V  _  V  _]
//! lane 3: V _ _
//!
//! for each target position j, for each query position i:
//!   scores = lookup(profile[i], letters[j])       // one shuffle for all lanes
//!   cell   = cell_update(diagonal, scores, ...)   // max/saturating ops only
//! ```
//!
//! Targets shorter than the longest in the batch read the padding letter `_`, which scores as the lowest lane value and never raises a lane's best. Lanes saturate instead of wrapping, and a lane whose best reaches the ceiling of its score type is reported as overflowed so the caller can retry it on wider lanes.
//!
//! The banded variant restricts every lane to its own range of diagonals, storing cells per band slot so a query row is one pass over the band.

use std::str::FromStr;
use std::sync::OnceLock;

use crate::Scoring;
use crate::alphabet::Letter;
use crate::error::{Error, Result};
use crate::profile::QueryProfile;
#[cfg(target_arch = "aarch64")]
use crate::simd::{NeonI8, NeonU8};
use crate::simd::{PortableVector, Score, ScoreVector};
#[cfg(target_arch = "x86_64")]
use crate::simd::{AvxI8, AvxU8, SseI8, SseU8};

mod banded;
pub mod cell;
pub mod reference;
mod swipe;

pub use banded::DpTarget;
pub(crate) use banded::BandedLane;

/// Environment variable naming the engine to use instead of the detected one
pub const ENGINE_ENV: &str = "SWIPE_ENGINE";

/// Best score of one lane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneScore {
    pub score: i32,
    /// The lane reached the ceiling of its score type, so `score` is only a lower bound
    pub overflow: bool,
}

/// Score type of the lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneType {
    /// `i8` lanes, no bias, ceiling `i8::MAX`
    Signed8,
    /// `u8` lanes shifted by the profile bias, ceiling `u8::MAX - bias`
    Unsigned8,
}

/// Reads the best score of every occupied lane and flags the ones at the ceiling
///
/// # Safety
///
/// The target features of `V` must be available.
#[inline(always)]
pub(crate) unsafe fn lane_scores<V: ScoreVector>(
    best: V,
    bias: V::Score,
    count: usize,
) -> Vec<LaneScore> {
    let ceiling = V::Score::MAX.saturating_sub(bias);
    unsafe { best.to_vec() }
        .into_iter()
        .take(count)
        .map(|score| LaneScore {
            score: score.to_i32(),
            overflow: score >= ceiling,
        })
        .collect()
}

/// One implementation of the kernels per instruction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    #[cfg(target_arch = "x86_64")]
    Avx2,
    #[cfg(target_arch = "x86_64")]
    Sse41,
    #[cfg(target_arch = "aarch64")]
    Neon,
    /// Plain arrays of 16 lanes, runs anywhere
    Portable,
}

static DETECTED: OnceLock<Engine> = OnceLock::new();

impl Engine {
    /// The engine every [`Searcher`](crate::Searcher) uses by default. Detected on first use,
    /// honouring the [`ENGINE_ENV`] override.
    pub fn detect() -> Self {
        *DETECTED.get_or_init(|| {
            let engine = match std::env::var(ENGINE_ENV) {
                Ok(name) => match name.parse::<Engine>() {
                    Ok(forced) if forced.is_available() => {
                        log::info!("{ENGINE_ENV}={name}: using {} engine", forced.name());
                        forced
                    }
                    Ok(forced) => {
                        log::warn!(
                            "{ENGINE_ENV}={name}: {} is not supported by this cpu, ignoring",
                            forced.name()
                        );
                        Self::best_available()
                    }
                    Err(err) => {
                        log::warn!("{ENGINE_ENV}: {err}, ignoring");
                        Self::best_available()
                    }
                },
                Err(_) => Self::best_available(),
            };
            log::info!("using {} engine with {} lanes", engine.name(), engine.lanes());
            engine
        })
    }

    pub fn best_available() -> Self {
        Self::all()
            .into_iter()
            .find(|engine| engine.is_available())
            .unwrap_or(Self::Portable)
    }

    /// Every engine compiled for this architecture, fastest first
    pub fn all() -> Vec<Self> {
        vec![
            #[cfg(target_arch = "x86_64")]
            Self::Avx2,
            #[cfg(target_arch = "x86_64")]
            Self::Sse41,
            #[cfg(target_arch = "aarch64")]
            Self::Neon,
            Self::Portable,
        ]
    }

    pub fn is_available(self) -> bool {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => KernelAvx2::is_available(),
            #[cfg(target_arch = "x86_64")]
            Self::Sse41 => KernelSse41::is_available(),
            #[cfg(target_arch = "aarch64")]
            Self::Neon => KernelNeon::is_available(),
            Self::Portable => KernelPortable::is_available(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => "avx2",
            #[cfg(target_arch = "x86_64")]
            Self::Sse41 => "sse",
            #[cfg(target_arch = "aarch64")]
            Self::Neon => "neon",
            Self::Portable => "portable",
        }
    }

    /// Targets scored per kernel call
    pub fn lanes(self) -> usize {
        match self {
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => AvxI8::LANES,
            #[cfg(target_arch = "x86_64")]
            Self::Sse41 => SseI8::LANES,
            #[cfg(target_arch = "aarch64")]
            Self::Neon => NeonI8::LANES,
            Self::Portable => PORTABLE_LANES,
        }
    }

    /// Full Smith-Waterman of the profile's query against up to [`Engine::lanes`] targets.
    /// Returns one [`LaneScore`] per target, in order.
    pub fn swipe(
        self,
        profile: &QueryProfile,
        targets: &[&[Letter]],
        scoring: &Scoring,
        lane_type: LaneType,
    ) -> Result<Vec<LaneScore>> {
        self.check(targets.len(), scoring)?;
        for target in targets {
            profile.check_target(target)?;
        }
        Ok(self.swipe_unchecked(profile, targets, scoring, lane_type))
    }

    /// Smith-Waterman of every target restricted to its band. Bands are clipped to the matrix,
    /// a band that misses it entirely is an error.
    pub fn banded_swipe(
        self,
        profile: &QueryProfile,
        targets: &[DpTarget],
        scoring: &Scoring,
        lane_type: LaneType,
    ) -> Result<Vec<LaneScore>> {
        self.check(targets.len(), scoring)?;
        let lanes = targets
            .iter()
            .map(|target| {
                profile.check_target(target.sequence())?;
                target.clip(profile.len())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.banded_swipe_unchecked(profile, &lanes, scoring, lane_type))
    }

    fn check(self, batch: usize, scoring: &Scoring) -> Result<()> {
        if !self.is_available() {
            return Err(Error::UnsupportedEngine(self.name()));
        }
        if batch > self.lanes() {
            return Err(Error::BatchTooLarge {
                got: batch,
                lanes: self.lanes(),
            });
        }
        scoring.validate()
    }

    /// Requires an available engine, a valid scoring, at most `lanes()` targets and target
    /// letters inside the alphabet
    pub(crate) fn swipe_unchecked(
        self,
        profile: &QueryProfile,
        targets: &[&[Letter]],
        scoring: &Scoring,
        lane_type: LaneType,
    ) -> Vec<LaneScore> {
        debug_assert!(self.is_available() && targets.len() <= self.lanes());
        // SAFETY: availability was checked when the engine was chosen
        unsafe {
            match self {
                #[cfg(target_arch = "x86_64")]
                Self::Avx2 => KernelAvx2::swipe(profile, targets, scoring, lane_type),
                #[cfg(target_arch = "x86_64")]
                Self::Sse41 => KernelSse41::swipe(profile, targets, scoring, lane_type),
                #[cfg(target_arch = "aarch64")]
                Self::Neon => KernelNeon::swipe(profile, targets, scoring, lane_type),
                Self::Portable => KernelPortable::swipe(profile, targets, scoring, lane_type),
            }
        }
    }

    pub(crate) fn banded_swipe_unchecked(
        self,
        profile: &QueryProfile,
        lanes: &[BandedLane],
        scoring: &Scoring,
        lane_type: LaneType,
    ) -> Vec<LaneScore> {
        debug_assert!(self.is_available() && lanes.len() <= self.lanes());
        // SAFETY: availability was checked when the engine was chosen
        unsafe {
            match self {
                #[cfg(target_arch = "x86_64")]
                Self::Avx2 => KernelAvx2::banded_swipe(profile, lanes, scoring, lane_type),
                #[cfg(target_arch = "x86_64")]
                Self::Sse41 => KernelSse41::banded_swipe(profile, lanes, scoring, lane_type),
                #[cfg(target_arch = "aarch64")]
                Self::Neon => KernelNeon::banded_swipe(profile, lanes, scoring, lane_type),
                Self::Portable => KernelPortable::banded_swipe(profile, lanes, scoring, lane_type),
            }
        }
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|engine| engine.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownEngine(s.to_string()))
    }
}

const PORTABLE_LANES: usize = 16;

macro_rules! define_kernel {
    (
        $name:ident,
        signed = $signed:ty,
        unsigned = $unsigned:ty
        $(, target_feature = $feature:literal)?
    ) => {
        struct $name;

        impl $name {
            fn is_available() -> bool {
                <$signed>::is_available() && <$unsigned>::is_available()
            }

            #[doc = "# Safety\n\nCaller must ensure that the target features of the lanes are available"]
            $(#[target_feature(enable = $feature)])?
            unsafe fn swipe(
                profile: &QueryProfile,
                targets: &[&[Letter]],
                scoring: &Scoring,
                lane_type: LaneType,
            ) -> Vec<LaneScore> {
                unsafe {
                    match lane_type {
                        LaneType::Signed8 => {
                            swipe::swipe::<$signed>(profile.signed_rows(), 0, targets, scoring)
                        }
                        LaneType::Unsigned8 => swipe::swipe::<$unsigned>(
                            profile.unsigned_rows(),
                            profile.bias(),
                            targets,
                            scoring,
                        ),
                    }
                }
            }

            #[doc = "# Safety\n\nCaller must ensure that the target features of the lanes are available"]
            $(#[target_feature(enable = $feature)])?
            unsafe fn banded_swipe(
                profile: &QueryProfile,
                lanes: &[BandedLane],
                scoring: &Scoring,
                lane_type: LaneType,
            ) -> Vec<LaneScore> {
                unsafe {
                    match lane_type {
                        LaneType::Signed8 => banded::banded_swipe::<$signed>(
                            profile.signed_rows(),
                            0,
                            lanes,
                            scoring,
                        ),
                        LaneType::Unsigned8 => banded::banded_swipe::<$unsigned>(
                            profile.unsigned_rows(),
                            profile.bias(),
                            lanes,
                            scoring,
                        ),
                    }
                }
            }
        }
    };
}

#[cfg(target_arch = "x86_64")]
define_kernel!(KernelAvx2, signed = AvxI8, unsigned = AvxU8, target_feature = "avx2");

#[cfg(target_arch = "x86_64")]
define_kernel!(
    KernelSse41,
    signed = SseI8,
    unsigned = SseU8,
    target_feature = "ssse3,sse4.1"
);

#[cfg(target_arch = "aarch64")]
define_kernel!(KernelNeon, signed = NeonI8, unsigned = NeonU8, target_feature = "neon");

define_kernel!(
    KernelPortable,
    signed = PortableVector<i8, PORTABLE_LANES>,
    unsigned = PortableVector<u8, PORTABLE_LANES>
);

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::alphabet::Sequence;
    use crate::score_matrix::ScoreMatrix;

    fn random_sequence(rng: &mut StdRng, len: usize) -> Vec<Letter> {
        (0..len).map(|_| rng.random_range(0..20)).collect()
    }

    #[test]
    fn test_detect_is_available() {
        let engine = Engine::detect();
        assert!(engine.is_available());
        assert_eq!(Engine::detect(), engine);
        assert!(Engine::Portable.is_available());
    }

    #[test]
    fn test_parse() {
        assert_eq!("portable".parse::<Engine>(), Ok(Engine::Portable));
        assert_eq!(" Portable ".parse::<Engine>(), Ok(Engine::Portable));
        assert!(matches!("avx512".parse::<Engine>(), Err(Error::UnknownEngine(_))));
        for engine in Engine::all() {
            assert_eq!(engine.name().parse::<Engine>(), Ok(engine));
        }
    }

    #[test]
    fn test_batch_too_large() {
        let query: Sequence = "MKV".parse().unwrap();
        let profile = QueryProfile::new(&query, &ScoreMatrix::blosum62(), None);
        let target = [0u8; 4];
        let targets = vec![&target[..]; Engine::Portable.lanes() + 1];
        let err = Engine::Portable
            .swipe(&profile, &targets, &Scoring::default(), LaneType::Signed8)
            .unwrap_err();
        assert_eq!(err, Error::BatchTooLarge { got: 17, lanes: 16 });
    }

    #[test]
    fn test_rejects_large_gap_penalty() {
        let query: Sequence = "MKV".parse().unwrap();
        let profile = QueryProfile::new(&query, &ScoreMatrix::blosum62(), None);
        let scoring = Scoring {
            gap_open_penalty: 200,
            gap_extend_penalty: 1,
        };
        let err = Engine::Portable
            .swipe(&profile, &[], &scoring, LaneType::Signed8)
            .unwrap_err();
        assert_eq!(err, Error::GapPenaltyTooLarge(200));
    }

    #[test]
    fn test_engines_agree() {
        let mut rng = StdRng::seed_from_u64(1234);
        let matrix = ScoreMatrix::blosum62();
        let scoring = Scoring::default();
        for _ in 0..10 {
            let len = rng.random_range(2..120);
            let query = random_sequence(&mut rng, len);
            let profile = QueryProfile::new(&query, &matrix, None);
            let targets: Vec<Vec<Letter>> = (0..16)
                .map(|_| {
                    let len = rng.random_range(0..150);
                    random_sequence(&mut rng, len)
                })
                .collect();
            let views: Vec<&[Letter]> = targets.iter().map(|t| t.as_slice()).collect();
            let bands: Vec<DpTarget> = views
                .iter()
                .map(|t| {
                    let lo = rng.random_range(1 - t.len() as i32..len as i32);
                    DpTarget::new(t, lo, lo + rng.random_range(0..20)).unwrap()
                })
                .collect();

            for lane_type in [LaneType::Signed8, LaneType::Unsigned8] {
                let expected = Engine::Portable
                    .swipe(&profile, &views, &scoring, lane_type)
                    .unwrap();
                let expected_banded = Engine::Portable
                    .banded_swipe(&profile, &bands, &scoring, lane_type)
                    .unwrap();
                for engine in Engine::all().into_iter().filter(|e| e.is_available()) {
                    for (chunk, start) in [(&views[..], 0), (&views[..7], 0), (&views[9..], 9)] {
                        let scores = engine.swipe(&profile, chunk, &scoring, lane_type).unwrap();
                        assert_eq!(scores, expected[start..start + chunk.len()], "{engine:?}");
                    }
                    let banded = engine
                        .banded_swipe(&profile, &bands, &scoring, lane_type)
                        .unwrap();
                    assert_eq!(banded, expected_banded, "{engine:?} banded");
                }
            }
        }
    }

    #[test]
    fn test_overflow_escalates_to_unsigned() {
        let query: Sequence = "W".repeat(15).parse().unwrap();
        let profile = QueryProfile::new(&query, &ScoreMatrix::blosum62(), None);
        let targets = [query.letters()];
        let engine = Engine::detect();

        let signed = engine
            .swipe(&profile, &targets, &Scoring::default(), LaneType::Signed8)
            .unwrap();
        assert!(signed[0].overflow);

        let unsigned = engine
            .swipe(&profile, &targets, &Scoring::default(), LaneType::Unsigned8)
            .unwrap();
        assert_eq!(unsigned[0], LaneScore { score: 165, overflow: false });
    }
}
