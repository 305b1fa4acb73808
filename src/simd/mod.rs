#![allow(unsafe_op_in_unsafe_fn)]

use std::fmt::Debug;

#[cfg(target_arch = "x86_64")]
mod avx;
#[cfg(target_arch = "aarch64")]
mod neon;
mod portable;
#[cfg(target_arch = "x86_64")]
mod sse;
pub mod transpose;

#[cfg(target_arch = "x86_64")]
pub use avx::{AvxI8, AvxU8};
#[cfg(target_arch = "aarch64")]
pub use neon::{NeonI8, NeonU8};
pub use portable::PortableVector;
#[cfg(target_arch = "x86_64")]
pub use sse::{SseI8, SseU8};

/// Entries in a lookup row. Letters index it directly, so every alphabet fits below the
/// padding letter.
pub const PROFILE_WIDTH: usize = 32;

/// A lookup row: the substitution score of one query residue against every letter
pub type ProfileRow<S> = [S; PROFILE_WIDTH];

/// Lane element type. Signed lanes run without bias, unsigned lanes carry one.
pub trait Score: Copy + Ord + Default + Debug + Send + Sync + 'static {
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;

    /// Clamps into the representable range
    fn saturate(value: i32) -> Self;
    fn to_i32(self) -> i32;

    fn from_bits(bits: u8) -> Self;
    fn to_bits(self) -> u8;

    fn saturating_add(self, other: Self) -> Self;
    fn saturating_sub(self, other: Self) -> Self;
}

impl Score for i8 {
    const MIN: Self = i8::MIN;
    const MAX: Self = i8::MAX;
    const ZERO: Self = 0;

    #[inline(always)]
    fn saturate(value: i32) -> Self {
        value.clamp(i8::MIN as i32, i8::MAX as i32) as i8
    }

    #[inline(always)]
    fn to_i32(self) -> i32 {
        self as i32
    }

    #[inline(always)]
    fn from_bits(bits: u8) -> Self {
        bits as i8
    }

    #[inline(always)]
    fn to_bits(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        i8::saturating_add(self, other)
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        i8::saturating_sub(self, other)
    }
}

impl Score for u8 {
    const MIN: Self = u8::MIN;
    const MAX: Self = u8::MAX;
    const ZERO: Self = 0;

    #[inline(always)]
    fn saturate(value: i32) -> Self {
        value.clamp(u8::MIN as i32, u8::MAX as i32) as u8
    }

    #[inline(always)]
    fn to_i32(self) -> i32 {
        self as i32
    }

    #[inline(always)]
    fn from_bits(bits: u8) -> Self {
        bits
    }

    #[inline(always)]
    fn to_bits(self) -> u8 {
        self
    }

    #[inline(always)]
    fn saturating_add(self, other: Self) -> Self {
        u8::saturating_add(self, other)
    }

    #[inline(always)]
    fn saturating_sub(self, other: Self) -> Self {
        u8::saturating_sub(self, other)
    }
}

/// `LANES` independent scores of one [`Score`] type. All arithmetic saturates.
///
/// # Safety
///
/// Every `unsafe fn` requires the target features of the implementation to be available,
/// which [`ScoreVector::is_available`] reports.
pub trait ScoreVector: Copy + Debug {
    type Score: Score;
    const LANES: usize;

    fn is_available() -> bool;

    /// Create a vector with zeros in all lanes.
    unsafe fn zero() -> Self;
    unsafe fn splat(value: Self::Score) -> Self;

    /// Read `LANES` scores. The pointer does not need to be aligned.
    ///
    /// # Safety
    ///
    /// Callers must guarantee that `LANES` scores are readable from `data`.
    unsafe fn load(data: *const Self::Score) -> Self;
    /// Write `LANES` scores. The pointer does not need to be aligned.
    ///
    /// # Safety
    ///
    /// Callers must guarantee that `LANES` scores are writable at `out`.
    unsafe fn store(self, out: *mut Self::Score);
    /// Read `LANES` letters, one per lane, keeping their raw bits
    unsafe fn load_letters(letters: *const u8) -> Self;

    unsafe fn adds(self, other: Self) -> Self;
    unsafe fn subs(self, other: Self) -> Self;
    unsafe fn max(self, other: Self) -> Self;
    /// All bits set in lanes where `self == other`
    unsafe fn cmpeq(self, other: Self) -> Self;
    /// Clears the lanes where `mask` is set
    unsafe fn and_not(self, mask: Self) -> Self;

    /// Substitution score of each lane's letter, read from a query lookup row.
    ///
    /// # Safety
    ///
    /// Callers must guarantee that `LANES` letters, each below [`PROFILE_WIDTH`], are
    /// readable from `letters`.
    unsafe fn lookup(row: &ProfileRow<Self::Score>, letters: *const u8) -> Self;

    unsafe fn to_vec(self) -> Vec<Self::Score> {
        let mut lanes = vec![Self::Score::ZERO; Self::LANES];
        self.store(lanes.as_mut_ptr());
        lanes
    }
}
