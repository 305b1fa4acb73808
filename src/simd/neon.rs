use std::arch::aarch64::*;

use super::{ProfileRow, ScoreVector};

#[derive(Debug, Clone, Copy)]
pub struct NeonI8(int8x16_t);

#[derive(Debug, Clone, Copy)]
pub struct NeonU8(uint8x16_t);

/// Both 16-byte halves of a lookup row, indexed by letters below 32
#[inline(always)]
unsafe fn table_lookup(row: *const u8, letters: *const u8) -> uint8x16_t {
    vqtbl2q_u8(vld1q_u8_x2(row), vld1q_u8(letters))
}

impl ScoreVector for NeonI8 {
    type Score = i8;
    const LANES: usize = 16;

    #[inline]
    fn is_available() -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self(vdupq_n_s8(0))
    }

    #[inline(always)]
    unsafe fn splat(value: i8) -> Self {
        Self(vdupq_n_s8(value))
    }

    #[inline(always)]
    unsafe fn load(data: *const i8) -> Self {
        Self(vld1q_s8(data))
    }

    #[inline(always)]
    unsafe fn store(self, out: *mut i8) {
        vst1q_s8(out, self.0)
    }

    #[inline(always)]
    unsafe fn load_letters(letters: *const u8) -> Self {
        Self(vreinterpretq_s8_u8(vld1q_u8(letters)))
    }

    #[inline(always)]
    unsafe fn adds(self, other: Self) -> Self {
        Self(vqaddq_s8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn subs(self, other: Self) -> Self {
        Self(vqsubq_s8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn max(self, other: Self) -> Self {
        Self(vmaxq_s8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq(self, other: Self) -> Self {
        Self(vreinterpretq_s8_u8(vceqq_s8(self.0, other.0)))
    }

    #[inline(always)]
    unsafe fn and_not(self, mask: Self) -> Self {
        Self(vbicq_s8(self.0, mask.0))
    }

    #[inline(always)]
    unsafe fn lookup(row: &ProfileRow<i8>, letters: *const u8) -> Self {
        Self(vreinterpretq_s8_u8(table_lookup(row.as_ptr() as *const u8, letters)))
    }
}

impl ScoreVector for NeonU8 {
    type Score = u8;
    const LANES: usize = 16;

    #[inline]
    fn is_available() -> bool {
        std::arch::is_aarch64_feature_detected!("neon")
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self(vdupq_n_u8(0))
    }

    #[inline(always)]
    unsafe fn splat(value: u8) -> Self {
        Self(vdupq_n_u8(value))
    }

    #[inline(always)]
    unsafe fn load(data: *const u8) -> Self {
        Self(vld1q_u8(data))
    }

    #[inline(always)]
    unsafe fn store(self, out: *mut u8) {
        vst1q_u8(out, self.0)
    }

    #[inline(always)]
    unsafe fn load_letters(letters: *const u8) -> Self {
        Self(vld1q_u8(letters))
    }

    #[inline(always)]
    unsafe fn adds(self, other: Self) -> Self {
        Self(vqaddq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn subs(self, other: Self) -> Self {
        Self(vqsubq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn max(self, other: Self) -> Self {
        Self(vmaxq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn cmpeq(self, other: Self) -> Self {
        Self(vceqq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn and_not(self, mask: Self) -> Self {
        Self(vbicq_u8(self.0, mask.0))
    }

    #[inline(always)]
    unsafe fn lookup(row: &ProfileRow<u8>, letters: *const u8) -> Self {
        Self(table_lookup(row.as_ptr(), letters))
    }
}
