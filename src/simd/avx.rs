use std::arch::x86_64::*;

use super::{ProfileRow, ScoreVector};

#[inline]
fn has_avx2() -> bool {
    let cpuid = raw_cpuid::CpuId::new();
    // the OS must also save the upper halves of the ymm registers
    let os_support = cpuid
        .get_feature_info()
        .is_some_and(|info| info.has_avx() && info.has_oxsave());
    os_support
        && cpuid
            .get_extended_feature_info()
            .is_some_and(|info| info.has_avx2())
}

macro_rules! define_avx_vector {
    (
        $name:ident,
        score = $score:ty,
        adds = $adds:ident,
        subs = $subs:ident,
        max = $max:ident
    ) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(__m256i);

        impl ScoreVector for $name {
            type Score = $score;
            const LANES: usize = 32;

            #[inline]
            fn is_available() -> bool {
                has_avx2()
            }

            #[inline(always)]
            unsafe fn zero() -> Self {
                Self(_mm256_setzero_si256())
            }

            #[inline(always)]
            unsafe fn splat(value: $score) -> Self {
                Self(_mm256_set1_epi8(value as i8))
            }

            #[inline(always)]
            unsafe fn load(data: *const $score) -> Self {
                Self(_mm256_loadu_si256(data as *const __m256i))
            }

            #[inline(always)]
            unsafe fn store(self, out: *mut $score) {
                _mm256_storeu_si256(out as *mut __m256i, self.0)
            }

            #[inline(always)]
            unsafe fn load_letters(letters: *const u8) -> Self {
                Self(_mm256_loadu_si256(letters as *const __m256i))
            }

            #[inline(always)]
            unsafe fn adds(self, other: Self) -> Self {
                Self($adds(self.0, other.0))
            }

            #[inline(always)]
            unsafe fn subs(self, other: Self) -> Self {
                Self($subs(self.0, other.0))
            }

            #[inline(always)]
            unsafe fn max(self, other: Self) -> Self {
                Self($max(self.0, other.0))
            }

            #[inline(always)]
            unsafe fn cmpeq(self, other: Self) -> Self {
                Self(_mm256_cmpeq_epi8(self.0, other.0))
            }

            #[inline(always)]
            unsafe fn and_not(self, mask: Self) -> Self {
                Self(_mm256_andnot_si256(mask.0, self.0))
            }

            #[inline(always)]
            unsafe fn lookup(row: &ProfileRow<$score>, letters: *const u8) -> Self {
                let letters = _mm256_loadu_si256(letters as *const __m256i);
                // vpshufb shuffles within 128-bit halves, so both halves get the full table
                let low = _mm256_broadcastsi128_si256(_mm_loadu_si128(row.as_ptr() as *const __m128i));
                let high = _mm256_broadcastsi128_si256(_mm_loadu_si128(
                    row.as_ptr().add(16) as *const __m128i,
                ));
                let bit = _mm256_set1_epi8(16);
                let use_high = _mm256_cmpeq_epi8(_mm256_and_si256(letters, bit), bit);
                Self(_mm256_blendv_epi8(
                    _mm256_shuffle_epi8(low, letters),
                    _mm256_shuffle_epi8(high, letters),
                    use_high,
                ))
            }
        }
    };
}

define_avx_vector!(
    AvxI8,
    score = i8,
    adds = _mm256_adds_epi8,
    subs = _mm256_subs_epi8,
    max = _mm256_max_epi8
);

define_avx_vector!(
    AvxU8,
    score = u8,
    adds = _mm256_adds_epu8,
    subs = _mm256_subs_epu8,
    max = _mm256_max_epu8
);
