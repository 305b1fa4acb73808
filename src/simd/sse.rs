use std::arch::x86_64::*;

use super::{ProfileRow, ScoreVector};

macro_rules! define_sse_vector {
    (
        $name:ident,
        score = $score:ty,
        adds = $adds:ident,
        subs = $subs:ident,
        max = $max:ident
    ) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(__m128i);

        impl ScoreVector for $name {
            type Score = $score;
            const LANES: usize = 16;

            #[inline]
            fn is_available() -> bool {
                raw_cpuid::CpuId::new()
                    .get_feature_info()
                    .is_some_and(|info| info.has_ssse3() && info.has_sse41())
            }

            #[inline(always)]
            unsafe fn zero() -> Self {
                Self(_mm_setzero_si128())
            }

            #[inline(always)]
            unsafe fn splat(value: $score) -> Self {
                Self(_mm_set1_epi8(value as i8))
            }

            #[inline(always)]
            unsafe fn load(data: *const $score) -> Self {
                Self(_mm_loadu_si128(data as *const __m128i))
            }

            #[inline(always)]
            unsafe fn store(self, out: *mut $score) {
                _mm_storeu_si128(out as *mut __m128i, self.0)
            }

            #[inline(always)]
            unsafe fn load_letters(letters: *const u8) -> Self {
                Self(_mm_loadu_si128(letters as *const __m128i))
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
                Self(_mm_cmpeq_epi8(self.0, other.0))
            }

            #[inline(always)]
            unsafe fn and_not(self, mask: Self) -> Self {
                Self(_mm_andnot_si128(mask.0, self.0))
            }

            #[inline(always)]
            unsafe fn lookup(row: &ProfileRow<$score>, letters: *const u8) -> Self {
                let letters = _mm_loadu_si128(letters as *const __m128i);
                let low = _mm_loadu_si128(row.as_ptr() as *const __m128i);
                let high = _mm_loadu_si128(row.as_ptr().add(16) as *const __m128i);
                // pshufb only looks at the low nibble, bit 4 picks the half
                let bit = _mm_set1_epi8(16);
                let use_high = _mm_cmpeq_epi8(_mm_and_si128(letters, bit), bit);
                Self(_mm_blendv_epi8(
                    _mm_shuffle_epi8(low, letters),
                    _mm_shuffle_epi8(high, letters),
                    use_high,
                ))
            }
        }
    };
}

define_sse_vector!(
    SseI8,
    score = i8,
    adds = _mm_adds_epi8,
    subs = _mm_subs_epi8,
    max = _mm_max_epi8
);

define_sse_vector!(
    SseU8,
    score = u8,
    adds = _mm_adds_epu8,
    subs = _mm_subs_epu8,
    max = _mm_max_epu8
);
