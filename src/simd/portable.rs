use std::array;
use std::ptr;

use super::{PROFILE_WIDTH, ProfileRow, Score, ScoreVector};

/// Array backed vector of any width. Serves as the fallback engine and, with `W = 1`, as the
/// single target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortableVector<T: Score, const W: usize>(pub [T; W]);

impl<T: Score, const W: usize> PortableVector<T, W> {
    #[inline(always)]
    fn zip_with(self, other: Self, f: impl Fn(T, T) -> T) -> Self {
        Self(array::from_fn(|i| f(self.0[i], other.0[i])))
    }
}

impl<T: Score, const W: usize> ScoreVector for PortableVector<T, W> {
    type Score = T;
    const LANES: usize = W;

    #[inline]
    fn is_available() -> bool {
        true
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self([T::ZERO; W])
    }

    #[inline(always)]
    unsafe fn splat(value: T) -> Self {
        Self([value; W])
    }

    #[inline(always)]
    unsafe fn load(data: *const T) -> Self {
        Self(ptr::read_unaligned(data as *const [T; W]))
    }

    #[inline(always)]
    unsafe fn store(self, out: *mut T) {
        ptr::write_unaligned(out as *mut [T; W], self.0)
    }

    #[inline(always)]
    unsafe fn load_letters(letters: *const u8) -> Self {
        let letters = ptr::read_unaligned(letters as *const [u8; W]);
        Self(letters.map(T::from_bits))
    }

    #[inline(always)]
    unsafe fn adds(self, other: Self) -> Self {
        self.zip_with(other, T::saturating_add)
    }

    #[inline(always)]
    unsafe fn subs(self, other: Self) -> Self {
        self.zip_with(other, T::saturating_sub)
    }

    #[inline(always)]
    unsafe fn max(self, other: Self) -> Self {
        self.zip_with(other, Ord::max)
    }

    #[inline(always)]
    unsafe fn cmpeq(self, other: Self) -> Self {
        self.zip_with(other, |a, b| T::from_bits(if a == b { 0xFF } else { 0 }))
    }

    #[inline(always)]
    unsafe fn and_not(self, mask: Self) -> Self {
        self.zip_with(mask, |a, m| T::from_bits(a.to_bits() & !m.to_bits()))
    }

    #[inline(always)]
    unsafe fn lookup(row: &ProfileRow<T>, letters: *const u8) -> Self {
        let letters = ptr::read_unaligned(letters as *const [u8; W]);
        Self(letters.map(|letter| row[letter as usize % PROFILE_WIDTH]))
    }
}
