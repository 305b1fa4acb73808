//! Byte matrix transposition, used to turn one row of letters per target into one vector of
//! letters per target position.

/// Side of the square tile transposed in registers
pub const TILE: usize = 16;

/// Transposes a row-major 16x16 byte matrix
pub fn transpose_16x16(input: &[u8; TILE * TILE], output: &mut [u8; TILE * TILE]) {
    // SAFETY: both arrays hold 16 rows of 16 bytes
    unsafe { transpose_tile(input.as_ptr(), TILE, output.as_mut_ptr(), TILE) }
}

/// Transposes the row-major `rows x cols` matrix in `src` into the row-major `cols x rows`
/// matrix in `dst`. Whole 16x16 tiles go through [`transpose_16x16`]'s kernel, the ragged
/// edges are copied byte by byte.
///
/// # Panics
///
/// Panics if either slice is shorter than `rows * cols`.
pub fn transpose_block(src: &[u8], rows: usize, cols: usize, dst: &mut [u8]) {
    assert!(src.len() >= rows * cols && dst.len() >= rows * cols);

    let (full_rows, full_cols) = (rows / TILE * TILE, cols / TILE * TILE);
    for r in (0..full_rows).step_by(TILE) {
        for c in (0..full_cols).step_by(TILE) {
            // SAFETY: the tile at (r, c) lies inside both matrices
            unsafe {
                transpose_tile(
                    src.as_ptr().add(r * cols + c),
                    cols,
                    dst.as_mut_ptr().add(c * rows + r),
                    rows,
                )
            }
        }
    }

    for r in 0..rows {
        let tail = if r < full_rows { full_cols } else { 0 };
        for c in tail..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
}

/// # Safety
///
/// `src` must hold 16 readable rows of 16 bytes spaced `src_stride` apart, `dst` 16 writable
/// rows spaced `dst_stride` apart.
#[cfg(target_arch = "x86_64")]
#[inline]
unsafe fn transpose_tile(src: *const u8, src_stride: usize, dst: *mut u8, dst_stride: usize) {
    use std::arch::x86_64::*;

    // SSE2 is part of the x86_64 baseline
    unsafe {
        let rows: [__m128i; TILE] =
            std::array::from_fn(|i| _mm_loadu_si128(src.add(i * src_stride) as *const __m128i));

        // interleave bytes of row pairs, then 16, 32 and 64 bit groups
        let bytes: [__m128i; TILE] = std::array::from_fn(|i| {
            let (a, b) = (rows[i & !1], rows[i | 1]);
            if i % 2 == 0 { _mm_unpacklo_epi8(a, b) } else { _mm_unpackhi_epi8(a, b) }
        });
        let words: [__m128i; TILE] = std::array::from_fn(|i| {
            let (group, quarter) = (i / 4 * 4, i % 4);
            let (a, b) = (bytes[group + quarter / 2], bytes[group + 2 + quarter / 2]);
            if quarter % 2 == 0 { _mm_unpacklo_epi16(a, b) } else { _mm_unpackhi_epi16(a, b) }
        });
        let dwords: [__m128i; TILE] = std::array::from_fn(|i| {
            let (half, pair) = (i / 8, i % 8);
            let (a, b) = (words[half * 8 + pair / 2], words[half * 8 + 4 + pair / 2]);
            if pair % 2 == 0 { _mm_unpacklo_epi32(a, b) } else { _mm_unpackhi_epi32(a, b) }
        });
        for (column, out) in (0..TILE).map(|c| (c, dst.add(c * dst_stride))) {
            let (a, b) = (dwords[column / 2], dwords[8 + column / 2]);
            let transposed =
                if column % 2 == 0 { _mm_unpacklo_epi64(a, b) } else { _mm_unpackhi_epi64(a, b) };
            _mm_storeu_si128(out as *mut __m128i, transposed);
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline]
unsafe fn transpose_tile(src: *const u8, src_stride: usize, dst: *mut u8, dst_stride: usize) {
    unsafe {
        for r in 0..TILE {
            for c in 0..TILE {
                *dst.add(c * dst_stride + r) = *src.add(r * src_stride + c);
            }
        }
    }
}
