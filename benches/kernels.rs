use std::hint::black_box;

use criterion::Criterion;
use swipe::simd::transpose::{TILE, transpose_16x16};
use swipe::simd::{PortableVector, ProfileRow, ScoreVector};
use swipe::smith_waterman::cell::{CellParams, cell_update};
use swipe::{QueryProfile, ScoreMatrix, Scoring, Sequence};

pub fn lookup_bench(c: &mut Criterion, query: &Sequence, target: &Sequence) {
    let profile = QueryProfile::new(query, &ScoreMatrix::blosum62(), None);
    let mut group = c.benchmark_group("lookup");

    run_lookup_bench::<PortableVector<u8, 16>>(&mut group, "portable", profile.unsigned_rows(), target);
    #[cfg(target_arch = "x86_64")]
    {
        run_lookup_bench::<swipe::simd::SseU8>(&mut group, "sse", profile.unsigned_rows(), target);
        run_lookup_bench::<swipe::simd::AvxU8>(&mut group, "avx2", profile.unsigned_rows(), target);
    }
    #[cfg(target_arch = "aarch64")]
    run_lookup_bench::<swipe::simd::NeonU8>(&mut group, "neon", profile.unsigned_rows(), target);
}

fn run_lookup_bench<V: ScoreVector>(
    group: &mut criterion::BenchmarkGroup<criterion::measurement::WallTime>,
    name: &str,
    rows: &[ProfileRow<V::Score>],
    target: &Sequence,
) {
    if !V::is_available() || target.len() < V::LANES {
        return;
    }
    group.bench_function(name, |b| {
        b.iter(|| unsafe {
            for (i, row) in rows.iter().enumerate() {
                let offset = i % (target.len() - V::LANES + 1);
                black_box(V::lookup(row, target[offset..].as_ptr()));
            }
        })
    });
}

pub fn transpose_bench(c: &mut Criterion) {
    let input: [u8; TILE * TILE] = std::array::from_fn(|i| (i % 31) as u8);
    let mut output = [0; TILE * TILE];
    c.bench_function("transpose/16x16", |b| {
        b.iter(|| {
            transpose_16x16(black_box(&input), &mut output);
            black_box(&output);
        })
    });
}

pub fn cell_update_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_update");
    run_cell_update_bench::<PortableVector<i8, 16>>(&mut group, "portable/i8", 0);
    run_cell_update_bench::<PortableVector<u8, 16>>(&mut group, "portable/u8", 4);
    #[cfg(target_arch = "x86_64")]
    {
        run_cell_update_bench::<swipe::simd::SseI8>(&mut group, "sse/i8", 0);
        run_cell_update_bench::<swipe::simd::SseU8>(&mut group, "sse/u8", 4);
    }
    #[cfg(target_arch = "aarch64")]
    {
        run_cell_update_bench::<swipe::simd::NeonI8>(&mut group, "neon/i8", 0);
        run_cell_update_bench::<swipe::simd::NeonU8>(&mut group, "neon/u8", 4);
    }
}

fn run_cell_update_bench<V: ScoreVector>(
    group: &mut criterion::BenchmarkGroup<criterion::measurement::WallTime>,
    name: &str,
    bias: u8,
) {
    if !V::is_available() {
        return;
    }
    use swipe::simd::Score;
    group.bench_function(name, |b| unsafe {
        let params = CellParams::<V>::new(&Scoring::default(), V::Score::from_bits(bias));
        let scores = V::splat(V::Score::from_bits(3));
        let (mut horizontal_gap, mut vertical_gap, mut best) = (V::zero(), V::zero(), V::zero());
        let mut diagonal = V::zero();
        b.iter(|| {
            for _ in 0..64 {
                diagonal = cell_update(
                    black_box(diagonal),
                    scores,
                    &mut horizontal_gap,
                    &mut vertical_gap,
                    &mut best,
                    &params,
                );
            }
            black_box(best)
        })
    });
}
