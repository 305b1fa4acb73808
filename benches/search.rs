use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use swipe::{
    Anchor, Config, DpTarget, Engine, Frame, LaneType, Letter, ScoreMatrix, Scoring, Searcher,
    Sequence,
};

fn searcher(query: &Sequence, bias_correction: bool) -> Searcher {
    let config = Config {
        bias_correction,
        ..Config::default()
    };
    Searcher::new(query, Arc::new(ScoreMatrix::blosum62()), &config).unwrap()
}

pub fn ungapped_bench(c: &mut Criterion, query: &Sequence, target: &Sequence) {
    let searcher = searcher(query, false);
    let anchor = Anchor {
        query: 20,
        target: 20,
    };
    c.bench_function("ungapped", |b| {
        b.iter(|| searcher.ungapped(black_box(target), black_box(anchor)).unwrap())
    });
}

pub fn swipe_bench(c: &mut Criterion, query: &Sequence, target: &Sequence) {
    let searcher = searcher(query, false);
    let mut group = c.benchmark_group("swipe");

    for engine in Engine::all().into_iter().filter(|e| e.is_available()) {
        let targets = vec![target.letters(); engine.lanes()];
        group.throughput(Throughput::Elements(
            (query.len() * target.len() * targets.len()) as u64,
        ));
        for (name, lane_type) in [("i8", LaneType::Signed8), ("u8", LaneType::Unsigned8)] {
            group.bench_function(format!("{}/{name}", engine.name()), |b| {
                b.iter(|| {
                    engine
                        .swipe(searcher.profile(), black_box(&targets), &Scoring::default(), lane_type)
                        .unwrap()
                })
            });
        }
    }
}

pub fn banded_swipe_bench(c: &mut Criterion, query: &Sequence, target: &Sequence) {
    let searcher = searcher(query, true);
    let mut group = c.benchmark_group("banded_swipe");

    for engine in Engine::all().into_iter().filter(|e| e.is_available()) {
        let targets = vec![DpTarget::new(target, -32, 32).unwrap(); engine.lanes()];
        group.throughput(Throughput::Elements((query.len() * 65 * targets.len()) as u64));
        group.bench_function(engine.name(), |b| {
            b.iter(|| {
                engine
                    .banded_swipe(
                        searcher.profile(),
                        black_box(&targets),
                        &Scoring::default(),
                        LaneType::Unsigned8,
                    )
                    .unwrap()
            })
        });
    }
}

pub fn search_generated_bench(c: &mut Criterion, name: &str, query: &Sequence, mean_length: f64) {
    let mut rng = StdRng::seed_from_u64(0);
    let lengths = Normal::new(mean_length, mean_length / 3.0).unwrap();
    let targets: Vec<Vec<Letter>> = (0..1000)
        .map(|_| {
            let len = lengths.sample(&mut rng).max(1.0) as usize;
            (0..len).map(|_| rng.random_range(0..20)).collect()
        })
        .collect();
    let residues = targets.iter().map(Vec::len).sum::<usize>();

    let searcher = searcher(query, true);
    let mut group = c.benchmark_group(format!("search/{name}"));
    group.throughput(Throughput::Elements((query.len() * residues) as u64));
    group.bench_function("full", |b| b.iter(|| searcher.search(black_box(&targets)).unwrap()));

    let bands: Vec<DpTarget> = targets
        .iter()
        .map(|target| DpTarget::new(target, -32, 32).unwrap())
        .collect();
    group.bench_function("banded", |b| {
        b.iter(|| {
            searcher
                .search_banded(black_box(&bands), Frame::default())
                .unwrap()
        })
    });
}
