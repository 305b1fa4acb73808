use criterion::{Criterion, criterion_group, criterion_main};
use std::time::Duration;

mod kernels;
mod search;

use kernels::{cell_update_bench, lookup_bench, transpose_bench};
use search::{banded_swipe_bench, search_generated_bench, swipe_bench, ungapped_bench};
use swipe::Sequence;

// A pair of unrelated human proteins of roughly 400 residues
const QUERY: &str = "mpeeeysefkelilqkelhvvyalshvcgqdrtllasillriflhekleslllctlndreismedeattlfrattlastlmeqymkatatqfvhhalkdsilkimeskqscelspskleknedvntnlthllnilselvekifmaseilpptlryiygclqksvqhkwptnttmrtrvvsgfvflrlicpailnprmfniisdspspiaartlilvaksvqnlanlvefgakepymegvnpfiksnkhrmimfldelgnvpelpdttehsrtdlsrdlaalheicvahsdelrtlsnergaqqhvlkkllaitellqqkqnqyt";
const TARGET: &str = "erlvelvtmmgdqgelpiamalanvvpcsqwdelarvlvtlfdsrhllyqllwnmfskeveladsmqtlfrgnslaskimtfcfkvygatylqklldpllrivitssdwqhvsfevdptrlepsesleenqrnllqmtekffhaiissssefppqlrsvchclyqvvsqrfpqnsigavgsamflrfinpaivspyeagildkkpppiierglklmskilqsianhvlftkeehmrpfndfvksnfdaarrffldiasdcptsdavnhslsfisdgnvlalhrllwnnqekigqylssnrdhkavgrrpfdkmatllaylgppe";

fn criterion_benchmark(c: &mut Criterion) {
    let query: Sequence = QUERY.parse().unwrap();
    let target: Sequence = TARGET.parse().unwrap();

    lookup_bench(c, &query, &target);
    transpose_bench(c);
    cell_update_bench(c);

    ungapped_bench(c, &query, &target);
    swipe_bench(c, &query, &target);
    banded_swipe_bench(c, &query, &target);

    // Bench on synthetic data
    for (name, mean_length) in [("Short", 120.0), ("Medium", 350.0), ("Long", 1000.0)] {
        search_generated_bench(c, name, &query, mean_length);
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(200))
        .measurement_time(Duration::from_secs(2));
    targets = criterion_benchmark
}
criterion_main!(benches);
