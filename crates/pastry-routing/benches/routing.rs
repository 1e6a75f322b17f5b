use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pastry_routing::{IdentifierCodec, RoutingSimulator, RoutingTable, SimulationConfig};
use std::collections::BTreeSet;

fn spread_keys(n: u64) -> Vec<u64> {
    let keys: BTreeSet<u64> = (1..=n)
        .map(|k| k.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 1)
        .collect();
    keys.into_iter().collect()
}

fn bench_table_build(c: &mut Criterion) {
    let keys = spread_keys(4096);
    let mut group = c.benchmark_group("table_build");

    for b in 1..=4 {
        let codec = IdentifierCodec::new(b).unwrap();
        let ids: Vec<String> = keys.iter().map(|&k| codec.encode(k)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(b), &ids, |bench, ids| {
            bench.iter(|| {
                let mut table = RoutingTable::new(ids.len(), &ids[0], b).unwrap();
                for id in &ids[1..] {
                    table.add_node(id).unwrap();
                }
                black_box(table.get_next_node(&ids[ids.len() - 1]).len())
            })
        });
    }

    group.finish();
}

fn bench_route(c: &mut Criterion) {
    let keys = spread_keys(1024);
    let mut group = c.benchmark_group("route");

    for b in 1..=4 {
        let sim = RoutingSimulator::new(&keys, SimulationConfig::new(b)).unwrap();
        group.bench_function(BenchmarkId::from_parameter(b), |bench| {
            bench.iter(|| black_box(sim.route(black_box(3), black_box(1000)).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_table_build, bench_route);
criterion_main!(benches);
