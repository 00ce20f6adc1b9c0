//! Criterion benchmarks for u-regroup.
//!
//! Measures pairing-model construction and first-solution search on
//! synthetic participant sets with a simple manager hierarchy.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_regroup::cp::{BacktrackSolver, CpSolver, SolutionCollector, SolverConfig};
use u_regroup::graph::{PairGraph, ParticipantGraph};
use u_regroup::grouping::PairingModel;

/// `n` participants; every fifth one manages the next four.
fn org(n: usize) -> ParticipantGraph {
    let mut graph = ParticipantGraph::new();
    for i in 0..n {
        let name = format!("p{i:03}");
        if i % 5 == 0 {
            graph.add_node(name);
        } else {
            graph.add_edge(format!("p{:03}", i - i % 5), name);
        }
    }
    graph
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairing_build");
    group.sample_size(10);

    for &n in &[10usize, 20, 30] {
        let graph = org(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, g| {
            b.iter(|| {
                let model = PairingModel::build(black_box(g), 3, &PairGraph::new());
                black_box(model)
            })
        });
    }
    group.finish();
}

fn bench_first_solution(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairing_first_solution");
    group.sample_size(10);

    for (n, size) in [(10usize, 2usize), (12, 3), (16, 4)] {
        let model = PairingModel::build(&org(n), size, &PairGraph::new())
            .expect("valid benchmark model");
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_s{}", n, size), n),
            &model,
            |b, m| {
                b.iter(|| {
                    let mut collector = SolutionCollector::with_limit(1);
                    let outcome = BacktrackSolver::new().search_all(
                        black_box(m.cp_model()),
                        &SolverConfig::default(),
                        &mut collector,
                    );
                    black_box(outcome)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_first_solution);
criterion_main!(benches);
