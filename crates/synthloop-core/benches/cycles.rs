use std::collections::BTreeSet;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use synthloop_core::graph::{CraftGraph, CycleSearch, SearchBudget, SearchOptions};
use synthloop_core::{Item, Matcher};

struct Tier {
    name: &'static str,
    items: usize,
    categories: usize,
}

const TIERS: &[Tier] = &[
    Tier {
        name: "small",
        items: 40,
        categories: 8,
    },
    Tier {
        name: "medium",
        items: 160,
        categories: 16,
    },
];

/// Deterministic catalog: every item carries one tag and requires two others,
/// so each tag is shared by `items / categories` items.
fn synthetic_catalog(tier: &Tier) -> Vec<Item> {
    let tag = |n: usize| format!("(Cat{})", n % tier.categories);
    (0..tier.items)
        .map(|i| {
            Item::new(format!("Item {i}"))
                .with_categories([tag(i)])
                .with_recipe([tag(i * 3 + 1), tag(i * 5 + 2)])
        })
        .collect()
}

fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycles.tiered");
    let matcher = Matcher::default();
    let required = BTreeSet::new();

    for tier in TIERS {
        let items = synthetic_catalog(tier);
        let pool: Vec<&Item> = items.iter().collect();
        group.throughput(Throughput::Elements(tier.items as u64));

        group.bench_with_input(BenchmarkId::new("build", tier.name), &pool, |b, pool| {
            b.iter(|| black_box(CraftGraph::build(&matcher, pool).edge_count()));
        });

        let graph = CraftGraph::build(&matcher, &pool);
        for length in [2_usize, 3] {
            group.bench_with_input(
                BenchmarkId::new(format!("k{length}"), tier.name),
                &graph,
                |b, graph| {
                    let search = CycleSearch::new(graph, SearchOptions::default());
                    b.iter(|| black_box(search.run(length, None, &required).loops.len()));
                },
            );
        }

        let bounded = SearchOptions {
            budget: SearchBudget {
                max_steps: Some(50_000),
                max_duration: None,
            },
            unique_rotations: false,
        };
        group.bench_with_input(
            BenchmarkId::new("k5-bounded", tier.name),
            &graph,
            |b, graph| {
                let search = CycleSearch::new(graph, bounded);
                b.iter(|| black_box(search.run(5, None, &required).steps));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_cycles);
criterion_main!(benches);
