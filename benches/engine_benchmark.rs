use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use colleague_affinity::{
    build_graph, layout, partition_teams_with_rng, Canvas, GroupingCriteria, Member,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn population(size: usize) -> Vec<Member> {
    let departments = ["Engineering/Platform", "Engineering/Data", "Product", "Design", "Sales", "Finance", "Research"];
    let levels = ["Intern", "Associate", "Senior", "Staff", "Manager", "Director"];
    let places = ["Tokyo", "Kanagawa", "Osaka", "Kyoto", "Remote", "Fukuoka"];
    let codes = ["INTJ", "ENFP", "ISTJ", "ESFP", "INFJ", "ENTP", "ISFJ", "ESTJ"];
    (0..size)
        .map(|i| {
            Member::new(i as u64 + 1, format!("Member{}", i))
                .with_department(departments[i % departments.len()])
                .with_job_level(levels[i % levels.len()])
                .with_location(places[i % places.len()])
                .with_personality(codes[i % codes.len()])
                .with_tags([format!("topic{}", i % 9), format!("topic{}", i % 4)])
                .with_profile_embedding((0..16).map(|d| ((i * 7 + d * 3) % 11) as f32).collect())
        })
        .collect()
}

/// Benchmark graph construction (all-pairs scoring)
fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for size in [25, 50, 100].iter() {
        let members = population(*size + 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| build_graph(black_box(&members[0]), black_box(&members[1..]), 0.3, 12, Canvas::default()));
        });
    }
    group.finish();
}

/// Benchmark the O(n²) force-directed layout
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for size in [25, 50, 100].iter() {
        let members = population(*size + 1);
        let graph = build_graph(&members[0], &members[1..], 0.3, 100, Canvas::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| layout(black_box(&graph.nodes), black_box(&graph.edges), &Canvas::default(), 120));
        });
    }
    group.finish();
}

/// Benchmark team partitioning with swap search
fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_teams");
    let criteria = GroupingCriteria {
        diverse_departments: true,
        diverse_personalities: true,
        mixed_levels: true,
        ..GroupingCriteria::default()
    };

    for size in [20, 40, 60].iter() {
        let members = population(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(42);
                partition_teams_with_rng(black_box(&members), 4, &criteria, true, 100, &mut rng)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_graph, bench_layout, bench_partition);
criterion_main!(benches);
