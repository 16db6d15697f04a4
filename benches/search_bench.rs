//! Criterion benchmarks for the chromatch search engines.
//!
//! Uses synthetic random-color problems to measure descent and runner
//! throughput independent of any image pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use chromatch::assignment::Assignment;
use chromatch::color::{Rgb, SquaredRgb};
use chromatch::evolution::{EvolutionConfig, EvolutionRunner};
use chromatch::ils::{IlsConfig, IlsRunner, Perturbation};
use chromatch::local_search::{LocalSearch, LocalSearchConfig, PivotRule};
use chromatch::problem::{AssignmentProblem, MappingMode};

fn random_colors(rng: &mut SmallRng, count: usize) -> Vec<Rgb> {
    (0..count)
        .map(|_| Rgb::new(rng.random(), rng.random(), rng.random()))
        .collect()
}

fn random_problem(n: usize, mode: MappingMode) -> AssignmentProblem<SquaredRgb> {
    let mut rng = SmallRng::seed_from_u64(n as u64);
    let targets = random_colors(&mut rng, n);
    let item_count = match mode {
        MappingMode::Permutation => n,
        MappingMode::ManyToOne => (n / 4).max(1),
    };
    let items = random_colors(&mut rng, item_count);
    AssignmentProblem::new(SquaredRgb, &targets, &items, mode).unwrap()
}

fn bench_descent(c: &mut Criterion) {
    let mut group = c.benchmark_group("descent");

    for &n in &[64usize, 256, 1024] {
        let problem = random_problem(n, MappingMode::Permutation);

        group.bench_with_input(BenchmarkId::new("all_pairs", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(7);
                let mut assignment = Assignment::random(&problem, &mut rng);
                LocalSearch::descend(
                    &problem,
                    &mut assignment,
                    &LocalSearchConfig::default(),
                    &mut rng,
                );
                black_box(assignment.cost())
            })
        });

        group.bench_with_input(BenchmarkId::new("window_10", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(7);
                let mut assignment = Assignment::random(&problem, &mut rng);
                LocalSearch::descend(
                    &problem,
                    &mut assignment,
                    &LocalSearchConfig::windowed(10),
                    &mut rng,
                );
                black_box(assignment.cost())
            })
        });
    }

    for &n in &[1024usize] {
        let problem = random_problem(n, MappingMode::Permutation);
        let parallel = LocalSearchConfig::new()
            .with_pivot(PivotRule::BestImprovement)
            .with_parallel(true);

        group.bench_with_input(BenchmarkId::new("parallel_best", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(7);
                let mut assignment = Assignment::random(&problem, &mut rng);
                LocalSearch::descend(&problem, &mut assignment, &parallel, &mut rng);
                black_box(assignment.cost())
            })
        });
    }

    group.finish();
}

fn bench_ils(c: &mut Criterion) {
    let mut group = c.benchmark_group("ils");
    group.sample_size(10);

    for &n in &[128usize, 512] {
        let problem = random_problem(n, MappingMode::Permutation);
        let config = IlsConfig::new()
            .with_iterations(20)
            .with_local_search(LocalSearchConfig::windowed(10))
            .with_seed(42);

        group.bench_with_input(BenchmarkId::new("double_bridge", n), &n, |b, _| {
            b.iter(|| black_box(IlsRunner::run(&problem, &config).best_cost))
        });
    }

    let problem = random_problem(512, MappingMode::ManyToOne);
    let config = IlsConfig::new()
        .with_iterations(20)
        .with_local_search(LocalSearchConfig::windowed(10))
        .with_perturbation(Perturbation::RandomMoves { count: 5 })
        .with_seed(42);
    group.bench_function("many_to_one_random_moves_512", |b| {
        b.iter(|| black_box(IlsRunner::run(&problem, &config).best_cost))
    });

    group.finish();
}

fn bench_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");
    group.sample_size(10);

    for &n in &[64usize, 256] {
        let problem = random_problem(n, MappingMode::Permutation);
        let config = EvolutionConfig::new()
            .with_population_size(50)
            .with_generations(30)
            .with_seed(42);

        group.bench_with_input(BenchmarkId::new("order_crossover", n), &n, |b, _| {
            b.iter(|| black_box(EvolutionRunner::run(&problem, &config).best_cost))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_descent, bench_ils, bench_evolution);
criterion_main!(benches);
