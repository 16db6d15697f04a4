//! Generational loop execution.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;

use crate::assignment::Assignment;
use crate::color::CostModel;
use crate::problem::{AssignmentProblem, MappingMode};
use crate::rng::create_rng;

use super::config::EvolutionConfig;
use super::crossover::{order_crossover, uniform_crossover};

/// Outcome of a generational search run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best assignment found across the whole run.
    pub best: Assignment,
    /// Cost of `best`.
    pub best_cost: f64,
    /// Generations completed.
    pub generations: usize,
    /// True when the cancellation flag or the time limit stopped the run.
    pub cancelled: bool,
    /// Best cost in the population after initialization and after each
    /// completed generation. Non-increasing whenever elitism is enabled.
    pub cost_history: Vec<f64>,
}

/// Generational search: tournament selection, adjacent-pair recombination,
/// elitist survivor replacement.
///
/// The population starts from random assignments and stays sorted ascending
/// by cost. Each generation builds a mating pool of `population_size`
/// tournament winners, pairs them up in order, recombines each pair with
/// the configured probability (order crossover in permutation mode, uniform
/// crossover in many-to-one mode), and replaces the population with the
/// best elite parents plus the best offspring.
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the search.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid; call [`EvolutionConfig::validate`]
    /// first for a descriptive error.
    pub fn run<M: CostModel>(
        problem: &AssignmentProblem<M>,
        config: &EvolutionConfig,
    ) -> EvolutionResult {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the search, checking `cancel` between generations. A set flag
    /// stops the run at the next generation boundary; the result still
    /// carries the best assignment seen so far.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid.
    pub fn run_with_cancel<M: CostModel>(
        problem: &AssignmentProblem<M>,
        config: &EvolutionConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EvolutionResult {
        config.validate().expect("invalid EvolutionConfig");
        let timer = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        // One slot has one basin; a pool of copies cannot explore anything.
        if problem.slot_count() <= 1 {
            let best = Assignment::random(problem, &mut rng);
            return EvolutionResult {
                best_cost: best.cost(),
                cost_history: vec![best.cost()],
                best,
                generations: 0,
                cancelled: false,
            };
        }

        let mut population: Vec<Assignment> = (0..config.population_size)
            .map(|_| Assignment::random(problem, &mut rng))
            .collect();
        sort_ascending(&mut population);

        let mut best = population[0].clone();
        let mut cost_history = Vec::with_capacity(config.generations + 1);
        cost_history.push(best.cost());

        let mut generations = 0;
        let mut cancelled = false;

        for _ in 0..config.generations {
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if timer.elapsed().as_millis() as u64 >= limit {
                    cancelled = true;
                    break;
                }
            }

            let mating_pool: Vec<usize> = (0..config.population_size)
                .map(|_| tournament(&population, config.tournament_size, &mut rng))
                .collect();

            let mut offspring_slots: Vec<Vec<usize>> =
                Vec::with_capacity(config.population_size);
            for pair in mating_pool.chunks(2) {
                match *pair {
                    [first, second] => {
                        let pa = &population[first];
                        let pb = &population[second];
                        if rng.random_range(0.0..1.0) < config.crossover_probability {
                            let (c1, c2) = match problem.mode() {
                                MappingMode::Permutation => {
                                    order_crossover(pa.slots(), pb.slots(), &mut rng)
                                }
                                MappingMode::ManyToOne => {
                                    uniform_crossover(pa.slots(), pb.slots(), &mut rng)
                                }
                            };
                            offspring_slots.push(c1);
                            offspring_slots.push(c2);
                        } else {
                            offspring_slots.push(pa.slots().to_vec());
                            offspring_slots.push(pb.slots().to_vec());
                        }
                    }
                    // Odd trailing mate passes through unchanged.
                    [lone] => offspring_slots.push(population[lone].slots().to_vec()),
                    _ => unreachable!("chunks(2) yields one or two mates"),
                }
            }

            let mut offspring: Vec<Assignment> = if config.parallel {
                offspring_slots
                    .into_par_iter()
                    .map(|slots| Assignment::evaluated(problem, slots))
                    .collect()
            } else {
                offspring_slots
                    .into_iter()
                    .map(|slots| Assignment::evaluated(problem, slots))
                    .collect()
            };
            sort_ascending(&mut offspring);

            let elite_count = config.elite_count();
            let mut next: Vec<Assignment> = population[..elite_count].to_vec();
            next.extend(
                offspring
                    .into_iter()
                    .take(config.population_size - elite_count),
            );
            sort_ascending(&mut next);
            population = next;

            if population[0].cost() < best.cost() {
                best = population[0].clone();
            }
            generations += 1;
            cost_history.push(population[0].cost());
        }

        EvolutionResult {
            best_cost: best.cost(),
            best,
            generations,
            cancelled,
            cost_history,
        }
    }
}

fn sort_ascending(population: &mut [Assignment]) {
    population.sort_by(|a, b| {
        a.cost()
            .partial_cmp(&b.cost())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Tournament selection: `size` draws without replacement, keep the best.
fn tournament<R: Rng>(population: &[Assignment], size: usize, rng: &mut R) -> usize {
    index::sample(rng, population.len(), size)
        .into_iter()
        .min_by(|&a, &b| {
            population[a]
                .cost()
                .partial_cmp(&population[b].cost())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("tournament draws at least one individual")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgb, SquaredRgb};
    use crate::rng::create_rng;

    fn gray(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    fn reverse_gradient(n: u8) -> AssignmentProblem<SquaredRgb> {
        let items: Vec<Rgb> = (0..n).map(|i| gray(i * 10)).collect();
        let targets: Vec<Rgb> = (0..n).rev().map(|i| gray(i * 10)).collect();
        AssignmentProblem::new(SquaredRgb, &targets, &items, MappingMode::Permutation).unwrap()
    }

    fn random_problem(n: usize, m: usize, mode: MappingMode) -> AssignmentProblem<SquaredRgb> {
        let mut rng = create_rng(55);
        let mut colors = |count: usize| -> Vec<Rgb> {
            (0..count)
                .map(|_| Rgb::new(rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()))
                .collect()
        };
        let targets = colors(n);
        let items = colors(m);
        AssignmentProblem::new(SquaredRgb, &targets, &items, mode).unwrap()
    }

    fn small_config() -> EvolutionConfig {
        EvolutionConfig::new()
            .with_population_size(30)
            .with_generations(40)
            .with_seed(42)
    }

    #[test]
    fn tiny_permutation_space_is_solved() {
        // Two slots have exactly two permutations; a random pool of 16 all
        // but surely contains the optimum, and elitism keeps it.
        let problem = reverse_gradient(2);
        let config = EvolutionConfig::new()
            .with_population_size(16)
            .with_generations(5)
            .with_seed(42);

        let result = EvolutionRunner::run(&problem, &config);

        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.best.slots(), &[1, 0]);
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn search_improves_on_the_initial_pool() {
        let problem = random_problem(12, 12, MappingMode::Permutation);
        let result = EvolutionRunner::run(&problem, &small_config());

        assert!(result.best.is_valid_for(&problem));
        assert!(result.best_cost <= result.cost_history[0]);
        assert_eq!(result.best_cost, result.best.recompute_cost(&problem));
        assert_eq!(result.cost_history.len(), 41);
    }

    #[test]
    fn elitism_makes_the_history_non_increasing() {
        let problem = random_problem(10, 10, MappingMode::Permutation);
        let config = small_config().with_elite_fraction(0.1);
        let result = EvolutionRunner::run(&problem, &config);

        assert!(
            result
                .cost_history
                .windows(2)
                .all(|pair| pair[1] <= pair[0]),
            "population best worsened despite elitism"
        );
        assert_eq!(result.best_cost, *result.cost_history.last().unwrap());
    }

    #[test]
    fn zero_elitism_still_archives_the_best() {
        let problem = random_problem(10, 10, MappingMode::Permutation);
        let config = small_config().with_elite_fraction(0.0);
        let result = EvolutionRunner::run(&problem, &config);

        let floor = result
            .cost_history
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.best_cost, floor);
        assert!(result.best.is_valid_for(&problem));
    }

    #[test]
    fn many_to_one_uses_uniform_crossover_and_stays_valid() {
        let problem = random_problem(16, 6, MappingMode::ManyToOne);
        let result = EvolutionRunner::run(&problem, &small_config());

        assert!(result.best.is_valid_for(&problem));
        assert!(result.best_cost <= result.cost_history[0]);
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let problem = random_problem(10, 10, MappingMode::Permutation);
        let config = small_config();

        let first = EvolutionRunner::run(&problem, &config);
        let second = EvolutionRunner::run(&problem, &config);

        assert_eq!(first.best.slots(), second.best.slots());
        assert_eq!(first.cost_history, second.cost_history);
    }

    #[test]
    fn parallel_evaluation_matches_sequential() {
        // The parallel flag only moves offspring evaluation onto rayon; it
        // draws nothing from the RNG, so the runs must agree exactly.
        let problem = random_problem(10, 10, MappingMode::Permutation);
        let sequential = EvolutionRunner::run(&problem, &small_config());
        let parallel = EvolutionRunner::run(&problem, &small_config().with_parallel(true));

        assert_eq!(sequential.best.slots(), parallel.best.slots());
        assert_eq!(sequential.cost_history, parallel.cost_history);
    }

    #[test]
    fn preset_cancel_flag_stops_before_the_first_generation() {
        let problem = random_problem(8, 8, MappingMode::Permutation);
        let flag = Arc::new(AtomicBool::new(true));

        let result = EvolutionRunner::run_with_cancel(&problem, &small_config(), Some(flag));

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.cost_history.len(), 1, "the initial pool is still ranked");
        assert!(result.best.is_valid_for(&problem));
    }

    #[test]
    fn single_slot_problem_returns_immediately() {
        let problem = AssignmentProblem::new(
            SquaredRgb,
            &[gray(10)],
            &[gray(200)],
            MappingMode::Permutation,
        )
        .unwrap();

        let result = EvolutionRunner::run(&problem, &small_config());

        assert_eq!(result.generations, 0);
        assert_eq!(result.best.slots(), &[0]);
        assert_eq!(result.best_cost, problem.pair_cost(0, 0));
    }

    #[test]
    fn empty_problem_yields_an_empty_best() {
        let problem =
            AssignmentProblem::new(SquaredRgb, &[], &[], MappingMode::Permutation).unwrap();
        let result = EvolutionRunner::run(&problem, &small_config());

        assert!(result.best.is_empty());
        assert_eq!(result.best_cost, 0.0);
        assert_eq!(result.generations, 0);
    }

    #[test]
    fn full_size_tournament_always_picks_the_population_best() {
        let problem = reverse_gradient(6);
        let mut rng = create_rng(3);
        let mut population: Vec<Assignment> = (0..8)
            .map(|_| Assignment::random(&problem, &mut rng))
            .collect();
        sort_ascending(&mut population);

        for _ in 0..20 {
            let winner = tournament(&population, population.len(), &mut rng);
            assert_eq!(population[winner].cost(), population[0].cost());
        }
    }

    #[test]
    fn unit_tournament_is_a_uniform_draw() {
        let problem = reverse_gradient(6);
        let mut rng = create_rng(17);
        let population: Vec<Assignment> = (0..4)
            .map(|_| Assignment::random(&problem, &mut rng))
            .collect();

        let mut counts = [0u32; 4];
        for _ in 0..8000 {
            counts[tournament(&population, 1, &mut rng)] += 1;
        }
        for &count in &counts {
            assert!(count > 1500, "expected roughly uniform, got {counts:?}");
        }
    }

    #[test]
    #[should_panic(expected = "invalid EvolutionConfig")]
    fn run_panics_on_invalid_config() {
        let problem = reverse_gradient(4);
        let config = EvolutionConfig {
            generations: 0,
            ..EvolutionConfig::default()
        };
        EvolutionRunner::run(&problem, &config);
    }
}
