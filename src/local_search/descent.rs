//! Descent procedure over swap and reassign moves.

use std::cmp::Ordering;

use rand::Rng;
use rayon::prelude::*;

use super::config::{LocalSearchConfig, Neighborhood, PivotRule};
use crate::assignment::Assignment;
use crate::color::CostModel;
use crate::moves::{apply_reassign, apply_swap, reassign_delta, swap_delta};
use crate::problem::{AssignmentProblem, MappingMode};

/// Counters describing one descent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescentStats {
    /// Full passes started.
    pub passes: usize,
    /// Trial moves priced.
    pub trials: usize,
    /// Improving moves applied.
    pub accepted: usize,
}

/// Descent engine. Stateless; all knobs live in [`LocalSearchConfig`].
pub struct LocalSearch;

impl LocalSearch {
    /// Descends `assignment` toward a local optimum in place.
    ///
    /// The cost never increases. The descent stops when a full pass applies
    /// no move, when the convergence width is exhausted, or after
    /// `max_passes` passes, whichever comes first. Assignments with fewer
    /// than two slots are already locally optimal and are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid; call [`LocalSearchConfig::validate`]
    /// first for a descriptive error.
    pub fn descend<M: CostModel, R: Rng>(
        problem: &AssignmentProblem<M>,
        assignment: &mut Assignment,
        config: &LocalSearchConfig,
        rng: &mut R,
    ) -> DescentStats {
        config.validate().expect("invalid LocalSearchConfig");

        let mut stats = DescentStats::default();
        if assignment.len() <= 1 {
            return stats;
        }

        match config.pivot {
            PivotRule::FirstImprovement => {
                first_improvement(problem, assignment, config, rng, &mut stats)
            }
            PivotRule::BestImprovement => {
                best_improvement(problem, assignment, config, rng, &mut stats)
            }
        }

        debug_assert!({
            let exact = assignment.recompute_cost(problem);
            (assignment.cost() - exact).abs() <= 1e-6 * exact.abs().max(1.0)
        });

        stats
    }
}

/// Sweeps slots in order, applying every improving move as soon as it is
/// found. The non-improving counter resets on each accepted move and is
/// checked after every trial.
fn first_improvement<M: CostModel, R: Rng>(
    problem: &AssignmentProblem<M>,
    assignment: &mut Assignment,
    config: &LocalSearchConfig,
    rng: &mut R,
    stats: &mut DescentStats,
) {
    let n = assignment.len();
    let reassigns = problem.mode() == MappingMode::ManyToOne && problem.item_count() > 1;
    let mut non_improving = 0usize;
    let mut partners = Vec::new();

    for _ in 0..config.max_passes {
        stats.passes += 1;
        let mut accepted_this_pass = 0usize;

        if reassigns {
            for slot in 0..n {
                let current = assignment.slots()[slot];
                item_candidates(
                    &config.neighborhood,
                    current,
                    problem.item_count(),
                    rng,
                    &mut partners,
                );
                for &item in &partners {
                    stats.trials += 1;
                    if reassign_delta(problem, assignment, slot, item) < 0.0 {
                        apply_reassign(problem, assignment, slot, item);
                        stats.accepted += 1;
                        accepted_this_pass += 1;
                        non_improving = 0;
                        break;
                    }
                    non_improving += 1;
                    if non_improving >= config.convergence_width {
                        return;
                    }
                }
            }
        }

        for slot in 0..n {
            swap_partners(&config.neighborhood, slot, n, rng, &mut partners);
            for &other in &partners {
                stats.trials += 1;
                if swap_delta(problem, assignment, slot, other) < 0.0 {
                    apply_swap(problem, assignment, slot, other);
                    stats.accepted += 1;
                    accepted_this_pass += 1;
                    non_improving = 0;
                    break;
                }
                non_improving += 1;
                if non_improving >= config.convergence_width {
                    return;
                }
            }
        }

        if accepted_this_pass == 0 {
            return;
        }
    }
}

/// Prices a full pass, applies the single steepest improving move, and
/// repeats. The non-improving counter accumulates over the whole descent
/// and is checked at pass boundaries.
fn best_improvement<M: CostModel, R: Rng>(
    problem: &AssignmentProblem<M>,
    assignment: &mut Assignment,
    config: &LocalSearchConfig,
    rng: &mut R,
    stats: &mut DescentStats,
) {
    let mut non_improving = 0usize;
    let mut partners = Vec::new();

    for _ in 0..config.max_passes {
        stats.passes += 1;

        let best = if config.parallel {
            scan_parallel(problem, assignment, &config.neighborhood)
        } else {
            scan_sequential(problem, assignment, &config.neighborhood, rng, &mut partners)
        };
        let scanned = pass_trial_count(problem, assignment.len(), &config.neighborhood);
        stats.trials += scanned;

        match best {
            Some(mv) => {
                match mv.kind {
                    MoveKind::Reassign => {
                        apply_reassign(problem, assignment, mv.slot, mv.partner);
                    }
                    MoveKind::Swap => {
                        apply_swap(problem, assignment, mv.slot, mv.partner);
                    }
                }
                stats.accepted += 1;
                non_improving += scanned.saturating_sub(1);
            }
            None => return,
        }

        if non_improving >= config.convergence_width {
            return;
        }
    }
}

/// Tie-break order for pass scans. Reassign sorts before swap so both scan
/// directions agree on the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MoveKind {
    Reassign,
    Swap,
}

#[derive(Debug, Clone, Copy)]
struct ScanMove {
    delta: f64,
    kind: MoveKind,
    slot: usize,
    partner: usize,
}

fn move_order(a: &ScanMove, b: &ScanMove) -> Ordering {
    a.delta
        .partial_cmp(&b.delta)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.kind.cmp(&b.kind))
        .then_with(|| a.slot.cmp(&b.slot))
        .then_with(|| a.partner.cmp(&b.partner))
}

fn consider(best: &mut Option<ScanMove>, candidate: ScanMove) {
    if candidate.delta >= 0.0 {
        return;
    }
    let replace = match best {
        Some(current) => move_order(&candidate, current) == Ordering::Less,
        None => true,
    };
    if replace {
        *best = Some(candidate);
    }
}

fn scan_sequential<M: CostModel, R: Rng>(
    problem: &AssignmentProblem<M>,
    assignment: &Assignment,
    neighborhood: &Neighborhood,
    rng: &mut R,
    partners: &mut Vec<usize>,
) -> Option<ScanMove> {
    let n = assignment.len();
    let mut best = None;

    if problem.mode() == MappingMode::ManyToOne && problem.item_count() > 1 {
        for slot in 0..n {
            let current = assignment.slots()[slot];
            item_candidates(neighborhood, current, problem.item_count(), rng, partners);
            for &item in partners.iter() {
                let delta = reassign_delta(problem, assignment, slot, item);
                consider(
                    &mut best,
                    ScanMove {
                        delta,
                        kind: MoveKind::Reassign,
                        slot,
                        partner: item,
                    },
                );
            }
        }
    }

    for slot in 0..n {
        swap_partners(neighborhood, slot, n, rng, partners);
        for &other in partners.iter() {
            let delta = swap_delta(problem, assignment, slot, other);
            consider(
                &mut best,
                ScanMove {
                    delta,
                    kind: MoveKind::Swap,
                    slot,
                    partner: other,
                },
            );
        }
    }

    best
}

/// Rayon scan over slots. Only deterministic neighborhoods reach this
/// path, and the total order on moves makes the reduction independent of
/// thread scheduling, so the outcome matches the sequential scan exactly.
fn scan_parallel<M: CostModel>(
    problem: &AssignmentProblem<M>,
    assignment: &Assignment,
    neighborhood: &Neighborhood,
) -> Option<ScanMove> {
    let n = assignment.len();
    let reassigns = problem.mode() == MappingMode::ManyToOne && problem.item_count() > 1;

    (0..n)
        .into_par_iter()
        .filter_map(|slot| {
            let mut best = None;
            if reassigns {
                let current = assignment.slots()[slot];
                for_each_item_candidate(neighborhood, current, problem.item_count(), |item| {
                    let delta = reassign_delta(problem, assignment, slot, item);
                    consider(
                        &mut best,
                        ScanMove {
                            delta,
                            kind: MoveKind::Reassign,
                            slot,
                            partner: item,
                        },
                    );
                });
            }
            for_each_swap_partner(neighborhood, slot, n, |other| {
                let delta = swap_delta(problem, assignment, slot, other);
                consider(
                    &mut best,
                    ScanMove {
                        delta,
                        kind: MoveKind::Swap,
                        slot,
                        partner: other,
                    },
                );
            });
            best
        })
        .min_by(move_order)
}

/// Trials a full pass prices, independent of the assignment contents.
fn pass_trial_count<M: CostModel>(
    problem: &AssignmentProblem<M>,
    n: usize,
    neighborhood: &Neighborhood,
) -> usize {
    let m = problem.item_count();
    let reassigns = if problem.mode() == MappingMode::ManyToOne && m > 1 {
        let per_slot = match *neighborhood {
            Neighborhood::AllPairs => m - 1,
            Neighborhood::Window { span } => span.min(m - 1),
            Neighborhood::Sampled { samples } => samples,
        };
        n * per_slot
    } else {
        0
    };
    let swaps = match *neighborhood {
        Neighborhood::AllPairs => n * (n - 1) / 2,
        Neighborhood::Window { span } => n * span.min(n - 1),
        Neighborhood::Sampled { samples } => n * samples,
    };
    reassigns + swaps
}

/// Fills `out` with the swap partners for `slot`. Requires `n >= 2`.
fn swap_partners<R: Rng>(
    neighborhood: &Neighborhood,
    slot: usize,
    n: usize,
    rng: &mut R,
    out: &mut Vec<usize>,
) {
    out.clear();
    match *neighborhood {
        Neighborhood::AllPairs => out.extend(slot + 1..n),
        Neighborhood::Window { span } => {
            for offset in 1..=span.min(n - 1) {
                out.push((slot + offset) % n);
            }
        }
        Neighborhood::Sampled { samples } => {
            for _ in 0..samples {
                let mut other = rng.random_range(0..n);
                while other == slot {
                    other = rng.random_range(0..n);
                }
                out.push(other);
            }
        }
    }
}

/// Fills `out` with alternative items for a slot currently holding
/// `current`. Requires `m >= 2`.
fn item_candidates<R: Rng>(
    neighborhood: &Neighborhood,
    current: usize,
    m: usize,
    rng: &mut R,
    out: &mut Vec<usize>,
) {
    out.clear();
    match *neighborhood {
        Neighborhood::AllPairs => out.extend((0..m).filter(|&item| item != current)),
        Neighborhood::Window { span } => {
            for offset in 1..=span.min(m - 1) {
                out.push((current + offset) % m);
            }
        }
        Neighborhood::Sampled { samples } => {
            for _ in 0..samples {
                let mut item = rng.random_range(0..m);
                while item == current {
                    item = rng.random_range(0..m);
                }
                out.push(item);
            }
        }
    }
}

fn for_each_swap_partner(
    neighborhood: &Neighborhood,
    slot: usize,
    n: usize,
    mut visit: impl FnMut(usize),
) {
    match *neighborhood {
        Neighborhood::AllPairs => {
            for other in slot + 1..n {
                visit(other);
            }
        }
        Neighborhood::Window { span } => {
            for offset in 1..=span.min(n - 1) {
                visit((slot + offset) % n);
            }
        }
        Neighborhood::Sampled { .. } => {
            unreachable!("sampled neighborhoods are rejected for parallel scans")
        }
    }
}

fn for_each_item_candidate(
    neighborhood: &Neighborhood,
    current: usize,
    m: usize,
    mut visit: impl FnMut(usize),
) {
    match *neighborhood {
        Neighborhood::AllPairs => {
            for item in (0..m).filter(|&item| item != current) {
                visit(item);
            }
        }
        Neighborhood::Window { span } => {
            for offset in 1..=span.min(m - 1) {
                visit((current + offset) % m);
            }
        }
        Neighborhood::Sampled { .. } => {
            unreachable!("sampled neighborhoods are rejected for parallel scans")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgb, SquaredRgb};
    use crate::rng::create_rng;

    fn gray(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    fn gradient_problem(n: usize) -> AssignmentProblem<SquaredRgb> {
        let targets: Vec<Rgb> = (0..n).map(|i| gray((i * 10) as u8)).collect();
        let items: Vec<Rgb> = (0..n).rev().map(|i| gray((i * 10) as u8)).collect();
        AssignmentProblem::new(SquaredRgb, &targets, &items, MappingMode::Permutation)
            .unwrap()
    }

    fn random_problem(n: usize, mode: MappingMode, seed: u64) -> AssignmentProblem<SquaredRgb> {
        let mut rng = create_rng(seed);
        let mut colors = |count: usize| -> Vec<Rgb> {
            (0..count)
                .map(|_| Rgb::new(rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()))
                .collect()
        };
        let targets = colors(n);
        let item_count = match mode {
            MappingMode::Permutation => n,
            MappingMode::ManyToOne => (n / 2).max(1),
        };
        let items = colors(item_count);
        AssignmentProblem::new(SquaredRgb, &targets, &items, mode).unwrap()
    }

    #[test]
    fn descent_solves_reversed_gradient() {
        let problem = gradient_problem(4);
        let mut assignment = Assignment::identity(&problem);
        assert!(assignment.cost() > 0.0);

        let mut rng = create_rng(42);
        let stats = LocalSearch::descend(
            &problem,
            &mut assignment,
            &LocalSearchConfig::default(),
            &mut rng,
        );

        assert_eq!(assignment.cost(), 0.0, "swaps must undo the reversal");
        assert_eq!(assignment.slots(), &[3, 2, 1, 0]);
        assert!(stats.accepted >= 2, "reversal needs at least two swaps");
    }

    #[test]
    fn descent_never_increases_cost() {
        let configs = [
            LocalSearchConfig::default(),
            LocalSearchConfig::default().with_pivot(PivotRule::BestImprovement),
            LocalSearchConfig::windowed(3),
            LocalSearchConfig::sampled(5),
        ];
        for mode in [MappingMode::Permutation, MappingMode::ManyToOne] {
            for (i, config) in configs.iter().enumerate() {
                let problem = random_problem(12, mode, 7 + i as u64);
                let mut rng = create_rng(100 + i as u64);
                let mut assignment = Assignment::random(&problem, &mut rng);
                let start = assignment.cost();

                LocalSearch::descend(&problem, &mut assignment, config, &mut rng);

                assert!(
                    assignment.cost() <= start,
                    "config {i} in {mode:?} worsened {start} to {}",
                    assignment.cost()
                );
                assert!(assignment.is_valid_for(&problem));
                let exact = assignment.recompute_cost(&problem);
                assert!((assignment.cost() - exact).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn optimal_input_converges_in_one_pass() {
        let targets: Vec<Rgb> = (0..6).map(|i| gray((i * 20) as u8)).collect();
        let problem =
            AssignmentProblem::new(SquaredRgb, &targets, &targets, MappingMode::Permutation)
                .unwrap();
        let mut assignment = Assignment::identity(&problem);
        let mut rng = create_rng(42);

        let stats = LocalSearch::descend(
            &problem,
            &mut assignment,
            &LocalSearchConfig::default(),
            &mut rng,
        );

        assert_eq!(assignment.cost(), 0.0);
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.accepted, 0);
    }

    #[test]
    fn convergence_width_stops_after_one_trial() {
        let targets: Vec<Rgb> = (0..6).map(|i| gray((i * 20) as u8)).collect();
        let problem =
            AssignmentProblem::new(SquaredRgb, &targets, &targets, MappingMode::Permutation)
                .unwrap();
        let mut assignment = Assignment::identity(&problem);
        let mut rng = create_rng(42);
        let config = LocalSearchConfig::new().with_convergence_width(1);

        let stats = LocalSearch::descend(&problem, &mut assignment, &config, &mut rng);

        assert_eq!(stats.trials, 1);
        assert_eq!(stats.accepted, 0);
    }

    #[test]
    fn reassign_phase_matches_each_slot_to_its_item() {
        let palette: Vec<Rgb> = (0..4).map(|i| gray((i * 10) as u8)).collect();
        let problem =
            AssignmentProblem::new(SquaredRgb, &palette, &palette, MappingMode::ManyToOne)
                .unwrap();
        let mut assignment = Assignment::from_slots(&problem, vec![0; 4]).unwrap();
        let mut rng = create_rng(42);

        let stats = LocalSearch::descend(
            &problem,
            &mut assignment,
            &LocalSearchConfig::default(),
            &mut rng,
        );

        assert_eq!(assignment.cost(), 0.0);
        assert_eq!(assignment.slots(), &[0, 1, 2, 3]);
        assert!(stats.passes <= 5, "stepwise reassigns converge quickly");
    }

    #[test]
    fn parallel_scan_matches_sequential_scan() {
        for mode in [MappingMode::Permutation, MappingMode::ManyToOne] {
            let problem = random_problem(16, mode, 23);
            let base = LocalSearchConfig::new().with_pivot(PivotRule::BestImprovement);

            let mut rng = create_rng(5);
            let mut sequential = Assignment::random(&problem, &mut rng);
            let mut parallel = sequential.clone();

            let mut seq_rng = create_rng(9);
            let seq_stats =
                LocalSearch::descend(&problem, &mut sequential, &base, &mut seq_rng);

            let mut par_rng = create_rng(9);
            let par_stats = LocalSearch::descend(
                &problem,
                &mut parallel,
                &base.with_parallel(true),
                &mut par_rng,
            );

            assert_eq!(sequential.slots(), parallel.slots(), "mode {mode:?}");
            assert_eq!(seq_stats, par_stats, "mode {mode:?}");
        }
    }

    #[test]
    fn sampled_descent_is_reproducible() {
        let problem = random_problem(20, MappingMode::Permutation, 31);
        let config = LocalSearchConfig::sampled(4);

        let mut first = Assignment::identity(&problem);
        let mut second = first.clone();

        let mut rng = create_rng(77);
        let first_stats = LocalSearch::descend(&problem, &mut first, &config, &mut rng);
        let mut rng = create_rng(77);
        let second_stats = LocalSearch::descend(&problem, &mut second, &config, &mut rng);

        assert_eq!(first.slots(), second.slots());
        assert_eq!(first_stats, second_stats);
    }

    #[test]
    fn tiny_assignments_are_left_untouched() {
        let problem = random_problem(1, MappingMode::Permutation, 3);
        let mut assignment = Assignment::identity(&problem);
        let mut rng = create_rng(42);

        let stats = LocalSearch::descend(
            &problem,
            &mut assignment,
            &LocalSearchConfig::default(),
            &mut rng,
        );

        assert_eq!(stats, DescentStats::default());
        assert_eq!(assignment.slots(), &[0]);
    }

    #[test]
    #[should_panic(expected = "invalid LocalSearchConfig")]
    fn descend_panics_on_invalid_config() {
        let problem = gradient_problem(4);
        let mut assignment = Assignment::identity(&problem);
        let mut rng = create_rng(42);
        let config = LocalSearchConfig::new().with_parallel(true);
        LocalSearch::descend(&problem, &mut assignment, &config, &mut rng);
    }
}
