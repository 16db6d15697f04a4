//! Iterated local search runner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use crate::assignment::Assignment;
use crate::color::CostModel;
use crate::local_search::LocalSearch;
use crate::problem::AssignmentProblem;
use crate::rng::create_rng;

use super::config::IlsConfig;

/// Outcome of an iterated local search run.
#[derive(Debug, Clone)]
pub struct IlsResult {
    /// Best assignment found across the whole run.
    pub best: Assignment,
    /// Cost of `best`.
    pub best_cost: f64,
    /// Outer iterations completed.
    pub iterations: usize,
    /// Candidates the acceptance policy let through.
    pub accepted_moves: usize,
    /// Candidates that improved on the archived best.
    pub improving_moves: usize,
    /// True when the cancellation flag or the time limit stopped the run.
    pub cancelled: bool,
    /// Archived best cost after the initial descent and after each
    /// completed iteration. Non-increasing.
    pub cost_history: Vec<f64>,
}

/// Iterated local search: descend once, then repeatedly perturb a copy of
/// the working assignment, descend it, and let the acceptance policy decide
/// which basin the next iteration starts from.
///
/// The working assignment follows the acceptance policy and may worsen;
/// the returned best is archived separately and never does.
pub struct IlsRunner;

impl IlsRunner {
    /// Runs the search from a fresh initial assignment.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid; call [`IlsConfig::validate`] first
    /// for a descriptive error.
    pub fn run<M: CostModel>(problem: &AssignmentProblem<M>, config: &IlsConfig) -> IlsResult {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the search, checking `cancel` between iterations. A set flag
    /// stops the run at the next iteration boundary; the result still
    /// carries the best assignment seen so far.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid.
    pub fn run_with_cancel<M: CostModel>(
        problem: &AssignmentProblem<M>,
        config: &IlsConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> IlsResult {
        config.validate().expect("invalid IlsConfig");
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let start = config.initial.build(problem, &mut rng);
        search(problem, config, start, cancel, &mut rng)
    }

    /// Runs the search from a caller-supplied assignment instead of a
    /// fresh one, re-evaluating its cost against `problem`.
    ///
    /// # Errors
    ///
    /// Returns an error when `start` does not satisfy the problem's mode
    /// invariant.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid.
    pub fn run_from<M: CostModel>(
        problem: &AssignmentProblem<M>,
        config: &IlsConfig,
        start: Assignment,
    ) -> Result<IlsResult, String> {
        Self::run_from_with_cancel(problem, config, start, None)
    }

    /// [`Self::run_from`] with a cancellation flag.
    pub fn run_from_with_cancel<M: CostModel>(
        problem: &AssignmentProblem<M>,
        config: &IlsConfig,
        start: Assignment,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<IlsResult, String> {
        config.validate().expect("invalid IlsConfig");
        if !start.is_valid_for(problem) {
            return Err("starting assignment does not fit the problem".to_string());
        }
        let start = Assignment::evaluated(problem, start.into_slots());
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Ok(search(problem, config, start, cancel, &mut rng))
    }
}

fn search<M: CostModel, R: Rng>(
    problem: &AssignmentProblem<M>,
    config: &IlsConfig,
    start: Assignment,
    cancel: Option<Arc<AtomicBool>>,
    rng: &mut R,
) -> IlsResult {
    let timer = Instant::now();

    let mut current = start;
    LocalSearch::descend(problem, &mut current, &config.local_search, rng);
    let mut best = current.clone();

    let mut cost_history = Vec::with_capacity(config.iterations + 1);
    cost_history.push(best.cost());

    let mut iterations = 0;
    let mut accepted_moves = 0;
    let mut improving_moves = 0;
    let mut cancelled = false;

    // A single basin: nothing to perturb toward.
    if current.len() > 1 {
        for _ in 0..config.iterations {
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

            let mut candidate = current.clone();
            config.perturbation.apply(problem, &mut candidate, rng);
            LocalSearch::descend(problem, &mut candidate, &config.local_search, rng);
            iterations += 1;

            if candidate.cost() < best.cost() {
                best = candidate.clone();
                improving_moves += 1;
            }
            if config.acceptance.accept(current.cost(), candidate.cost(), rng) {
                current = candidate;
                accepted_moves += 1;
            }
            cost_history.push(best.cost());
        }
    }

    let best_cost = best.cost();
    IlsResult {
        best,
        best_cost,
        iterations,
        accepted_moves,
        improving_moves,
        cancelled,
        cost_history,
    }
}
