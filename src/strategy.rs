//! Strategy selection: one entry point over both search engines.
//!
//! Callers that do not care which engine runs pick a [`SearchStrategy`]
//! (a configured iterated or generational search) and call [`optimize`],
//! which returns a strategy-independent [`SearchOutcome`]. Callers that
//! need engine-specific results (descent statistics, acceptance counters)
//! use [`IlsRunner`](crate::ils::IlsRunner) or
//! [`EvolutionRunner`](crate::evolution::EvolutionRunner) directly.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::assignment::Assignment;
use crate::color::CostModel;
use crate::evolution::{EvolutionConfig, EvolutionRunner};
use crate::ils::{IlsConfig, IlsRunner};
use crate::problem::AssignmentProblem;

/// The search engine to run, with its configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// Iterated local search: a single solution trajectory of
    /// perturb-descend-accept steps.
    Iterated(IlsConfig),
    /// Generational evolutionary search over a pool of assignments.
    Population(EvolutionConfig),
}

impl Default for SearchStrategy {
    fn default() -> Self {
        SearchStrategy::Iterated(IlsConfig::default())
    }
}

/// Final assignment and run summary, the same shape for either engine.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best assignment found.
    pub assignment: Assignment,
    /// Cost of `assignment`.
    pub cost: f64,
    /// Outer iterations or generations completed.
    pub iterations: usize,
    /// True when a cancellation flag or time limit stopped the run.
    pub cancelled: bool,
    /// Best cost after each completed iteration or generation.
    pub cost_history: Vec<f64>,
}

/// Runs the selected strategy on a problem.
///
/// # Panics
///
/// Panics if the strategy's configuration is invalid; validate the
/// embedded config first for a descriptive error.
pub fn optimize<M: CostModel>(
    problem: &AssignmentProblem<M>,
    strategy: &SearchStrategy,
) -> SearchOutcome {
    optimize_with_cancel(problem, strategy, None)
}

/// [`optimize`] with a cooperative cancellation flag, checked between
/// iterations or generations.
pub fn optimize_with_cancel<M: CostModel>(
    problem: &AssignmentProblem<M>,
    strategy: &SearchStrategy,
    cancel: Option<Arc<AtomicBool>>,
) -> SearchOutcome {
    match strategy {
        SearchStrategy::Iterated(config) => {
            let result = IlsRunner::run_with_cancel(problem, config, cancel);
            SearchOutcome {
                assignment: result.best,
                cost: result.best_cost,
                iterations: result.iterations,
                cancelled: result.cancelled,
                cost_history: result.cost_history,
            }
        }
        SearchStrategy::Population(config) => {
            let result = EvolutionRunner::run_with_cancel(problem, config, cancel);
            SearchOutcome {
                assignment: result.best,
                cost: result.best_cost,
                iterations: result.generations,
                cancelled: result.cancelled,
                cost_history: result.cost_history,
            }
        }
    }
}
