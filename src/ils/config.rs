//! Configuration for the iterated local search runner.

use crate::assignment::InitialAssignment;
use crate::local_search::LocalSearchConfig;

use super::accept::Acceptance;
use super::perturb::Perturbation;

/// Configuration for [`IlsRunner`](super::IlsRunner).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlsConfig {
    /// Outer perturb-descend iterations (default: 100).
    pub iterations: usize,
    /// How the starting assignment is built (default: random).
    pub initial: InitialAssignment,
    /// Descent applied to the start and to every perturbed candidate.
    pub local_search: LocalSearchConfig,
    /// Kick applied to a copy of the working assignment (default:
    /// double-bridge).
    pub perturbation: Perturbation,
    /// Policy picking the basin the next iteration starts from (default:
    /// greedy).
    pub acceptance: Acceptance,
    /// Seed for the run's RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Soft wall-clock budget in milliseconds, checked between iterations.
    pub time_limit_ms: Option<u64>,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            initial: InitialAssignment::default(),
            local_search: LocalSearchConfig::default(),
            perturbation: Perturbation::default(),
            acceptance: Acceptance::default(),
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl IlsConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the outer iteration budget (clamped to at least 1).
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Sets the initial assignment strategy.
    pub fn with_initial(mut self, initial: InitialAssignment) -> Self {
        self.initial = initial;
        self
    }

    /// Sets the descent configuration.
    pub fn with_local_search(mut self, local_search: LocalSearchConfig) -> Self {
        self.local_search = local_search;
        self
    }

    /// Sets the perturbation operator.
    pub fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// Sets the acceptance policy.
    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Fixes the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock budget in milliseconds (clamped to at least 1).
    pub fn with_time_limit_ms(mut self, millis: u64) -> Self {
        self.time_limit_ms = Some(millis.max(1));
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.iterations == 0 {
            return Err("iterations must be at least 1".to_string());
        }
        if let Acceptance::SimulatedAnnealing { temperature } = self.acceptance {
            if !(temperature.is_finite() && temperature > 0.0) {
                return Err("annealing temperature must be positive and finite".to_string());
            }
        }
        if let Perturbation::RandomMoves { count } = self.perturbation {
            if count == 0 {
                return Err("perturbation move count must be at least 1".to_string());
            }
        }
        if self.time_limit_ms == Some(0) {
            return Err("time limit must be at least 1 ms".to_string());
        }
        self.local_search.validate()
    }
}
