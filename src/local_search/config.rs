//! Configuration for the descent engine.

/// Candidate partners priced for each slot during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighborhood {
    /// Every unordered slot pair once per pass (and, in many-to-one mode,
    /// every alternative item per slot). Exhaustive and O(n^2) per pass.
    AllPairs,
    /// The `span` cyclic successors of each slot index (of the currently
    /// assigned item index for reassign trials). Cheap on large problems
    /// where most improving exchanges are local.
    Window {
        /// Successors tried per slot, at least 1.
        span: usize,
    },
    /// `samples` partners drawn uniformly per slot, resampling any draw
    /// that hits the slot (or its current item) itself.
    Sampled {
        /// Draws per slot, at least 1.
        samples: usize,
    },
}

impl Default for Neighborhood {
    fn default() -> Self {
        Neighborhood::AllPairs
    }
}

/// Which improving move a pass applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PivotRule {
    /// Apply the first improving move found and continue the sweep from
    /// the next slot. Fast, order-dependent.
    #[default]
    FirstImprovement,
    /// Price the whole pass, then apply the single steepest improving
    /// move. Ties break on a fixed total order (delta, move kind, slot,
    /// partner), so the result does not depend on scan order.
    BestImprovement,
}

/// Configuration for [`LocalSearch`](super::LocalSearch).
///
/// The convergence width bounds non-improving trial moves. Under
/// [`PivotRule::FirstImprovement`] the counter resets on every accepted
/// move and is checked after every trial; under
/// [`PivotRule::BestImprovement`] it accumulates over the whole descent
/// and is checked at pass boundaries, which keeps parallel and sequential
/// scans on identical schedules.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalSearchConfig {
    /// Partner enumeration per slot.
    pub neighborhood: Neighborhood,
    /// Move selection within a pass.
    pub pivot: PivotRule,
    /// Maximum full passes over the slots (default: 50).
    pub max_passes: usize,
    /// Non-improving trial moves tolerated before the descent stops
    /// (default: 50 000).
    pub convergence_width: usize,
    /// Scan passes with rayon. Requires [`PivotRule::BestImprovement`]
    /// and a deterministic neighborhood (default: false).
    pub parallel: bool,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            neighborhood: Neighborhood::default(),
            pivot: PivotRule::default(),
            max_passes: 50,
            convergence_width: 50_000,
            parallel: false,
        }
    }
}

impl LocalSearchConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exhaustive descent over a cyclic window of `span` successors.
    pub fn windowed(span: usize) -> Self {
        Self::default().with_neighborhood(Neighborhood::Window { span: span.max(1) })
    }

    /// Descent over `samples` random partners per slot.
    pub fn sampled(samples: usize) -> Self {
        Self::default().with_neighborhood(Neighborhood::Sampled {
            samples: samples.max(1),
        })
    }

    /// Sets the partner enumeration.
    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    /// Sets the pivot rule.
    pub fn with_pivot(mut self, pivot: PivotRule) -> Self {
        self.pivot = pivot;
        self
    }

    /// Sets the pass budget (clamped to at least 1).
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes.max(1);
        self
    }

    /// Sets the non-improving trial budget (clamped to at least 1).
    pub fn with_convergence_width(mut self, width: usize) -> Self {
        self.convergence_width = width.max(1);
        self
    }

    /// Enables or disables parallel pass scanning.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_passes == 0 {
            return Err("max_passes must be at least 1".to_string());
        }
        if self.convergence_width == 0 {
            return Err("convergence_width must be at least 1".to_string());
        }
        match self.neighborhood {
            Neighborhood::Window { span } if span == 0 => {
                return Err("window span must be at least 1".to_string());
            }
            Neighborhood::Sampled { samples } if samples == 0 => {
                return Err("sample count must be at least 1".to_string());
            }
            _ => {}
        }
        if self.parallel {
            if self.pivot != PivotRule::BestImprovement {
                return Err(
                    "parallel scanning requires the best-improvement pivot".to_string()
                );
            }
            if matches!(self.neighborhood, Neighborhood::Sampled { .. }) {
                return Err(
                    "parallel scanning requires a deterministic neighborhood".to_string()
                );
            }
        }
        Ok(())
    }
}
