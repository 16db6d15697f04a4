//! Configuration for the generational runner.

/// Configuration for [`EvolutionRunner`](super::EvolutionRunner).
///
/// The defaults are the parameter set the engine was tuned with on pixel
/// palettes: a pool of 100, 250 generations, tournaments of 3, crossover
/// probability 0.9, and a 5% elite.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Individuals in the pool (default: 100, at least 2).
    pub population_size: usize,
    /// Generations to run (default: 250).
    pub generations: usize,
    /// Draws per tournament, without replacement (default: 3). Must not
    /// exceed the population size.
    pub tournament_size: usize,
    /// Probability that a mated pair recombines instead of passing through
    /// cloned, in `[0, 1]` (default: 0.9).
    pub crossover_probability: f64,
    /// Fraction of the population carried over unchanged each generation,
    /// in `[0, 1)` (default: 0.05). Zero disables elitism.
    pub elite_fraction: f64,
    /// Evaluate offspring with rayon (default: false).
    pub parallel: bool,
    /// Seed for the run's RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Soft wall-clock budget in milliseconds, checked between generations.
    pub time_limit_ms: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 250,
            tournament_size: 3,
            crossover_probability: 0.9,
            elite_fraction: 0.05,
            parallel: false,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl EvolutionConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size (clamped to at least 2).
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    /// Sets the generation budget (clamped to at least 1).
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations.max(1);
        self
    }

    /// Sets the tournament size (clamped to at least 1).
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.crossover_probability = probability;
        self
    }

    /// Sets the elite fraction.
    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction;
        self
    }

    /// Enables or disables parallel offspring evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
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
        if self.population_size < 2 {
            return Err("population size must be at least 2".to_string());
        }
        if self.generations == 0 {
            return Err("generations must be at least 1".to_string());
        }
        if self.tournament_size == 0 {
            return Err("tournament size must be at least 1".to_string());
        }
        if self.tournament_size > self.population_size {
            return Err(format!(
                "tournament size {} exceeds population size {}",
                self.tournament_size, self.population_size
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err("crossover probability must be within [0, 1]".to_string());
        }
        if !(0.0..1.0).contains(&self.elite_fraction) {
            return Err("elite fraction must be within [0, 1)".to_string());
        }
        if self.time_limit_ms == Some(0) {
            return Err("time limit must be at least 1 ms".to_string());
        }
        Ok(())
    }

    /// Elite individuals carried over per generation.
    pub(crate) fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_fraction) as usize
    }
}
