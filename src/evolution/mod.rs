//! Generational evolutionary search over assignments.
//!
//! The runner evolves a fixed-size pool of candidate assignments:
//! tournament selection fills a mating pool, adjacent mates recombine with
//! a configured probability, and survivor replacement is elitist — the best
//! parents carry over unchanged, the rest of the next generation comes from
//! the best offspring. There is no mutation operator; diversity comes from
//! the random initial population and from recombination.
//!
//! Recombination respects the problem's mapping mode: order crossover for
//! permutations (which uniform crossover would break), per-slot uniform
//! crossover for many-to-one assignments.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//!   (order crossover)
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

mod config;
mod crossover;
mod runner;

pub use config::EvolutionConfig;
pub use crossover::{order_crossover, uniform_crossover};
pub use runner::{EvolutionResult, EvolutionRunner};
