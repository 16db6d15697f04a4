//! Iterated local search.
//!
//! The runner descends to a first local optimum, then loops: perturb a
//! copy of the working assignment, descend it, and let the acceptance
//! policy decide which basin the next iteration starts from. Exploratory
//! policies (random walk, fixed-temperature annealing) may move the
//! working assignment uphill; the archived best never worsens and is what
//! the runner returns.
//!
//! # References
//!
//! - Lourenço, Martin & Stützle (2003), "Iterated Local Search",
//!   *Handbook of Metaheuristics*
//! - Martin, Otto & Felten (1991), "Large-Step Markov Chains for the
//!   Traveling Salesman Problem" (the double-bridge kick)

mod accept;
mod config;
mod perturb;
mod runner;

pub use accept::Acceptance;
pub use config::IlsConfig;
pub use perturb::Perturbation;
pub use runner::{IlsResult, IlsRunner};
