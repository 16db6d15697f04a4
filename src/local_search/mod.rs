//! Local search: descent to a local optimum under a configurable
//! neighborhood.
//!
//! A descent repeatedly prices single moves (reassigns in many-to-one mode,
//! then swaps) and applies improving ones until a full pass finds nothing,
//! a bound on non-improving trials ("convergence width") is exhausted, or a
//! pass budget runs out. Two pivot rules are available: first-improvement
//! (apply the first negative delta found) and best-improvement (scan the
//! pass, apply the single best move), the latter optionally scanning in
//! parallel with identical results.
//!
//! # References
//!
//! - Hoos & Stützle (2004), *Stochastic Local Search: Foundations and
//!   Applications*, ch. 2 (iterative improvement, pivoting rules)

mod config;
mod descent;

pub use config::{LocalSearchConfig, Neighborhood, PivotRule};
pub use descent::{DescentStats, LocalSearch};
