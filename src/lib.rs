//! Heuristic color-assignment optimization.
//!
//! Given a fixed pool of items carrying 8-bit RGB colors and a fixed
//! sequence of target slots, this crate searches for a slot → item
//! assignment that minimizes the aggregate pairwise color distance. It is
//! the optimization core behind pixel-morphing and photomosaic pipelines;
//! image decoding, tiling, and output rendering are the caller's job.
//!
//! Two search engines cover the same problem:
//!
//! - **Iterated local search** ([`ils`]): first-improvement or
//!   best-improvement descent to a local optimum, then repeated
//!   perturb-descend-accept rounds (double-bridge kicks or random moves;
//!   greedy, random-walk, or Metropolis acceptance).
//! - **Generational search** ([`evolution`]): tournament selection,
//!   order/uniform crossover, and elitist survivor replacement over a pool
//!   of assignments.
//!
//! Assignments come in two modes: a strict permutation (every item used
//! exactly once — pixel rearrangement) or many-to-one (slots draw from the
//! item pool with repetition — tile mosaics). Costs are maintained
//! incrementally: every move is priced in O(1) from the slots it touches,
//! so problem sizes in the hundreds of thousands of slots stay tractable.
//!
//! # Example
//!
//! ```
//! use chromatch::color::{Rgb, SquaredRgb};
//! use chromatch::ils::IlsConfig;
//! use chromatch::problem::{AssignmentProblem, MappingMode};
//! use chromatch::strategy::{optimize, SearchStrategy};
//!
//! let targets = vec![Rgb::new(30, 30, 30), Rgb::new(0, 0, 0)];
//! let items = vec![Rgb::new(0, 0, 0), Rgb::new(30, 30, 30)];
//! let problem =
//!     AssignmentProblem::new(SquaredRgb, &targets, &items, MappingMode::Permutation)?;
//!
//! let strategy = SearchStrategy::Iterated(IlsConfig::new().with_seed(42));
//! let outcome = optimize(&problem, &strategy);
//!
//! assert_eq!(outcome.cost, 0.0);
//! assert_eq!(outcome.assignment.slots(), &[1, 0]);
//! # Ok::<(), String>(())
//! ```

pub mod assignment;
pub mod color;
pub mod evolution;
pub mod ils;
pub mod local_search;
pub mod moves;
pub mod problem;
mod rng;
pub mod strategy;
