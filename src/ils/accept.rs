//! Acceptance policies for the outer search loop.

use rand::Rng;

/// Decides whether a perturbed-and-descended candidate replaces the
/// working assignment.
///
/// The policy only steers where the next perturbation starts from; the
/// archived best assignment is kept separately and never worsens.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Acceptance {
    /// Accept only strict improvements over the working assignment.
    Greedy,
    /// Accept every candidate, turning the outer loop into a random walk
    /// over local optima.
    RandomWalk,
    /// Metropolis criterion: improvements always pass, worsenings pass
    /// with probability `exp(-(candidate - incumbent) / temperature)`.
    SimulatedAnnealing {
        /// Fixed temperature, strictly positive.
        temperature: f64,
    },
}

impl Default for Acceptance {
    fn default() -> Self {
        Acceptance::Greedy
    }
}

impl Acceptance {
    /// Default Metropolis temperature.
    pub const DEFAULT_TEMPERATURE: f64 = 0.1;

    /// Simulated annealing at [`Self::DEFAULT_TEMPERATURE`].
    pub fn annealing() -> Self {
        Acceptance::SimulatedAnnealing {
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }

    /// Whether a candidate with cost `candidate` replaces a working
    /// assignment with cost `incumbent`.
    pub fn accept<R: Rng>(&self, incumbent: f64, candidate: f64, rng: &mut R) -> bool {
        match *self {
            Acceptance::Greedy => candidate < incumbent,
            Acceptance::RandomWalk => true,
            Acceptance::SimulatedAnnealing { temperature } => {
                if candidate < incumbent {
                    true
                } else {
                    let probability = (-(candidate - incumbent) / temperature).exp();
                    rng.random_bool(probability)
                }
            }
        }
    }
}
