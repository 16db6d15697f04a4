//! Perturbation operators for escaping local optima.

use rand::Rng;

use crate::assignment::Assignment;
use crate::color::CostModel;
use crate::moves::{apply_double_bridge, apply_reassign, apply_swap};
use crate::problem::{AssignmentProblem, MappingMode};

/// Kick applied to a copy of the working assignment before each descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Perturbation {
    /// Classic double-bridge: cut the slot sequence at three random points
    /// and reorder the four segments. A single application is hard for
    /// swap-based descent to undo, which keeps the walk moving between
    /// basins.
    DoubleBridge,
    /// `count` uniformly random moves. In permutation mode every move is a
    /// random swap; in many-to-one mode each move is a swap or a reassign
    /// with equal probability.
    RandomMoves {
        /// Moves per kick, at least 1.
        count: usize,
    },
}

impl Default for Perturbation {
    fn default() -> Self {
        Perturbation::DoubleBridge
    }
}

impl Perturbation {
    /// Applies the kick in place. Assignments with fewer than two slots
    /// are left untouched.
    pub fn apply<M: CostModel, R: Rng>(
        &self,
        problem: &AssignmentProblem<M>,
        assignment: &mut Assignment,
        rng: &mut R,
    ) {
        if assignment.len() < 2 {
            return;
        }
        match *self {
            Perturbation::DoubleBridge => apply_double_bridge(problem, assignment, rng),
            Perturbation::RandomMoves { count } => {
                for _ in 0..count {
                    random_move(problem, assignment, rng);
                }
            }
        }
    }
}

fn random_move<M: CostModel, R: Rng>(
    problem: &AssignmentProblem<M>,
    assignment: &mut Assignment,
    rng: &mut R,
) {
    let n = assignment.len();
    let reassigns = problem.mode() == MappingMode::ManyToOne && problem.item_count() > 1;
    if reassigns && rng.random_bool(0.5) {
        let slot = rng.random_range(0..n);
        let current = assignment.slots()[slot];
        let mut item = rng.random_range(0..problem.item_count());
        while item == current {
            item = rng.random_range(0..problem.item_count());
        }
        apply_reassign(problem, assignment, slot, item);
    } else {
        let slot = rng.random_range(0..n);
        let mut other = rng.random_range(0..n);
        while other == slot {
            other = rng.random_range(0..n);
        }
        apply_swap(problem, assignment, slot, other);
    }
}
