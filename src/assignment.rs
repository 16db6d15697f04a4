//! Candidate solutions: a slot vector with its cached total cost.
//!
//! [`Assignment`] is the unit the whole engine moves, copies, and ranks.
//! The cached cost is maintained by the move functions in [`crate::moves`];
//! [`Assignment::recompute_cost`] is the O(N) oracle used to cross-check it.

use crate::color::CostModel;
use crate::problem::{AssignmentProblem, MappingMode};
use rand::seq::SliceRandom;
use rand::Rng;

/// A candidate solution: `slots[i]` is the item index assigned to slot `i`,
/// `cost` its cached slot-wise total distance.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub(crate) slots: Vec<usize>,
    pub(crate) cost: f64,
}

impl Assignment {
    /// Builds an assignment from caller-provided slots, validating the mode
    /// invariant and computing the cost.
    ///
    /// Permutation mode requires each item index to appear exactly once;
    /// many-to-one mode only requires every index to be in range. Both
    /// require the vector length to equal the problem's slot count.
    pub fn from_slots<M: CostModel>(
        problem: &AssignmentProblem<M>,
        slots: Vec<usize>,
    ) -> Result<Self, String> {
        if slots.len() != problem.slot_count() {
            return Err(format!(
                "assignment length {} does not match slot count {}",
                slots.len(),
                problem.slot_count()
            ));
        }
        if let Some(&bad) = slots.iter().find(|&&item| item >= problem.item_count()) {
            return Err(format!(
                "item index {bad} out of range for {} items",
                problem.item_count()
            ));
        }
        if problem.mode() == MappingMode::Permutation {
            let mut seen = vec![false; problem.item_count()];
            for &item in &slots {
                if seen[item] {
                    return Err(format!("item index {item} appears more than once"));
                }
                seen[item] = true;
            }
        }
        Ok(Self::evaluated(problem, slots))
    }

    /// Builds an assignment from slots known to satisfy the mode invariant,
    /// computing its cost.
    pub(crate) fn evaluated<M: CostModel>(
        problem: &AssignmentProblem<M>,
        slots: Vec<usize>,
    ) -> Self {
        let cost = problem.assignment_cost(&slots);
        Self { slots, cost }
    }

    /// Uniformly random valid assignment: a shuffled permutation, or
    /// independent uniform item draws in many-to-one mode.
    pub fn random<M: CostModel, R: Rng>(problem: &AssignmentProblem<M>, rng: &mut R) -> Self {
        let slots = match problem.mode() {
            MappingMode::Permutation => {
                let mut slots: Vec<usize> = (0..problem.slot_count()).collect();
                slots.shuffle(rng);
                slots
            }
            MappingMode::ManyToOne => (0..problem.slot_count())
                .map(|_| rng.random_range(0..problem.item_count()))
                .collect(),
        };
        Self::evaluated(problem, slots)
    }

    /// In-order assignment: slot `i` takes item `i` (modulo the item count
    /// in many-to-one mode).
    pub fn identity<M: CostModel>(problem: &AssignmentProblem<M>) -> Self {
        let slots = match problem.mode() {
            MappingMode::Permutation => (0..problem.slot_count()).collect(),
            MappingMode::ManyToOne => (0..problem.slot_count())
                .map(|i| i % problem.item_count())
                .collect(),
        };
        Self::evaluated(problem, slots)
    }

    /// Greedy nearest-item construction.
    ///
    /// Visits slots in order; each takes its cheapest item — the cheapest
    /// still-unused item in permutation mode, the cheapest overall in
    /// many-to-one mode. O(N·M), intended as a strong starting point for
    /// moderate sizes, not for per-pixel problems.
    pub fn greedy_nearest<M: CostModel>(problem: &AssignmentProblem<M>) -> Self {
        let n = problem.slot_count();
        let m = problem.item_count();
        let slots = match problem.mode() {
            MappingMode::Permutation => {
                let mut used = vec![false; m];
                let mut slots = Vec::with_capacity(n);
                for slot in 0..n {
                    let mut best_item = usize::MAX;
                    let mut best_cost = f64::INFINITY;
                    for item in 0..m {
                        if used[item] {
                            continue;
                        }
                        let cost = problem.pair_cost(slot, item);
                        if cost < best_cost {
                            best_cost = cost;
                            best_item = item;
                        }
                    }
                    used[best_item] = true;
                    slots.push(best_item);
                }
                slots
            }
            MappingMode::ManyToOne => (0..n)
                .map(|slot| {
                    let mut best_item = 0;
                    let mut best_cost = f64::INFINITY;
                    for item in 0..m {
                        let cost = problem.pair_cost(slot, item);
                        if cost < best_cost {
                            best_cost = cost;
                            best_item = item;
                        }
                    }
                    best_item
                })
                .collect(),
        };
        Self::evaluated(problem, slots)
    }

    /// The slot → item mapping.
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Cached total cost, maintained incrementally by the move functions.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the assignment covers zero slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Consumes the assignment, returning the slot vector.
    pub fn into_slots(self) -> Vec<usize> {
        self.slots
    }

    /// Recomputes the total cost from scratch. Correctness oracle for the
    /// incremental updates; O(N).
    pub fn recompute_cost<M: CostModel>(&self, problem: &AssignmentProblem<M>) -> f64 {
        problem.assignment_cost(&self.slots)
    }

    /// Checks the mode invariant against a problem: length, index range,
    /// and uniqueness in permutation mode.
    pub fn is_valid_for<M: CostModel>(&self, problem: &AssignmentProblem<M>) -> bool {
        if self.slots.len() != problem.slot_count() {
            return false;
        }
        if self.slots.iter().any(|&item| item >= problem.item_count()) {
            return false;
        }
        if problem.mode() == MappingMode::Permutation {
            let mut seen = vec![false; problem.item_count()];
            for &item in &self.slots {
                if seen[item] {
                    return false;
                }
                seen[item] = true;
            }
        }
        true
    }
}

/// How a runner builds its starting assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialAssignment {
    /// Uniformly random valid assignment.
    #[default]
    Random,

    /// Slot `i` takes item `i` (modulo the item count in many-to-one mode).
    Identity,

    /// Greedy nearest-item construction ([`Assignment::greedy_nearest`]).
    GreedyNearest,
}

impl InitialAssignment {
    /// Builds the starting assignment for a problem.
    pub fn build<M: CostModel, R: Rng>(
        &self,
        problem: &AssignmentProblem<M>,
        rng: &mut R,
    ) -> Assignment {
        match self {
            InitialAssignment::Random => Assignment::random(problem, rng),
            InitialAssignment::Identity => Assignment::identity(problem),
            InitialAssignment::GreedyNearest => Assignment::greedy_nearest(problem),
        }
    }
}
