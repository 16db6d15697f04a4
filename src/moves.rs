//! Structural edits over assignments, each with its exact cost delta.
//!
//! The `*_delta` functions price a move in O(1) by re-evaluating only the
//! touched slots; the `apply_*` functions perform the edit and keep the
//! cached [`Assignment::cost`](crate::assignment::Assignment::cost)
//! consistent. [`apply_double_bridge`] rebuilds the whole slot vector and
//! recomputes the cost in full, which also resets any floating-point drift
//! accumulated by non-exact cost models.

use crate::assignment::Assignment;
use crate::color::CostModel;
use crate::problem::{AssignmentProblem, MappingMode};
use rand::Rng;

/// Cost change from exchanging the items of slots `a` and `b`, without
/// applying the move. O(1).
pub fn swap_delta<M: CostModel>(
    problem: &AssignmentProblem<M>,
    assignment: &Assignment,
    a: usize,
    b: usize,
) -> f64 {
    let item_a = assignment.slots[a];
    let item_b = assignment.slots[b];
    let old = problem.pair_cost(a, item_a) + problem.pair_cost(b, item_b);
    let new = problem.pair_cost(a, item_b) + problem.pair_cost(b, item_a);
    new - old
}

/// Exchanges the items of slots `a` and `b`, updating the cached cost.
/// Returns the applied delta. Valid in both mapping modes.
pub fn apply_swap<M: CostModel>(
    problem: &AssignmentProblem<M>,
    assignment: &mut Assignment,
    a: usize,
    b: usize,
) -> f64 {
    let delta = swap_delta(problem, assignment, a, b);
    assignment.slots.swap(a, b);
    assignment.cost += delta;
    delta
}

/// Cost change from putting `item` into `slot`, without applying. O(1).
pub fn reassign_delta<M: CostModel>(
    problem: &AssignmentProblem<M>,
    assignment: &Assignment,
    slot: usize,
    item: usize,
) -> f64 {
    problem.pair_cost(slot, item) - problem.pair_cost(slot, assignment.slots[slot])
}

/// Puts `item` into `slot`, updating the cached cost. Returns the delta.
///
/// # Panics
///
/// Panics in permutation mode: an uncompensated reassign breaks the
/// bijection, and the compensated pair is exactly [`apply_swap`].
pub fn apply_reassign<M: CostModel>(
    problem: &AssignmentProblem<M>,
    assignment: &mut Assignment,
    slot: usize,
    item: usize,
) -> f64 {
    assert_eq!(
        problem.mode(),
        MappingMode::ManyToOne,
        "reassign is a many-to-one move"
    );
    let delta = reassign_delta(problem, assignment, slot, item);
    assignment.slots[slot] = item;
    assignment.cost += delta;
    delta
}

/// Double-bridge segment recombination (4-opt style).
///
/// Picks cut points `p1 < p2 < p3` as three successive offsets uniform in
/// `[1, N/4]` and rebuilds the sequence as
/// `[0,p1) + [p3,N) + [p2,p3) + [p1,p2)`. The result cannot be reached by
/// any single swap, which is what makes it useful as a perturbation; it is
/// never used inside descent. Preserves the item multiset, hence both mode
/// invariants.
///
/// For N < 4 there is no room for three cuts: the move degrades to one
/// random swap of two distinct slots (no-op for N < 2).
pub fn apply_double_bridge<M: CostModel, R: Rng>(
    problem: &AssignmentProblem<M>,
    assignment: &mut Assignment,
    rng: &mut R,
) {
    let n = assignment.slots.len();
    if n < 2 {
        return;
    }
    if n < 4 {
        let a = rng.random_range(0..n);
        let b = (a + rng.random_range(1..n)) % n;
        apply_swap(problem, assignment, a, b);
        return;
    }

    let q = n / 4;
    let p1 = rng.random_range(1..=q);
    let p2 = p1 + rng.random_range(1..=q);
    let p3 = p2 + rng.random_range(1..=q);

    let slots = &assignment.slots;
    let mut rebuilt = Vec::with_capacity(n);
    rebuilt.extend_from_slice(&slots[..p1]);
    rebuilt.extend_from_slice(&slots[p3..]);
    rebuilt.extend_from_slice(&slots[p2..p3]);
    rebuilt.extend_from_slice(&slots[p1..p2]);

    assignment.cost = problem.assignment_cost(&rebuilt);
    assignment.slots = rebuilt;
}
