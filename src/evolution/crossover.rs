//! Recombination operators.
//!
//! Both operators take two parent slot vectors and return two children.
//! [`uniform_crossover`] mixes per slot and is only sound in many-to-one
//! mode; [`order_crossover`] is the permutation-safe operator the runner
//! uses whenever the problem is a bijection.

use rand::Rng;

/// Per-slot uniform crossover.
///
/// Each position goes to child one from parent `a` or parent `b` with equal
/// probability; child two receives the other parent's item. Preserves the
/// index-range invariant but not uniqueness, so it is restricted to
/// many-to-one assignments.
pub fn uniform_crossover<R: Rng>(
    a: &[usize],
    b: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    debug_assert_eq!(a.len(), b.len());
    let mut first = Vec::with_capacity(a.len());
    let mut second = Vec::with_capacity(a.len());
    for (&from_a, &from_b) in a.iter().zip(b) {
        if rng.random_bool(0.5) {
            first.push(from_a);
            second.push(from_b);
        } else {
            first.push(from_b);
            second.push(from_a);
        }
    }
    (first, second)
}

/// Order crossover (OX) for permutations.
///
/// Copies a random segment from one parent, then fills the remaining
/// positions with the other parent's items in their cyclic order starting
/// after the segment, skipping items the segment already placed. Both
/// children are valid permutations whenever the parents are. O(n).
pub fn order_crossover<R: Rng>(
    a: &[usize],
    b: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    if n <= 1 {
        return (a.to_vec(), b.to_vec());
    }

    let lo = rng.random_range(0..n);
    let hi = rng.random_range(0..n);
    let (lo, hi) = (lo.min(hi), lo.max(hi));

    (ox_child(a, b, lo, hi), ox_child(b, a, lo, hi))
}

/// One OX child: the segment `[lo, hi]` comes from `keeper`, the rest from
/// `donor` in cyclic order.
fn ox_child(keeper: &[usize], donor: &[usize], lo: usize, hi: usize) -> Vec<usize> {
    let n = keeper.len();
    let mut child = vec![usize::MAX; n];
    let mut placed = vec![false; n];

    for i in lo..=hi {
        child[i] = keeper[i];
        placed[keeper[i]] = true;
    }

    let mut write = (hi + 1) % n;
    for offset in 0..n {
        let item = donor[(hi + 1 + offset) % n];
        if !placed[item] {
            child[write] = item;
            write = (write + 1) % n;
        }
    }

    child
}
