//! Problem instances: precomputed color features plus a mapping mode.
//!
//! [`AssignmentProblem`] is built once from raw colors, validates the
//! slot/item counts for the chosen [`MappingMode`], and precomputes every
//! feature so the search loops never touch raw colors again. All data flows
//! through this struct by explicit reference; there is no global state.

use crate::color::{CostModel, Rgb};

/// How item indices may appear in an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MappingMode {
    /// Every item is used exactly once; slot and item counts must match.
    #[default]
    Permutation,

    /// Slots draw from the item pool with repetition; an item may appear
    /// under any number of slots, or none.
    ManyToOne,
}

/// A validated assignment problem: target features, item features, the
/// mapping mode, and the cost model that produced the features.
#[derive(Debug)]
pub struct AssignmentProblem<M: CostModel> {
    model: M,
    targets: Vec<M::Feature>,
    items: Vec<M::Feature>,
    mode: MappingMode,
}

impl<M: CostModel> AssignmentProblem<M> {
    /// Builds a problem from raw colors.
    ///
    /// Returns `Err` when the inputs cannot form a valid problem for the
    /// requested mode: permutation mode requires equally many targets and
    /// items; many-to-one mode requires at least one item unless there are
    /// no slots at all. Degenerate sizes (0 or 1 slots) are valid.
    pub fn new(
        model: M,
        targets: &[Rgb],
        items: &[Rgb],
        mode: MappingMode,
    ) -> Result<Self, String> {
        match mode {
            MappingMode::Permutation => {
                if targets.len() != items.len() {
                    return Err(format!(
                        "permutation mode requires equal counts: {} targets vs {} items",
                        targets.len(),
                        items.len()
                    ));
                }
            }
            MappingMode::ManyToOne => {
                if items.is_empty() && !targets.is_empty() {
                    return Err("many-to-one mode requires at least one item".into());
                }
            }
        }

        let targets = targets.iter().map(|&c| model.feature(c)).collect();
        let items = items.iter().map(|&c| model.feature(c)).collect();

        Ok(Self {
            model,
            targets,
            items,
            mode,
        })
    }

    /// Number of target slots.
    pub fn slot_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of available items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// The mapping mode this problem was built with.
    pub fn mode(&self) -> MappingMode {
        self.mode
    }

    /// Distance between one slot's target and one item.
    pub fn pair_cost(&self, slot: usize, item: usize) -> f64 {
        self.model.distance(self.targets[slot], self.items[item])
    }

    /// Full cost of a slot vector: the slot-wise sum of pairwise distances.
    ///
    /// O(N). The incremental deltas in [`crate::moves`] are the hot path;
    /// this is the correctness oracle.
    pub fn assignment_cost(&self, slots: &[usize]) -> f64 {
        slots
            .iter()
            .enumerate()
            .map(|(slot, &item)| self.pair_cost(slot, item))
            .sum()
    }
}
