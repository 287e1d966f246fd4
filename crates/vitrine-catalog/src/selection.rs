//! Option selection state.

use serde::{Deserialize, Serialize};

/// The values a user has picked so far, one slot per option position.
///
/// The length is fixed at the product's option count; slots stay `None`
/// until a value is chosen for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelection {
    values: Vec<Option<String>>,
}

impl OptionSelection {
    /// An empty selection for a product with `option_count` options.
    pub fn new(option_count: usize) -> Self {
        Self {
            values: vec![None; option_count],
        }
    }

    /// Build a selection from explicit slot values. Arity is the caller's
    /// responsibility.
    pub fn from_values(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    /// Number of option positions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the selection has no positions at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The chosen value at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.values.get(position).and_then(|v| v.as_deref())
    }

    /// Choose a value for `position`. Returns false when the position is out
    /// of range.
    pub fn select(&mut self, position: usize, value: impl Into<String>) -> bool {
        match self.values.get_mut(position) {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// Clear the value at `position`.
    pub fn clear(&mut self, position: usize) {
        if let Some(slot) = self.values.get_mut(position) {
            *slot = None;
        }
    }

    /// True when every position has a chosen value.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(|v| v.is_some())
    }

    /// True when no position has a chosen value yet.
    pub fn is_unset(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }

    /// Iterate over `(position, value)` for the chosen slots.
    pub fn chosen(&self) -> impl Iterator<Item = (usize, &str)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_deref().map(|s| (i, s)))
    }
}
