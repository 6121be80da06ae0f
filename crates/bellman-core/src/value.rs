//! Value tables, Q tables and greedy selection

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Action, State};

/// Observed range of stored values, always containing 0
///
/// Display code uses it to scale colours; no algorithm depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest value seen, at most 0
    pub min: f64,
    /// Largest value seen, at least 0
    pub max: f64,
}

impl ValueRange {
    /// Range of `values` together with 0
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        values.into_iter().fold(Self::default(), |mut range, v| {
            range.include(v);
            range
        })
    }

    /// Widen the range to cover `value`
    pub fn include(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

/// Actions sharing the best score in a state
#[derive(Debug, Clone, PartialEq)]
pub struct Greedy<A> {
    /// Tied best actions, in the order they were scored
    pub actions: Vec<A>,
    /// Best score, 0 when there was nothing to score
    pub value: f64,
}

/// Score every action and keep the ones reaching the maximum
///
/// The running maximum starts at negative infinity so negative optimal
/// values survive. Ties use exact equality.
#[allow(clippy::float_cmp)]
pub fn greedy<A, F>(actions: Vec<A>, mut score: F) -> crate::Result<Greedy<A>>
where
    F: FnMut(&A) -> crate::Result<f64>,
{
    let mut best = f64::NEG_INFINITY;
    let mut tied = Vec::new();

    for action in actions {
        let value = score(&action)?;
        if value > best {
            best = value;
            tied.clear();
            tied.push(action);
        } else if value == best {
            tied.push(action);
        }
    }

    if tied.is_empty() {
        best = 0.0;
    }
    Ok(Greedy {
        actions: tied,
        value: best,
    })
}

/// State-value table `V`, absent states read as 0
#[derive(Debug, Clone)]
pub struct ValueTable<S> {
    values: HashMap<S, f64>,
}

impl<S: State> ValueTable<S> {
    /// Table holding 0 for every given state
    pub fn zeroed(states: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: states.into_iter().map(|s| (s, 0.0)).collect(),
        }
    }

    /// Value of `state`
    #[must_use]
    pub fn get(&self, state: &S) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    /// Update value for a state
    pub fn insert(&mut self, state: S, value: f64) {
        self.values.insert(state, value);
    }

    /// Largest absolute difference with `previous` over this table's states
    #[must_use]
    pub fn max_diff(&self, previous: &Self) -> f64 {
        self.values
            .iter()
            .map(|(s, v)| (v - previous.get(s)).abs())
            .fold(0.0, f64::max)
    }

    /// Range of the stored values
    #[must_use]
    pub fn range(&self) -> ValueRange {
        ValueRange::from_values(self.values.values().copied())
    }

    /// Number of stored states
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Action-value table `Q` as a two-level map state → (action → value)
///
/// Inner maps keep insertion order. Absent pairs read as 0.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    q_values: HashMap<S, IndexMap<A, f64>>,
}

impl<S, A> Default for QTable<S, A> {
    fn default() -> Self {
        Self {
            q_values: HashMap::new(),
        }
    }
}

impl<S: State, A: Action> QTable<S, A> {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value of `(state, action)`, 0 if never written
    #[must_use]
    pub fn get(&self, state: &S, action: &A) -> f64 {
        self.q_values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Write `(state, action)`, creating the row on first use
    pub fn set(&mut self, state: &S, action: &A, value: f64) {
        self.q_values
            .entry(state.clone())
            .or_default()
            .insert(action.clone(), value);
    }

    /// Range over every stored entry
    #[must_use]
    pub fn range(&self) -> ValueRange {
        ValueRange::from_values(self.q_values.values().flat_map(|row| row.values().copied()))
    }

    /// Number of states with at least one stored entry
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.q_values.len()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.q_values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiscreteAction;

    #[test]
    fn test_range_always_contains_zero() {
        assert_eq!(
            ValueRange::from_values([2.0, 5.0]),
            ValueRange { min: 0.0, max: 5.0 }
        );
        assert_eq!(
            ValueRange::from_values([-1.5, -0.5]),
            ValueRange { min: -1.5, max: 0.0 }
        );
        assert_eq!(ValueRange::from_values(std::iter::empty()), ValueRange::default());
    }

    #[test]
    fn test_greedy_keeps_ties_in_order() {
        let scores = [1.0, 3.0, 2.0, 3.0];
        let best = greedy(vec![0usize, 1, 2, 3], |&a| Ok(scores[a])).unwrap();
        assert_eq!(best.actions, vec![1, 3]);
        assert_eq!(best.value, 3.0);
    }

    #[test]
    fn test_greedy_supports_negative_values() {
        let best = greedy(vec!['a', 'b'], |&a| Ok(if a == 'a' { -2.0 } else { -1.0 })).unwrap();
        assert_eq!(best.actions, vec!['b']);
        assert_eq!(best.value, -1.0);
    }

    #[test]
    fn test_greedy_empty() {
        let best = greedy(Vec::<u8>::new(), |_| Ok(1.0)).unwrap();
        assert!(best.actions.is_empty());
        assert_eq!(best.value, 0.0);
    }

    #[test]
    fn test_greedy_propagates_errors() {
        let result = greedy(vec![1u8], |_| {
            Err(crate::RLError::DimensionMismatch {
                expected: 2,
                actual: 1,
            })
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_value_table_max_diff() {
        let old = ValueTable::zeroed(["a", "b"]);
        let mut new = old.clone();
        new.insert("a", 0.25);
        new.insert("b", -0.75);
        assert_eq!(new.max_diff(&old), 0.75);
        assert_eq!(new.get(&"missing"), 0.0);
        assert_eq!(new.range(), ValueRange { min: -0.75, max: 0.25 });
    }

    #[test]
    fn test_q_table_absent_is_zero() {
        let mut q = QTable::new();
        let go = DiscreteAction::new(0);
        assert_eq!(q.get(&"s", &go), 0.0);
        assert_eq!(q.state_count(), 0);

        q.set(&"s", &go, 4.0);
        q.set(&"t", &go, -1.0);
        assert_eq!(q.get(&"s", &go), 4.0);
        assert_eq!(q.state_count(), 2);
        assert_eq!(q.range(), ValueRange { min: -1.0, max: 4.0 });

        q.clear();
        assert_eq!(q.get(&"s", &go), 0.0);
    }
}
