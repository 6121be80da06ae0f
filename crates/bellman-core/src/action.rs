//! Action representations

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for actions in an MDP or environment
pub trait Action: Clone + Debug + Eq + Hash {
    /// The distinguished "do nothing" action returned for states that have
    /// no legal action
    fn noop() -> Self;

    /// Check whether this is the no-op action
    fn is_noop(&self) -> bool {
        *self == Self::noop()
    }
}

/// Discrete action identified by its index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscreteAction(pub Option<usize>);

impl DiscreteAction {
    /// Create the action with the given index
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(Some(index))
    }

    /// Index of the action, `None` for the no-op
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.0
    }
}

impl Action for DiscreteAction {
    fn noop() -> Self {
        Self(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_noop() {
        assert!(DiscreteAction::noop().is_noop());
        assert!(!DiscreteAction::new(0).is_noop());
        assert_eq!(DiscreteAction::new(3).index(), Some(3));
    }
}
