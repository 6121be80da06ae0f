//! State representations

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for states of an MDP or environment
///
/// States are opaque to the agents: they only need to be cloned, compared
/// and hashed so they can key the value and Q tables.
pub trait State: Clone + Debug + Eq + Hash {}

impl<T> State for T where T: Clone + Debug + Eq + Hash {}
