//! Reference MDPs and simulators for bellman agents
//!
//! This crate provides:
//! - a noisy gridworld, including the classic 4x3 book grid
//! - a deterministic chain
//! - a simulator that samples transitions of any MDP

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chain;
pub mod gridworld;
pub mod simulator;

// Re-export environments
pub use chain::{Chain, Hop};
pub use gridworld::{Cell, Gridworld, Move, Tile};
pub use simulator::MdpSimulator;

// Re-export core types
pub use bellman_core::{Environment, Mdp, Simulator, Step};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Cell, Chain, Gridworld, Hop, MdpSimulator, Move};
    pub use bellman_core::prelude::*;
}
