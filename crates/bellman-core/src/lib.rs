//! Core traits and types for MDP planning and reinforcement learning
//!
//! This crate provides the shared abstractions the agents are built on:
//! the MDP and environment query surfaces, the agent capability traits and
//! lifecycle, value and Q tables, feature functions and exploration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod environment;
pub mod error;
pub mod features;
pub mod mdp;
pub mod observer;
pub mod policy;
pub mod state;
pub mod value;

// Re-export core traits and types
pub use action::{Action, DiscreteAction};
pub use agent::{Agent, AgentConfig, AgentMetrics, BaseAgent, Learning};
pub use environment::{Environment, ModelActions, Simulator, Step};
pub use error::{RLError, Result};
pub use features::{FeatureFunction, FnFeatures, IdentityFeatures};
pub use mdp::{Mdp, Transitions};
pub use observer::{Listener, Observers};
pub use policy::EpsilonGreedy;
pub use state::State;
pub use value::{greedy, Greedy, QTable, ValueRange, ValueTable};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, Agent, AgentConfig, Environment, FeatureFunction, Learning, Mdp, Result,
        Simulator, State, Step,
    };
}
