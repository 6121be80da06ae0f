//! Planning and learning agents for bellman
//!
//! This crate provides:
//! - Value Iteration over a known MDP
//! - Tabular Q-learning
//! - Q-learning with a linear estimator over feature vectors
//! - Drivers running planning sweeps and training episodes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod linear;
pub mod q_learning;
pub mod runner;
pub mod schedule;
pub mod value_iteration;

// Re-export agents
pub use linear::ApproxQLearningAgent;
pub use q_learning::QLearningAgent;
pub use value_iteration::ValueIterationAgent;

// Re-export drivers
pub use runner::{plan_until_converged, run_episode, train, EpisodeReport, PlanReport};
pub use schedule::{ConstantSchedule, ExponentialSchedule, LinearSchedule, Schedule};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        plan_until_converged, run_episode, train, ApproxQLearningAgent, QLearningAgent, Schedule,
        ValueIterationAgent,
    };
    pub use bellman_core::prelude::*;
}
