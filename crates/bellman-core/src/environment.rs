//! Environment traits and types

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{Action, Mdp, State};

/// Result of a single environment step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<S> {
    /// State reached after the action
    pub next_state: S,
    /// Reward signal
    pub reward: f64,
    /// Whether the reached state is absorbing
    pub done: bool,
}

/// Legal-action view of an environment
///
/// This is the only part of an environment a learning agent consults. It
/// may disagree in timing with a static MDP view of the same problem.
pub trait Environment {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// Legal actions in `state`, empty when the state is absorbing
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;
}

/// Environment that can execute actions
pub trait Simulator: Environment {
    /// State the simulator is currently in
    fn current_state(&self) -> Self::State;

    /// Reset the simulator and return the initial state
    fn reset(&mut self) -> Self::State;

    /// Execute `action` from the current state
    fn step(&mut self, action: &Self::Action) -> crate::Result<Step<Self::State>>;
}

impl<E> Environment for Rc<E>
where
    E: Environment + ?Sized,
{
    type State = E::State;
    type Action = E::Action;

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        (**self).legal_actions(state)
    }
}

/// Exposes the legal actions of an MDP model as an [`Environment`]
#[derive(Debug, Clone)]
pub struct ModelActions<M>(pub M);

impl<M> Environment for ModelActions<M>
where
    M: Mdp,
{
    type State = M::State;
    type Action = M::Action;

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        self.0.legal_actions(state)
    }
}
