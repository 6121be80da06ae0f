//! Deterministic chain MDP

use serde::{Deserialize, Serialize};

use bellman_core::{Action, Environment, Mdp, RLError, Result, Transitions};

/// Chain moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hop {
    /// Advance to the next state
    Go,
    /// Step back, staying put at the first state
    Back,
    /// No-op
    Idle,
}

impl Action for Hop {
    fn noop() -> Self {
        Hop::Idle
    }
}

/// Line of states `0..len` whose last state is absorbing
///
/// Entering the last state pays `goal_reward`; every other transition pays
/// `step_reward`.
#[derive(Debug, Clone)]
pub struct Chain {
    len: usize,
    goal_reward: f64,
    step_reward: f64,
}

impl Chain {
    /// Create a chain of `len >= 2` states
    pub fn new(len: usize, goal_reward: f64) -> Result<Self> {
        if len < 2 {
            return Err(RLError::InvalidConfig(format!(
                "a chain needs at least 2 states, got {len}"
            )));
        }
        Ok(Self {
            len,
            goal_reward,
            step_reward: 0.0,
        })
    }

    /// Set the reward of non-goal transitions
    #[must_use]
    pub fn with_step_reward(mut self, step_reward: f64) -> Self {
        self.step_reward = step_reward;
        self
    }

    /// Index of the absorbing goal state
    #[must_use]
    pub fn goal(&self) -> usize {
        self.len - 1
    }

    fn next(&self, state: usize, hop: Hop) -> usize {
        match hop {
            Hop::Go => (state + 1).min(self.goal()),
            Hop::Back => state.saturating_sub(1),
            Hop::Idle => state,
        }
    }
}

impl Mdp for Chain {
    type State = usize;
    type Action = Hop;

    fn reachable_states(&self) -> Vec<usize> {
        (0..self.len).collect()
    }

    fn legal_actions(&self, state: &usize) -> Vec<Hop> {
        if *state < self.goal() {
            vec![Hop::Go, Hop::Back]
        } else {
            Vec::new()
        }
    }

    fn transition_probabilities(&self, state: &usize, action: &Hop) -> Result<Transitions<usize>> {
        if *state >= self.goal() {
            return Err(RLError::Mdp(format!("no transition out of state {state}")));
        }
        Ok(vec![(self.next(*state, *action), 1.0)])
    }

    fn reward(&self, state: &usize, _action: &Hop, next_state: &usize) -> Result<f64> {
        if *next_state >= self.len {
            return Err(RLError::Mdp(format!("{next_state} is not a state")));
        }
        if *next_state == self.goal() && *state != self.goal() {
            Ok(self.goal_reward)
        } else {
            Ok(self.step_reward)
        }
    }

    fn is_absorbing(&self, state: &usize) -> bool {
        *state == self.goal()
    }
}

impl Environment for Chain {
    type State = usize;
    type Action = Hop;

    fn legal_actions(&self, state: &usize) -> Vec<Hop> {
        Mdp::legal_actions(self, state)
    }
}
