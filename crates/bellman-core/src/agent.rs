//! Agent traits and types

use serde::{Deserialize, Serialize};

use crate::observer::{Listener, Observers};
use crate::value::ValueRange;
use crate::{Action, EpsilonGreedy, RLError, State};

/// Configuration for agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Discount factor, in `[0, 1]`
    pub gamma: f64,
    /// Learning rate, in `(0, 1]`
    pub alpha: f64,
    /// Exploration rate, in `[0, 1]`
    pub epsilon: f64,
    /// Seed for the exploration RNG, entropy when absent
    pub seed: Option<u64>,
    /// Emit per-update traces
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            alpha: 0.1,
            epsilon: 0.1,
            seed: None,
            verbose: false,
        }
    }
}

impl AgentConfig {
    /// Parse a configuration from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every hyper-parameter is in range
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(RLError::InvalidConfig(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(RLError::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(RLError::InvalidConfig(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Capability shared by planning and learning agents
pub trait Agent {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// Action the agent executes in `state`
    ///
    /// Returns [`Action::noop`] when `state` has no legal action.
    fn action(&mut self, state: &Self::State) -> crate::Result<Self::Action>;

    /// Current value estimate of `state`
    fn value(&self, state: &Self::State) -> crate::Result<f64>;

    /// Every action of maximal value in `state`, ties included
    fn policy(&self, state: &Self::State) -> crate::Result<Vec<Self::Action>>;

    /// Restore the initial estimates and notify observers
    fn reset(&mut self);

    /// Register a listener called after each mutating operation
    fn subscribe(&mut self, listener: Listener);

    /// Observed range of the stored values
    fn value_range(&self) -> ValueRange;
}

/// Trait for agents that learn from transition samples
pub trait Learning: Agent {
    /// Estimate of `Q(state, action)`
    fn q_value(&self, state: &Self::State, action: &Self::Action) -> crate::Result<f64>;

    /// Overwrite `Q(state, action)`
    fn set_q_value(
        &mut self,
        state: &Self::State,
        action: &Self::Action,
        value: f64,
    ) -> crate::Result<()>;

    /// Learn from the transition `(state, action, next_state, reward)`
    fn end_step(
        &mut self,
        state: &Self::State,
        action: &Self::Action,
        next_state: &Self::State,
        reward: f64,
    ) -> crate::Result<()>;

    /// Close the current episode
    fn end_episode(&mut self);

    /// Episodes completed since the last reset
    fn episode_count(&self) -> usize;

    /// Last action returned by [`Agent::action`]
    fn last_action(&self) -> Option<&Self::Action>;

    /// Exploration strategy used by [`Agent::action`]
    fn strategy_mut(&mut self) -> &mut EpsilonGreedy;
}

/// Agent metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// Updates applied since the last reset
    pub total_steps: usize,
    /// Episodes completed since the last reset
    pub total_episodes: usize,
}

/// Lifecycle state common to every agent
#[derive(Debug)]
pub struct BaseAgent {
    /// Configuration
    pub config: AgentConfig,
    /// Metrics
    pub metrics: AgentMetrics,
    range: ValueRange,
    observers: Observers,
}

impl BaseAgent {
    /// Create a new base agent, rejecting out-of-range hyper-parameters
    pub fn new(config: AgentConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: AgentMetrics::default(),
            range: ValueRange::default(),
            observers: Observers::default(),
        })
    }

    /// Register a listener
    pub fn subscribe(&mut self, listener: Listener) {
        self.observers.subscribe(listener);
    }

    /// Call every listener once
    pub fn notify(&mut self) {
        self.observers.notify();
    }

    /// Current value range
    #[must_use]
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Replace the value range
    pub fn set_range(&mut self, range: ValueRange) {
        self.range = range;
    }

    /// Count one applied update
    pub fn record_step(&mut self) {
        self.metrics.total_steps += 1;
    }

    /// Count one finished episode and return the new total
    pub fn end_episode(&mut self) -> usize {
        self.metrics.total_episodes += 1;
        self.metrics.total_episodes
    }

    /// Clear counters and range; observers are kept
    pub fn reset(&mut self) {
        self.metrics = AgentMetrics::default();
        self.range = ValueRange::default();
    }
}
