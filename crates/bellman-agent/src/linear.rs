//! Linear function-approximation Q-learning agent
//!
//! Q-values are the dot product of a weight vector with the features of a
//! `(state, action)` pair, `Q(s, a) = w · phi(s, a)`. Each transition moves
//! the weights along the features by the temporal-difference error:
//!
//! `w ← w + α · (r + γ · max_a' Q(s', a') - Q(s, a)) · phi(s, a)`

use ndarray::Array1;
use tracing::{debug, info};

use bellman_core::{
    greedy, Action, Agent, AgentConfig, BaseAgent, Environment, EpsilonGreedy, FeatureFunction,
    Greedy, Learning, Listener, RLError, Result, ValueRange,
};

/// Q-learning agent with a linear estimator over pluggable features
#[derive(Debug)]
pub struct ApproxQLearningAgent<E, F>
where
    E: Environment,
{
    base: BaseAgent,
    env: E,
    features: F,
    weights: Array1<f64>,
    strategy: EpsilonGreedy,
    last_action: Option<E::Action>,
}

impl<E, F> ApproxQLearningAgent<E, F>
where
    E: Environment,
    F: FeatureFunction<State = E::State, Action = E::Action>,
{
    /// Create an agent with all weights at 0
    pub fn new(env: E, features: F, config: AgentConfig) -> Result<Self> {
        let count = features.feature_count();
        if count == 0 {
            return Err(RLError::InvalidConfig(
                "feature function must produce at least one feature".to_string(),
            ));
        }
        let strategy = EpsilonGreedy::from_config(&config);
        Ok(Self {
            base: BaseAgent::new(config)?,
            env,
            features,
            weights: Array1::zeros(count),
            strategy,
            last_action: None,
        })
    }

    /// Current weights
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Feature function
    pub fn feature_function(&self) -> &F {
        &self.features
    }

    /// Learning rate
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.base.config.alpha
    }

    /// Discount factor
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.base.config.gamma
    }

    fn phi(&self, state: &E::State, action: &E::Action) -> Result<Array1<f64>> {
        let phi = self.features.features(state, action);
        if phi.len() != self.weights.len() {
            return Err(RLError::DimensionMismatch {
                expected: self.weights.len(),
                actual: phi.len(),
            });
        }
        Ok(phi)
    }

    fn greedy_in(&self, state: &E::State, legal: Vec<E::Action>) -> Result<Greedy<E::Action>> {
        greedy(legal, |action| self.q_value(state, action))
    }
}

impl<E, F> Agent for ApproxQLearningAgent<E, F>
where
    E: Environment,
    F: FeatureFunction<State = E::State, Action = E::Action>,
{
    type State = E::State;
    type Action = E::Action;

    fn action(&mut self, state: &E::State) -> Result<E::Action> {
        let legal = self.env.legal_actions(state);
        let best = self.greedy_in(state, legal.clone())?;
        self.last_action = self.strategy.choose(&legal, &best.actions);
        Ok(self.last_action.clone().unwrap_or_else(E::Action::noop))
    }

    fn value(&self, state: &E::State) -> Result<f64> {
        Ok(self.greedy_in(state, self.env.legal_actions(state))?.value)
    }

    fn policy(&self, state: &E::State) -> Result<Vec<E::Action>> {
        Ok(self.greedy_in(state, self.env.legal_actions(state))?.actions)
    }

    fn reset(&mut self) {
        self.weights.fill(0.0);
        self.last_action = None;
        self.base.reset();
        self.base.notify();
    }

    fn subscribe(&mut self, listener: Listener) {
        self.base.subscribe(listener);
    }

    fn value_range(&self) -> ValueRange {
        self.base.range()
    }
}

impl<E, F> Learning for ApproxQLearningAgent<E, F>
where
    E: Environment,
    F: FeatureFunction<State = E::State, Action = E::Action>,
{
    fn q_value(&self, state: &E::State, action: &E::Action) -> Result<f64> {
        Ok(self.weights.dot(&self.phi(state, action)?))
    }

    fn set_q_value(&mut self, _state: &E::State, _action: &E::Action, _value: f64) -> Result<()> {
        Err(RLError::IllegalOperation(
            "Q-values of a linear agent derive from its weights and cannot be set".to_string(),
        ))
    }

    fn end_step(
        &mut self,
        state: &E::State,
        action: &E::Action,
        next_state: &E::State,
        reward: f64,
    ) -> Result<()> {
        if self.base.config.verbose {
            debug!(?state, ?action, ?next_state, reward, "linear Q-learning update");
        }

        let phi = self.phi(state, action)?;
        let target = reward + self.gamma() * self.value(next_state)?;
        let td_error = target - self.weights.dot(&phi);
        self.weights.scaled_add(self.alpha() * td_error, &phi);

        let mut range = self.base.range();
        range.include(self.weights.dot(&phi));
        self.base.set_range(range);
        self.base.record_step();
        self.base.notify();
        Ok(())
    }

    fn end_episode(&mut self) {
        let episode = self.base.end_episode();
        info!(
            episode,
            features = self.features.feature_count(),
            "episode finished"
        );
    }

    fn episode_count(&self) -> usize {
        self.base.metrics.total_episodes
    }

    fn last_action(&self) -> Option<&E::Action> {
        self.last_action.as_ref()
    }

    fn strategy_mut(&mut self) -> &mut EpsilonGreedy {
        &mut self.strategy
    }
}
