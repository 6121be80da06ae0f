//! Value Iteration planning agent
//!
//! Each call to [`ValueIterationAgent::update_v`] performs one synchronous
//! Bellman-optimality sweep over every reachable state:
//!
//! `V_k(s) = max_a Σ_s' T(s, a, s') · (R(s, a, s') + γ · V_{k-1}(s'))`
//!
//! The sweep reads only the previous table, never values written earlier in
//! the same sweep. Convergence is observed by the caller through the
//! returned delta.

use tracing::{debug, warn};

use bellman_core::{
    greedy, Action, Agent, AgentConfig, BaseAgent, Greedy, Listener, Mdp, Result,
    ValueRange, ValueTable,
};

/// Model-based agent computing the optimal state values of an MDP
#[derive(Debug)]
pub struct ValueIterationAgent<M: Mdp> {
    base: BaseAgent,
    mdp: M,
    values: ValueTable<M::State>,
    delta: f64,
}

impl<M: Mdp> ValueIterationAgent<M> {
    /// Create an agent with every reachable state valued 0
    pub fn new(mdp: M, config: AgentConfig) -> Result<Self> {
        let values = ValueTable::zeroed(mdp.reachable_states());
        Ok(Self {
            base: BaseAgent::new(config)?,
            mdp,
            values,
            delta: 0.0,
        })
    }

    /// Perform one sweep and return its delta
    ///
    /// Absorbing states keep their value. Observers are notified once, after
    /// the whole table has been replaced.
    pub fn update_v(&mut self) -> Result<f64> {
        let previous = &self.values;
        let mut next = previous.clone();

        for state in self.mdp.reachable_states() {
            if self.mdp.is_absorbing(&state) {
                continue;
            }
            let best = self.best_backups(&state, previous)?;
            next.insert(state, best.value);
        }

        self.delta = next.max_diff(previous);
        self.values = next;
        self.base.set_range(self.values.range());
        self.base.record_step();
        debug!(
            sweep = self.base.metrics.total_steps,
            delta = self.delta,
            "value iteration sweep"
        );

        self.base.notify();
        Ok(self.delta)
    }

    /// Delta of the last sweep, 0 before the first one
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Sweeps performed since the last reset
    #[must_use]
    pub fn sweeps(&self) -> usize {
        self.base.metrics.total_steps
    }

    /// Discount factor
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.base.config.gamma
    }

    /// Change the discount factor used by later sweeps
    pub fn set_gamma(&mut self, gamma: f64) -> Result<()> {
        let config = AgentConfig {
            gamma,
            ..self.base.config.clone()
        };
        config.validate()?;
        self.base.config = config;
        debug!(gamma, "discount factor updated");
        Ok(())
    }

    /// Planned model
    pub fn mdp(&self) -> &M {
        &self.mdp
    }

    /// `Σ_s' T(s, a, s') · (R(s, a, s') + γ · V(s'))`
    fn backup(&self, state: &M::State, action: &M::Action, values: &ValueTable<M::State>) -> Result<f64> {
        let gamma = self.base.config.gamma;
        let mut total = 0.0;
        for (next, probability) in self.mdp.transition_probabilities(state, action)? {
            let reward = self.mdp.reward(state, action, &next)?;
            total += probability * (reward + gamma * values.get(&next));
        }
        Ok(total)
    }

    fn best_backups(
        &self,
        state: &M::State,
        values: &ValueTable<M::State>,
    ) -> Result<Greedy<M::Action>> {
        greedy(self.mdp.legal_actions(state), |action| {
            Ok(self.backup(state, action, values).unwrap_or_else(|err| {
                warn!(?state, ?action, error = %err, "MDP query failed, backup counted as 0");
                0.0
            }))
        })
    }
}

impl<M: Mdp> Agent for ValueIterationAgent<M> {
    type State = M::State;
    type Action = M::Action;

    fn action(&mut self, state: &M::State) -> Result<M::Action> {
        Ok(self
            .policy(state)?
            .into_iter()
            .next()
            .unwrap_or_else(M::Action::noop))
    }

    fn value(&self, state: &M::State) -> Result<f64> {
        Ok(self.values.get(state))
    }

    fn policy(&self, state: &M::State) -> Result<Vec<M::Action>> {
        if self.mdp.is_absorbing(state) {
            return Ok(Vec::new());
        }
        Ok(self.best_backups(state, &self.values)?.actions)
    }

    fn reset(&mut self) {
        self.values = ValueTable::zeroed(self.mdp.reachable_states());
        self.delta = 0.0;
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
