//! Tabular Q-learning agent

use tracing::{debug, info};

use bellman_core::{
    greedy, Action, Agent, AgentConfig, BaseAgent, Environment, EpsilonGreedy, Greedy, Learning,
    Listener, QTable, Result, ValueRange,
};

/// Model-free agent learning a table of action values from transitions
///
/// Every write goes through [`Learning::set_q_value`] so observers always
/// see a table consistent with [`Agent::value_range`].
#[derive(Debug)]
pub struct QLearningAgent<E: Environment> {
    base: BaseAgent,
    env: E,
    q_values: QTable<E::State, E::Action>,
    strategy: EpsilonGreedy,
    last_action: Option<E::Action>,
}

impl<E: Environment> QLearningAgent<E> {
    /// Create a new Q-learning agent over the legal actions of `env`
    pub fn new(env: E, config: AgentConfig) -> Result<Self> {
        let strategy = EpsilonGreedy::from_config(&config);
        Ok(Self {
            base: BaseAgent::new(config)?,
            env,
            q_values: QTable::new(),
            strategy,
            last_action: None,
        })
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

    /// Number of states with stored Q-values
    #[must_use]
    pub fn known_states(&self) -> usize {
        self.q_values.state_count()
    }

    /// Environment whose legal actions are used
    pub fn environment(&self) -> &E {
        &self.env
    }

    fn greedy_in(&self, state: &E::State, legal: Vec<E::Action>) -> Result<Greedy<E::Action>> {
        greedy(legal, |action| Ok(self.q_values.get(state, action)))
    }
}

impl<E: Environment> Agent for QLearningAgent<E> {
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
        self.q_values.clear();
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

impl<E: Environment> Learning for QLearningAgent<E> {
    fn q_value(&self, state: &E::State, action: &E::Action) -> Result<f64> {
        Ok(self.q_values.get(state, action))
    }

    fn set_q_value(&mut self, state: &E::State, action: &E::Action, value: f64) -> Result<()> {
        self.q_values.set(state, action, value);
        self.base.set_range(self.q_values.range());
        self.base.notify();
        Ok(())
    }

    fn end_step(
        &mut self,
        state: &E::State,
        action: &E::Action,
        next_state: &E::State,
        reward: f64,
    ) -> Result<()> {
        if self.base.config.verbose {
            debug!(?state, ?action, ?next_state, reward, "Q-learning update");
        }

        let alpha = self.alpha();
        let target = reward + self.gamma() * self.value(next_state)?;
        let updated = (1.0 - alpha) * self.q_value(state, action)? + alpha * target;

        self.base.record_step();
        self.set_q_value(state, action, updated)
    }

    fn end_episode(&mut self) {
        let episode = self.base.end_episode();
        info!(episode, states = self.known_states(), "episode finished");
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bellman_env::{Chain, Hop};
    use std::cell::Cell;
    use std::rc::Rc;

    fn agent(alpha: f64, gamma: f64, epsilon: f64) -> QLearningAgent<Chain> {
        let config = AgentConfig {
            alpha,
            gamma,
            epsilon,
            seed: Some(7),
            verbose: true,
        };
        QLearningAgent::new(Chain::new(2, 1.0).unwrap(), config).unwrap()
    }

    #[test]
    fn test_unseen_pairs_read_zero() {
        let agent = agent(0.5, 0.9, 0.0);
        assert_eq!(agent.q_value(&0, &Hop::Go).unwrap(), 0.0);
        assert_eq!(agent.value(&0).unwrap(), 0.0);
        assert_eq!(agent.known_states(), 0);
    }

    #[test]
    fn test_two_state_chain_converges_to_reward() {
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.end_step(&0, &Hop::Go, &1, 1.0).unwrap();
        assert_relative_eq!(agent.q_value(&0, &Hop::Go).unwrap(), 0.5);

        for _ in 0..60 {
            agent.end_step(&0, &Hop::Go, &1, 1.0).unwrap();
        }
        // Terminal state has no legal action, so it contributes 0
        assert_relative_eq!(agent.q_value(&0, &Hop::Go).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(agent.value(&1).unwrap(), 0.0);
        assert_eq!(agent.policy(&0).unwrap(), vec![Hop::Go]);
    }

    #[test]
    fn test_set_q_value_updates_range_and_notifies() {
        let mut agent = agent(0.5, 0.9, 0.0);
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        agent.subscribe(Box::new(move || seen.set(seen.get() + 1)));

        agent.set_q_value(&0, &Hop::Go, 3.0).unwrap();
        agent.set_q_value(&0, &Hop::Back, -2.0).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(agent.value_range(), ValueRange { min: -2.0, max: 3.0 });
        assert_eq!(agent.known_states(), 1);
    }

    #[test]
    fn test_negative_best_value() {
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.set_q_value(&0, &Hop::Go, -1.0).unwrap();
        agent.set_q_value(&0, &Hop::Back, -3.0).unwrap();
        assert_eq!(agent.value(&0).unwrap(), -1.0);
        assert_eq!(agent.policy(&0).unwrap(), vec![Hop::Go]);
    }

    #[test]
    fn test_policy_ties() {
        let agent = agent(0.5, 0.9, 0.0);
        assert_eq!(agent.policy(&0).unwrap(), vec![Hop::Go, Hop::Back]);
        assert!(agent.policy(&1).unwrap().is_empty());
    }

    #[test]
    fn test_action_uses_strategy() {
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.set_q_value(&0, &Hop::Back, 0.5).unwrap();
        assert_eq!(agent.action(&0).unwrap(), Hop::Back);
        assert_eq!(agent.last_action(), Some(&Hop::Back));

        assert_eq!(agent.action(&1).unwrap(), Hop::Idle);
        assert_eq!(agent.last_action(), None);

        agent.strategy_mut().set_epsilon(1.0);
        let mut seen_go = false;
        for _ in 0..200 {
            seen_go |= agent.action(&0).unwrap() == Hop::Go;
        }
        assert!(seen_go);
    }

    #[test]
    fn test_reads_do_not_notify() {
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.end_step(&0, &Hop::Go, &1, 1.0).unwrap();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        agent.subscribe(Box::new(move || seen.set(seen.get() + 1)));
        let range = agent.value_range();

        agent.q_value(&0, &Hop::Back).unwrap();
        agent.value(&0).unwrap();
        agent.policy(&0).unwrap();

        assert_eq!(calls.get(), 0);
        assert_eq!(agent.value_range(), range);
        assert_eq!(agent.known_states(), 1);
    }

    #[test]
    fn test_episodes_and_reset() {
        let mut agent = agent(0.5, 0.9, 0.0);
        agent.end_step(&0, &Hop::Go, &1, 1.0).unwrap();
        agent.end_episode();
        agent.end_episode();
        assert_eq!(agent.episode_count(), 2);

        agent.reset();
        let once = (agent.q_value(&0, &Hop::Go).unwrap(), agent.known_states(), agent.value_range());
        agent.reset();
        let twice = (agent.q_value(&0, &Hop::Go).unwrap(), agent.known_states(), agent.value_range());

        assert_eq!(once, (0.0, 0, ValueRange::default()));
        assert_eq!(once, twice);
        assert_eq!(agent.episode_count(), 0);
    }
}
