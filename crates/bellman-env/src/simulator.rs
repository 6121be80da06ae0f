//! Sampling simulator over any MDP model

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bellman_core::{Environment, Mdp, RLError, Result, Simulator, Step};

/// Environment that executes actions by sampling `T(s, a)` of an MDP
#[derive(Debug, Clone)]
pub struct MdpSimulator<M: Mdp> {
    mdp: M,
    start: M::State,
    current: M::State,
    rng: StdRng,
}

impl<M: Mdp> MdpSimulator<M> {
    /// Create a simulator starting in `start`, seeded when `seed` is given
    pub fn new(mdp: M, start: M::State, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mdp,
            current: start.clone(),
            start,
            rng,
        }
    }

    /// Underlying model
    pub fn mdp(&self) -> &M {
        &self.mdp
    }
}

impl<M: Mdp> Environment for MdpSimulator<M> {
    type State = M::State;
    type Action = M::Action;

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        self.mdp.legal_actions(state)
    }
}

impl<M: Mdp> Simulator for MdpSimulator<M> {
    fn current_state(&self) -> Self::State {
        self.current.clone()
    }

    fn reset(&mut self) -> Self::State {
        self.current = self.start.clone();
        self.current.clone()
    }

    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::State>> {
        if self.mdp.is_absorbing(&self.current) {
            return Err(RLError::Environment(format!(
                "cannot act from absorbing state {:?}",
                self.current
            )));
        }
        if !self.mdp.legal_actions(&self.current).contains(action) {
            return Err(RLError::Environment(format!(
                "{action:?} is not legal in {:?}",
                self.current
            )));
        }

        let transitions = self.mdp.transition_probabilities(&self.current, action)?;
        let weights = WeightedIndex::new(transitions.iter().map(|(_, p)| *p))
            .map_err(|e| RLError::Environment(format!("bad transition distribution: {e}")))?;
        let next_state = transitions[weights.sample(&mut self.rng)].0.clone();

        let reward = self.mdp.reward(&self.current, action, &next_state)?;
        let done = self.mdp.is_absorbing(&next_state);
        tracing::trace!(from = ?self.current, ?action, to = ?next_state, reward, "step");

        self.current = next_state.clone();
        Ok(Step {
            next_state,
            reward,
            done,
        })
    }
}
