//! Exploration strategies turning value estimates into executed actions

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::AgentConfig;

/// Epsilon-greedy exploration
///
/// With probability `epsilon` a uniformly random legal action is chosen,
/// otherwise the first action of the agent's greedy set.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    /// Exploration rate
    epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    /// Create a new epsilon-greedy strategy, seeded when `seed` is given
    #[must_use]
    pub fn new(epsilon: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            epsilon: epsilon.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Create the strategy described by an agent configuration
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.epsilon, config.seed)
    }

    /// Current exploration rate
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set the exploration rate, effective from the next choice
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
        tracing::debug!(epsilon = self.epsilon, "exploration rate updated");
    }

    /// Pick an action among `legal`, exploiting `greedy` when not exploring
    ///
    /// Returns `None` when `legal` is empty, which signals an absorbing
    /// state. An empty greedy set always falls back to exploration.
    pub fn choose<A: Clone>(&mut self, legal: &[A], greedy: &[A]) -> Option<A> {
        if legal.is_empty() {
            return None;
        }

        let explore = self.rng.gen::<f64>() < self.epsilon;
        match greedy.first() {
            Some(best) if !explore => Some(best.clone()),
            _ => legal.choose(&mut self.rng).cloned(),
        }
    }
}
