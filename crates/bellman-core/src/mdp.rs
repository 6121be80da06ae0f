//! Markov Decision Process query surface

use std::rc::Rc;

use crate::{Action, State};

/// Transition distribution `T(s, a)`: successor states with non-zero
/// probability
pub type Transitions<S> = Vec<(S, f64)>;

/// Read-only model of a Markov Decision Process
///
/// Planning agents consume this trait only; they never mutate the model.
pub trait Mdp {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// All states reachable in this MDP
    fn reachable_states(&self) -> Vec<Self::State>;

    /// Legal actions in `state`, empty for absorbing states
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Transition distribution for taking `action` in `state`
    ///
    /// Probabilities of the returned entries sum to 1.
    fn transition_probabilities(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> crate::Result<Transitions<Self::State>>;

    /// Reward `R(s, a, s')`
    fn reward(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next_state: &Self::State,
    ) -> crate::Result<f64>;

    /// Whether `state` is absorbing
    fn is_absorbing(&self, state: &Self::State) -> bool;
}

impl<M> Mdp for Rc<M>
where
    M: Mdp + ?Sized,
{
    type State = M::State;
    type Action = M::Action;

    fn reachable_states(&self) -> Vec<Self::State> {
        (**self).reachable_states()
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        (**self).legal_actions(state)
    }

    fn transition_probabilities(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> crate::Result<Transitions<Self::State>> {
        (**self).transition_probabilities(state, action)
    }

    fn reward(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next_state: &Self::State,
    ) -> crate::Result<f64> {
        (**self).reward(state, action, next_state)
    }

    fn is_absorbing(&self, state: &Self::State) -> bool {
        (**self).is_absorbing(state)
    }
}
