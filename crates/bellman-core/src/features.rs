//! Feature functions for linear value approximation

use std::fmt;

use indexmap::IndexMap;
use ndarray::Array1;

use crate::{Action, State};

/// Mapping from a `(state, action)` pair to a fixed-length feature vector
///
/// `features` must be a pure function of its inputs: equal pairs give equal
/// vectors, and every vector has length `feature_count()`.
pub trait FeatureFunction {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// Length of every feature vector
    fn feature_count(&self) -> usize;

    /// Feature vector `phi(state, action)`
    fn features(&self, state: &Self::State, action: &Self::Action) -> Array1<f64>;
}

/// One-hot features: one component per enumerated `(state, action)` pair
///
/// With these features a linear agent behaves like a tabular one. Pairs
/// that were not enumerated map to the zero vector.
#[derive(Debug, Clone)]
pub struct IdentityFeatures<S, A> {
    index: IndexMap<(S, A), usize>,
}

impl<S: State, A: Action> IdentityFeatures<S, A> {
    /// Build the feature map, indices follow enumeration order
    pub fn new(pairs: impl IntoIterator<Item = (S, A)>) -> Self {
        let mut index = IndexMap::new();
        for pair in pairs {
            let next = index.len();
            index.entry(pair).or_insert(next);
        }
        Self { index }
    }

    /// Enumerate every `(state, action)` pair from states and their legal actions
    pub fn from_states<F>(states: impl IntoIterator<Item = S>, mut legal_actions: F) -> Self
    where
        F: FnMut(&S) -> Vec<A>,
    {
        let pairs = states.into_iter().flat_map(|s| {
            legal_actions(&s)
                .into_iter()
                .map(move |a| (s.clone(), a))
                .collect::<Vec<_>>()
        });
        Self::new(pairs)
    }

    /// Component that is hot for `(state, action)`
    #[must_use]
    pub fn index_of(&self, state: &S, action: &A) -> Option<usize> {
        self.index.get(&(state.clone(), action.clone())).copied()
    }
}

impl<S: State, A: Action> FeatureFunction for IdentityFeatures<S, A> {
    type State = S;
    type Action = A;

    fn feature_count(&self) -> usize {
        self.index.len()
    }

    fn features(&self, state: &S, action: &A) -> Array1<f64> {
        let mut phi = Array1::zeros(self.index.len());
        if let Some(i) = self.index_of(state, action) {
            phi[i] = 1.0;
        }
        phi
    }
}

/// Feature function backed by a closure
pub struct FnFeatures<S, A, F> {
    count: usize,
    f: F,
    _phantom: std::marker::PhantomData<fn(&S, &A)>,
}

impl<S, A, F> FnFeatures<S, A, F>
where
    S: State,
    A: Action,
    F: Fn(&S, &A) -> Array1<f64>,
{
    /// Wrap `f`, which must return vectors of length `count`
    pub fn new(count: usize, f: F) -> Self {
        Self {
            count,
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, A, F> FeatureFunction for FnFeatures<S, A, F>
where
    S: State,
    A: Action,
    F: Fn(&S, &A) -> Array1<f64>,
{
    type State = S;
    type Action = A;

    fn feature_count(&self) -> usize {
        self.count
    }

    fn features(&self, state: &S, action: &A) -> Array1<f64> {
        (self.f)(state, action)
    }
}

impl<S, A, F> fmt::Debug for FnFeatures<S, A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFeatures").field("count", &self.count).finish()
    }
}
