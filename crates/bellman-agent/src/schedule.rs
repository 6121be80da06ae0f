//! Exploration schedules mapping an episode index to an epsilon

use serde::{Deserialize, Serialize};

/// Value as a function of the episode index, used to anneal exploration
pub trait Schedule {
    /// Value for episode `t`, counted from 0
    fn value(&self, t: usize) -> f64;
}

/// Linear interpolation from `start` to `end` over `episodes`, then `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSchedule {
    /// Value at episode 0
    pub start: f64,
    /// Value from episode `episodes` on
    pub end: f64,
    /// Length of the ramp
    pub episodes: usize,
}

impl LinearSchedule {
    /// Create a new linear schedule
    #[must_use]
    pub fn new(start: f64, end: f64, episodes: usize) -> Self {
        Self {
            start,
            end,
            episodes,
        }
    }
}

impl Schedule for LinearSchedule {
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, t: usize) -> f64 {
        if t >= self.episodes {
            self.end
        } else {
            let progress = t as f64 / self.episodes as f64;
            self.start + (self.end - self.start) * progress
        }
    }
}

/// Geometric decay `start · rate^t`, floored at `min_value`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialSchedule {
    /// Value at episode 0
    pub start: f64,
    /// Floor
    pub min_value: f64,
    /// Multiplier applied per episode
    pub decay_rate: f64,
}

impl ExponentialSchedule {
    /// Create a new exponential schedule
    #[must_use]
    pub fn new(start: f64, min_value: f64, decay_rate: f64) -> Self {
        Self {
            start,
            min_value,
            decay_rate,
        }
    }
}

impl Schedule for ExponentialSchedule {
    fn value(&self, t: usize) -> f64 {
        let exponent = i32::try_from(t).unwrap_or(i32::MAX);
        (self.start * self.decay_rate.powi(exponent)).max(self.min_value)
    }
}

/// Same value for every episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantSchedule {
    /// Constant value
    pub value: f64,
}

impl ConstantSchedule {
    /// Create a new constant schedule
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Schedule for ConstantSchedule {
    fn value(&self, _t: usize) -> f64 {
        self.value
    }
}
