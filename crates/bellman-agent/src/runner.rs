//! Drivers for planning and learning loops

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bellman_core::{Agent, Learning, Mdp, Result, Simulator};

use crate::schedule::Schedule;
use crate::value_iteration::ValueIterationAgent;

/// Outcome of [`plan_until_converged`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    /// Sweeps performed by this call
    pub sweeps: usize,
    /// Delta of the last sweep
    pub delta: f64,
    /// Whether the last delta fell below the threshold
    pub converged: bool,
}

/// Outcome of one [`run_episode`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Transitions executed
    pub steps: usize,
    /// Undiscounted sum of the rewards
    pub total_reward: f64,
    /// Whether the episode ended in a state without legal actions
    pub reached_absorbing: bool,
}

/// Sweep until the delta drops below `threshold` or `max_sweeps` is reached
pub fn plan_until_converged<M: Mdp>(
    agent: &mut ValueIterationAgent<M>,
    threshold: f64,
    max_sweeps: usize,
) -> Result<PlanReport> {
    let mut report = PlanReport {
        sweeps: 0,
        delta: agent.delta(),
        converged: false,
    };

    while report.sweeps < max_sweeps {
        report.delta = agent.update_v()?;
        report.sweeps += 1;
        if report.delta < threshold {
            report.converged = true;
            break;
        }
    }

    info!(
        sweeps = report.sweeps,
        delta = report.delta,
        converged = report.converged,
        "planning finished"
    );
    Ok(report)
}

/// Play one episode from the simulator's start state, learning from every step
///
/// The episode ends when the current state has no legal action, when the
/// simulator reports `done`, or after `max_steps` transitions. The agent's
/// episode is closed in every case except a propagated error.
pub fn run_episode<A, S>(agent: &mut A, sim: &mut S, max_steps: usize) -> Result<EpisodeReport>
where
    A: Learning,
    S: Simulator<State = A::State, Action = A::Action>,
{
    let mut report = EpisodeReport::default();
    let mut state = sim.reset();

    while report.steps < max_steps {
        if sim.legal_actions(&state).is_empty() {
            report.reached_absorbing = true;
            break;
        }

        let action = agent.action(&state)?;
        let step = sim.step(&action)?;
        agent.end_step(&state, &action, &step.next_state, step.reward)?;

        report.steps += 1;
        report.total_reward += step.reward;
        state = step.next_state;

        if step.done {
            report.reached_absorbing = true;
            break;
        }
    }

    agent.end_episode();
    debug!(
        steps = report.steps,
        total_reward = report.total_reward,
        absorbed = report.reached_absorbing,
        "episode complete"
    );
    Ok(report)
}

/// Run `episodes` episodes, annealing epsilon with `schedule` when given
pub fn train<A, S>(
    agent: &mut A,
    sim: &mut S,
    episodes: usize,
    max_steps: usize,
    schedule: Option<&dyn Schedule>,
) -> Result<Vec<EpisodeReport>>
where
    A: Learning,
    S: Simulator<State = A::State, Action = A::Action>,
{
    let mut reports = Vec::with_capacity(episodes);
    for episode in 0..episodes {
        if let Some(schedule) = schedule {
            agent.strategy_mut().set_epsilon(schedule.value(episode));
        }
        reports.push(run_episode(agent, sim, max_steps)?);
    }

    let total: f64 = reports.iter().map(|r| r.total_reward).sum();
    info!(
        episodes,
        total_reward = total,
        range = ?agent.value_range(),
        "training finished"
    );
    Ok(reports)
}
