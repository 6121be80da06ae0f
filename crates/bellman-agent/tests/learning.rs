//! End-to-end planning and learning on the reference environments

use std::rc::Rc;

use approx::assert_relative_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use bellman_agent::prelude::*;
use bellman_agent::{ExponentialSchedule, PlanReport};
use bellman_core::{IdentityFeatures, ModelActions};
use bellman_env::{Cell, Chain, Gridworld, Hop, MdpSimulator, Move};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn config(epsilon: f64, seed: u64) -> AgentConfig {
    AgentConfig {
        gamma: 0.9,
        alpha: 0.5,
        epsilon,
        seed: Some(seed),
        verbose: true,
    }
}

#[test]
fn test_planning_book_grid() {
    init_tracing();
    let grid = Gridworld::book_grid();
    let mut agent = ValueIterationAgent::new(grid, config(0.0, 0)).unwrap();

    let PlanReport {
        sweeps,
        delta,
        converged,
    } = plan_until_converged(&mut agent, 1e-8, 500).unwrap();
    assert!(converged, "delta {delta} after {sweeps} sweeps");

    // Near the -1 exit the best move heads away from it
    assert_eq!(agent.action(&Cell::new(2, 1)).unwrap(), Move::Up);
    assert_eq!(agent.action(&Cell::new(2, 0)).unwrap(), Move::Right);

    let range = agent.value_range();
    assert!(range.min >= 0.0 && range.max <= 1.0, "{range:?}");
    assert!(agent.policy(&Cell::new(3, 1)).unwrap().is_empty());
}

#[test]
fn test_q_learning_matches_planning_on_chain() {
    init_tracing();
    let chain = Chain::new(5, 1.0).unwrap();

    let mut planner = ValueIterationAgent::new(chain.clone(), config(0.0, 0)).unwrap();
    plan_until_converged(&mut planner, 1e-12, 100).unwrap();

    let mut learner = QLearningAgent::new(chain.clone(), config(0.3, 21)).unwrap();
    let mut sim = MdpSimulator::new(chain.clone(), 0, Some(4));
    let schedule = ExponentialSchedule::new(0.5, 0.05, 0.98);
    let reports = train(&mut learner, &mut sim, 300, 200, Some(&schedule)).unwrap();

    assert_eq!(reports.len(), 300);
    assert_eq!(learner.episode_count(), 300);
    for s in 0..chain.goal() {
        assert_relative_eq!(
            learner.value(&s).unwrap(),
            planner.value(&s).unwrap(),
            epsilon = 1e-6
        );
        assert_eq!(learner.policy(&s).unwrap(), planner.policy(&s).unwrap());
    }
}

#[test]
fn test_identity_features_match_tabular_agent() {
    init_tracing();
    let grid = Rc::new(Gridworld::book_grid());
    let features = IdentityFeatures::from_states(grid.reachable_states(), |s| {
        Mdp::legal_actions(&*grid, s)
    });

    let mut tabular = QLearningAgent::new(Rc::clone(&grid), config(0.0, 1)).unwrap();
    let mut linear = ApproxQLearningAgent::new(Rc::clone(&grid), features, config(0.0, 1)).unwrap();

    let mut sim = MdpSimulator::new(Rc::clone(&grid), grid.start(), Some(8));
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..3000 {
        let state = sim.current_state();
        let legal = sim.legal_actions(&state);
        let Some(action) = legal.choose(&mut rng).copied() else {
            sim.reset();
            continue;
        };
        let step = sim.step(&action).unwrap();
        tabular.end_step(&state, &action, &step.next_state, step.reward).unwrap();
        linear.end_step(&state, &action, &step.next_state, step.reward).unwrap();
    }

    for state in grid.reachable_states() {
        for action in Mdp::legal_actions(&*grid, &state) {
            assert_relative_eq!(
                tabular.q_value(&state, &action).unwrap(),
                linear.q_value(&state, &action).unwrap(),
                epsilon = 1e-9
            );
        }
        assert_relative_eq!(
            tabular.value(&state).unwrap(),
            linear.value(&state).unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_training_on_book_grid_stays_bounded() {
    init_tracing();
    let grid = Rc::new(Gridworld::book_grid());
    let mut agent = QLearningAgent::new(ModelActions(Rc::clone(&grid)), config(0.2, 3)).unwrap();
    let mut sim = MdpSimulator::new(Rc::clone(&grid), grid.start(), Some(5));

    let reports = train(&mut agent, &mut sim, 200, 100, None).unwrap();

    // Rewards are only paid on entering an exit and lie in [-1, 1]
    let range = agent.value_range();
    assert!(range.min >= -1.0 && range.max <= 1.0, "{range:?}");
    assert!(reports.iter().all(|r| r.total_reward.abs() <= 1.0));
    assert!(reports.iter().any(|r| r.reached_absorbing));
    assert_eq!(agent.environment().0.start(), Cell::new(0, 2));
}

proptest! {
    #[test]
    fn prop_greedy_action_is_in_policy(go in -5.0f64..5.0, back in -5.0f64..5.0) {
        let mut agent = QLearningAgent::new(Chain::new(3, 1.0).unwrap(), config(0.0, 0)).unwrap();
        agent.set_q_value(&0, &Hop::Go, go).unwrap();
        agent.set_q_value(&0, &Hop::Back, back).unwrap();

        let policy = agent.policy(&0).unwrap();
        let action = agent.action(&0).unwrap();
        prop_assert!(policy.contains(&action));
        prop_assert_eq!(agent.value(&0).unwrap(), go.max(back));
        for a in &policy {
            prop_assert_eq!(agent.q_value(&0, a).unwrap(), go.max(back));
        }

        let range = agent.value_range();
        prop_assert!(range.min <= go.min(back).min(0.0));
        prop_assert!(range.max >= go.max(back).max(0.0));
    }
}
