use crate::engine::tests::{Chain, chain_mdp, two_state_mdp};
use crate::{Component, EngineError};

#[test]
fn greedy_learning_matches_value_iteration_on_deterministic_chain() {
    let mut mdp = chain_mdp(17);

    let values = mdp.value_iteration(0.9, 100).expect("model registered");
    mdp.q_learning(0.9, 5_000, 0.0).expect("model registered");
    let q = mdp.q_table().expect("learning ran");

    for state in [Chain::At(0), Chain::At(1), Chain::At(2), Chain::Dead] {
        let expected = values.get(&state).expect("known");
        let learned = q.max_value(&state).expect("known");
        assert!(
            (learned - expected).abs() < 0.1,
            "{state:?}: learned {learned}, value iteration {expected}"
        );
    }
}

#[test]
fn visit_counts_accumulate_across_calls() {
    let mut mdp = chain_mdp(3);

    let first = mdp.q_learning(0.9, 20, 0.3).expect("model registered");
    let visits_after_first: u64 = mdp
        .q_table()
        .expect("learning ran")
        .rows()
        .iter()
        .map(|row| row.visits)
        .sum();
    assert_eq!(visits_after_first, first.steps as u64);

    let second = mdp.q_learning(0.9, 20, 0.3).expect("model registered");
    let visits_after_second: u64 = mdp
        .q_table()
        .expect("learning ran")
        .rows()
        .iter()
        .map(|row| row.visits)
        .sum();
    assert_eq!(visits_after_second, (first.steps + second.steps) as u64);
}

#[test]
fn single_visit_takes_the_full_target() {
    let mut mdp = chain_mdp(5);
    mdp.register_actions(["right"]);

    mdp.q_learning(0.5, 1, 0.0).expect("model registered");
    let exit = mdp
        .q_value(&Chain::At(2), &"right")
        .expect("learning ran");
    assert_eq!(exit.visits(), 1);
    assert_eq!(exit.value(), 10.0);

    // Earlier cells saw zero-valued successors on their only visit.
    let first = mdp
        .q_value(&Chain::At(0), &"right")
        .expect("learning ran");
    assert_eq!(first.visits(), 1);
    assert_eq!(first.value(), 0.0);
}

#[test]
fn same_seed_learns_identical_tables() {
    let run = |seed: u64| {
        let mut mdp = chain_mdp(seed);
        mdp.q_learning(0.9, 30, 0.4).expect("model registered");
        mdp.q_table()
            .expect("learning ran")
            .rows()
            .iter()
            .map(|row| (row.value, row.visits))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(99), run(99));
}

#[test_log::test]
fn step_limit_truncates_endless_episodes() {
    let mut mdp = two_state_mdp(1);
    mdp.register_terminal_state("never");

    let report = mdp
        .q_learning_with_step_limit(0.9, 4, 0.5, Some(10))
        .expect("model registered");
    assert_eq!(report.truncated_episodes, 4);
    assert_eq!(report.steps, 40);
}

#[test]
fn learning_requires_a_terminal_state() {
    let mut mdp = two_state_mdp(0);
    assert_eq!(
        mdp.q_learning(0.9, 1, 0.1),
        Err(EngineError::NotInitialized {
            component: Component::TerminalState
        })
    );
}

#[test]
fn invalid_epsilon_is_rejected() {
    let mut mdp = chain_mdp(0);
    assert_eq!(
        mdp.q_learning(0.9, 1, 1.5),
        Err(EngineError::InvalidEpsilon { value: 1.5 })
    );
}

#[test]
fn q_lookups_fail_before_learning_and_for_unknown_keys() {
    let mut mdp = chain_mdp(0);
    assert!(matches!(mdp.q_table(), Err(EngineError::NoQTable)));

    mdp.q_learning(0.9, 2, 0.5).expect("model registered");
    assert!(matches!(
        mdp.q_value(&Chain::At(9), &"right"),
        Err(EngineError::UnknownState { .. })
    ));
    assert!(matches!(
        mdp.q_value(&Chain::At(0), &"left"),
        Err(EngineError::UnknownAction { .. })
    ));
    let q = mdp.q_table().expect("learning ran");
    assert_eq!(q.state_count(), 4);
    assert!(matches!(
        q.get(&Chain::At(0), &"left"),
        Err(EngineError::UnknownAction { .. })
    ));
}

#[test]
fn replacing_actions_drops_tables_sized_for_the_old_set() {
    let mut mdp = chain_mdp(1);
    mdp.value_iteration(0.9, 5).expect("model registered");
    mdp.q_learning(0.9, 5, 0.5).expect("model registered");
    mdp.extract_policy().expect("learning ran");

    mdp.register_actions(["stay", "right", "jump"]);
    assert!(matches!(mdp.value_table(), Err(EngineError::NoValueTable)));
    assert!(matches!(mdp.q_table(), Err(EngineError::NoQTable)));
    assert!(matches!(mdp.policy(), Err(EngineError::NoPolicy)));
    assert_eq!(
        mdp.q_value(&Chain::At(0), &"jump"),
        Err(EngineError::NoQTable)
    );

    mdp.q_learning(0.9, 5, 0.5).expect("model registered");
    let q = mdp.q_table().expect("learning ran");
    for state in [Chain::At(0), Chain::At(1), Chain::At(2), Chain::Dead] {
        let entries = q.entries(&state).expect("known");
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|row| row.state == state));
    }
    assert!(mdp.q_value(&Chain::At(0), &"jump").is_ok());
}
