use lazymdp_core::{Mdp, Operator, SolverConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
enum Room {
    Hall,
    Vault,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
enum Move {
    Wait,
    Open,
    Leave,
}

fn rooms(seed: u64) -> Mdp<Room, Move> {
    let mut mdp: Mdp<Room, Move> = Mdp::new(seed);
    mdp.register_actions([Move::Wait, Move::Open, Move::Leave])
        .register_operators([
            Operator::new("enter_vault", |s: &Room| *s == Room::Hall, |_: &Room| Room::Vault),
            Operator::new("leave", |s: &Room| *s != Room::Exit, |_: &Room| Room::Exit),
        ])
        .register_transition_function(|s, a, sp| match (s, a, sp) {
            (Room::Exit, _, Room::Exit) => 1.0,
            (Room::Exit, _, _) => 0.0,
            (Room::Hall, Move::Open, Room::Vault) => 0.8,
            (Room::Hall, Move::Open, Room::Hall) => 0.2,
            (_, Move::Leave, Room::Exit) => 1.0,
            (_, Move::Wait, next) if next == s => 1.0,
            (Room::Vault, Move::Open, Room::Vault) => 1.0,
            _ => 0.0,
        })
        .register_reward_function(|s, a, sp| match (s, a, sp) {
            (Room::Exit, _, _) => 0.0,
            (Room::Hall, Move::Open, Room::Vault) => 5.0,
            (Room::Vault, Move::Leave, Room::Exit) => 1.0,
            (Room::Hall, Move::Leave, Room::Exit) => 2.0,
            _ => -0.1,
        })
        .register_start_state(Room::Hall)
        .register_terminal_state(Room::Exit);
    mdp
}

#[test]
fn public_solve_produces_consistent_tables() {
    let mut mdp = rooms(21);
    let config = SolverConfig {
        episodes: 400,
        epsilon: 0.3,
        iterations: 60,
        ..SolverConfig::default()
    };

    let solution = mdp.solve(&config).expect("model registered");

    assert_eq!(mdp.state_count(), 3);
    assert!(mdp.validate_transitions(1e-9).is_ok());
    assert_eq!(solution.values.len(), 3);
    assert_eq!(solution.policy.len(), 3);
    assert_eq!(solution.q.state_count(), 3);
    assert_eq!(solution.learning.episodes, 400);

    let hall = solution.values.get(&Room::Hall).expect("hall known");
    let vault = solution.values.get(&Room::Vault).expect("vault known");
    assert!((vault - 1.0).abs() < 1e-9);
    assert!(hall > 2.0);

    assert_eq!(solution.policy.get(&Room::Hall), Ok(&Move::Open));
    assert_eq!(solution.policy.get(&Room::Vault), Ok(&Move::Leave));
}

#[test]
fn public_tables_serialize_to_json() {
    let mut mdp = rooms(2);
    let values = mdp.value_iteration(0.9, 10).expect("model registered");
    mdp.q_learning(0.9, 10, 0.5).expect("model registered");
    let policy = mdp.extract_policy().expect("learning ran");

    let json = values.to_json().expect("values serialize");
    assert!(json.contains("\"Vault\""));
    assert!(mdp.q_table().expect("learning ran").to_json().is_ok());
    assert!(policy.to_json().expect("policy serializes").contains("\"action\""));
}

#[test]
fn public_random_episode_reaches_exit() {
    let mut mdp = rooms(7);
    let report = mdp.random_episode(500).expect("model registered");

    assert!(report.terminated);
    assert_eq!(mdp.current_state(), Some(&Room::Exit));
}
