use lazymdp_core::{Mdp, Operator, SolverConfig};

#[test]
fn public_default_yaml_config_parses() {
    let config = SolverConfig::from_default_yaml().expect("default yaml should parse");
    assert_eq!(config.discount, 0.9);
    assert_eq!(config.iterations, 7);
    assert_eq!(config.episodes, 50);
    assert_eq!(config.epsilon, 0.5);
    assert_eq!(config.max_episode_steps, None);
    assert_eq!(config.random_episode_steps, 100);
}

#[test]
fn public_partial_yaml_falls_back_to_defaults() {
    let config = SolverConfig::from_yaml_str("episodes: 12\nmax_episode_steps: 40\n")
        .expect("partial yaml should parse");
    assert_eq!(config.episodes, 12);
    assert_eq!(config.max_episode_steps, Some(40));
    assert_eq!(config.discount, SolverConfig::default().discount);
}

#[test]
fn public_invalid_config_is_rejected() {
    assert!(SolverConfig::from_yaml_str("epsilon: 2.0\n").is_err());
    assert!(SolverConfig::from_yaml_str("discount: -0.5\n").is_err());
    assert!(SolverConfig::from_yaml_str("max_episode_steps: 0\n").is_err());
    assert!(SolverConfig::from_yaml_str("episodes: [1, 2]\n").is_err());
}

#[test]
fn public_random_episode_length_comes_from_config() {
    let config = SolverConfig::from_yaml_str("seed: 3\nrandom_episode_steps: 6\n")
        .expect("partial yaml should parse");

    let mut mdp: Mdp<u8, u8> = Mdp::from_config(&config);
    mdp.register_actions([0, 1])
        .register_operators([Operator::new("flip", |_: &u8| true, |s: &u8| 1 - s)])
        .register_transition_function(|_, _, _| 0.5)
        .register_reward_function(|_, _, _| 1.0)
        .register_start_state(0);

    let report = mdp
        .random_episode(config.random_episode_steps)
        .expect("model registered");
    assert_eq!(report.steps, 6);
    assert!(!report.terminated);
    assert_eq!(report.total_reward, 6.0);
}
