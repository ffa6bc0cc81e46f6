use std::path::PathBuf;

use lazymdp_core::SolverConfig;
use lazymdp_model::{compile_yaml, solve_yaml};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/lazymdp-model/examples/sample.mdp.yaml"));
    let config = match std::env::args().nth(2) {
        Some(config_path) => SolverConfig::from_yaml_path(config_path),
        None => SolverConfig::from_default_yaml(),
    }
    .expect("failed to load solver config");

    let mut mdp = compile_yaml(&path)
        .expect("failed to compile model")
        .into_engine(config.seed);
    let episode = mdp
        .random_episode(config.random_episode_steps)
        .expect("model registered");
    println!(
        "random episode: steps={} reward={:.2} terminated={}",
        episode.steps, episode.total_reward, episode.terminated
    );

    let solution = solve_yaml(&path, &config).expect("failed to solve model");

    println!("values:");
    for (state, value) in solution.values.iter() {
        println!("  {state:<10} {value:>8.3}");
    }
    println!("q values:");
    for row in solution.q.rows() {
        println!(
            "  {:<10} {:<8} {:>8.3} (n={})",
            row.state, row.action, row.value, row.visits
        );
    }
    println!("policy:");
    for (state, action) in solution.policy.iter() {
        println!("  {state:<10} {action}");
    }
}
