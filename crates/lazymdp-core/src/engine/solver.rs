use std::{
    fmt::{self, Debug},
    fs,
    hash::Hash,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::engine::{
    error::EngineError,
    mdp::Mdp,
    q_learning::LearningReport,
    snapshot::{Policy, QTable, ValueTable},
};

const DEFAULT_SOLVER_CONFIG_YAML: &str = include_str!("../../config/solver.default.yaml");

/// Parameters for the solvers and the random-episode simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub seed: u64,
    pub discount: f64,
    /// Number of value-iteration passes.
    pub iterations: usize,
    /// Number of Q-learning episodes.
    pub episodes: usize,
    pub epsilon: f64,
    /// Cap on actions per Q-learning episode; `None` runs until terminal.
    pub max_episode_steps: Option<usize>,
    pub random_episode_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            seed: 0,
            discount: 0.9,
            iterations: 7,
            episodes: 50,
            epsilon: 0.5,
            max_episode_steps: None,
            random_episode_steps: 100,
        }
    }
}

impl SolverConfig {
    /// Parse a solver config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SolverConfigError> {
        let config: SolverConfig = serde_yaml::from_str(yaml).map_err(SolverConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solver config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SolverConfigError> {
        let yaml = fs::read_to_string(path).map_err(SolverConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SolverConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), SolverConfigError> {
        if !self.discount.is_finite() || !(0.0..=1.0).contains(&self.discount) {
            return Err(SolverConfigError::Invalid(
                "discount must be finite and within [0, 1]".to_string(),
            ));
        }
        if !self.epsilon.is_finite() || !(0.0..=1.0).contains(&self.epsilon) {
            return Err(SolverConfigError::Invalid(
                "epsilon must be finite and within [0, 1]".to_string(),
            ));
        }
        if self.max_episode_steps == Some(0) {
            return Err(SolverConfigError::Invalid(
                "max_episode_steps must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error type for loading and validating `SolverConfig`.
#[derive(Debug)]
pub enum SolverConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for SolverConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            SolverConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            SolverConfigError::Invalid(err) => write!(f, "invalid solver config: {err}"),
        }
    }
}

impl std::error::Error for SolverConfigError {}

/// Every table produced by a full `solve` run.
#[derive(Debug, Clone)]
pub struct Solution<S, A>
where
    S: Clone + Eq + Hash,
{
    pub values: ValueTable<S>,
    pub q: QTable<S, A>,
    pub policy: Policy<S, A>,
    pub learning: LearningReport,
}

impl<S, A> Mdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Create an engine seeded from `config`.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.seed)
    }

    /// Run value iteration, Q-learning, and policy extraction with `config`.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<Solution<S, A>, EngineError> {
        let values = self.value_iteration(config.discount, config.iterations)?;
        let learning = self.q_learning_with_step_limit(
            config.discount,
            config.episodes,
            config.epsilon,
            config.max_episode_steps,
        )?;
        let policy = self.extract_policy()?;

        Ok(Solution {
            values,
            q: self.q_table()?,
            policy,
            learning,
        })
    }
}
