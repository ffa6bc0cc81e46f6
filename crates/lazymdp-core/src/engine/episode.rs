use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use crate::engine::{
    error::EngineError,
    ids::ActionId,
    mdp::Mdp,
};

/// Summary of one random rollout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeReport {
    /// Number of actions actually taken.
    pub steps: usize,
    /// Undiscounted sum of the rewards collected.
    pub total_reward: f64,
    /// Whether the episode stopped early at the terminal state.
    pub terminated: bool,
}

impl<S, A> Mdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Run up to `max_steps` uniformly random actions from the start state.
    ///
    /// Stops early when the terminal state is reached. Without a registered
    /// terminal state the episode always runs the full length.
    pub fn random_episode(&mut self, max_steps: usize) -> Result<EpisodeReport, EngineError> {
        self.ensure_initialized()?;
        self.reset()?;

        let action_count = self.actions().len();
        let mut report = EpisodeReport {
            steps: 0,
            total_reward: 0.0,
            terminated: false,
        };

        for _ in 0..max_steps {
            let action_id = ActionId::from(self.rng.gen_range(0..action_count));
            let (next, reward) = self.step(action_id)?;
            report.steps += 1;
            report.total_reward += reward;

            if self.is_terminal(next) {
                debug!("terminating at terminal state after {} steps", report.steps);
                report.terminated = true;
                break;
            }
        }

        info!(
            "done with {} of {max_steps} steps of random exploration",
            report.steps
        );
        Ok(report)
    }
}
