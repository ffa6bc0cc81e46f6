use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::engine::{
    error::{Component, EngineError},
    ids::{ActionId, StateKey},
    mdp::{Mdp, not_initialized, validate_discount},
    snapshot::QTable,
    stats::QEntry,
};

/// Aggregate counters for one Q-learning call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LearningReport {
    pub episodes: usize,
    /// Actions taken across all episodes.
    pub steps: usize,
    /// Episodes cut off by the step limit before reaching the terminal state.
    pub truncated_episodes: usize,
}

impl<S, A> Mdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Learn action values from `episodes` simulated episodes.
    ///
    /// Each episode starts at the start state and runs until the terminal
    /// state is reached. Estimates are running averages whose visit counts
    /// persist across calls, so a second call keeps refining the first.
    pub fn q_learning(
        &mut self,
        discount: f64,
        episodes: usize,
        epsilon: f64,
    ) -> Result<LearningReport, EngineError> {
        self.q_learning_with_step_limit(discount, episodes, epsilon, None)
    }

    /// Q-learning where each episode stops after at most `max_episode_steps` actions.
    pub fn q_learning_with_step_limit(
        &mut self,
        discount: f64,
        episodes: usize,
        epsilon: f64,
        max_episode_steps: Option<usize>,
    ) -> Result<LearningReport, EngineError> {
        self.ensure_initialized()?;
        self.require_terminal()?;
        validate_discount(discount)?;
        if !epsilon.is_finite() || !(0.0..=1.0).contains(&epsilon) {
            return Err(EngineError::InvalidEpsilon { value: epsilon });
        }

        self.generate_all_states()?;
        self.ensure_q_rows();

        let start = self
            .start
            .ok_or_else(|| not_initialized(Component::StartState))?;
        let mut report = LearningReport {
            episodes,
            ..LearningReport::default()
        };

        for episode in 0..episodes {
            self.current = Some(start);
            let mut state = start;
            let mut steps = 0_usize;
            debug!("episode {episode}");

            while !self.is_terminal(state) {
                if max_episode_steps.is_some_and(|limit| steps >= limit) {
                    warn!("episode {episode} truncated after {steps} steps");
                    report.truncated_episodes += 1;
                    break;
                }

                let action = self.select_action(state, epsilon)?;
                let (next, reward) = self.step(action)?;
                self.ensure_q_rows();

                let rows = self.q.as_mut().ok_or(EngineError::NoQTable)?;
                let best_next = rows[next.index()]
                    .iter()
                    .map(QEntry::value)
                    .fold(f64::NEG_INFINITY, f64::max);
                rows[state.index()][action.index()].record(reward + discount * best_next);

                state = next;
                steps += 1;
            }

            report.steps += steps;
        }

        info!(
            "q-learning finished {} episodes, {} steps, {} truncated",
            report.episodes, report.steps, report.truncated_episodes
        );
        Ok(report)
    }

    /// Epsilon-greedy choice at `state`.
    ///
    /// With probability `1 - epsilon` the candidates are the actions tied for
    /// the highest value; otherwise every action is a candidate. One
    /// candidate is then drawn uniformly.
    fn select_action(&mut self, state: StateKey, epsilon: f64) -> Result<ActionId, EngineError> {
        let rows = self.q.as_ref().ok_or(EngineError::NoQTable)?;
        let row = &rows[state.index()];
        let explore = self.rng.gen_bool(epsilon);

        let mut candidates: Vec<usize> = if explore {
            (0..row.len()).collect()
        } else {
            let best = row
                .iter()
                .map(QEntry::value)
                .fold(f64::NEG_INFINITY, f64::max);
            (0..row.len())
                .filter(|&idx| row[idx].value() == best)
                .collect()
        };
        if candidates.is_empty() {
            candidates = (0..row.len()).collect();
        }

        candidates
            .choose(&mut self.rng)
            .copied()
            .map(ActionId::from)
            .ok_or(EngineError::EmptyActionSet)
    }

    /// Give every known state a zeroed row, keeping existing estimates.
    pub(crate) fn ensure_q_rows(&mut self) {
        let action_count = self.actions().len();
        let state_count = self.space.len();
        let rows = self.q.get_or_insert_with(Vec::new);
        rows.resize_with(state_count, || vec![QEntry::default(); action_count]);
    }

    /// Snapshot of `Q` with visit counts.
    pub fn q_table(&self) -> Result<QTable<S, A>, EngineError> {
        let rows = self.q.as_ref().ok_or(EngineError::NoQTable)?;
        Ok(QTable::new(self.space.states(), self.actions(), rows))
    }

    /// Look up the `Q(state, action)` entry.
    pub fn q_value(&self, state: &S, action: &A) -> Result<QEntry, EngineError> {
        let rows = self.q.as_ref().ok_or(EngineError::NoQTable)?;
        let action_id = self.action_id(action)?;
        self.space
            .key_of(state)
            .and_then(|key| rows.get(key.index()))
            .and_then(|row| row.get(action_id.index()).copied())
            .ok_or_else(|| EngineError::unknown_state(state))
    }
}
