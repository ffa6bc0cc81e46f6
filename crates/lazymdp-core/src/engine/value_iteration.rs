use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, info};

use crate::engine::{
    error::{Component, EngineError},
    ids::StateKey,
    mdp::{Mdp, not_initialized, validate_discount},
    snapshot::{ValueRow, ValueTable},
};

impl<S, A> Mdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Approximate the optimal state values with exactly `iterations` synchronous Bellman backups.
    ///
    /// Explores the full reachable state space first, starts from `V = 0`,
    /// and computes each pass from the previous pass only:
    ///
    /// `V'(s) = max_a Σ_{s' ∈ succ(s) ∪ {s}} T(s,a,s') · (R(s,a,s') + γ·V(s'))`
    ///
    /// There is no convergence test. Callers pick `iterations` large enough
    /// for their purpose; the exact count is always honored.
    pub fn value_iteration(
        &mut self,
        discount: f64,
        iterations: usize,
    ) -> Result<ValueTable<S>, EngineError> {
        self.ensure_initialized()?;
        validate_discount(discount)?;
        self.generate_all_states()?;

        let state_count = self.space.len();
        let outcome_sets: Vec<Vec<StateKey>> = (0..state_count)
            .map(|idx| self.outcome_set(StateKey::from(idx)))
            .collect();

        let actions = self.actions();
        let transition = self
            .transition
            .as_ref()
            .ok_or_else(|| not_initialized(Component::TransitionFunction))?;
        let reward = self
            .reward
            .as_ref()
            .ok_or_else(|| not_initialized(Component::RewardFunction))?;

        let mut values = vec![0.0_f64; state_count];
        for pass in 0..iterations {
            let mut next_values = Vec::with_capacity(state_count);

            for (idx, outcomes) in outcome_sets.iter().enumerate() {
                let state = self.space.state(StateKey::from(idx));
                let best = actions
                    .iter()
                    .map(|action| {
                        let mut q = 0.0;
                        for &next in outcomes {
                            let next_state = self.space.state(next);
                            let probability = transition(state, action, next_state);
                            if probability == 0.0 {
                                continue;
                            }
                            q += probability
                                * (reward(state, action, next_state)
                                    + discount * values[next.index()]);
                        }
                        q
                    })
                    .fold(f64::NEG_INFINITY, f64::max);
                next_values.push(best);
            }

            values = next_values;
            debug!("value iteration pass {} of {iterations} complete", pass + 1);
        }

        info!("value iteration finished {iterations} passes over {state_count} states");
        self.values = Some(values);
        self.value_table()
    }

    /// Snapshot of `V` from the last value-iteration run.
    pub fn value_table(&self) -> Result<ValueTable<S>, EngineError> {
        let values = self.values.as_ref().ok_or(EngineError::NoValueTable)?;
        let rows = self
            .space
            .states()
            .iter()
            .zip(values)
            .map(|(state, &value)| ValueRow {
                state: state.clone(),
                value,
            })
            .collect();
        Ok(ValueTable::new(rows))
    }

    /// Look up `V(state)` from the last value-iteration run.
    pub fn value(&self, state: &S) -> Result<f64, EngineError> {
        let values = self.values.as_ref().ok_or(EngineError::NoValueTable)?;
        self.space
            .key_of(state)
            .and_then(|key| values.get(key.index()).copied())
            .ok_or_else(|| EngineError::unknown_state(state))
    }
}
