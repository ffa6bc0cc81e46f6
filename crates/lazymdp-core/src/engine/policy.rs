use std::fmt::Debug;
use std::hash::Hash;

use crate::engine::{
    error::EngineError,
    ids::ActionId,
    mdp::Mdp,
    snapshot::{Policy, PolicyRow},
    stats::{QEntry, first_argmax},
};

impl<S, A> Mdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Derive the greedy policy from the current `Q` table.
    ///
    /// For every known state the action with the highest value wins; ties go
    /// to the action registered first. States discovered after learning get
    /// zeroed `Q` rows first, so they read the same through `q_value`. The
    /// stored policy is replaced wholesale.
    pub fn extract_policy(&mut self) -> Result<Policy<S, A>, EngineError> {
        if self.q.is_none() {
            return Err(EngineError::NoQTable);
        }
        if self.actions().is_empty() {
            return Err(EngineError::EmptyActionSet);
        }
        self.ensure_q_rows();

        let rows = self.q.as_ref().ok_or(EngineError::NoQTable)?;
        let policy = rows
            .iter()
            .map(|row| {
                first_argmax(row.iter().map(QEntry::value))
                    .map(ActionId::from)
                    .ok_or(EngineError::EmptyActionSet)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.policy = Some(policy);
        self.policy()
    }

    /// Snapshot of the last extracted policy.
    pub fn policy(&self) -> Result<Policy<S, A>, EngineError> {
        let policy = self.policy.as_ref().ok_or(EngineError::NoPolicy)?;
        let actions = self.actions();
        let rows = self
            .space
            .states()
            .iter()
            .zip(policy)
            .filter_map(|(state, action)| {
                actions.get(action.index()).map(|action| PolicyRow {
                    state: state.clone(),
                    action: action.clone(),
                })
            })
            .collect();
        Ok(Policy::new(rows))
    }

    /// Action the last extracted policy picks at `state`.
    pub fn policy_action(&self, state: &S) -> Result<&A, EngineError> {
        let policy = self.policy.as_ref().ok_or(EngineError::NoPolicy)?;
        self.space
            .key_of(state)
            .and_then(|key| policy.get(key.index()))
            .and_then(|action| self.actions().get(action.index()))
            .ok_or_else(|| EngineError::unknown_state(state))
    }
}
