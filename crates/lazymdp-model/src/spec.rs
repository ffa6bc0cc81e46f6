use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CompiledModel, ModelError, compiled::PROB_TOLERANCE};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable tabular model used for YAML IO and validation.
pub struct ModelSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// String id of the start state.
    pub start: String,
    /// String id of the state that ends episodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    /// Ordered action set shared by every state.
    pub actions: Vec<String>,
    /// All state declarations in the model.
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single state declaration.
///
/// Actions a state does not declare keep the state where it is with reward 0.
pub struct StateSpec {
    /// Unique state id.
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<TransitionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// The stochastic outcomes of one action taken in one state.
pub struct TransitionSpec {
    pub action: String,
    pub outcomes: Vec<OutcomeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One probabilistic successor for an action.
pub struct OutcomeSpec {
    pub next: String,
    pub prob: f64,
    pub reward: f64,
}

impl ModelSpec {
    /// Validate model invariants using the crate default tolerance.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.validate_with_tolerance(PROB_TOLERANCE)
    }

    /// Validate ids, transitions, and probability constraints.
    pub fn validate_with_tolerance(&self, tolerance: f64) -> Result<(), ModelError> {
        if self.start.trim().is_empty() {
            return Err(ModelError::MissingStart);
        }

        if self.actions.is_empty() {
            return Err(ModelError::EmptyActions);
        }
        let mut action_ids = HashSet::with_capacity(self.actions.len());
        for action in &self.actions {
            if !action_ids.insert(action.as_str()) {
                return Err(ModelError::DuplicateAction {
                    action: action.clone(),
                });
            }
        }

        let mut ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !ids.insert(state.id.as_str()) {
                return Err(ModelError::DuplicateStateId {
                    id: state.id.clone(),
                });
            }
        }

        if !ids.contains(self.start.as_str()) {
            return Err(ModelError::UnknownStartState {
                start: self.start.clone(),
            });
        }
        if let Some(terminal) = &self.terminal {
            if !ids.contains(terminal.as_str()) {
                return Err(ModelError::UnknownTerminalState {
                    terminal: terminal.clone(),
                });
            }
        }

        for state in &self.states {
            if self.terminal.as_deref() == Some(state.id.as_str()) && !state.transitions.is_empty()
            {
                return Err(ModelError::TerminalStateHasTransitions {
                    state: state.id.clone(),
                });
            }

            let mut declared = HashSet::with_capacity(state.transitions.len());
            for transition in &state.transitions {
                if !action_ids.contains(transition.action.as_str()) {
                    return Err(ModelError::UnknownAction {
                        state: state.id.clone(),
                        action: transition.action.clone(),
                    });
                }
                if !declared.insert(transition.action.as_str()) {
                    return Err(ModelError::DuplicateTransition {
                        state: state.id.clone(),
                        action: transition.action.clone(),
                    });
                }
                validate_outcomes(&state.id, transition, &ids, tolerance)?;
            }
        }

        Ok(())
    }

    /// Compile this spec into the runtime representation.
    pub fn compile(&self) -> Result<CompiledModel, ModelError> {
        CompiledModel::from_spec(self)
    }
}

fn validate_outcomes(
    state: &str,
    transition: &TransitionSpec,
    known_states: &HashSet<&str>,
    tolerance: f64,
) -> Result<(), ModelError> {
    if transition.outcomes.is_empty() {
        return Err(ModelError::EmptyOutcomes {
            state: state.to_string(),
            action: transition.action.clone(),
        });
    }

    let mut targets = HashSet::with_capacity(transition.outcomes.len());
    let mut sum = 0.0_f64;
    for (i, outcome) in transition.outcomes.iter().enumerate() {
        if !outcome.prob.is_finite() || outcome.prob < 0.0 {
            return Err(ModelError::InvalidProbability {
                state: state.to_string(),
                action: transition.action.clone(),
                outcome_index: i,
                value: outcome.prob,
            });
        }

        if !outcome.reward.is_finite() {
            return Err(ModelError::InvalidReward {
                state: state.to_string(),
                action: transition.action.clone(),
                outcome_index: i,
                value: outcome.reward,
            });
        }

        if !known_states.contains(outcome.next.as_str()) {
            return Err(ModelError::UnknownNextState {
                state: state.to_string(),
                action: transition.action.clone(),
                next: outcome.next.clone(),
            });
        }

        if !targets.insert(outcome.next.as_str()) {
            return Err(ModelError::DuplicateOutcome {
                state: state.to_string(),
                action: transition.action.clone(),
                next: outcome.next.clone(),
            });
        }

        sum += outcome.prob;
    }

    // Outcome probabilities for an action must sum to 1 within tolerance.
    if (sum - 1.0).abs() > tolerance {
        return Err(ModelError::ProbabilitySum {
            state: state.to_string(),
            action: transition.action.clone(),
            sum,
            tolerance,
        });
    }

    Ok(())
}
