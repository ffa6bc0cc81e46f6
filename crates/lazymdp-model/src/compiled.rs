use std::collections::{HashMap, HashSet};

use lazymdp_core::{Domain, Mdp, Operator};

use crate::{ModelError, ModelSpec};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
/// Runtime form of a tabular model with resolved state references.
pub struct CompiledModel {
    start: usize,
    terminal: Option<usize>,
    actions: Vec<String>,
    state_ids: Vec<String>,
    state_id_to_key: HashMap<String, usize>,
    states: Vec<StateRec>,
}

#[derive(Debug, Clone)]
struct StateRec {
    /// Outcomes per action index; empty means the action keeps the state in place.
    outcomes: Vec<Vec<OutcomeRec>>,
}

#[derive(Debug, Clone)]
struct OutcomeRec {
    next: usize,
    prob: f64,
    reward: f64,
}

impl CompiledModel {
    /// Compile and validate a spec into a fast runtime representation.
    pub(crate) fn from_spec(spec: &ModelSpec) -> Result<Self, ModelError> {
        spec.validate_with_tolerance(PROB_TOLERANCE)?;

        let mut state_id_to_key = HashMap::with_capacity(spec.states.len());
        let mut state_ids = Vec::with_capacity(spec.states.len());
        for (idx, state) in spec.states.iter().enumerate() {
            state_id_to_key.insert(state.id.clone(), idx);
            state_ids.push(state.id.clone());
        }

        let start = state_id_to_key.get(&spec.start).copied().ok_or_else(|| {
            ModelError::UnknownStartState {
                start: spec.start.clone(),
            }
        })?;
        let terminal = spec
            .terminal
            .as_ref()
            .map(|terminal| {
                state_id_to_key.get(terminal).copied().ok_or_else(|| {
                    ModelError::UnknownTerminalState {
                        terminal: terminal.clone(),
                    }
                })
            })
            .transpose()?;

        let mut states = Vec::with_capacity(spec.states.len());
        for state in &spec.states {
            let mut outcomes = vec![Vec::new(); spec.actions.len()];

            for transition in &state.transitions {
                let action_idx = spec
                    .actions
                    .iter()
                    .position(|action| *action == transition.action)
                    .ok_or_else(|| ModelError::UnknownAction {
                        state: state.id.clone(),
                        action: transition.action.clone(),
                    })?;

                for outcome in &transition.outcomes {
                    let next = state_id_to_key.get(&outcome.next).copied().ok_or_else(|| {
                        ModelError::UnknownNextState {
                            state: state.id.clone(),
                            action: transition.action.clone(),
                            next: outcome.next.clone(),
                        }
                    })?;
                    outcomes[action_idx].push(OutcomeRec {
                        next,
                        prob: outcome.prob,
                        reward: outcome.reward,
                    });
                }
            }

            states.push(StateRec { outcomes });
        }

        Ok(Self {
            start,
            terminal,
            actions: spec.actions.clone(),
            state_ids,
            state_id_to_key,
            states,
        })
    }

    /// Return the start state id.
    pub fn start(&self) -> &str {
        &self.state_ids[self.start]
    }

    /// Return the terminal state id, if the model has one.
    pub fn terminal(&self) -> Option<&str> {
        self.terminal.map(|key| self.state_ids[key].as_str())
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Return the ordered action ids.
    pub fn action_ids(&self) -> &[String] {
        &self.actions
    }

    /// Return whether a state id is declared.
    pub fn contains_state(&self, id: &str) -> bool {
        self.state_id_to_key.contains_key(id)
    }

    /// Build an engine with this model registered and a deterministic RNG seed.
    pub fn into_engine(self, seed: u64) -> Mdp<String, String> {
        let mut mdp = Mdp::new(seed);
        mdp.register_domain(self);
        mdp
    }

    /// Declared outcomes for `(state, action)`, or `None` for an unknown state or action.
    fn outcomes(&self, state: &str, action: &str) -> Option<&[OutcomeRec]> {
        let key = *self.state_id_to_key.get(state)?;
        let action_idx = self.actions.iter().position(|a| a == action)?;
        Some(&self.states[key].outcomes[action_idx])
    }

    /// Distinct declared targets, each with the set of states that can reach it.
    fn sources_by_target(&self) -> Vec<(usize, HashSet<String>)> {
        let mut sources: Vec<(usize, HashSet<String>)> = Vec::new();
        for (key, state) in self.states.iter().enumerate() {
            for outcome in state.outcomes.iter().flatten() {
                let source = self.state_ids[key].clone();
                match sources.iter_mut().find(|(target, _)| *target == outcome.next) {
                    Some((_, set)) => {
                        set.insert(source);
                    }
                    None => sources.push((outcome.next, HashSet::from([source]))),
                }
            }
        }
        sources
    }
}

impl Domain for CompiledModel {
    type State = String;
    type Action = String;

    fn actions(&self) -> Vec<String> {
        self.actions.clone()
    }

    /// One operator per declared target, applicable wherever some outcome leads there.
    fn operators(&self) -> Vec<Operator<String>> {
        self.sources_by_target()
            .into_iter()
            .map(|(target, sources)| {
                let next = self.state_ids[target].clone();
                Operator::new(
                    format!("to_{next}"),
                    move |s: &String| sources.contains(s),
                    move |_: &String| next.clone(),
                )
            })
            .collect()
    }

    fn transition(&self, state: &String, action: &String, next: &String) -> f64 {
        let Some(outcomes) = self.outcomes(state, action) else {
            return 0.0;
        };
        if outcomes.is_empty() {
            return if state == next { 1.0 } else { 0.0 };
        }
        outcomes
            .iter()
            .filter(|outcome| self.state_ids[outcome.next] == *next)
            .map(|outcome| outcome.prob)
            .sum()
    }

    fn reward(&self, state: &String, action: &String, next: &String) -> f64 {
        self.outcomes(state, action)
            .and_then(|outcomes| {
                outcomes
                    .iter()
                    .find(|outcome| self.state_ids[outcome.next] == *next)
            })
            .map_or(0.0, |outcome| outcome.reward)
    }

    fn start_state(&self) -> String {
        self.start().to_string()
    }

    fn terminal_state(&self) -> Option<String> {
        self.terminal().map(str::to_string)
    }
}
