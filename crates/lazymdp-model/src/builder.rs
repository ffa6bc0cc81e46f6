use crate::{CompiledModel, ModelError, ModelSpec, OutcomeSpec, StateSpec, TransitionSpec};

#[derive(Debug, Clone, Default)]
/// Struct to build tabular models
pub struct ModelBuilder {
    start: Option<String>,
    terminal: Option<String>,
    actions: Vec<String>,
    states: Vec<StateSpec>,
}

impl ModelBuilder {
    /// Create a new ModelBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Define the start state of the model
    pub fn set_start(&mut self, state: impl Into<String>) -> &mut Self {
        self.start = Some(state.into());
        self
    }

    /// Define the state that ends episodes
    pub fn set_terminal(&mut self, state: impl Into<String>) -> &mut Self {
        self.terminal = Some(state.into());
        self
    }

    /// Append an action to the shared action set
    pub fn add_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.actions.push(action.into());
        self
    }

    /// Add a new state without transitions
    pub fn add_state(&mut self, id: impl Into<String>) -> &mut Self {
        self.states.push(StateSpec {
            id: id.into(),
            transitions: Vec::new(),
        });
        self
    }

    /// Add an outcome to an action taken in a state
    /// Actions can be stochastic so one action may collect several outcomes
    pub fn add_outcome(
        &mut self,
        state_id: impl AsRef<str>,
        action_id: impl AsRef<str>,
        next: impl Into<String>,
        prob: f64,
        reward: f64,
    ) -> Result<&mut Self, ModelError> {
        let state_id = state_id.as_ref();
        let action_id = action_id.as_ref();

        if !self.actions.iter().any(|a| a == action_id) {
            return Err(ModelError::BuilderUnknownAction {
                state: state_id.to_string(),
                action: action_id.to_string(),
            });
        }

        let state = self
            .states
            .iter_mut()
            .find(|s| s.id == state_id)
            .ok_or_else(|| ModelError::BuilderUnknownState {
                state: state_id.to_string(),
            })?;

        let position = match state
            .transitions
            .iter()
            .position(|t| t.action == action_id)
        {
            Some(position) => position,
            None => {
                state.transitions.push(TransitionSpec {
                    action: action_id.to_string(),
                    outcomes: Vec::new(),
                });
                state.transitions.len() - 1
            }
        };

        state.transitions[position].outcomes.push(OutcomeSpec {
            next: next.into(),
            prob,
            reward,
        });

        Ok(self)
    }

    pub fn build_spec(self) -> Result<ModelSpec, ModelError> {
        let start = self.start.ok_or(ModelError::MissingStart)?;
        let spec = ModelSpec {
            version: Some(1),
            start,
            terminal: self.terminal,
            actions: self.actions,
            states: self.states,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<CompiledModel, ModelError> {
        let spec = self.build_spec()?;
        spec.compile()
    }
}
