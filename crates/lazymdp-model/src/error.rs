use lazymdp_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for model loading, validation, compilation, and builder operations.
pub enum ModelError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("missing start state")]
    MissingStart,

    #[error("start state '{start}' does not exist")]
    UnknownStartState { start: String },

    #[error("terminal state '{terminal}' does not exist")]
    UnknownTerminalState { terminal: String },

    #[error("model must declare at least one action")]
    EmptyActions,

    #[error("duplicate action id '{action}'")]
    DuplicateAction { action: String },

    #[error("duplicate state id '{id}'")]
    DuplicateStateId { id: String },

    #[error("state '{state}' is terminal and cannot declare transitions")]
    TerminalStateHasTransitions { state: String },

    #[error("state '{state}' declares undeclared action '{action}'")]
    UnknownAction { state: String, action: String },

    #[error("state '{state}' declares action '{action}' more than once")]
    DuplicateTransition { state: String, action: String },

    #[error("outcome in state '{state}', action '{action}' references unknown next state '{next}'")]
    UnknownNextState {
        state: String,
        action: String,
        next: String,
    },

    #[error("state '{state}', action '{action}' lists next state '{next}' more than once")]
    DuplicateOutcome {
        state: String,
        action: String,
        next: String,
    },

    #[error(
        "invalid probability in state '{state}', action '{action}', outcome {outcome_index}: {value}"
    )]
    InvalidProbability {
        state: String,
        action: String,
        outcome_index: usize,
        value: f64,
    },

    #[error(
        "invalid reward in state '{state}', action '{action}', outcome {outcome_index}: {value}"
    )]
    InvalidReward {
        state: String,
        action: String,
        outcome_index: usize,
        value: f64,
    },

    #[error(
        "probability sum for state '{state}', action '{action}' must be within {tolerance} of 1.0, got {sum}"
    )]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },

    #[error("state '{state}' action '{action}' must contain at least one outcome")]
    EmptyOutcomes { state: String, action: String },

    #[error("builder referenced unknown state '{state}'")]
    BuilderUnknownState { state: String },

    #[error("builder referenced unknown action '{action}' in state '{state}'")]
    BuilderUnknownAction { state: String, action: String },
}
