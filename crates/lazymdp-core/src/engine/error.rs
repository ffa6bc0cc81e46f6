use std::fmt;

/// Pieces of the model that must be registered before the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Actions,
    Operators,
    TransitionFunction,
    RewardFunction,
    StartState,
    TerminalState,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Actions => "action set",
            Component::Operators => "operator list",
            Component::TransitionFunction => "transition function",
            Component::RewardFunction => "reward function",
            Component::StartState => "start state",
            Component::TerminalState => "terminal state",
        };
        f.write_str(name)
    }
}

/// Error type for engine registration, solving, and table lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A required model component was never registered.
    NotInitialized { component: Component },
    /// The registered action set has no members.
    EmptyActionSet,
    /// Lookup for a state that was never discovered.
    UnknownState { state: String },
    /// Lookup for an action outside the registered action set.
    UnknownAction { action: String },
    /// Value table requested before value iteration ran.
    NoValueTable,
    /// Q table requested before Q-learning ran.
    NoQTable,
    /// Policy requested before it was extracted.
    NoPolicy,
    /// Discount factor outside `[0, 1]` or not finite.
    InvalidDiscount { value: f64 },
    /// Exploration rate outside `[0, 1]` or not finite.
    InvalidEpsilon { value: f64 },
    /// Transition probabilities for `(state, action)` do not form a distribution.
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },
}

impl EngineError {
    pub(crate) fn unknown_state(state: &impl fmt::Debug) -> Self {
        EngineError::UnknownState {
            state: format!("{state:?}"),
        }
    }

    pub(crate) fn unknown_action(action: &impl fmt::Debug) -> Self {
        EngineError::UnknownAction {
            action: format!("{action:?}"),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotInitialized { component } => {
                write!(f, "engine not initialized: no {component} registered")
            }
            EngineError::EmptyActionSet => write!(f, "action set must not be empty"),
            EngineError::UnknownState { state } => write!(f, "unknown state {state}"),
            EngineError::UnknownAction { action } => write!(f, "unknown action {action}"),
            EngineError::NoValueTable => {
                write!(f, "no value table: value iteration has not run")
            }
            EngineError::NoQTable => write!(f, "no Q table: Q-learning has not run"),
            EngineError::NoPolicy => write!(f, "no policy: policy has not been extracted"),
            EngineError::InvalidDiscount { value } => {
                write!(f, "discount must be finite and within [0, 1], got {value}")
            }
            EngineError::InvalidEpsilon { value } => {
                write!(f, "epsilon must be finite and within [0, 1], got {value}")
            }
            EngineError::ProbabilitySum {
                state,
                action,
                sum,
                tolerance,
            } => write!(
                f,
                "transition probabilities for state {state}, action {action} must sum to 1.0 within {tolerance}, got {sum}"
            ),
        }
    }
}

impl std::error::Error for EngineError {}
