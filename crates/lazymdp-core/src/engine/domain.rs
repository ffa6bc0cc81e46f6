use std::fmt::{self, Debug};
use std::hash::Hash;

/// Deterministic state transformation guarded by a precondition.
///
/// Operators only say which successor states exist structurally. How likely
/// an action is to land on each of them is the transition function's job.
pub struct Operator<S> {
    name: String,
    precondition: Box<dyn Fn(&S) -> bool>,
    apply: Box<dyn Fn(&S) -> S>,
}

impl<S> Operator<S> {
    /// Create a named operator from a precondition and a pure state transformation.
    pub fn new(
        name: impl Into<String>,
        precondition: impl Fn(&S) -> bool + 'static,
        apply: impl Fn(&S) -> S + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            precondition: Box::new(precondition),
            apply: Box::new(apply),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return whether the operator may be applied to `state`.
    pub fn is_applicable(&self, state: &S) -> bool {
        (self.precondition)(state)
    }

    /// Produce the successor of `state`. Callers check `is_applicable` first.
    pub fn apply(&self, state: &S) -> S {
        (self.apply)(state)
    }
}

impl<S> Debug for Operator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator").field("name", &self.name).finish()
    }
}

/// Probability `T(s, a, s')` of landing on `s'` when taking `a` in `s`.
pub type TransitionFn<S, A> = Box<dyn Fn(&S, &A, &S) -> f64>;

/// Reward `R(s, a, s')` received when moving from `s` to `s'` under `a`.
pub type RewardFn<S, A> = Box<dyn Fn(&S, &A, &S) -> f64>;

/// Generic interface for user-defined MDP domains with arbitrary state types.
///
/// Registering a domain installs every component the engine needs in one call.
pub trait Domain {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + Eq + Hash + Debug;

    /// Return the fixed, ordered action set.
    fn actions(&self) -> Vec<Self::Action>;

    /// Return the operators that generate successor states.
    fn operators(&self) -> Vec<Operator<Self::State>>;

    /// Probability of reaching `next` from `state` under `action`.
    fn transition(&self, state: &Self::State, action: &Self::Action, next: &Self::State) -> f64;

    /// Reward for reaching `next` from `state` under `action`.
    fn reward(&self, state: &Self::State, action: &Self::Action, next: &Self::State) -> f64;

    /// Return the initial state of the domain.
    fn start_state(&self) -> Self::State;

    /// Return the marker state that ends an episode, if the domain has one.
    fn terminal_state(&self) -> Option<Self::State>;
}
