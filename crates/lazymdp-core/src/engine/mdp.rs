use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::engine::{
    domain::{Domain, Operator, RewardFn, TransitionFn},
    error::{Component, EngineError},
    explorer::StateSpace,
    ids::{ActionId, StateKey},
    stats::QEntry,
};

/// Result of a single stochastic action step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome<S> {
    /// State the engine moved to (unchanged when no successor was drawn).
    pub state: S,
    pub reward: f64,
}

/// Markov decision process over a lazily discovered state space.
///
/// Owns the registered model, the discovered state graph, the current
/// simulation state, the seeded RNG, and every table a solver produces.
/// Nothing is shared: all solvers read and write through `&mut self`.
pub struct Mdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    pub(crate) actions: Option<Vec<A>>,
    pub(crate) operators: Option<Vec<Operator<S>>>,
    pub(crate) transition: Option<TransitionFn<S, A>>,
    pub(crate) reward: Option<RewardFn<S, A>>,
    pub(crate) start: Option<StateKey>,
    pub(crate) terminal: Option<S>,
    pub(crate) current: Option<StateKey>,
    pub(crate) space: StateSpace<S>,
    pub(crate) values: Option<Vec<f64>>,
    pub(crate) q: Option<Vec<Vec<QEntry>>>,
    pub(crate) policy: Option<Vec<ActionId>>,
    pub(crate) rng: ChaCha8Rng,
}

impl<S, A> Mdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Create an empty engine with a deterministic RNG seed.
    pub fn new(seed: u64) -> Self {
        Self {
            actions: None,
            operators: None,
            transition: None,
            reward: None,
            start: None,
            terminal: None,
            current: None,
            space: StateSpace::default(),
            values: None,
            q: None,
            policy: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replace the RNG with a freshly seeded one.
    pub fn reseed(&mut self, seed: u64) -> &mut Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Register the start state. It becomes known and current.
    pub fn register_start_state(&mut self, state: S) -> &mut Self {
        let key = self.space.intern(state);
        self.start = Some(key);
        self.current = Some(key);
        self
    }

    /// Register the ordered action set. The order fixes policy tie-breaking.
    ///
    /// Every solver table is sized by the action set, so registering a new
    /// one drops the value, `Q` and policy tables.
    pub fn register_actions(&mut self, actions: impl IntoIterator<Item = A>) -> &mut Self {
        self.actions = Some(actions.into_iter().collect());
        if self.values.is_some() || self.q.is_some() || self.policy.is_some() {
            debug!("action set replaced, dropping solver tables");
        }
        self.values = None;
        self.q = None;
        self.policy = None;
        self
    }

    pub fn register_operators(
        &mut self,
        operators: impl IntoIterator<Item = Operator<S>>,
    ) -> &mut Self {
        self.operators = Some(operators.into_iter().collect());
        self
    }

    pub fn register_transition_function(
        &mut self,
        transition: impl Fn(&S, &A, &S) -> f64 + 'static,
    ) -> &mut Self {
        self.transition = Some(Box::new(transition));
        self
    }

    pub fn register_reward_function(
        &mut self,
        reward: impl Fn(&S, &A, &S) -> f64 + 'static,
    ) -> &mut Self {
        self.reward = Some(Box::new(reward));
        self
    }

    /// Register the marker state that ends episodes.
    /// It is compared by equality and does not become known until reached.
    pub fn register_terminal_state(&mut self, state: S) -> &mut Self {
        self.terminal = Some(state);
        self
    }

    /// Install every model component supplied by `domain`.
    pub fn register_domain<D>(&mut self, domain: D) -> &mut Self
    where
        D: Domain<State = S, Action = A> + 'static,
    {
        let domain = Rc::new(domain);

        self.register_actions(domain.actions());
        self.register_operators(domain.operators());
        self.register_start_state(domain.start_state());
        if let Some(terminal) = domain.terminal_state() {
            self.register_terminal_state(terminal);
        }

        let transition_domain = Rc::clone(&domain);
        self.register_transition_function(move |s, a, sp| transition_domain.transition(s, a, sp));
        self.register_reward_function(move |s, a, sp| domain.reward(s, a, sp));
        self
    }

    /// Check that every component needed for simulation and solving is registered.
    pub fn ensure_initialized(&self) -> Result<(), EngineError> {
        match &self.actions {
            None => return Err(not_initialized(Component::Actions)),
            Some(actions) if actions.is_empty() => return Err(EngineError::EmptyActionSet),
            Some(_) => {}
        }
        if self.operators.is_none() {
            return Err(not_initialized(Component::Operators));
        }
        if self.transition.is_none() {
            return Err(not_initialized(Component::TransitionFunction));
        }
        if self.reward.is_none() {
            return Err(not_initialized(Component::RewardFunction));
        }
        if self.start.is_none() {
            return Err(not_initialized(Component::StartState));
        }
        Ok(())
    }

    /// Registered actions in registration order (empty before registration).
    pub fn actions(&self) -> &[A] {
        self.actions.as_deref().unwrap_or(&[])
    }

    /// All states discovered so far, in discovery order.
    pub fn known_states(&self) -> &[S] {
        self.space.states()
    }

    pub fn state_count(&self) -> usize {
        self.space.len()
    }

    pub fn is_known(&self, state: &S) -> bool {
        self.space.key_of(state).is_some()
    }

    pub fn start_state(&self) -> Option<&S> {
        self.start.map(|key| self.space.state(key))
    }

    pub fn terminal_state(&self) -> Option<&S> {
        self.terminal.as_ref()
    }

    pub fn current_state(&self) -> Option<&S> {
        self.current.map(|key| self.space.state(key))
    }

    /// Move the simulation back to the start state.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        let start = self
            .start
            .ok_or_else(|| not_initialized(Component::StartState))?;
        self.current = Some(start);
        Ok(())
    }

    /// Return the memoized successors of `state`, expanding it on first call.
    ///
    /// `state` and all of its successors become known. Repeated calls return
    /// the same cached sequence without applying operators again.
    pub fn state_neighbors(&mut self, state: &S) -> Result<Vec<S>, EngineError> {
        let operators = self
            .operators
            .as_deref()
            .ok_or_else(|| not_initialized(Component::Operators))?;
        let key = self.space.intern(state.clone());
        let successors = self.space.neighbors(key, operators).to_vec();
        Ok(successors
            .into_iter()
            .map(|next| self.space.state(next).clone())
            .collect())
    }

    /// Discover every state reachable from the known set. Returns how many were new.
    pub fn generate_all_states(&mut self) -> Result<usize, EngineError> {
        let operators = self
            .operators
            .as_deref()
            .ok_or_else(|| not_initialized(Component::Operators))?;
        Ok(self.space.explore(operators))
    }

    /// Take `action` from the current state and move to a sampled successor.
    pub fn take_action(&mut self, action: &A) -> Result<StepOutcome<S>, EngineError> {
        let action_id = self.action_id(action)?;
        let (next, reward) = self.step(action_id)?;
        Ok(StepOutcome {
            state: self.space.state(next).clone(),
            reward,
        })
    }

    /// Check that `T(s, a, ·)` sums to one over each known state's successors plus itself.
    ///
    /// Terminal states are skipped. Call after `generate_all_states` to cover
    /// the whole reachable set.
    pub fn validate_transitions(&self, tolerance: f64) -> Result<(), EngineError> {
        self.ensure_initialized()?;
        let (Some(actions), Some(transition)) = (self.actions.as_deref(), self.transition.as_ref())
        else {
            return Ok(());
        };

        for idx in 0..self.space.len() {
            let key = StateKey::from(idx);
            if self.is_terminal(key) {
                continue;
            }
            let state = self.space.state(key);
            let outcomes = self.outcome_set(key);
            for action in actions {
                let sum: f64 = outcomes
                    .iter()
                    .map(|&next| transition(state, action, self.space.state(next)))
                    .sum();
                if (sum - 1.0).abs() > tolerance {
                    return Err(EngineError::ProbabilitySum {
                        state: format!("{state:?}"),
                        action: format!("{action:?}"),
                        sum,
                        tolerance,
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve a registered action to its position in the action set.
    pub(crate) fn action_id(&self, action: &A) -> Result<ActionId, EngineError> {
        let actions = self
            .actions
            .as_deref()
            .ok_or_else(|| not_initialized(Component::Actions))?;
        actions
            .iter()
            .position(|candidate| candidate == action)
            .map(ActionId::from)
            .ok_or_else(|| EngineError::unknown_action(action))
    }

    pub(crate) fn is_terminal(&self, key: StateKey) -> bool {
        self.terminal
            .as_ref()
            .is_some_and(|terminal| self.space.state(key) == terminal)
    }

    pub(crate) fn require_terminal(&self) -> Result<(), EngineError> {
        if self.terminal.is_none() {
            return Err(not_initialized(Component::TerminalState));
        }
        Ok(())
    }

    /// Cached successors of `key` plus `key` itself when it is not already among them.
    pub(crate) fn outcome_set(&self, key: StateKey) -> Vec<StateKey> {
        let mut outcomes = self.space.cached(key).to_vec();
        if !outcomes.contains(&key) {
            outcomes.push(key);
        }
        outcomes
    }

    /// Sample one transition from the current state.
    ///
    /// A single uniform draw `r` in `[0, 1)` is compared with the running sum
    /// of `T(s, a, ·)` over the successor list; the first successor pushing
    /// the sum past `r` wins. If none does, the residual mass means "stay":
    /// the state is unchanged and the reward is `R(s, a, s)`.
    pub(crate) fn step(&mut self, action_id: ActionId) -> Result<(StateKey, f64), EngineError> {
        let current = self
            .current
            .ok_or_else(|| not_initialized(Component::StartState))?;
        let actions = self
            .actions
            .as_deref()
            .ok_or_else(|| not_initialized(Component::Actions))?;
        let action = actions
            .get(action_id.index())
            .ok_or(EngineError::EmptyActionSet)?;
        let operators = self
            .operators
            .as_deref()
            .ok_or_else(|| not_initialized(Component::Operators))?;
        let transition = self
            .transition
            .as_ref()
            .ok_or_else(|| not_initialized(Component::TransitionFunction))?;
        let reward = self
            .reward
            .as_ref()
            .ok_or_else(|| not_initialized(Component::RewardFunction))?;

        let successors = self.space.neighbors(current, operators).to_vec();
        let sample: f64 = self.rng.gen_range(0.0..1.0);
        let state = self.space.state(current);

        let mut threshold = 0.0;
        let mut outcome = None;
        for next in successors {
            let next_state = self.space.state(next);
            threshold += transition(state, action, next_state);
            if threshold > sample {
                outcome = Some((next, reward(state, action, next_state)));
                break;
            }
        }
        let (next, r) = outcome.unwrap_or_else(|| (current, reward(state, action, state)));

        trace!(
            "after action {action:?}, moving to state {:?}; reward is {r}",
            self.space.state(next)
        );
        self.current = Some(next);
        Ok((next, r))
    }
}

pub(crate) fn not_initialized(component: Component) -> EngineError {
    EngineError::NotInitialized { component }
}

pub(crate) fn validate_discount(discount: f64) -> Result<(), EngineError> {
    if !discount.is_finite() || !(0.0..=1.0).contains(&discount) {
        return Err(EngineError::InvalidDiscount { value: discount });
    }
    Ok(())
}
