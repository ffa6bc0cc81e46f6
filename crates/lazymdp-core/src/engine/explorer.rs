use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use crate::engine::{domain::Operator, ids::StateKey};

/// Lazily discovered state graph.
///
/// Every interned state is a known state and keys follow discovery order.
/// Successor lists are computed at most once per state and are never invalidated.
#[derive(Debug, Clone)]
pub(crate) struct StateSpace<S>
where
    S: Clone + Eq + Hash,
{
    states: Vec<S>,
    keys: HashMap<S, StateKey>,
    succ: Vec<Option<Vec<StateKey>>>,
}

impl<S> Default for StateSpace<S>
where
    S: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self {
            states: Vec::new(),
            keys: HashMap::new(),
            succ: Vec::new(),
        }
    }
}

impl<S> StateSpace<S>
where
    S: Clone + Eq + Hash,
{
    /// Register a state as known and return its key.
    pub fn intern(&mut self, state: S) -> StateKey {
        if let Some(&key) = self.keys.get(&state) {
            return key;
        }

        let key = StateKey::from(self.states.len());
        self.keys.insert(state.clone(), key);
        self.states.push(state);
        self.succ.push(None);
        key
    }

    pub fn key_of(&self, state: &S) -> Option<StateKey> {
        self.keys.get(state).copied()
    }

    /// Borrow a known state. Keys are only handed out by this space.
    pub fn state(&self, key: StateKey) -> &S {
        &self.states[key.index()]
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Return the cached successors of `key`, or an empty slice if it was never expanded.
    pub fn cached(&self, key: StateKey) -> &[StateKey] {
        self.succ
            .get(key.index())
            .and_then(|succ| succ.as_deref())
            .unwrap_or(&[])
    }

    /// Return the memoized successors of `key`, expanding it on first use.
    ///
    /// Expansion applies every operator whose precondition holds, keeps the
    /// first occurrence of each resulting state, and registers new states as known.
    pub fn neighbors(&mut self, key: StateKey, operators: &[Operator<S>]) -> &[StateKey] {
        if self.succ[key.index()].is_none() {
            let state = self.state(key).clone();
            let mut successors = Vec::new();
            for op in operators.iter().filter(|op| op.is_applicable(&state)) {
                let next = self.intern(op.apply(&state));
                if !successors.contains(&next) {
                    successors.push(next);
                }
            }
            self.succ[key.index()] = Some(successors);
        }

        self.cached(key)
    }

    /// Close the known set under `neighbors`.
    ///
    /// The frontier holds states awaiting expansion; `seen` holds everything
    /// ever queued, so a state reachable along several paths is expanded once.
    /// Returns how many states were newly discovered.
    pub fn explore(&mut self, operators: &[Operator<S>]) -> usize {
        let before = self.len();
        let mut frontier: VecDeque<StateKey> = (0..before).map(StateKey::from).collect();
        let mut seen: HashSet<StateKey> = frontier.iter().copied().collect();

        while let Some(key) = frontier.pop_front() {
            let successors = self.neighbors(key, operators).to_vec();
            for next in successors {
                if seen.insert(next) {
                    frontier.push_back(next);
                }
            }
        }

        self.len() - before
    }
}
