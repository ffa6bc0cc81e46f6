use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use crate::engine::{error::EngineError, stats::QEntry};

/// Read-only copy of the state-value table `V`.
#[derive(Debug, Clone, Serialize)]
pub struct ValueTable<S>
where
    S: Clone + Eq + Hash,
{
    rows: Vec<ValueRow<S>>,
    #[serde(skip)]
    index: HashMap<S, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueRow<S> {
    pub state: S,
    pub value: f64,
}

impl<S> ValueTable<S>
where
    S: Clone + Eq + Hash + Debug,
{
    pub(crate) fn new(rows: Vec<ValueRow<S>>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.state.clone(), idx))
            .collect();
        Self { rows, index }
    }

    /// Look up `V(state)`.
    pub fn get(&self, state: &S) -> Result<f64, EngineError> {
        self.index
            .get(state)
            .map(|&idx| self.rows[idx].value)
            .ok_or_else(|| EngineError::unknown_state(state))
    }

    pub fn rows(&self) -> &[ValueRow<S>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> {
        self.rows.iter().map(|row| (&row.state, row.value))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read-only copy of the action-value table `Q`, with visit counts.
///
/// Rows are grouped by state; within a state they follow the action order.
#[derive(Debug, Clone, Serialize)]
pub struct QTable<S, A>
where
    S: Clone + Eq + Hash,
{
    rows: Vec<QRow<S, A>>,
    #[serde(skip)]
    actions: Vec<A>,
    /// First row and row count per state.
    #[serde(skip)]
    index: HashMap<S, (usize, usize)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QRow<S, A> {
    pub state: S,
    pub action: A,
    pub value: f64,
    pub visits: u64,
}

impl<S, A> QTable<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Debug,
{
    pub(crate) fn new(states: &[S], actions: &[A], entries: &[Vec<QEntry>]) -> Self {
        let mut rows = Vec::with_capacity(entries.len() * actions.len());
        let mut index = HashMap::with_capacity(entries.len());

        for (state, row) in states.iter().zip(entries) {
            let start = rows.len();
            for (action, entry) in actions.iter().zip(row) {
                rows.push(QRow {
                    state: state.clone(),
                    action: action.clone(),
                    value: entry.value(),
                    visits: entry.visits(),
                });
            }
            index.insert(state.clone(), (start, rows.len() - start));
        }

        Self {
            rows,
            actions: actions.to_vec(),
            index,
        }
    }

    /// All rows for `state`, one per action in action order.
    pub fn entries(&self, state: &S) -> Result<&[QRow<S, A>], EngineError> {
        let &(start, len) = self
            .index
            .get(state)
            .ok_or_else(|| EngineError::unknown_state(state))?;
        Ok(&self.rows[start..start + len])
    }

    /// Look up the row for `(state, action)`.
    pub fn get(&self, state: &S, action: &A) -> Result<&QRow<S, A>, EngineError> {
        let position = self
            .actions
            .iter()
            .position(|candidate| candidate == action)
            .ok_or_else(|| EngineError::unknown_action(action))?;
        self.entries(state)?
            .get(position)
            .ok_or_else(|| EngineError::unknown_action(action))
    }

    /// Largest action value at `state`.
    pub fn max_value(&self, state: &S) -> Result<f64, EngineError> {
        Ok(self
            .entries(state)?
            .iter()
            .map(|row| row.value)
            .fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn rows(&self) -> &[QRow<S, A>] {
        &self.rows
    }

    /// Number of states covered.
    pub fn state_count(&self) -> usize {
        self.index.len()
    }
}

/// Deterministic greedy policy: one action per known state.
#[derive(Debug, Clone, Serialize)]
pub struct Policy<S, A>
where
    S: Clone + Eq + Hash,
{
    rows: Vec<PolicyRow<S, A>>,
    #[serde(skip)]
    index: HashMap<S, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyRow<S, A> {
    pub state: S,
    pub action: A,
}

impl<S, A> Policy<S, A>
where
    S: Clone + Eq + Hash + Debug,
{
    pub(crate) fn new(rows: Vec<PolicyRow<S, A>>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.state.clone(), idx))
            .collect();
        Self { rows, index }
    }

    /// Action the policy picks at `state`.
    pub fn get(&self, state: &S) -> Result<&A, EngineError> {
        self.index
            .get(state)
            .map(|&idx| &self.rows[idx].action)
            .ok_or_else(|| EngineError::unknown_state(state))
    }

    pub fn rows(&self) -> &[PolicyRow<S, A>] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &A)> {
        self.rows.iter().map(|row| (&row.state, &row.action))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S> ValueTable<S>
where
    S: Clone + Eq + Hash + Serialize,
{
    /// Serialize the rows as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<S, A> QTable<S, A>
where
    S: Clone + Eq + Hash + Serialize,
    A: Serialize,
{
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<S, A> Policy<S, A>
where
    S: Clone + Eq + Hash + Serialize,
    A: Serialize,
{
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
