/// Dense index of a discovered state, assigned in discovery order.
/// Keys are never reused: the set of known states only grows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    /// Allow for explicit conversion from usize to StateKey.
    fn from(value: usize) -> Self {
        StateKey(value)
    }
}

/// Position of an action in the registered action list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

impl ActionId {
    /// Get the position of the action without exposing the internal value
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    fn from(value: usize) -> Self {
        ActionId(value)
    }
}
