use serde::Serialize;

/// Running-average action value and how often it has been updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QEntry {
    value: f64,
    visits: u64,
}

impl QEntry {
    /// Retrieve the current action-value estimate.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Retrieve how many updates this entry has received.
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Count one more visit and fold `target` into the running average.
    /// The count is bumped first, so the divisor is never zero.
    pub fn record(&mut self, target: f64) {
        self.visits += 1;
        let weight = 1.0 / self.visits as f64;
        self.value = (1.0 - weight) * self.value + weight * target;
    }

    pub fn is_unvisited(&self) -> bool {
        self.visits == 0
    }
}

/// Index of the first maximal value. Earlier entries win ties.
pub(crate) fn first_argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        best = match best {
            Some((best_idx, best_value)) if best_value >= value || value.is_nan() => {
                Some((best_idx, best_value))
            }
            _ => Some((idx, value)),
        };
    }
    best.map(|(idx, _)| idx)
}
