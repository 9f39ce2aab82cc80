/// Remembers the last observed alert total for one live stream.
///
/// The first observation only sets the baseline. Afterwards an alert is
/// raised when the total is strictly greater than the previous one.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlertTracker {
    last_total: Option<i64>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_total(&self) -> Option<i64> {
        self.last_total
    }

    /// Record a new total; returns the previous total when it increased
    pub fn observe(&mut self, total: i64) -> Option<i64> {
        let previous = self.last_total.replace(total);
        match previous {
            Some(prev) if total > prev => Some(prev),
            _ => None,
        }
    }
}
