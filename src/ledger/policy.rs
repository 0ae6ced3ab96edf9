use chrono::Duration;

/// Thresholds used by duplicate detection and balance filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerPolicy {
    /// Two adds closer than this window are candidates for duplicate suppression.
    pub duplicate_window: Duration,
    /// Tolerance when comparing split amounts and percentages of candidate duplicates.
    pub match_tolerance: f64,
    /// Net balances within this epsilon of zero count as settled up.
    pub balance_epsilon: f64,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            duplicate_window: Duration::seconds(5),
            match_tolerance: 0.01,
            balance_epsilon: 0.01,
        }
    }
}
