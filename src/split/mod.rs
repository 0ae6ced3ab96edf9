//! Split calculation: maps a split mode, amount and participant list to per-participant
//! obligations.

pub mod calculator;
pub mod mode;

pub use calculator::{calculate_splits, calculate_splits_checked, default_custom_percentages};
pub use mode::{CustomSplit, SplitType};
