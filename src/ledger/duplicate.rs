use crate::domain::{ExpenseSplit, SharedExpense};

use super::policy::LedgerPolicy;

/// Heuristic double-submission check.
///
/// `candidate` duplicates `existing` when title, total and payer are equal, the two were
/// created within the policy's window, and their splits cover the same participants with
/// amounts and percentages equal within the policy's tolerance. Splits are compared after
/// sorting by participant id.
pub fn is_duplicate(
    existing: &SharedExpense,
    candidate: &SharedExpense,
    policy: &LedgerPolicy,
) -> bool {
    let basic_match = existing.title == candidate.title
        && existing.total_amount == candidate.total_amount
        && existing.paid_by == candidate.paid_by
        && (existing.created_at - candidate.created_at).abs() < policy.duplicate_window;
    if !basic_match || existing.splits.len() != candidate.splits.len() {
        return false;
    }

    let left = sorted_splits(&existing.splits);
    let right = sorted_splits(&candidate.splits);
    left.iter().zip(right.iter()).all(|(a, b)| {
        a.contact_id == b.contact_id
            && (a.amount - b.amount).abs() < policy.match_tolerance
            && (a.percentage - b.percentage).abs() < policy.match_tolerance
    })
}

fn sorted_splits(splits: &[ExpenseSplit]) -> Vec<&ExpenseSplit> {
    let mut sorted: Vec<&ExpenseSplit> = splits.iter().collect();
    sorted.sort_by(|a, b| a.contact_id.as_str().cmp(b.contact_id.as_str()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewExpense, Participant};
    use chrono::{Duration, TimeZone, Utc};

    fn expense_at(seconds: i64, splits: Vec<ExpenseSplit>) -> SharedExpense {
        let created =
            Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap() + Duration::seconds(seconds);
        SharedExpense::from_new(
            NewExpense::new("Pizza", 40.0, Participant::CurrentUser, splits),
            format!("expense-{seconds}"),
            created,
        )
    }

    fn splits(order: &[&str]) -> Vec<ExpenseSplit> {
        order
            .iter()
            .map(|id| ExpenseSplit::new(Participant::contact(*id), 20.0, 50.0))
            .collect()
    }

    #[test]
    fn split_order_does_not_matter() {
        let policy = LedgerPolicy::default();
        let first = expense_at(0, splits(&["a", "b"]));
        let second = expense_at(2, splits(&["b", "a"]));
        assert!(is_duplicate(&first, &second, &policy));
    }

    #[test]
    fn outside_window_is_not_duplicate() {
        let policy = LedgerPolicy::default();
        let first = expense_at(0, splits(&["a", "b"]));
        let second = expense_at(5, splits(&["a", "b"]));
        assert!(!is_duplicate(&first, &second, &policy));
    }

    #[test]
    fn amounts_beyond_tolerance_differ() {
        let policy = LedgerPolicy::default();
        let first = expense_at(0, splits(&["a"]));
        let mut other = splits(&["a"]);
        other[0].amount += 0.02;
        let second = expense_at(1, other);
        assert!(!is_duplicate(&first, &second, &policy));

        let mut close = splits(&["a"]);
        close[0].amount += 0.005;
        let third = expense_at(1, close);
        assert!(is_duplicate(&first, &third, &policy));
    }

    #[test]
    fn different_participants_differ() {
        let policy = LedgerPolicy::default();
        let first = expense_at(0, splits(&["a", "b"]));
        let second = expense_at(1, splits(&["a", "c"]));
        assert!(!is_duplicate(&first, &second, &policy));
    }
}
