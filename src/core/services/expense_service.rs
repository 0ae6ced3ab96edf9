//! Business logic helpers for recording and editing shared expenses.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{clock::Clock, contacts::ContactDirectory};
use crate::domain::{ExpenseUpdate, NewExpense, SharedExpense};
use crate::errors::LedgerError;
use crate::ledger::{is_duplicate, LedgerPolicy, SharedLedger};

use super::ServiceResult;

/// Builds a `expense-<millis>-<random>` identifier. Unique enough for a single user's
/// ledger; not a cryptographic guarantee.
pub fn generate_expense_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("expense-{}-{}", now.timestamp_millis(), &random[..9])
}

/// Provides add, update, and delete helpers for ledger expenses.
pub struct ExpenseService;

impl ExpenseService {
    /// Records a new expense at the front of the ledger.
    ///
    /// Returns `None` without touching the ledger when the expense duplicates one added
    /// within the policy's window.
    pub fn add(
        ledger: &mut SharedLedger,
        expense: NewExpense,
        clock: &dyn Clock,
        policy: &LedgerPolicy,
    ) -> Option<String> {
        let now = clock.now();
        let candidate = SharedExpense::from_new(expense, generate_expense_id(now), now);

        if let Some(existing) = ledger
            .expenses
            .iter()
            .find(|existing| is_duplicate(existing, &candidate, policy))
        {
            warn!(
                title = %candidate.title,
                existing = %existing.id,
                "duplicate expense detected, not adding"
            );
            return None;
        }

        info!(
            id = %candidate.id,
            title = %candidate.title,
            total = candidate.total_amount,
            payer = %candidate.paid_by,
            splits = candidate.splits.len(),
            "expense added"
        );
        Some(ledger.prepend_expense(candidate))
    }

    /// Validates the expense against the contact directory before adding it.
    pub fn add_checked(
        ledger: &mut SharedLedger,
        expense: NewExpense,
        clock: &dyn Clock,
        policy: &LedgerPolicy,
        contacts: &dyn ContactDirectory,
    ) -> ServiceResult<Option<String>> {
        Self::validate(&expense, policy, contacts)?;
        Ok(Self::add(ledger, expense, clock, policy))
    }

    /// Checks the invariants the lenient `add` takes on trust.
    pub fn validate(
        expense: &NewExpense,
        policy: &LedgerPolicy,
        contacts: &dyn ContactDirectory,
    ) -> ServiceResult<()> {
        if expense.title.trim().is_empty() {
            return Err(LedgerError::validation("expense title must not be empty").into());
        }
        if !expense.total_amount.is_finite() || expense.total_amount <= 0.0 {
            return Err(LedgerError::validation(format!(
                "total amount must be a positive number, got {}",
                expense.total_amount
            ))
            .into());
        }
        if expense.splits.is_empty() {
            return Err(LedgerError::validation("expense needs at least one split").into());
        }
        if let Some(payer) = expense.paid_by.contact_id() {
            if !contacts.contains(payer) {
                return Err(LedgerError::ContactNotFound(payer.to_string()).into());
            }
        }

        let mut seen = HashSet::new();
        let mut split_total = 0.0;
        for split in &expense.splits {
            if !seen.insert(split.contact_id.as_str()) {
                return Err(LedgerError::validation(format!(
                    "`{}` appears in more than one split",
                    split.contact_id
                ))
                .into());
            }
            if split.contact_id == expense.paid_by {
                return Err(LedgerError::validation(format!(
                    "payer `{}` cannot owe themselves",
                    expense.paid_by
                ))
                .into());
            }
            if !split.amount.is_finite() || split.amount < 0.0 {
                return Err(LedgerError::validation(format!(
                    "split amount for `{}` must not be negative",
                    split.contact_id
                ))
                .into());
            }
            if !(0.0..=100.0).contains(&split.percentage) {
                return Err(LedgerError::validation(format!(
                    "split percentage for `{}` must be between 0 and 100",
                    split.contact_id
                ))
                .into());
            }
            if let Some(contact_id) = split.contact_id.contact_id() {
                if !contacts.contains(contact_id) {
                    return Err(LedgerError::ContactNotFound(contact_id.to_string()).into());
                }
            }
            split_total += split.amount;
        }
        if split_total > expense.total_amount + policy.match_tolerance {
            return Err(LedgerError::validation(format!(
                "splits add up to {split_total:.2}, more than the total {:.2}",
                expense.total_amount
            ))
            .into());
        }
        Ok(())
    }

    /// Applies a partial update. Returns `false` when the id is unknown.
    pub fn update(ledger: &mut SharedLedger, id: &str, update: ExpenseUpdate) -> bool {
        match ledger.expense_mut(id) {
            Some(expense) => {
                expense.apply(update);
                info!(id, "expense updated");
                true
            }
            None => {
                debug!(id, "update ignored for unknown expense");
                false
            }
        }
    }

    /// Removes the expense, returning it when it existed.
    pub fn remove(ledger: &mut SharedLedger, id: &str) -> Option<SharedExpense> {
        let removed = ledger.remove_expense(id);
        if removed.is_some() {
            info!(id, "expense deleted");
        }
        removed
    }

    /// Records a payment reminder for `contact_id` and returns its timestamp.
    pub fn send_reminder(
        ledger: &mut SharedLedger,
        contact_id: &str,
        clock: &dyn Clock,
    ) -> DateTime<Utc> {
        let now = clock.now();
        ledger.record_reminder(contact_id, now);
        info!(contact = contact_id, "reminder recorded");
        now
    }

    pub fn last_reminder_date(ledger: &SharedLedger, contact_id: &str) -> Option<DateTime<Utc>> {
        ledger.last_reminder(contact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, InMemoryContacts};
    use crate::domain::{Contact, ExpenseSplit, Participant};
    use chrono::{Duration, TimeZone};

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 7, 4, 19, 30, 0).unwrap())
    }

    fn dinner() -> NewExpense {
        NewExpense::new(
            "Dinner",
            100.0,
            Participant::CurrentUser,
            vec![ExpenseSplit::new(Participant::contact("alice"), 50.0, 50.0)],
        )
    }

    fn contacts() -> InMemoryContacts {
        InMemoryContacts::new(vec![Contact::new("alice", "Alice")])
    }

    #[test]
    fn add_assigns_identity_and_timestamp() {
        let clock = clock();
        let mut ledger = SharedLedger::new();
        let id = ExpenseService::add(&mut ledger, dinner(), &clock, &LedgerPolicy::default())
            .expect("added");
        let stored = ledger.expense(&id).unwrap();
        assert!(stored.id.starts_with("expense-"));
        assert_eq!(stored.created_at, clock.now());
        assert!(!stored.is_settled);
    }

    #[test]
    fn duplicate_within_window_is_dropped() {
        let clock = clock();
        let policy = LedgerPolicy::default();
        let mut ledger = SharedLedger::new();
        assert!(ExpenseService::add(&mut ledger, dinner(), &clock, &policy).is_some());
        clock.advance(Duration::seconds(3));
        assert!(ExpenseService::add(&mut ledger, dinner(), &clock, &policy).is_none());
        assert_eq!(ledger.expense_count(), 1);

        clock.advance(Duration::seconds(10));
        assert!(ExpenseService::add(&mut ledger, dinner(), &clock, &policy).is_some());
        assert_eq!(ledger.expense_count(), 2);
    }

    #[test]
    fn checked_add_rejects_unknown_contact() {
        let mut ledger = SharedLedger::new();
        let mut expense = dinner();
        expense.splits[0].contact_id = Participant::contact("mallory");
        let err = ExpenseService::add_checked(
            &mut ledger,
            expense,
            &clock(),
            &LedgerPolicy::default(),
            &contacts(),
        )
        .unwrap_err();
        assert!(!err.is_validation());
        assert!(err.to_string().contains("mallory"));
        assert_eq!(ledger.expense_count(), 0);
    }

    #[test]
    fn checked_add_rejects_oversized_splits() {
        let mut expense = dinner();
        expense.splits[0].amount = 150.0;
        let err = ExpenseService::validate(&expense, &LedgerPolicy::default(), &contacts())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn checked_add_rejects_self_owed_payer() {
        let mut expense = dinner();
        expense
            .splits
            .push(ExpenseSplit::new(Participant::CurrentUser, 10.0, 10.0));
        let err = ExpenseService::validate(&expense, &LedgerPolicy::default(), &contacts())
            .unwrap_err();
        assert!(err.to_string().contains("cannot owe themselves"));
    }

    #[test]
    fn update_and_remove_ignore_unknown_ids() {
        let mut ledger = SharedLedger::new();
        assert!(!ExpenseService::update(&mut ledger, "nope", ExpenseUpdate::default()));
        assert!(ExpenseService::remove(&mut ledger, "nope").is_none());
    }

    #[test]
    fn reminders_track_latest_time() {
        let clock = clock();
        let mut ledger = SharedLedger::new();
        assert!(ExpenseService::last_reminder_date(&ledger, "alice").is_none());
        let sent = ExpenseService::send_reminder(&mut ledger, "alice", &clock);
        assert_eq!(ExpenseService::last_reminder_date(&ledger, "alice"), Some(sent));
    }
}
