//! Aggregation of per-contact balances from the expense list.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{ContactBalance, Participant, SharedExpense};
use crate::ledger::{LedgerPolicy, SharedLedger};

/// Derives balance views. Nothing here is cached: every call rescans the ledger.
pub struct BalanceService;

impl BalanceService {
    /// Net position with every counterparty that still matters.
    ///
    /// When the current user paid, each unsettled contact split adds to what that contact
    /// owes. When a contact paid, the current user's unsettled split adds to what is owed
    /// to the payer. Contacts whose net is within the policy epsilon and whose own splits
    /// with the current user are all settled are dropped. Order follows first appearance in the ledger.
    pub fn contact_balances(ledger: &SharedLedger, policy: &LedgerPolicy) -> Vec<ContactBalance> {
        let mut balances: Vec<ContactBalance> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for expense in &ledger.expenses {
            if expense.paid_by_current_user() {
                for split in &expense.splits {
                    let Some(contact_id) = split.contact_id.contact_id() else {
                        continue;
                    };
                    let balance = balance_entry(&mut balances, &mut index, contact_id);
                    balance.record_expense(expense);
                    balance.total_owed_to_you += split.outstanding();
                }
            } else if let Some(split) = expense.split_for(&Participant::CurrentUser) {
                let balance = balance_entry(&mut balances, &mut index, expense.paid_by.as_str());
                balance.record_expense(expense);
                balance.total_owed += split.outstanding();
            }
        }

        let tracked = balances.len();
        let result: Vec<ContactBalance> = balances
            .into_iter()
            .map(|mut balance| {
                balance.net_balance = balance.total_owed_to_you - balance.total_owed;
                balance
            })
            .filter(|balance| {
                balance.net_balance.abs() > policy.balance_epsilon
                    || balance.has_unsettled_expenses()
            })
            .collect();
        debug!(
            expenses = ledger.expense_count(),
            tracked,
            visible = result.len(),
            "contact balances recomputed"
        );
        result
    }

    /// Balance for one contact, or `None` when it is filtered out or never existed.
    pub fn contact_balance(
        ledger: &SharedLedger,
        contact_id: &str,
        policy: &LedgerPolicy,
    ) -> Option<ContactBalance> {
        Self::contact_balances(ledger, policy)
            .into_iter()
            .find(|balance| balance.contact_id == contact_id)
    }

    /// Expenses that tie the current user to `contact_id`, most recent first, each once.
    pub fn expenses_by_contact<'a>(
        ledger: &'a SharedLedger,
        contact_id: &str,
    ) -> Vec<&'a SharedExpense> {
        let mut seen: HashSet<&str> = HashSet::new();
        ledger
            .expenses
            .iter()
            .filter(|expense| expense.involves_contact(contact_id))
            .filter(|expense| seen.insert(expense.id.as_str()))
            .collect()
    }

    /// Sum of positive net balances: what others owe the current user.
    pub fn total_owed_to_you(ledger: &SharedLedger, policy: &LedgerPolicy) -> f64 {
        Self::contact_balances(ledger, policy)
            .iter()
            .filter(|balance| balance.net_balance > 0.0)
            .map(|balance| balance.net_balance)
            .sum()
    }

    /// Sum of negative net balances as a positive number: what the current user owes.
    pub fn total_you_owe(ledger: &SharedLedger, policy: &LedgerPolicy) -> f64 {
        Self::contact_balances(ledger, policy)
            .iter()
            .filter(|balance| balance.net_balance < 0.0)
            .map(|balance| -balance.net_balance)
            .sum()
    }
}

fn balance_entry<'a>(
    balances: &'a mut Vec<ContactBalance>,
    index: &mut HashMap<String, usize>,
    contact_id: &str,
) -> &'a mut ContactBalance {
    let position = *index.entry(contact_id.to_string()).or_insert_with(|| {
        balances.push(ContactBalance::new(contact_id));
        balances.len() - 1
    });
    &mut balances[position]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseSplit, NewExpense};
    use chrono::{Duration, TimeZone, Utc};

    fn push(
        ledger: &mut SharedLedger,
        id: &str,
        paid_by: Participant,
        splits: Vec<ExpenseSplit>,
    ) {
        let created = Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap()
            + Duration::minutes(ledger.expense_count() as i64);
        let total = splits.iter().map(|split| split.amount).sum::<f64>() * 2.0;
        ledger.prepend_expense(SharedExpense::from_new(
            NewExpense::new(id, total, paid_by, splits),
            id.into(),
            created,
        ));
    }

    fn split(id: Participant, amount: f64) -> ExpenseSplit {
        ExpenseSplit::new(id, amount, 50.0)
    }

    #[test]
    fn nets_both_directions_per_contact() {
        let mut ledger = SharedLedger::new();
        push(
            &mut ledger,
            "lunch",
            Participant::CurrentUser,
            vec![split(Participant::contact("alice"), 40.0)],
        );
        push(
            &mut ledger,
            "taxi",
            Participant::contact("alice"),
            vec![split(Participant::CurrentUser, 15.0)],
        );

        let balances = BalanceService::contact_balances(&ledger, &LedgerPolicy::default());
        assert_eq!(balances.len(), 1);
        let alice = &balances[0];
        assert_eq!(alice.total_owed_to_you, 40.0);
        assert_eq!(alice.total_owed, 15.0);
        assert_eq!(alice.net_balance, 25.0);
        assert_eq!(alice.expenses.len(), 2);
    }

    #[test]
    fn expenses_paid_by_other_contacts_without_user_split_are_ignored() {
        let mut ledger = SharedLedger::new();
        push(
            &mut ledger,
            "their trip",
            Participant::contact("bob"),
            vec![split(Participant::contact("carol"), 30.0)],
        );
        assert!(BalanceService::contact_balances(&ledger, &LedgerPolicy::default()).is_empty());
        assert!(BalanceService::expenses_by_contact(&ledger, "bob").is_empty());
    }

    #[test]
    fn settled_zero_balances_are_filtered() {
        let mut ledger = SharedLedger::new();
        let mut settled = split(Participant::contact("alice"), 40.0);
        settled.is_settled = true;
        push(&mut ledger, "old", Participant::CurrentUser, vec![settled]);
        let policy = LedgerPolicy::default();
        assert!(BalanceService::contact_balance(&ledger, "alice", &policy).is_none());
        assert_eq!(BalanceService::expenses_by_contact(&ledger, "alice").len(), 1);
    }

    #[test]
    fn offsetting_unsettled_debts_remain_visible() {
        let mut ledger = SharedLedger::new();
        push(
            &mut ledger,
            "a",
            Participant::CurrentUser,
            vec![split(Participant::contact("alice"), 20.0)],
        );
        push(
            &mut ledger,
            "b",
            Participant::contact("alice"),
            vec![split(Participant::CurrentUser, 20.0)],
        );
        let balance =
            BalanceService::contact_balance(&ledger, "alice", &LedgerPolicy::default()).unwrap();
        assert!(balance.net_balance.abs() < 1e-9);
    }

    #[test]
    fn totals_split_by_sign() {
        let mut ledger = SharedLedger::new();
        push(
            &mut ledger,
            "a",
            Participant::CurrentUser,
            vec![split(Participant::contact("alice"), 20.0)],
        );
        push(
            &mut ledger,
            "b",
            Participant::contact("bob"),
            vec![split(Participant::CurrentUser, 12.5)],
        );
        let policy = LedgerPolicy::default();
        assert_eq!(BalanceService::total_owed_to_you(&ledger, &policy), 20.0);
        assert_eq!(BalanceService::total_you_owe(&ledger, &policy), 12.5);
    }
}
