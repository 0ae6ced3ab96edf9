//! Settlement: flipping split flags, optionally paired with the matching money movement.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::{clock::Clock, contacts::ContactDirectory, wallet::Wallet};
use crate::domain::{BalanceDirection, Participant};
use crate::errors::LedgerError;
use crate::ledger::{LedgerPolicy, SharedLedger};

use super::{BalanceService, ServiceError, ServiceResult};

/// Outcome of a settlement that moved money.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub contact_id: String,
    pub contact_name: String,
    pub amount: f64,
    pub direction: BalanceDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_title: Option<String>,
}

pub struct SettlementService;

impl SettlementService {
    /// Marks every split owned by `participant` in `expense_id` as settled and re-derives
    /// the expense flag. Unknown expenses or participants are a silent no-op; the return
    /// value reports whether any split changed.
    pub fn settle_expense(
        ledger: &mut SharedLedger,
        expense_id: &str,
        participant: &Participant,
        clock: &dyn Clock,
    ) -> bool {
        let Some(expense) = ledger.expense_mut(expense_id) else {
            debug!(expense = expense_id, "settle ignored for unknown expense");
            return false;
        };
        let now = clock.now();
        let mut matched = 0;
        let mut changed = 0;
        for split in expense
            .splits
            .iter_mut()
            .filter(|split| &split.contact_id == participant)
        {
            matched += 1;
            if split.settle(now) {
                changed += 1;
            }
        }
        if matched == 0 {
            debug!(
                expense = expense_id,
                participant = %participant,
                "settle ignored, no matching split"
            );
            return false;
        }
        expense.refresh_settled();
        if changed > 0 {
            info!(
                expense = expense_id,
                participant = %participant,
                splits = changed,
                fully_settled = expense.is_settled,
                "split settled"
            );
        }
        changed > 0
    }

    /// Settles every split linking the current user and `contact_id`, in both directions:
    /// the contact's own splits and the current user's splits on expenses the contact
    /// paid. Returns the number of splits that changed.
    pub fn settle_all_with_contact(
        ledger: &mut SharedLedger,
        contact_id: &str,
        clock: &dyn Clock,
    ) -> usize {
        let now = clock.now();
        let mut changed = 0;
        for expense in ledger.expenses.iter_mut() {
            let contact_paid = expense.paid_by.is_contact(contact_id);
            let mut touched = false;
            for split in expense.splits.iter_mut() {
                let linked = split.contact_id.is_contact(contact_id)
                    || (split.contact_id.is_current_user() && contact_paid);
                if linked {
                    touched = true;
                    if split.settle(now) {
                        changed += 1;
                    }
                }
            }
            if touched {
                expense.refresh_settled();
            }
        }
        info!(contact = contact_id, splits = changed, "settled all with contact");
        changed
    }

    /// Settles the whole net balance with a contact and moves the money in one step.
    ///
    /// The wallet is credited when the contact owes the current user and debited via
    /// `send_money` otherwise. Flags are only flipped after the wallet call succeeds, so a
    /// failed transfer leaves the ledger untouched. Offsetting debts that net to zero are
    /// settled without a transfer.
    pub fn settle_up_with_contact(
        ledger: &mut SharedLedger,
        contact_id: &str,
        wallet: &mut dyn Wallet,
        contacts: &dyn ContactDirectory,
        clock: &dyn Clock,
        policy: &LedgerPolicy,
    ) -> ServiceResult<SettlementReceipt> {
        let balance = BalanceService::contact_balance(ledger, contact_id, policy)
            .ok_or_else(|| LedgerError::NothingToSettle(contact_id.to_string()))?;
        let direction = balance.direction(policy.balance_epsilon);
        let amount = balance.net_balance.abs();
        let contact_name = contacts.display_name(contact_id);

        match direction {
            BalanceDirection::OwedToYou => wallet.update_balance(amount)?,
            BalanceDirection::YouOwe => {
                ensure_funds(wallet, amount)?;
                wallet.send_money(&contact_name, amount, Some("Settling shared expenses"))?;
            }
            BalanceDirection::Even => {
                if !balance.has_unsettled_expenses() {
                    return Err(LedgerError::NothingToSettle(contact_id.to_string()).into());
                }
            }
        }

        Self::settle_all_with_contact(ledger, contact_id, clock);
        let amount = if direction == BalanceDirection::Even {
            0.0
        } else {
            amount
        };
        Ok(SettlementReceipt {
            contact_id: contact_id.to_string(),
            contact_name,
            amount,
            direction,
            expense_id: None,
            expense_title: None,
        })
    }

    /// Settles the single split tying `contact_id` to the current user in one expense and
    /// moves its amount: the contact's split when the current user paid, the current
    /// user's split when the contact paid.
    pub fn settle_single_expense(
        ledger: &mut SharedLedger,
        expense_id: &str,
        contact_id: &str,
        wallet: &mut dyn Wallet,
        contacts: &dyn ContactDirectory,
        clock: &dyn Clock,
        policy: &LedgerPolicy,
    ) -> ServiceResult<SettlementReceipt> {
        let expense = ledger
            .expense(expense_id)
            .ok_or_else(|| LedgerError::ExpenseNotFound(expense_id.to_string()))?;

        let (target, direction) = if expense.paid_by_current_user() {
            (Participant::contact(contact_id), BalanceDirection::OwedToYou)
        } else if expense.paid_by.is_contact(contact_id) {
            (Participant::CurrentUser, BalanceDirection::YouOwe)
        } else {
            return Err(ServiceError::Invalid(format!(
                "expense {expense_id} is not shared with {contact_id}"
            )));
        };

        let split = expense
            .split_for(&target)
            .ok_or_else(|| LedgerError::SplitNotFound {
                expense: expense_id.to_string(),
                participant: target.to_string(),
            })?;
        if split.is_settled || split.amount <= policy.balance_epsilon {
            return Err(LedgerError::NothingToSettle(contact_id.to_string()).into());
        }
        let amount = split.amount;
        let title = expense.title.clone();
        let contact_name = contacts.display_name(contact_id);

        match direction {
            BalanceDirection::YouOwe => {
                ensure_funds(wallet, amount)?;
                let description = format!("Settling: {title}");
                wallet.send_money(&contact_name, amount, Some(&description))?;
            }
            _ => wallet.update_balance(amount)?,
        }

        Self::settle_expense(ledger, expense_id, &target, clock);
        Ok(SettlementReceipt {
            contact_id: contact_id.to_string(),
            contact_name,
            amount,
            direction,
            expense_id: Some(expense_id.to_string()),
            expense_title: Some(title),
        })
    }
}

fn ensure_funds(wallet: &dyn Wallet, amount: f64) -> Result<(), LedgerError> {
    let available = wallet.balance();
    if available < amount {
        return Err(LedgerError::InsufficientFunds {
            needed: amount,
            available,
        });
    }
    Ok(())
}
