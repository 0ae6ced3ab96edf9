use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::core::{
    clock::{Clock, SystemClock},
    contacts::{ContactDirectory, InMemoryContacts},
    services::{
        BalanceService, ExpenseService, ServiceResult, SettlementReceipt, SettlementService,
    },
    wallet::Wallet,
};
use crate::domain::{ContactBalance, ExpenseUpdate, NewExpense, Participant, SharedExpense};
use crate::errors::LedgerError;
use crate::ledger::{LedgerPolicy, SharedLedger, CURRENT_SCHEMA_VERSION};
use crate::split::{calculate_splits_checked, CustomSplit, SplitType};
use crate::storage::StorageBackend;

/// Facade that owns the ledger state and wires it to its collaborators: the clock used
/// for ids and timestamps, the contacts directory, and an optional persistence backend.
///
/// Every mutation persists the full state afterwards when storage is attached. Storage
/// failures are logged and never change the outcome of the ledger operation.
pub struct ExpenseManager {
    ledger: SharedLedger,
    policy: LedgerPolicy,
    clock: Box<dyn Clock>,
    contacts: Box<dyn ContactDirectory>,
    storage: Option<Box<dyn StorageBackend>>,
}

impl ExpenseManager {
    pub fn new(clock: Box<dyn Clock>, contacts: Box<dyn ContactDirectory>) -> Self {
        Self {
            ledger: SharedLedger::new(),
            policy: LedgerPolicy::default(),
            clock,
            contacts,
            storage: None,
        }
    }

    /// Manager on the system clock with no contacts and no storage.
    pub fn in_memory() -> Self {
        Self::new(Box::new(SystemClock), Box::new(InMemoryContacts::default()))
    }

    /// Loads ledger and contacts from `storage` and keeps it attached for write-back.
    pub fn open(
        storage: Box<dyn StorageBackend>,
        clock: Box<dyn Clock>,
        policy: LedgerPolicy,
    ) -> Result<Self, LedgerError> {
        let ledger = storage.load()?.unwrap_or_default();
        if ledger.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::validation(format!(
                "ledger schema version {} is newer than supported version {}",
                ledger.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        let contacts = InMemoryContacts::new(storage.load_contacts()?);
        info!(
            expenses = ledger.expense_count(),
            contacts = contacts.len(),
            "shared expense ledger opened"
        );
        Ok(Self {
            ledger,
            policy,
            clock,
            contacts: Box::new(contacts),
            storage: Some(storage),
        })
    }

    pub fn with_policy(mut self, policy: LedgerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ledger(mut self, ledger: SharedLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_storage(mut self, storage: Box<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    pub fn contacts(&self) -> &dyn ContactDirectory {
        self.contacts.as_ref()
    }

    pub fn expenses(&self) -> &[SharedExpense] {
        &self.ledger.expenses
    }

    pub fn expense(&self, id: &str) -> Option<&SharedExpense> {
        self.ledger.expense(id)
    }

    /// Records an expense; `None` when suppressed as a duplicate.
    pub fn add_expense(&mut self, expense: NewExpense) -> Option<String> {
        let id = ExpenseService::add(
            &mut self.ledger,
            expense,
            self.clock.as_ref(),
            &self.policy,
        );
        if id.is_some() {
            self.persist();
        }
        id
    }

    /// Validates against the contacts directory before recording the expense.
    pub fn add_expense_checked(&mut self, expense: NewExpense) -> ServiceResult<Option<String>> {
        let id = ExpenseService::add_checked(
            &mut self.ledger,
            expense,
            self.clock.as_ref(),
            &self.policy,
            self.contacts.as_ref(),
        )?;
        if id.is_some() {
            self.persist();
        }
        Ok(id)
    }

    /// Computes splits for `split_type` and records the resulting expense in one call.
    /// The payer is implied by the mode: the current user, or the first participant.
    pub fn add_split_expense(
        &mut self,
        title: &str,
        total_amount: f64,
        split_type: SplitType,
        participants: &[Participant],
        custom_splits: Option<&[CustomSplit]>,
    ) -> ServiceResult<Option<String>> {
        let paid_by = split_type.default_payer(participants);
        let splits = calculate_splits_checked(
            split_type,
            total_amount,
            participants,
            &paid_by,
            custom_splits,
        )?;
        self.add_expense_checked(NewExpense::new(title, total_amount, paid_by, splits))
    }

    pub fn settle_expense(&mut self, expense_id: &str, participant: &Participant) -> bool {
        let changed = SettlementService::settle_expense(
            &mut self.ledger,
            expense_id,
            participant,
            self.clock.as_ref(),
        );
        if changed {
            self.persist();
        }
        changed
    }

    pub fn settle_all_with_contact(&mut self, contact_id: &str) -> usize {
        let changed = SettlementService::settle_all_with_contact(
            &mut self.ledger,
            contact_id,
            self.clock.as_ref(),
        );
        if changed > 0 {
            self.persist();
        }
        changed
    }

    /// Settles the net balance with a contact, moving money through `wallet` first.
    pub fn settle_up_with_contact(
        &mut self,
        contact_id: &str,
        wallet: &mut dyn Wallet,
    ) -> ServiceResult<SettlementReceipt> {
        let receipt = SettlementService::settle_up_with_contact(
            &mut self.ledger,
            contact_id,
            wallet,
            self.contacts.as_ref(),
            self.clock.as_ref(),
            &self.policy,
        )?;
        self.persist();
        Ok(receipt)
    }

    /// Settles one expense with a contact, moving money through `wallet` first.
    pub fn settle_single_expense(
        &mut self,
        expense_id: &str,
        contact_id: &str,
        wallet: &mut dyn Wallet,
    ) -> ServiceResult<SettlementReceipt> {
        let receipt = SettlementService::settle_single_expense(
            &mut self.ledger,
            expense_id,
            contact_id,
            wallet,
            self.contacts.as_ref(),
            self.clock.as_ref(),
            &self.policy,
        )?;
        self.persist();
        Ok(receipt)
    }

    pub fn get_contact_balances(&self) -> Vec<ContactBalance> {
        BalanceService::contact_balances(&self.ledger, &self.policy)
    }

    pub fn get_contact_balance(&self, contact_id: &str) -> Option<ContactBalance> {
        BalanceService::contact_balance(&self.ledger, contact_id, &self.policy)
    }

    pub fn get_expenses_by_contact(&self, contact_id: &str) -> Vec<&SharedExpense> {
        BalanceService::expenses_by_contact(&self.ledger, contact_id)
    }

    pub fn total_owed_to_you(&self) -> f64 {
        BalanceService::total_owed_to_you(&self.ledger, &self.policy)
    }

    pub fn total_you_owe(&self) -> f64 {
        BalanceService::total_you_owe(&self.ledger, &self.policy)
    }

    pub fn delete_expense(&mut self, expense_id: &str) -> Option<SharedExpense> {
        let removed = ExpenseService::remove(&mut self.ledger, expense_id);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    pub fn update_expense(&mut self, expense_id: &str, update: ExpenseUpdate) -> bool {
        let updated = ExpenseService::update(&mut self.ledger, expense_id, update);
        if updated {
            self.persist();
        }
        updated
    }

    pub fn send_reminder(&mut self, contact_id: &str) -> DateTime<Utc> {
        let sent =
            ExpenseService::send_reminder(&mut self.ledger, contact_id, self.clock.as_ref());
        self.persist();
        sent
    }

    pub fn last_reminder_date(&self, contact_id: &str) -> Option<DateTime<Utc>> {
        ExpenseService::last_reminder_date(&self.ledger, contact_id)
    }

    fn persist(&self) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        if let Err(err) = storage.save(&self.ledger) {
            warn!(error = %err, "failed to persist shared expense ledger");
        }
    }
}
