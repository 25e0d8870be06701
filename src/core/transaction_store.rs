//! Authoritative in-memory transaction list, persisted after every mutation.

use chrono::{DateTime, Utc};
use once_cell::unsync::OnceCell;
use serde_json::Value;
use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;

use crate::core::demo;
use crate::core::notifications::Notifier;
use crate::core::services::summary_service::PeriodTotals;
use crate::errors::{BudgetError, Result};
use crate::ledger::{NewTransaction, Transaction, TransactionPatch};
use crate::storage::{save_item, KeyValueStore};

pub const TRANSACTIONS_KEY: &str = "budget_transactions";

pub struct TransactionStore {
    transactions: Vec<Transaction>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    revision: u64,
    totals: OnceCell<PeriodTotals>,
}

impl std::fmt::Debug for TransactionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionStore")
            .field("transactions", &self.transactions.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl TransactionStore {
    /// Loads the persisted list, seeding demo data when nothing usable is stored.
    pub fn open(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::open_with_clock(storage, notifier, Utc::now())
    }

    pub fn open_with_clock(
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        today: DateTime<Utc>,
    ) -> Self {
        let stored = match storage.get(TRANSACTIONS_KEY) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored transactions");
                None
            }
        };
        let mut store = Self {
            transactions: Vec::new(),
            storage,
            notifier,
            revision: 0,
            totals: OnceCell::new(),
        };
        match stored {
            Some(Value::Array(records)) if !records.is_empty() => {
                let total = records.len();
                store.transactions = decode_records(records);
                let dropped = total - store.transactions.len();
                tracing::info!(count = store.transactions.len(), dropped, "loaded transactions");
                if dropped > 0 {
                    store.notifier.warning(&format!(
                        "{dropped} stored transaction(s) were unreadable and skipped"
                    ));
                }
            }
            _ => {
                tracing::info!("no stored transactions, seeding demo data");
                store.generate_demo_at(today);
            }
        }
        store
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Incremented on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Display order: newest date first, insertion order among equal dates.
    pub fn sorted_by_date(&self) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        let mut sorted = self.sorted_by_date();
        sorted.truncate(limit);
        sorted
    }

    pub fn totals(&self) -> PeriodTotals {
        *self
            .totals
            .get_or_init(|| PeriodTotals::from_transactions(&self.transactions))
    }

    pub fn total_income(&self) -> f64 {
        self.totals().income
    }

    pub fn total_expense(&self) -> f64 {
        self.totals().expense
    }

    pub fn total_balance(&self) -> f64 {
        self.totals().balance
    }

    pub fn add(&mut self, new: NewTransaction) -> Result<Uuid> {
        new.validate()?;
        let id = Uuid::new_v4();
        self.transactions.insert(0, new.into_transaction(id));
        tracing::debug!(%id, "transaction added");
        self.commit();
        Ok(id)
    }

    pub fn update(&mut self, id: Uuid, patch: TransactionPatch) -> Result<()> {
        patch.validate()?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id == id)
            .ok_or(BudgetError::TransactionNotFound(id))?;
        *slot = patch.apply(slot);
        tracing::debug!(%id, "transaction updated");
        self.commit();
        Ok(())
    }

    /// Replaces the record sharing `transaction.id`.
    pub fn replace(&mut self, transaction: Transaction) -> Result<()> {
        let id = transaction.id;
        let draft = NewTransaction {
            description: transaction.description,
            amount: transaction.amount,
            kind: transaction.kind,
            category: transaction.category,
            date: transaction.date,
        };
        self.update(id, TransactionPatch::replace_with(draft))
    }

    /// Removing an unknown id leaves the list and the stored copy untouched.
    pub fn remove(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        tracing::debug!(%id, "transaction removed");
        self.commit();
        Some(removed)
    }

    pub fn clear_all(&mut self) {
        self.transactions.clear();
        tracing::info!("all transactions cleared");
        self.commit();
    }

    /// Replaces the whole list with a fresh demo dataset.
    pub fn generate_demo(&mut self) {
        self.generate_demo_at(Utc::now());
    }

    pub fn generate_demo_at(&mut self, now: DateTime<Utc>) {
        self.transactions = demo::generate(now);
        tracing::info!(count = self.transactions.len(), "demo data generated");
        self.commit();
    }

    fn commit(&mut self) {
        self.revision += 1;
        self.totals = OnceCell::new();
        if let Err(err) = save_item(self.storage.as_ref(), TRANSACTIONS_KEY, &self.transactions) {
            tracing::warn!(error = %err, "failed to persist transactions");
            self.notifier
                .error(&format!("Could not save transactions: {err}"));
        }
    }
}

/// Decodes stored records one by one, keeping the first of each id and
/// dropping records that fail to parse or break the amount/description rules.
fn decode_records(records: Vec<Value>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let txn = match serde_json::from_value::<Transaction>(record) {
                Ok(txn) => txn,
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping malformed transaction");
                    return None;
                }
            };
            if let Err(err) = txn.validate() {
                tracing::warn!(index, id = %txn.id, error = %err, "skipping invalid transaction");
                return None;
            }
            if !seen.insert(txn.id) {
                tracing::warn!(index, id = %txn.id, "skipping duplicate transaction id");
                return None;
            }
            Some(txn)
        })
        .collect()
}
