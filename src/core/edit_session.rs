//! Tracks which transaction, if any, the entry form is editing.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::transaction_store::TransactionStore;
use crate::errors::BudgetError;
use crate::ledger::{CategoryKey, NewTransaction, Transaction, TransactionKind};

const MIN_DESCRIPTION_CHARS: usize = 3;
const MIN_AMOUNT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(Uuid),
}

/// Holds at most one transaction under edit; the last `start_edit` wins.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    editing: Option<Transaction>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_edit(&mut self, transaction: &Transaction) {
        tracing::debug!(id = %transaction.id, "edit started");
        self.editing = Some(transaction.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn current(&self) -> Option<&Transaction> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn mode(&self) -> FormMode {
        match &self.editing {
            Some(txn) => FormMode::Update(txn.id),
            None => FormMode::Create,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("description must be at least 3 characters")]
    DescriptionTooShort,
    #[error("amount must be at least 0.01")]
    AmountTooSmall,
    #[error(transparent)]
    Store(#[from] BudgetError),
}

/// Entry-form state. `Default` is a blank expense dated now.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Option<f64>,
    pub kind: TransactionKind,
    pub category: CategoryKey,
    pub date: DateTime<Utc>,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            amount: None,
            kind: TransactionKind::Expense,
            category: CategoryKey::Other,
            date: Utc::now(),
        }
    }
}

impl TransactionDraft {
    /// Pre-populates from the transaction under edit, or returns a blank draft.
    pub fn from_session(session: &EditSession) -> Self {
        match session.current() {
            Some(txn) => Self {
                description: txn.description.clone(),
                amount: Some(txn.amount),
                kind: txn.kind,
                category: txn.category.unwrap_or_default(),
                date: txn.date,
            },
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(FormError::DescriptionTooShort);
        }
        match self.amount {
            Some(amount) if amount.is_finite() && amount >= MIN_AMOUNT => Ok(()),
            _ => Err(FormError::AmountTooSmall),
        }
    }

    fn to_new_transaction(&self) -> NewTransaction {
        NewTransaction {
            description: self.description.trim().to_string(),
            amount: self.amount.unwrap_or_default(),
            kind: self.kind,
            category: Some(self.category),
            date: self.date,
        }
    }

    /// Adds or updates depending on the session mode, then ends the edit.
    pub fn submit(
        &self,
        store: &mut TransactionStore,
        session: &mut EditSession,
    ) -> Result<Uuid, FormError> {
        self.validate()?;
        let id = match session.mode() {
            FormMode::Create => store.add(self.to_new_transaction())?,
            FormMode::Update(id) => {
                store.replace(self.to_new_transaction().into_transaction(id))?;
                id
            }
        };
        session.cancel_edit();
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::LogNotifier;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn store() -> TransactionStore {
        let mut store =
            TransactionStore::open(Arc::new(MemoryStore::new()), Arc::new(LogNotifier));
        store.clear_all();
        store
    }

    fn draft(description: &str, amount: f64) -> TransactionDraft {
        TransactionDraft {
            description: description.into(),
            amount: Some(amount),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            ..TransactionDraft::default()
        }
    }

    #[test]
    fn session_mode_follows_last_edit() {
        let mut store = store();
        let first = store.add(NewTransaction::expense("Kira", 100.0, Utc::now())).unwrap();
        let second = store.add(NewTransaction::expense("Kahve", 5.0, Utc::now())).unwrap();
        let mut session = EditSession::new();
        assert_eq!(session.mode(), FormMode::Create);

        session.start_edit(store.get(first).unwrap());
        session.start_edit(store.get(second).unwrap());
        assert_eq!(session.mode(), FormMode::Update(second));
        assert_eq!(session.current().map(|txn| txn.id), Some(second));

        session.cancel_edit();
        assert!(session.current().is_none());
        assert!(!session.is_editing());
    }

    #[test]
    fn default_draft_is_blank_expense() {
        let draft = TransactionDraft::default();
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.category, CategoryKey::Other);
        assert!(draft.description.is_empty());
        assert!(draft.amount.is_none());
    }

    #[test]
    fn validation_is_local_to_the_form() {
        assert!(matches!(draft("ab", 10.0).validate(), Err(FormError::DescriptionTooShort)));
        assert!(matches!(draft("Kira", 0.001).validate(), Err(FormError::AmountTooSmall)));
        assert!(matches!(
            TransactionDraft {
                amount: None,
                ..draft("Kira", 1.0)
            }
            .validate(),
            Err(FormError::AmountTooSmall)
        ));
        assert!(draft("Kira", 0.01).validate().is_ok());
    }

    #[test]
    fn submit_creates_when_not_editing() {
        let mut store = store();
        let mut session = EditSession::new();
        let id = draft("Market", 250.0).submit(&mut store, &mut session).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().category, Some(CategoryKey::Other));
    }

    #[test]
    fn submit_updates_and_clears_session() {
        let mut store = store();
        let id = store.add(NewTransaction::expense("Market", 250.0, Utc::now())).unwrap();
        let mut session = EditSession::new();
        session.start_edit(store.get(id).unwrap());

        let mut form = TransactionDraft::from_session(&session);
        assert_eq!(form.amount, Some(250.0));
        form.amount = Some(300.0);
        form.category = CategoryKey::Food;
        let updated = form.submit(&mut store, &mut session).unwrap();

        assert_eq!(updated, id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().amount, 300.0);
        assert_eq!(store.get(id).unwrap().category, Some(CategoryKey::Food));
        assert_eq!(session.mode(), FormMode::Create);
    }

    #[test]
    fn submit_against_deleted_record_reports_not_found() {
        let mut store = store();
        let id = store.add(NewTransaction::expense("Market", 250.0, Utc::now())).unwrap();
        let mut session = EditSession::new();
        session.start_edit(store.get(id).unwrap());
        store.remove(id);

        let err = TransactionDraft::from_session(&session)
            .submit(&mut store, &mut session)
            .unwrap_err();
        assert!(matches!(err, FormError::Store(BudgetError::TransactionNotFound(_))));
        assert!(session.is_editing());
        assert!(store.is_empty());
    }
}
