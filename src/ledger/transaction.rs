use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::{BudgetError, Result};

use super::category::CategoryKey;

/// Direction of a transaction. Amounts are always positive; the kind carries the sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "gelir" => Some(TransactionKind::Income),
            "expense" | "gider" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

/// A recorded income or expense event. Updates replace the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryKey>,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the sign implied by the kind.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn falls_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    /// Checks the invariants `add` enforces, for records that arrive from storage.
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        validate_description(&self.description)
    }
}

/// Maps a stored id onto a [`Uuid`].
///
/// UUID text is parsed as-is; any other string (for example a millisecond
/// timestamp) maps to the same v5 UUID every time it is read.
pub fn id_from_str(raw: &str) -> Uuid {
    let trimmed = raw.trim();
    Uuid::parse_str(trimmed)
        .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, trimmed.as_bytes()))
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredId {
        Text(String),
        Number(u64),
    }

    Ok(match StoredId::deserialize(deserializer)? {
        StoredId::Text(text) => id_from_str(&text),
        StoredId::Number(number) => id_from_str(&number.to_string()),
    })
}

/// Transaction payload before an id has been assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryKey>,
    pub date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            kind,
            category: None,
            date,
        }
    }

    pub fn income(description: impl Into<String>, amount: f64, date: DateTime<Utc>) -> Self {
        Self::new(description, amount, TransactionKind::Income, date)
    }

    pub fn expense(description: impl Into<String>, amount: f64, date: DateTime<Utc>) -> Self {
        Self::new(description, amount, TransactionKind::Expense, date)
    }

    pub fn with_category(mut self, category: CategoryKey) -> Self {
        self.category = Some(category);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        validate_description(&self.description)
    }

    pub fn into_transaction(self, id: Uuid) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            date: self.date,
        }
    }
}

/// Field-level changes applied to an existing record; `None` leaves a field as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<TransactionKind>,
    /// `Some(None)` clears the category.
    pub category: Option<Option<CategoryKey>>,
    pub date: Option<DateTime<Utc>>,
}

impl TransactionPatch {
    /// Patch that overwrites every field with the values of `replacement`.
    pub fn replace_with(replacement: NewTransaction) -> Self {
        Self {
            description: Some(replacement.description),
            amount: Some(replacement.amount),
            kind: Some(replacement.kind),
            category: Some(replacement.category),
            date: Some(replacement.date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &TransactionPatch::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        match &self.description {
            Some(description) => validate_description(description),
            None => Ok(()),
        }
    }

    /// Builds the replacement record; the id is always preserved.
    pub fn apply(&self, current: &Transaction) -> Transaction {
        Transaction {
            id: current.id,
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            amount: self.amount.unwrap_or(current.amount),
            kind: self.kind.unwrap_or(current.kind),
            category: self.category.unwrap_or(current.category),
            date: self.date.unwrap_or(current.date),
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(BudgetError::InvalidInput(format!(
            "amount must be a positive number, got {amount}"
        )))
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(BudgetError::InvalidInput(
            "description must not be empty".into(),
        ));
    }
    Ok(())
}

/// Parses an ISO-8601 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| BudgetError::InvalidInput(format!("unrecognized date `{trimmed}`")))
}
