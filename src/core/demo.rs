//! Synthetic dataset used for first-run seeding and the "load demo data" action.
//!
//! The shape is fixed: the same entries, on the same days, for each of the
//! trailing months. Only the amounts vary between runs.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use uuid::Uuid;

use crate::ledger::CategoryKey as C;
use crate::ledger::TransactionKind::{Expense, Income};
use crate::ledger::{CategoryKey, NewTransaction, Transaction, TransactionKind};

use super::time::{days_in_month, shift_month};

pub const DEMO_MONTHS: u32 = 6;

struct Template {
    description: &'static str,
    kind: TransactionKind,
    category: Option<CategoryKey>,
    day: u32,
    base: f64,
    /// Maximum relative deviation from `base`.
    spread: f64,
}

const fn entry(
    description: &'static str,
    kind: TransactionKind,
    category: Option<CategoryKey>,
    day: u32,
    base: f64,
    spread: f64,
) -> Template {
    Template {
        description,
        kind,
        category,
        day,
        base,
        spread,
    }
}

const MONTHLY_TEMPLATES: &[Template] = &[
    entry("Maaş", Income, Some(C::Salary), 1, 45000.0, 0.05),
    entry("Serbest proje ödemesi", Income, None, 15, 6000.0, 0.5),
    entry("Metro kart dolumu", Expense, Some(C::Transport), 2, 500.0, 0.2),
    entry("Ev kirası", Expense, Some(C::Rent), 3, 15000.0, 0.0),
    entry("Market alışverişi", Expense, None, 6, 2800.0, 0.3),
    entry("Elektrik faturası", Expense, None, 8, 900.0, 0.3),
    entry("İnternet faturası", Expense, Some(C::Bills), 10, 450.0, 0.1),
    entry("Akaryakıt", Expense, None, 12, 1800.0, 0.3),
    entry("Eczane", Expense, None, 17, 350.0, 0.6),
    entry("Restoran", Expense, Some(C::Food), 19, 1200.0, 0.4),
    entry("Sinema", Expense, None, 21, 400.0, 0.5),
    entry("Kıyafet alışverişi", Expense, Some(C::Shopping), 25, 2200.0, 0.5),
];

/// Generates the demo dataset for the trailing [`DEMO_MONTHS`] months ending at `now`.
pub fn generate(now: DateTime<Utc>) -> Vec<Transaction> {
    generate_with(now, DEMO_MONTHS, &mut random_unit)
}

/// Generates the demo dataset with an explicit month count and unit-interval source.
///
/// Entries dated after `now` are skipped. The result is ordered by date, newest first.
pub fn generate_with(
    now: DateTime<Utc>,
    months: u32,
    unit: &mut dyn FnMut() -> f64,
) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for back in 0..months {
        let (year, month) = shift_month(now.year(), now.month(), -(back as i32));
        let last_day = days_in_month(year, month);
        for template in MONTHLY_TEMPLATES {
            let day = template.day.min(last_day);
            let Some(date) = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single() else {
                continue;
            };
            if date > now {
                continue;
            }
            let deviation = template.spread * (2.0 * unit().clamp(0.0, 1.0) - 1.0);
            let amount = round_cents(template.base * (1.0 + deviation)).max(0.01);
            let mut draft =
                NewTransaction::new(template.description, amount, template.kind, date);
            draft.category = template.category;
            transactions.push(draft.into_transaction(Uuid::new_v4()));
        }
    }
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    tracing::debug!(count = transactions.len(), months, "generated demo dataset");
    transactions
}

/// Number of entries generated for one full month.
pub fn entries_per_month() -> usize {
    MONTHLY_TEMPLATES.len()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Uniform value in `[0, 1)` drawn from the random bits of a v4 UUID.
fn random_unit() -> f64 {
    const MANTISSA_BITS: u32 = 53;
    let bits = Uuid::new_v4().as_u128() & ((1u128 << MANTISSA_BITS) - 1);
    bits as f64 / (1u64 << MANTISSA_BITS) as f64
}
