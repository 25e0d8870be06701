//! Period filtering and aggregation helpers behind the dashboard and reports.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

use crate::config::{Language, PeriodPolicy};
use crate::core::services::category_service::{CategoryAppearance, CategoryClassifier};
use crate::core::services::{ServiceError, ServiceResult};
use crate::core::time::{month_label, shift_month};
use crate::core::transaction_store::TransactionStore;
use crate::ledger::{CategoryKey, Transaction};

/// Categories that always appear in category statistics, even at zero.
pub const ALWAYS_SHOWN: [CategoryKey; 5] = [
    CategoryKey::Food,
    CategoryKey::Transport,
    CategoryKey::Bills,
    CategoryKey::Shopping,
    CategoryKey::Entertainment,
];

const ROLLING_YEAR_DAYS: i64 = 365;
const ROLLING_MONTH_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    All,
    Year,
    #[default]
    Month,
}

impl Period {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Period::All),
            "year" => Some(Period::Year),
            "month" => Some(Period::Month),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Year => "year",
            Period::Month => "month",
        }
    }

    /// Whether `date` lies inside this period relative to `now`.
    pub fn contains(self, date: DateTime<Utc>, policy: PeriodPolicy, now: DateTime<Utc>) -> bool {
        match (self, policy) {
            (Period::All, _) => true,
            (Period::Year, PeriodPolicy::Calendar) => date.year() == now.year(),
            (Period::Month, PeriodPolicy::Calendar) => {
                date.year() == now.year() && date.month() == now.month()
            }
            (Period::Year, PeriodPolicy::Rolling) => within_days(date, now, ROLLING_YEAR_DAYS),
            (Period::Month, PeriodPolicy::Rolling) => within_days(date, now, ROLLING_MONTH_DAYS),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn within_days(date: DateTime<Utc>, now: DateTime<Utc>, days: i64) -> bool {
    date <= now && date >= now - Duration::days(days)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl PeriodTotals {
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let (income, expense) = transactions
            .into_iter()
            .fold((0.0, 0.0), |(income, expense), txn| {
                if txn.is_income() {
                    (income + txn.amount, expense)
                } else {
                    (income, expense + txn.amount)
                }
            });
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStat {
    pub key: CategoryKey,
    pub appearance: CategoryAppearance,
    pub amount: f64,
    /// Share of the filtered expense total, `0.0..=100.0`.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub totals: PeriodTotals,
    /// Income share of income plus expense; 50 when both are zero.
    pub income_share: f64,
    pub expense_share: f64,
    /// Expense as a rounded percentage of income; 0 without income.
    pub expense_ratio: u32,
    pub savings_rate: u32,
    pub recent: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub period: Period,
    pub policy: PeriodPolicy,
    pub transaction_count: usize,
    pub totals: PeriodTotals,
    pub savings_rate: u32,
    pub categories: Vec<CategoryStat>,
}

/// Aggregates transaction lists for the dashboard and report views.
pub struct SummaryService;

impl SummaryService {
    pub fn parse_period(value: &str) -> ServiceResult<Period> {
        Period::parse(value).ok_or_else(|| {
            ServiceError::Invalid(format!(
                "unknown period `{}` (expected all, year, or month)",
                value.trim()
            ))
        })
    }

    pub fn filter_by_period(
        transactions: &[Transaction],
        period: Period,
        policy: PeriodPolicy,
        now: DateTime<Utc>,
    ) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|txn| period.contains(txn.date, policy, now))
            .cloned()
            .collect()
    }

    pub fn filter_by_month(transactions: &[Transaction], year: i32, month: u32) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|txn| txn.falls_in_month(year, month))
            .cloned()
            .collect()
    }

    pub fn totals(transactions: &[Transaction]) -> PeriodTotals {
        PeriodTotals::from_transactions(transactions)
    }

    /// Groups expenses by resolved category, largest first.
    ///
    /// Income records are ignored. [`ALWAYS_SHOWN`] categories are padded in with a
    /// zero amount so the result never loses them; ties keep the fixed category order.
    pub fn aggregate_by_category(
        transactions: &[Transaction],
        classifier: &CategoryClassifier,
        language: Language,
    ) -> Vec<CategoryStat> {
        let mut sums: BTreeMap<CategoryKey, f64> =
            ALWAYS_SHOWN.iter().map(|key| (*key, 0.0)).collect();
        for txn in transactions.iter().filter(|txn| txn.is_expense()) {
            let key = classifier.resolve(txn.category, &txn.description);
            *sums.entry(key).or_insert(0.0) += txn.amount;
        }
        let total: f64 = sums.values().sum();

        let mut stats: Vec<CategoryStat> = sums
            .into_iter()
            .map(|(key, amount)| CategoryStat {
                key,
                appearance: CategoryAppearance::of(key, language),
                amount,
                percentage: if total > 0.0 {
                    amount / total * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        stats.sort_by(|a, b| b.amount.total_cmp(&a.amount).then(a.key.cmp(&b.key)));
        stats
    }

    /// `max(0, round((income - expense) / income * 100))`, or 0 without income.
    pub fn savings_rate(income: f64, expense: f64) -> u32 {
        if income <= 0.0 {
            return 0;
        }
        let rate = ((income - expense) / income * 100.0).round();
        rate.max(0.0) as u32
    }

    /// Income, expense, and savings for the trailing `month_count` calendar months, oldest first.
    pub fn monthly_history(
        transactions: &[Transaction],
        month_count: u32,
        now: DateTime<Utc>,
        language: Language,
    ) -> Vec<MonthlyBucket> {
        (0..month_count)
            .rev()
            .map(|back| {
                let (year, month) = shift_month(now.year(), now.month(), -(back as i32));
                let totals = PeriodTotals::from_transactions(
                    transactions
                        .iter()
                        .filter(|txn| txn.falls_in_month(year, month)),
                );
                MonthlyBucket {
                    year,
                    month,
                    label: month_label(year, month, language),
                    income: totals.income,
                    expense: totals.expense,
                    savings: totals.balance,
                }
            })
            .collect()
    }

    pub fn dashboard(store: &TransactionStore, recent_limit: usize) -> DashboardSummary {
        let totals = store.totals();
        let combined = totals.income + totals.expense;
        let (income_share, expense_share) = if combined > 0.0 {
            (
                totals.income / combined * 100.0,
                totals.expense / combined * 100.0,
            )
        } else {
            (50.0, 0.0)
        };
        let expense_ratio = if totals.income > 0.0 {
            (totals.expense / totals.income * 100.0).round().max(0.0) as u32
        } else {
            0
        };
        DashboardSummary {
            totals,
            income_share,
            expense_share,
            expense_ratio,
            savings_rate: Self::savings_rate(totals.income, totals.expense),
            recent: store.recent(recent_limit).into_iter().cloned().collect(),
        }
    }

    pub fn report(
        transactions: &[Transaction],
        period: Period,
        policy: PeriodPolicy,
        now: DateTime<Utc>,
        classifier: &CategoryClassifier,
        language: Language,
    ) -> Report {
        let filtered = Self::filter_by_period(transactions, period, policy, now);
        let totals = Self::totals(&filtered);
        Report {
            period,
            policy,
            transaction_count: filtered.len(),
            totals,
            savings_rate: Self::savings_rate(totals.income, totals.expense),
            categories: Self::aggregate_by_category(&filtered, classifier, language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{NewTransaction, TransactionKind};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn txn(kind: TransactionKind, amount: f64, date: DateTime<Utc>, description: &str) -> Transaction {
        NewTransaction::new(description, amount, kind, date).into_transaction(Uuid::new_v4())
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            txn(TransactionKind::Income, 45000.0, at(2024, 1, 1), "Maaş"),
            txn(TransactionKind::Expense, 15000.0, at(2024, 1, 1), "Kira"),
            txn(TransactionKind::Expense, 3000.0, at(2024, 2, 1), "Market"),
        ]
    }

    #[test]
    fn calendar_month_filter_matches_worked_example() {
        let list = scenario();
        let january = SummaryService::filter_by_period(
            &list,
            Period::Month,
            PeriodPolicy::Calendar,
            at(2024, 1, 20),
        );
        let totals = SummaryService::totals(&january);
        assert_eq!(totals.income, 45000.0);
        assert_eq!(totals.expense, 15000.0);
        assert_eq!(totals.balance, 30000.0);

        let all = SummaryService::filter_by_period(&list, Period::All, PeriodPolicy::Calendar, at(2030, 1, 1));
        let totals = SummaryService::totals(&all);
        assert_eq!((totals.income, totals.expense, totals.balance), (45000.0, 18000.0, 27000.0));
    }

    #[test]
    fn filter_by_month_is_calendar_aligned() {
        let list = scenario();
        let february = SummaryService::filter_by_month(&list, 2024, 2);
        assert_eq!(february.len(), 1);
        assert_eq!(february[0].amount, 3000.0);
    }

    #[test]
    fn rolling_month_crosses_calendar_boundaries() {
        let list = scenario();
        let now = at(2024, 2, 10);
        let calendar = SummaryService::filter_by_period(&list, Period::Month, PeriodPolicy::Calendar, now);
        let rolling = SummaryService::filter_by_period(&list, Period::Month, PeriodPolicy::Rolling, now);
        assert_eq!(calendar.len(), 1);
        assert_eq!(rolling.len(), 1);

        let later = at(2024, 1, 25);
        let rolling = SummaryService::filter_by_period(&list, Period::Month, PeriodPolicy::Rolling, later);
        assert_eq!(rolling.len(), 2, "rolling window must not include future entries");
    }

    #[test]
    fn rolling_year_spans_previous_calendar_year() {
        let list = scenario();
        let now = at(2024, 12, 31);
        assert_eq!(
            SummaryService::filter_by_period(&list, Period::Year, PeriodPolicy::Rolling, now).len(),
            2
        );
        assert_eq!(
            SummaryService::filter_by_period(&list, Period::Year, PeriodPolicy::Calendar, now).len(),
            3
        );
    }

    #[test]
    fn savings_rate_edges() {
        assert_eq!(SummaryService::savings_rate(0.0, 500.0), 0);
        assert_eq!(SummaryService::savings_rate(1000.0, 0.0), 100);
        assert_eq!(SummaryService::savings_rate(1000.0, 2500.0), 0);
        assert_eq!(SummaryService::savings_rate(45000.0, 15000.0), 67);
    }

    #[test]
    fn category_stats_sum_to_expense_total() {
        let list = scenario();
        let stats = SummaryService::aggregate_by_category(
            &list,
            CategoryClassifier::shared(),
            Language::En,
        );
        let sum: f64 = stats.iter().map(|stat| stat.amount).sum();
        assert_eq!(sum, SummaryService::totals(&list).expense);
        assert_eq!(stats[0].key, CategoryKey::Rent);
        assert_eq!(stats[1].key, CategoryKey::Food);
        for key in ALWAYS_SHOWN {
            assert!(stats.iter().any(|stat| stat.key == key), "missing {key}");
        }
        assert!(stats.iter().all(|stat| stat.key != CategoryKey::Salary));
        let percent: f64 = stats.iter().map(|stat| stat.percentage).sum();
        assert!((percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_list_yields_padded_zero_stats() {
        let stats = SummaryService::aggregate_by_category(&[], CategoryClassifier::shared(), Language::Tr);
        assert_eq!(stats.len(), ALWAYS_SHOWN.len());
        assert!(stats.iter().all(|stat| stat.amount == 0.0 && stat.percentage == 0.0));
        let keys: Vec<_> = stats.iter().map(|stat| stat.key).collect();
        assert_eq!(
            keys,
            vec![
                CategoryKey::Food,
                CategoryKey::Transport,
                CategoryKey::Shopping,
                CategoryKey::Bills,
                CategoryKey::Entertainment,
            ]
        );
    }

    #[test]
    fn monthly_history_is_oldest_first() {
        let list = scenario();
        let history = SummaryService::monthly_history(&list, 3, at(2024, 2, 15), Language::En);
        let labels: Vec<_> = history.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(labels, vec!["Dec 2023", "Jan 2024", "Feb 2024"]);
        assert_eq!(history[1].income, 45000.0);
        assert_eq!(history[1].savings, 30000.0);
        assert_eq!(history[2].expense, 3000.0);
        assert_eq!(history[2].savings, -3000.0);
        assert_eq!(history[0].income, 0.0);
    }

    #[test]
    fn report_bundles_period_figures() {
        let list = scenario();
        let report = SummaryService::report(
            &list,
            Period::Year,
            PeriodPolicy::Calendar,
            at(2024, 6, 1),
            CategoryClassifier::shared(),
            Language::Tr,
        );
        assert_eq!(report.transaction_count, 3);
        assert_eq!(report.totals.balance, 27000.0);
        assert_eq!(report.savings_rate, 60);
        assert_eq!(report.categories[0].appearance.name, "Kira");
    }

    #[test]
    fn period_parses_user_input() {
        assert_eq!(Period::parse("ALL"), Some(Period::All));
        assert_eq!(Period::parse(" year "), Some(Period::Year));
        assert_eq!(Period::parse("week"), None);
        assert_eq!(Period::default(), Period::Month);
        assert!(matches!(
            SummaryService::parse_period("week"),
            Err(ServiceError::Invalid(message)) if message.contains("week")
        ));
    }
}
