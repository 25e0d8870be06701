use std::sync::Arc;

use budget_tracker::{
    config::{Language, PeriodPolicy},
    core::{
        demo,
        services::{CategoryClassifier, Period, SummaryService},
        LogNotifier, TransactionStore,
    },
    ledger::{NewTransaction, Transaction},
    storage::MemoryStore,
};
use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_sample(months: u32) -> Vec<Transaction> {
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
    let mut unit = 0.0;
    demo::generate_with(now, months, &mut || {
        unit = (unit + 0.37) % 1.0;
        unit
    })
}

fn bench_reports(c: &mut Criterion) {
    let transactions = build_sample(black_box(600));
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
    let classifier = CategoryClassifier::shared();

    c.bench_function("aggregate_by_category_7k", |b| {
        b.iter(|| {
            SummaryService::aggregate_by_category(
                black_box(&transactions),
                classifier,
                Language::Tr,
            )
        })
    });

    c.bench_function("filter_year_rolling_7k", |b| {
        b.iter(|| {
            SummaryService::filter_by_period(
                black_box(&transactions),
                Period::Year,
                PeriodPolicy::Rolling,
                now,
            )
        })
    });

    c.bench_function("monthly_history_12_7k", |b| {
        b.iter(|| SummaryService::monthly_history(black_box(&transactions), 12, now, Language::En))
    });
}

fn bench_store(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
    let mut store = TransactionStore::open_with_clock(
        Arc::new(MemoryStore::new()),
        Arc::new(LogNotifier),
        now,
    );

    c.bench_function("add_then_totals", |b| {
        b.iter(|| {
            store
                .add(NewTransaction::expense("Market", 125.5, now))
                .expect("valid transaction");
            black_box(store.total_balance())
        })
    });
}

criterion_group!(benches, bench_reports, bench_store);
criterion_main!(benches);
