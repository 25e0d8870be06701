use chrono::{Datelike, Utc};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{self, percent_bar, section as output_section};
use crate::config::MAX_HISTORY_MONTHS;
use crate::core::services::{CategoryStat, Period, PeriodTotals, SummaryService};
use crate::core::time::month_label;
use crate::ledger::Transaction;

const BAR_WIDTH: usize = 20;
const DASHBOARD_RECENT: usize = 5;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "totals",
            "Show total income, expense, and balance",
            "totals",
            cmd_totals,
        ),
        CommandDefinition::new(
            "report",
            "Summarize a period or a specific month",
            "report [all|year|month|YYYY-MM]",
            cmd_report,
        ),
        CommandDefinition::new(
            "categories",
            "Break down expenses by category",
            "categories [all|year|month]",
            cmd_categories,
        ),
        CommandDefinition::new(
            "history",
            "Show income and expense for recent months",
            "history [months]",
            cmd_history,
        ),
        CommandDefinition::new(
            "dashboard",
            "Show the overview of balance, ratios, and recent activity",
            "dashboard",
            cmd_dashboard,
        ),
    ]
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Totals");
    print_totals(context, &context.store.totals());
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args.first().copied().unwrap_or("month");
    if let Some((year, month)) = parse_year_month(token) {
        let selected = SummaryService::filter_by_month(context.store.transactions(), year, month);
        let title = month_label(year, month, context.language());
        print_report(context, &title, &selected);
        return Ok(());
    }

    let period = SummaryService::parse_period(token)?;
    let prefs = context.preferences.preferences();
    let report = SummaryService::report(
        context.store.transactions(),
        period,
        prefs.period_policy,
        Utc::now(),
        context.classifier,
        prefs.language,
    );
    output_section(format!("Report: {} ({})", report.period, report.policy));
    io::print_info(format!("  Transactions : {}", report.transaction_count));
    print_totals(context, &report.totals);
    io::print_info(format!("  Savings rate : {}%", report.savings_rate));
    print_categories(context, &report.categories);
    Ok(())
}

fn print_report(context: &ShellContext, title: &str, transactions: &[Transaction]) {
    let totals = SummaryService::totals(transactions);
    output_section(format!("Report: {title}"));
    io::print_info(format!("  Transactions : {}", transactions.len()));
    print_totals(context, &totals);
    io::print_info(format!(
        "  Savings rate : {}%",
        SummaryService::savings_rate(totals.income, totals.expense)
    ));
    let stats =
        SummaryService::aggregate_by_category(transactions, context.classifier, context.language());
    print_categories(context, &stats);
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = match args.first() {
        Some(value) => SummaryService::parse_period(value)?,
        None => Period::Month,
    };
    let policy = context.preferences.preferences().period_policy;
    let filtered =
        SummaryService::filter_by_period(context.store.transactions(), period, policy, Utc::now());
    let stats =
        SummaryService::aggregate_by_category(&filtered, context.classifier, context.language());
    output_section(format!("Expenses by category ({period}, {policy})"));
    print_categories(context, &stats);
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let months = match args.first() {
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|months| (1..=MAX_HISTORY_MONTHS).contains(months))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "months must be between 1 and {MAX_HISTORY_MONTHS}, got `{value}`"
                ))
            })?,
        None => context.preferences.preferences().history_months,
    };
    let history = SummaryService::monthly_history(
        context.store.transactions(),
        months,
        Utc::now(),
        context.language(),
    );
    let peak = history
        .iter()
        .map(|bucket| bucket.income.max(bucket.expense))
        .fold(0.0_f64, f64::max);

    output_section(format!("Last {months} month(s)"));
    for bucket in &history {
        let scale = |value: f64| if peak > 0.0 { value / peak * 100.0 } else { 0.0 };
        output::line(format!(
            "  {:<9} in  {} {:>16}",
            bucket.label,
            percent_bar(scale(bucket.income), BAR_WIDTH),
            context.money(bucket.income)
        ));
        output::line(format!(
            "  {:<9} out {} {:>16}   saved {}",
            "",
            percent_bar(scale(bucket.expense), BAR_WIDTH),
            context.money(bucket.expense),
            context.money(bucket.savings)
        ));
    }
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = SummaryService::dashboard(&context.store, DASHBOARD_RECENT);
    let today = Utc::now();
    output_section(format!(
        "Dashboard: {}, {}",
        context.profile.full_name(),
        month_label(today.year(), today.month(), context.language())
    ));
    print_totals(context, &summary.totals);
    io::print_info(format!(
        "  Income share : {} {:.1}%",
        percent_bar(summary.income_share, BAR_WIDTH),
        summary.income_share
    ));
    io::print_info(format!(
        "  Expense share: {} {:.1}%",
        percent_bar(summary.expense_share, BAR_WIDTH),
        summary.expense_share
    ));
    io::print_info(format!("  Expense ratio: {}%", summary.expense_ratio));
    io::print_info(format!("  Savings rate : {}%", summary.savings_rate));

    output_section("Recent transactions");
    if summary.recent.is_empty() {
        io::print_info("No transactions found.");
    }
    for (index, txn) in summary.recent.iter().enumerate() {
        output::line(context.describe_row(index + 1, txn));
    }
    Ok(())
}

fn print_totals(context: &ShellContext, totals: &PeriodTotals) {
    io::print_info(format!("  Income       : {}", context.money(totals.income)));
    io::print_info(format!("  Expense      : {}", context.money(totals.expense)));
    io::print_info(format!("  Balance      : {}", context.money(totals.balance)));
}

fn print_categories(context: &ShellContext, stats: &[CategoryStat]) {
    for stat in stats {
        output::line(format!(
            "  {} {:<14} {} {:>5.1}% {:>16}",
            stat.appearance.icon,
            stat.appearance.name,
            percent_bar(stat.percentage, BAR_WIDTH),
            stat.percentage,
            context.money(stat.amount)
        ));
    }
}

/// Parses `YYYY-MM` month selectors.
fn parse_year_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.trim().split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    (year >= 1 && (1..=12).contains(&month)).then_some((year, month))
}
