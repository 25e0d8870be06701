mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::path::Path;

fn run_script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("budget_tracker_cli").unwrap();
    cmd.env("BUDGET_TRACKER_CLI_SCRIPT", "1")
        .env("BUDGET_TRACKER_HOME", home)
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = common::temp_base();
    run_script(
        &home,
        "clear\nadd income 45000 Maaş\nadd expense 15000 Ev kirası --date 2024-01-03\ntotals\nexit\n",
    )
    .success()
    .stdout(contains("WARNING: [!] All transactions deleted."))
    .stdout(contains("Income `Maaş` added"))
    .stdout(contains("₺45,000.00"))
    .stdout(contains("₺30,000.00"));

    let stored = std::fs::read_to_string(home.join("store").join("budget_transactions.json")).unwrap();
    assert!(stored.contains("\"Ev kirası\""));
    assert!(stored.contains("\"type\": \"expense\""));
}

#[test]
fn edit_then_update_replaces_record() {
    let home = common::temp_base();
    run_script(
        &home,
        "clear\nadd expense 250 Market\nedit 1\nupdate --amount 300 --category food\nlist\n",
    )
    .success()
    .stdout(contains("Editing `Market`"))
    .stdout(contains("updated."))
    .stdout(contains("₺300.00"));
}

#[test]
fn invalid_input_is_reported_without_aborting() {
    let home = common::temp_base();
    run_script(
        &home,
        "clear\nadd expense abc Market\nadd expense 10 ab\nupdate --amount 5\ntotals\n",
    )
    .success()
    .stdout(contains("`abc` is not a valid amount"))
    .stdout(contains("description must be at least 3 characters"))
    .stdout(contains("nothing is being edited"))
    .stdout(contains("Balance      : ₺0.00"));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = common::temp_base();
    run_script(&home, "totls\n")
        .success()
        .stdout(contains("Unknown command `totls`"))
        .stdout(contains("Suggestion: `totals`?"));
}

#[test]
fn preferences_change_currency_rendering() {
    let home = common::temp_base();
    run_script(&home, "clear\ncurrency USD\nadd income 1234.5 Freelance invoice\ntotals\n")
        .success()
        .stdout(contains("$1,234.50"))
        .stdout(contains("₺").not());
    run_script(&home, "currency\n")
        .success()
        .stdout(contains("Currency: USD"));
}

#[test]
fn export_writes_dated_backup() {
    let home = common::temp_base();
    let target = home.join("out");
    run_script(&home, &format!("demo\nexport {}\n", target.display()))
        .success()
        .stdout(contains("Exported to"));

    let pattern = regex::Regex::new(r"^butcem-backup-\d{4}-\d{2}-\d{2}\.json$").unwrap();
    let names: Vec<String> = std::fs::read_dir(&target)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(pattern.is_match(&names[0]));
}

#[test]
fn report_for_explicit_month() {
    let home = common::temp_base();
    run_script(
        &home,
        "clear\nlang en\nadd income 45000 Salary --date 2024-01-01\nadd expense 15000 Rent --date 2024-01-01 --category rent\nadd expense 3000 Groceries --date 2024-02-01\nreport 2024-01\n",
    )
    .success()
    .stdout(contains("Report: Jan 2024"))
    .stdout(contains("₺30,000.00"))
    .stdout(contains("Savings rate : 67%"));
}

#[test]
fn help_lists_sections_and_accepted_values() {
    let home = common::temp_base();
    run_script(&home, "help\nhelp transactions\nhelp lang\nexit\n")
        .success()
        .stdout(contains("Reports"))
        .stdout(contains("add <income|expense> <amount>"))
        .stdout(contains("Values: tr, en"));
}
