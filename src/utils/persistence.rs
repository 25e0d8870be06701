use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::core::utils::ensure_dir;
use crate::errors::Result;
use crate::ledger::Transaction;
use crate::storage::json_backend::write_atomic;

/// `butcem-backup-YYYY-MM-DD.json` for the given day.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("butcem-backup-{}.json", date.format("%Y-%m-%d"))
}

pub fn export_json(transactions: &[Transaction]) -> Result<String> {
    Ok(serde_json::to_string_pretty(transactions)?)
}

/// Writes a one-way snapshot of `transactions` into `dir`, replacing a same-day export.
pub fn export_to_dir(transactions: &[Transaction], dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(export_file_name(date));
    write_atomic(&path, &export_json(transactions)?)?;
    tracing::info!(path = %path.display(), count = transactions.len(), "exported transactions");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::NewTransaction;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;
    use uuid::Uuid;

    #[test]
    fn file_name_embeds_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "butcem-backup-2024-03-07.json");
    }

    #[test]
    fn export_writes_parseable_snapshot() {
        let dir = tempdir().unwrap();
        let txn = NewTransaction::income("Maaş", 45000.0, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .into_transaction(Uuid::new_v4());
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let path = export_to_dir(std::slice::from_ref(&txn), &dir.path().join("exports"), date).unwrap();

        assert!(path.ends_with("butcem-backup-2024-01-02.json"));
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Transaction> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec![txn]);
    }
}
