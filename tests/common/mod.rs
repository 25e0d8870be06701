#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use budget_tracker::{
    core::{notifications::NotificationCenter, TransactionStore},
    storage::{JsonFileStore, KeyValueStore},
};
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub struct TestEnv {
    pub base: PathBuf,
    pub storage: Arc<dyn KeyValueStore>,
    pub notifications: Arc<NotificationCenter>,
}

impl TestEnv {
    pub fn open_store(&self) -> TransactionStore {
        TransactionStore::open(self.storage.clone(), self.notifications.clone())
    }

    /// Opens the store and drops the seeded demo data.
    pub fn empty_store(&self) -> TransactionStore {
        let mut store = self.open_store();
        store.clear_all();
        store
    }
}

/// Isolated JSON-backed environment per test.
pub fn setup_test_env() -> TestEnv {
    let base = temp_base();
    let storage = JsonFileStore::new(base.join("store")).expect("create json store");
    TestEnv {
        base,
        storage: Arc::new(storage),
        notifications: Arc::new(NotificationCenter::new()),
    }
}

pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}
