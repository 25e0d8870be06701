#![doc(test(attr(deny(warnings))))]

//! Budget Tracker keeps a personal list of income and expense transactions,
//! persists it through a key-value store of JSON documents, and derives the
//! totals, period reports, and category statistics shown by its shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static STARTUP: Once = Once::new();

/// Installs the tracing subscriber and logs the build once per process.
pub fn init() {
    STARTUP.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(build = %build.summary(), "budget tracker starting");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
