//! Transaction and category models shared by the store, reports, and shell.

pub mod category;
pub mod transaction;

pub use category::CategoryKey;
pub use transaction::{
    id_from_str, parse_timestamp, NewTransaction, Transaction, TransactionKind, TransactionPatch,
};
