pub mod demo;
pub mod edit_session;
pub mod notifications;
pub mod profile;
pub mod services;
pub mod time;
pub mod transaction_store;
pub mod utils;

pub use edit_session::{EditSession, FormError, FormMode, TransactionDraft};
pub use notifications::{LogNotifier, NotificationCenter, Notifier, Severity};
pub use profile::{ProfileError, ProfileService, UserProfile};
pub use transaction_store::TransactionStore;
