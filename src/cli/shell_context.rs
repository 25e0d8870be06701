use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use dialoguer::theme::ColorfulTheme;
use uuid::Uuid;

use crate::{
    config::PreferencesService,
    core::{
        notifications::NotificationCenter, services::CategoryClassifier, utils, EditSession,
        ProfileService, TransactionStore,
    },
    errors::Result,
    storage::{JsonFileStore, KeyValueStore},
};

use super::commands::{self, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a shell command can reach: the store, the edit session, and the services.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub data_dir: PathBuf,
    pub notifications: Arc<NotificationCenter>,
    pub store: TransactionStore,
    pub session: EditSession,
    pub preferences: PreferencesService,
    pub profile: ProfileService,
    pub classifier: &'static CategoryClassifier,
    pub last_command: Option<String>,
    pub running: bool,
    pub(crate) announced: HashSet<Uuid>,
}

impl ShellContext {
    /// Opens the JSON store under the resolved data directory.
    pub fn new(mode: CliMode) -> Result<Self> {
        let data_dir = utils::app_data_dir()?;
        let storage = JsonFileStore::new(utils::store_dir_in(&data_dir))?;
        Ok(Self::with_storage(mode, Arc::new(storage), &data_dir))
    }

    pub fn with_storage(mode: CliMode, storage: Arc<dyn KeyValueStore>, data_dir: &Path) -> Self {
        let notifications = Arc::new(NotificationCenter::new());
        let store = TransactionStore::open(storage.clone(), notifications.clone());
        let preferences = PreferencesService::load(storage.clone(), notifications.clone());
        let profile = ProfileService::load(storage, notifications.clone());
        tracing::debug!(data_dir = %data_dir.display(), ?mode, "shell context ready");
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            theme: ColorfulTheme::default(),
            data_dir: data_dir.to_path_buf(),
            notifications,
            store,
            session: EditSession::new(),
            preferences,
            profile,
            classifier: CategoryClassifier::shared(),
            last_command: None,
            running: true,
            announced: HashSet::new(),
        }
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn prompt(&self) -> String {
        match self.session.current() {
            Some(txn) => format!("budget[edit {}]> ", short_id(&txn.id)),
            None => "budget> ".to_string(),
        }
    }
}

/// Number of hex characters of an id shown in listings.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..SHORT_ID_LEN].to_string()
}
