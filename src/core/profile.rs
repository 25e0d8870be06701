use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::notifications::Notifier;
use crate::storage::{load_item, save_item, KeyValueStore};

pub const PROFILE_KEY: &str = "user_profile";

const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub avatar_text: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            first_name: "Demo".into(),
            last_name: "User".into(),
            email: "demo@example.com".into(),
            role: "Pro Plan".into(),
            avatar_text: "DU".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("first name must be at least 2 characters")]
    FirstNameTooShort,
    #[error("last name must be at least 2 characters")]
    LastNameTooShort,
    #[error("`{0}` is not a valid email address")]
    InvalidEmail(String),
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Upper-cased first letters of the first and last name.
    pub fn initials(&self) -> String {
        self.first_name
            .trim()
            .chars()
            .take(1)
            .chain(self.last_name.trim().chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.first_name.trim().chars().count() < MIN_NAME_CHARS {
            return Err(ProfileError::FirstNameTooShort);
        }
        if self.last_name.trim().chars().count() < MIN_NAME_CHARS {
            return Err(ProfileError::LastNameTooShort);
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ProfileError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Owns the active profile and persists accepted updates.
pub struct ProfileService {
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    profile: UserProfile,
}

impl ProfileService {
    pub fn load(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let profile = load_item(storage.as_ref(), PROFILE_KEY).unwrap_or_default();
        Self {
            storage,
            notifier,
            profile,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn full_name(&self) -> String {
        self.profile.full_name()
    }

    /// Validates `data`, derives the avatar initials, and persists the result.
    ///
    /// A failed write keeps the new profile in memory and raises an error notification.
    pub fn update(&mut self, data: UserProfile) -> Result<&UserProfile, ProfileError> {
        data.validate()?;
        let mut updated = UserProfile {
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            email: data.email.trim().to_string(),
            role: data.role,
            avatar_text: String::new(),
        };
        updated.avatar_text = updated.initials();
        self.profile = updated;

        match save_item(self.storage.as_ref(), PROFILE_KEY, &self.profile) {
            Ok(()) => self.notifier.success("Profile information updated successfully."),
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist profile");
                self.notifier.error(&format!("Could not save profile: {err}"));
            }
        }
        Ok(&self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::{NotificationCenter, Severity};
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn profile(first: &str, last: &str, email: &str) -> UserProfile {
        UserProfile {
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
            role: "Pro Plan".into(),
            avatar_text: String::new(),
        }
    }

    #[test]
    fn update_derives_uppercase_initials_and_persists() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let center = Arc::new(NotificationCenter::new());
        let mut service = ProfileService::load(storage.clone(), center.clone());
        let saved = service
            .update(profile("ayşe", "yılmaz", "ayse@example.com"))
            .unwrap()
            .clone();
        assert_eq!(saved.avatar_text, "AY");

        let stored = storage.get(PROFILE_KEY).unwrap().unwrap();
        assert_eq!(stored["firstName"], json!("ayşe"));
        assert_eq!(stored["avatarText"], json!("AY"));
        assert_eq!(center.active()[0].severity, Severity::Success);

        let reloaded = ProfileService::load(storage, center);
        assert_eq!(reloaded.profile(), &saved);
        assert_eq!(reloaded.full_name(), "ayşe yılmaz");
    }

    #[test]
    fn invalid_profile_is_rejected_without_saving() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut service = ProfileService::load(storage.clone(), Arc::new(NotificationCenter::new()));
        assert_eq!(
            service.update(profile("A", "Yılmaz", "a@b.co")).unwrap_err(),
            ProfileError::FirstNameTooShort
        );
        assert_eq!(
            service.update(profile("Ali", "Y", "a@b.co")).unwrap_err(),
            ProfileError::LastNameTooShort
        );
        assert!(matches!(
            service.update(profile("Ali", "Veli", "not-an-email")),
            Err(ProfileError::InvalidEmail(_))
        ));
        assert_eq!(storage.get(PROFILE_KEY).unwrap(), None);
        assert_eq!(service.profile(), &UserProfile::default());
    }

    #[test]
    fn email_shape_checks() {
        assert!(looks_like_email("user@example.com"));
        assert!(!looks_like_email("user@"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("a b@example.com"));
        assert!(!looks_like_email("a@b@c"));
    }
}
