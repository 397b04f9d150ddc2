//! Session users

use super::entity::{EntityType, Record, Role};
use super::ids::UserId;
use crate::database::Collection;
use crate::identity::{format_stamp, format_stamp_no_spaces, generate_uuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a user is a person or a generated fixture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserKind {
    #[default]
    Real,
    Simulated,
}

/// How the user signed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    Google,
    #[default]
    Password,
}

/// A user record. Creators of items and tasks are stamped from the
/// session user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: UserId,
    pub uid: String,
    pub index: u64,
    pub uuid: String,
    pub email: String,
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: UserKind,
    pub role: Role,
    pub level: u8,
    pub provider: Provider,
    #[serde(rename = "boardIDs")]
    pub board_ids: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: UserId::default(),
            uid: String::new(),
            index: 1,
            uuid: String::new(),
            email: String::new(),
            name: String::new(),
            title: String::new(),
            kind: UserKind::Real,
            role: Role::Subscriber,
            level: Role::Subscriber.level(),
            provider: Provider::default(),
            board_ids: Vec::new(),
            created: now,
            updated: now,
        }
    }
}

impl User {
    /// Create a user for an email address. Name, uid and id are derived.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
        .prepared_at(Utc::now())
    }

    /// Set the display name and re-derive the id
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.id = UserId::default();
        let created = self.created;
        self.prepared_at(created)
    }

    /// Set the role; the level follows it
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self.level = role.level();
        self
    }

    /// Fill every derived field that is still empty, using `now` for stamps
    pub fn prepared_at(mut self, now: DateTime<Utc>) -> Self {
        if self.name.trim().is_empty() {
            let local = self.email.split('@').next().unwrap_or_default();
            self.name = capitalize_words(local);
        }
        if self.uid.is_empty() {
            self.uid = generate_uuid(None);
        }
        if self.uuid.is_empty() {
            self.uuid = self.uid.clone();
        }
        if self.id.is_empty() {
            self.id = UserId::from_string(format!(
                "{}_{}_{}_{}_{}",
                self.index,
                EntityType::User,
                self.name,
                format_stamp_no_spaces(&now),
                self.uid
            ));
            self.title = format!(
                "{} {} {} {}",
                EntityType::User,
                self.index,
                format_stamp(&now),
                self.uid
            );
            self.created = now;
            self.updated = now;
        }
        self
    }
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Uppercase the first letter of every word
fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_name_derived_from_email() {
        let user = User::new("jane.doe@example.com");
        assert_eq!(user.name, "Jane.Doe");
        assert_eq!(user.role, Role::Subscriber);
        assert_eq!(user.level, 2);
        assert!(user.id.as_str().starts_with("1_User_Jane.Doe_"));
        assert!(user.id.as_str().ends_with(&user.uid));
    }

    #[test]
    fn test_explicit_name_kept() {
        let user = User::new("r@example.com").with_name("R");
        assert_eq!(user.name, "R");
        assert!(user.id.as_str().starts_with("1_User_R_"));
    }

    #[test]
    fn test_prepared_at_is_stable_for_existing_id() {
        let at = Utc.with_ymd_and_hms(2025, 9, 24, 20, 47, 20).unwrap();
        let user = User {
            email: "r@example.com".into(),
            uid: "vBK5XSeH6".into(),
            ..User::default()
        }
        .prepared_at(at);
        assert_eq!(user.id, "1_User_R_8-47-PM_9-24-2025_vBK5XSeH6");
        assert_eq!(user.title, "User 1 8:47 PM 9-24-2025 vBK5XSeH6");

        let again = user.clone().prepared_at(Utc::now());
        assert_eq!(again.id, user.id);
    }

    #[test]
    fn test_role_sets_level() {
        let owner = User::new("o@example.com").with_role(Role::Owner);
        assert_eq!(owner.level, 7);
    }
}
