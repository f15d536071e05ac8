use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::common::UserId;
use crate::kernel::store::{BaseTable, Item, PrimaryKey, Query, EMAIL_INDEX};
use crate::kernel::{DocumentTable, KeyedRepository};

/// User - a contact in the CRM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Look up a text attribute by its stored name. Absent optionals are `None`.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            "phoneNumber" => Some(&self.phone_number),
            "email" => Some(&self.email),
            "avatar" => self.avatar.as_deref(),
            "gender" => self.gender.as_deref(),
            "jobTitle" => self.job_title.as_deref(),
            "company" => self.company.as_deref(),
            "city" => self.city.as_deref(),
            "state" => self.state.as_deref(),
            _ => None,
        }
    }

    /// Sort key for an attribute by its stored name.
    ///
    /// Unknown and absent attributes sort as `""`. Timestamps use a fixed-width
    /// RFC 3339 form so string order matches time order.
    pub fn sort_key(&self, name: &str) -> String {
        match name {
            "id" => self.id.as_key(),
            "createdAt" => self.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            "updatedAt" => self.updated_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            other => self.text_field(other).unwrap_or_default().to_string(),
        }
    }
}

/// Repository over the Users table
#[derive(Clone)]
pub struct UserRepository {
    docs: DocumentTable<User>,
}

impl UserRepository {
    pub fn new(table: Arc<dyn BaseTable>) -> Self {
        Self {
            docs: DocumentTable::new(table),
        }
    }

    /// Exact-match lookup through the email index
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut matches = self.docs.query(&Query::on_index(EMAIL_INDEX, email)).await?;
        if matches.len() > 1 {
            tracing::warn!(email = %email, count = matches.len(), "Multiple users share an email");
        }
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }
}

#[async_trait]
impl KeyedRepository for UserRepository {
    type Record = User;
    type Key = UserId;

    async fn get(&self, id: &UserId) -> Result<Option<User>> {
        self.docs.get(&PrimaryKey::single(id.as_key())).await
    }

    async fn create(&self, user: &User) -> Result<User> {
        self.docs.put(user).await
    }

    async fn update(&self, id: &UserId, changes: Item) -> Result<Option<User>> {
        self.docs
            .update(&PrimaryKey::single(id.as_key()), changes)
            .await
    }

    async fn delete(&self, id: &UserId) -> Result<bool> {
        self.docs.delete(&PrimaryKey::single(id.as_key())).await
    }

    async fn scan(&self) -> Result<Vec<User>> {
        self.docs.scan().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::store::{MemoryStore, TableSchema};
    use chrono::TimeZone;

    fn user(first: &str, email: &str) -> User {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        User {
            id: UserId::new(),
            first_name: first.into(),
            last_name: "Tester".into(),
            phone_number: "555-0100".into(),
            email: email.into(),
            avatar: None,
            gender: None,
            job_title: Some("Engineer".into()),
            company: None,
            city: Some("Austin".into()),
            state: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn repo() -> UserRepository {
        UserRepository::new(Arc::new(MemoryStore::new().open(TableSchema::users("T"))))
    }

    #[test]
    fn test_text_field_by_stored_name() {
        let u = user("Ada", "ada@x.io");
        assert_eq!(u.text_field("jobTitle"), Some("Engineer"));
        assert_eq!(u.text_field("company"), None);
        assert_eq!(u.text_field("nonsense"), None);
    }

    #[test]
    fn test_sort_key_defaults_to_empty() {
        let u = user("Ada", "ada@x.io");
        assert_eq!(u.sort_key("company"), "");
        assert_eq!(u.sort_key("firstName"), "Ada");
        assert_eq!(u.sort_key("createdAt"), "2025-01-01T00:00:00.000000000Z");
    }

    #[test]
    fn test_serializes_with_mixed_case_names() {
        let json = serde_json::to_value(user("Ada", "ada@x.io")).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["jobTitle"], "Engineer");
        assert!(json.get("first_name").is_none());
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = repo();
        let ada = repo.create(&user("Ada", "ada@x.io")).await.unwrap();
        repo.create(&user("Bob", "bob@x.io")).await.unwrap();

        assert_eq!(repo.find_by_email("ada@x.io").await.unwrap(), Some(ada));
        assert!(repo.find_by_email("nobody@x.io").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let repo = repo();
        let ada = repo.create(&user("Ada", "ada@x.io")).await.unwrap();

        let mut changes = Item::new();
        changes.insert("company".into(), "Acme".into());
        let updated = repo.update(&ada.id, changes).await.unwrap().unwrap();

        assert_eq!(updated.company.as_deref(), Some("Acme"));
        assert_eq!(updated.first_name, "Ada");
        assert!(updated.updated_at > ada.updated_at);
    }
}
