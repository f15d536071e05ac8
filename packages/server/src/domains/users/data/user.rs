use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::{deserialize_nullable, UserId};
use crate::domains::user_events::models::EventCounts;
use crate::domains::users::models::User;
use crate::kernel::repository::to_item;
use crate::kernel::store::Item;

/// Input for creating a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl CreateUserInput {
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            email: self.email,
            avatar: self.avatar,
            gender: self.gender,
            job_title: self.job_title,
            company: self.company,
            city: self.city,
            state: self.state,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a user. Only fields present in the request are written;
/// an explicit `null` clears an optional attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_title: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<Option<String>>,
}

impl UpdateUserInput {
    /// The set fields, keyed by stored attribute name
    pub fn into_changes(self) -> Result<Item> {
        to_item(&self)
    }
}

/// Criteria for the user filter pipeline.
///
/// Text predicates are case-insensitive equality; count bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option, into)))]
pub struct UserFilter {
    pub company: Option<String>,
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_events_hosted: Option<u32>,
    pub max_events_hosted: Option<u32>,
    pub min_events_attended: Option<u32>,
    pub max_events_attended: Option<u32>,
}

impl UserFilter {
    /// Equality predicates in application order, paired with the attribute they test
    pub fn equality_predicates(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("email", self.email.as_deref()),
            ("city", self.city.as_deref()),
            ("company", self.company.as_deref()),
            ("jobTitle", self.job_title.as_deref()),
            ("state", self.state.as_deref()),
        ]
    }

    pub fn has_count_bounds(&self) -> bool {
        self.min_events_hosted.is_some()
            || self.max_events_hosted.is_some()
            || self.min_events_attended.is_some()
            || self.max_events_attended.is_some()
    }

    pub fn accepts_counts(&self, counts: EventCounts) -> bool {
        within(counts.hosted, self.min_events_hosted, self.max_events_hosted)
            && within(counts.attended, self.min_events_attended, self.max_events_attended)
    }
}

fn within(value: usize, min: Option<u32>, max: Option<u32>) -> bool {
    min.map_or(true, |min| value >= min as usize) && max.map_or(true, |max| value <= max as usize)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Optional in-memory sort applied before pagination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSort {
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl UserSort {
    pub fn by(field: impl Into<String>, sort_order: SortOrder) -> Self {
        Self {
            sort_by: Some(field.into()),
            sort_order,
        }
    }
}
