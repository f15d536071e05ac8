//! Table layouts and key handling shared by every storage backend.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::error::StoreError;

/// A stored record: a flat JSON document with mixed-case attribute names.
pub type Item = Map<String, Value>;

/// Attribute stamped by every `update`.
pub const UPDATED_AT: &str = "updatedAt";

/// Current time in the fixed-width form used for stored timestamps.
///
/// Fixed width keeps lexicographic order equal to chronological order.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: &'static str,
    pub hash_attr: &'static str,
    pub range_attr: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub hash_attr: &'static str,
    pub range_attr: Option<&'static str>,
    pub indexes: &'static [IndexSchema],
}

pub const EMAIL_INDEX: &str = "EmailIndex";
pub const COMPANY_INDEX: &str = "CompanyIndex";
pub const JOB_TITLE_INDEX: &str = "JobTitleIndex";
pub const CITY_STATE_INDEX: &str = "CityStateIndex";
pub const SLUG_INDEX: &str = "SlugIndex";
pub const OWNER_ID_INDEX: &str = "OwnerIdIndex";
pub const EVENT_ID_INDEX: &str = "EventIdIndex";

const USER_INDEXES: &[IndexSchema] = &[
    IndexSchema {
        name: EMAIL_INDEX,
        hash_attr: "email",
        range_attr: None,
    },
    IndexSchema {
        name: COMPANY_INDEX,
        hash_attr: "company",
        range_attr: None,
    },
    IndexSchema {
        name: JOB_TITLE_INDEX,
        hash_attr: "jobTitle",
        range_attr: None,
    },
    IndexSchema {
        name: CITY_STATE_INDEX,
        hash_attr: "city",
        range_attr: Some("state"),
    },
];

const EVENT_INDEXES: &[IndexSchema] = &[
    IndexSchema {
        name: SLUG_INDEX,
        hash_attr: "slug",
        range_attr: None,
    },
    IndexSchema {
        name: OWNER_ID_INDEX,
        hash_attr: "ownerId",
        range_attr: None,
    },
];

const USER_EVENT_INDEXES: &[IndexSchema] = &[IndexSchema {
    name: EVENT_ID_INDEX,
    hash_attr: "eventId",
    range_attr: Some("userId"),
}];

impl TableSchema {
    pub fn users(prefix: &str) -> Self {
        Self {
            name: format!("{}Users", prefix),
            hash_attr: "id",
            range_attr: None,
            indexes: USER_INDEXES,
        }
    }

    pub fn events(prefix: &str) -> Self {
        Self {
            name: format!("{}Events", prefix),
            hash_attr: "id",
            range_attr: None,
            indexes: EVENT_INDEXES,
        }
    }

    pub fn user_events(prefix: &str) -> Self {
        Self {
            name: format!("{}UserEvents", prefix),
            hash_attr: "userId",
            range_attr: Some("eventId"),
            indexes: USER_EVENT_INDEXES,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.range_attr.is_some()
    }

    pub fn index(&self, name: &str) -> Result<&IndexSchema, StoreError> {
        self.indexes
            .iter()
            .find(|index| index.name == name)
            .ok_or_else(|| StoreError::UnknownIndex {
                table: self.name.clone(),
                index: name.to_string(),
            })
    }

    /// Reject keys whose shape does not match the table's key schema.
    pub fn check_key(&self, key: &PrimaryKey) -> Result<(), StoreError> {
        match (self.is_composite(), key.range.is_some()) {
            (true, false) => Err(StoreError::CompositeKeyRequired {
                table: self.name.clone(),
            }),
            (false, true) => Err(StoreError::UnexpectedRangeKey {
                table: self.name.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Extract the primary key from a full item.
    pub fn key_of(&self, item: &Item) -> Result<PrimaryKey, StoreError> {
        let hash = self.key_attr(item, self.hash_attr)?;
        let range = match self.range_attr {
            Some(attr) => Some(self.key_attr(item, attr)?),
            None => None,
        };
        Ok(PrimaryKey { hash, range })
    }

    fn key_attr(&self, item: &Item, attribute: &str) -> Result<String, StoreError> {
        item.get(attribute)
            .and_then(attr_as_key)
            .ok_or_else(|| StoreError::MissingKeyAttribute {
                table: self.name.clone(),
                attribute: attribute.to_string(),
            })
    }

    /// Reject partial updates that touch key attributes.
    pub fn check_changes(&self, changes: &Item) -> Result<(), StoreError> {
        let key_attrs = std::iter::once(self.hash_attr).chain(self.range_attr);
        for attribute in key_attrs {
            if changes.contains_key(attribute) {
                return Err(StoreError::KeyAttributeUpdate {
                    table: self.name.clone(),
                    attribute: attribute.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Primary key of a stored item. `range` is set only for composite-key tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimaryKey {
    pub hash: String,
    pub range: Option<String>,
}

impl PrimaryKey {
    pub fn single(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            range: None,
        }
    }

    pub fn composite(hash: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            range: Some(range.into()),
        }
    }
}

/// Exact-match lookup against the primary key or a named secondary index.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub index: Option<&'static str>,
    pub hash: String,
    pub range: Option<String>,
    /// Equality on a non-key attribute, applied after the key condition.
    pub filter: Option<(String, Value)>,
}

impl Query {
    /// Items whose primary hash key equals `hash`.
    pub fn primary(hash: impl Into<String>) -> Self {
        Self {
            index: None,
            hash: hash.into(),
            range: None,
            filter: None,
        }
    }

    pub fn on_index(index: &'static str, hash: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            hash: hash.into(),
            range: None,
            filter: None,
        }
    }

    pub fn range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn filter_eq(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((attribute.into(), value.into()));
        self
    }

    /// The (hash, range) attribute names this query matches on.
    pub fn key_attrs<'a>(
        &self,
        schema: &'a TableSchema,
    ) -> Result<(&'a str, Option<&'a str>), StoreError> {
        match self.index {
            None => Ok((schema.hash_attr, schema.range_attr)),
            Some(name) => {
                let index = schema.index(name)?;
                Ok((index.hash_attr, index.range_attr))
            }
        }
    }

    /// In-process evaluation, used by backends without native indexes.
    pub fn matches(&self, hash_attr: &str, range_attr: Option<&str>, item: &Item) -> bool {
        let attr_eq = |attribute: &str, wanted: &str| {
            item.get(attribute)
                .and_then(attr_as_key)
                .is_some_and(|value| value == wanted)
        };

        if !attr_eq(hash_attr, &self.hash) {
            return false;
        }
        if let (Some(attribute), Some(wanted)) = (range_attr, self.range.as_deref()) {
            if !attr_eq(attribute, wanted) {
                return false;
            }
        }
        match &self.filter {
            Some((attribute, wanted)) => item.get(attribute) == Some(wanted),
            None => true,
        }
    }
}

/// Key attributes may be strings or numbers; anything else is not indexable.
pub fn attr_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
