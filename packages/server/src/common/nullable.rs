//! Partial-update fields that distinguish "absent" from "explicit null".
//!
//! Pair with `#[serde(default, skip_serializing_if = "Option::is_none")]` on an
//! `Option<Option<T>>`: absent stays `None`, `null` becomes `Some(None)` and is
//! written through as a null.

use serde::{Deserialize, Deserializer};

pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
