use serde::Deserialize;

/// Body for registering a user with an event
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub role: String,
}

/// Optional role restriction for association listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleFilter {
    pub role: Option<String>,
}

impl RoleFilter {
    /// The role to filter on; blank means no restriction
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}
