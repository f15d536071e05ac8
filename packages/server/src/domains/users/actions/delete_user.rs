use anyhow::Result;
use tracing::info;

use crate::common::UserId;
use crate::kernel::{KeyedRepository, ServerDeps};

/// Delete a user by id. Associations referencing the user are left in place.
pub async fn delete_user(user_id: UserId, deps: &ServerDeps) -> Result<bool> {
    info!(user_id = %user_id, "Deleting user");
    deps.users().delete(&user_id).await
}
