use anyhow::Result;
use tracing::{debug, info};

use crate::common::UserId;
use crate::domains::users::data::UpdateUserInput;
use crate::domains::users::models::User;
use crate::kernel::{KeyedRepository, ServerDeps};

/// Apply a partial update. Returns `None` when the user does not exist.
///
/// An update with no fields set is a read: nothing is written and
/// `updatedAt` keeps its value.
pub async fn update_user(
    user_id: UserId,
    input: UpdateUserInput,
    deps: &ServerDeps,
) -> Result<Option<User>> {
    info!(user_id = %user_id, "Updating user");

    let users = deps.users();
    let changes = input.into_changes()?;
    if changes.is_empty() {
        debug!(user_id = %user_id, "Empty update, returning current state");
        return users.get(&user_id).await;
    }

    users.update(&user_id, changes).await
}
