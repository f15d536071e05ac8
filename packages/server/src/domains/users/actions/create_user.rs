use anyhow::Result;
use tracing::info;

use crate::common::CrmError;
use crate::domains::users::data::CreateUserInput;
use crate::domains::users::models::User;
use crate::kernel::{KeyedRepository, ServerDeps};

/// Create a user after checking the email index for an existing owner.
///
/// The check and the write are separate operations, so two concurrent
/// creates with the same email can both succeed.
pub async fn create_user(input: CreateUserInput, deps: &ServerDeps) -> Result<User> {
    info!(email = %input.email, "Creating user");

    let users = deps.users();
    if users.find_by_email(&input.email).await?.is_some() {
        return Err(CrmError::conflict(format!(
            "User with email '{}' already exists.",
            input.email
        ))
        .into());
    }

    let user = users.create(&input.into_user()).await?;
    info!(user_id = %user.id, "User created");
    Ok(user)
}
