//! User query actions
//!
//! Query actions return data directly; a miss is `None`, not an error.

use anyhow::Result;
use tracing::info;

use crate::common::UserId;
use crate::domains::users::models::User;
use crate::kernel::{KeyedRepository, ServerDeps};

pub async fn get_user(user_id: UserId, deps: &ServerDeps) -> Result<Option<User>> {
    info!(user_id = %user_id, "Getting user");
    deps.users().get(&user_id).await
}

pub async fn get_user_by_email(email: &str, deps: &ServerDeps) -> Result<Option<User>> {
    info!(email = %email, "Getting user by email");
    deps.users().find_by_email(email).await
}
