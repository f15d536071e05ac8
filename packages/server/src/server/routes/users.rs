//! `/api/v1/users` handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::{Page, PageArgs, UserId};
use crate::domains::user_events::actions::list_user_registrations;
use crate::domains::user_events::data::RoleFilter;
use crate::domains::user_events::models::UserEvent;
use crate::domains::users::actions::{
    create_user, delete_user, filter_users, get_user, get_user_by_email, update_user,
};
use crate::domains::users::data::{
    CreateUserInput, SortOrder, UpdateUserInput, UserFilter, UserSort,
};
use crate::domains::users::models::User;
use crate::server::app::AxumAppState;
use crate::server::error::{ApiError, ApiResult};

/// Query string of `GET /api/v1/users`
#[derive(Debug, Default, Deserialize)]
pub struct FilterUsersParams {
    pub company: Option<String>,
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub email: Option<String>,
    pub min_events_hosted: Option<u32>,
    pub max_events_hosted: Option<u32>,
    pub min_events_attended: Option<u32>,
    pub max_events_attended: Option<u32>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl FilterUsersParams {
    pub fn filter(&self) -> UserFilter {
        let text = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        UserFilter {
            company: text(&self.company),
            job_title: text(&self.job_title),
            email: text(&self.email),
            city: text(&self.city),
            state: text(&self.state),
            min_events_hosted: self.min_events_hosted,
            max_events_hosted: self.max_events_hosted,
            min_events_attended: self.min_events_attended,
            max_events_attended: self.max_events_attended,
        }
    }

    pub fn page_args(&self) -> PageArgs {
        let defaults = PageArgs::default();
        PageArgs::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )
    }

    pub fn sort(&self) -> UserSort {
        UserSort {
            sort_by: self.sort_by.clone().filter(|s| !s.is_empty()),
            sort_order: self.sort_order.unwrap_or_default(),
        }
    }
}

/// Unparseable ids cannot name a stored record
pub(crate) fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    UserId::parse(raw).map_err(|_| ApiError::not_found("User"))
}

pub async fn create_user_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<CreateUserInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(input) = body?;
    let user = create_user(input, &state.server_deps).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn filter_users_handler(
    Extension(state): Extension<AxumAppState>,
    params: Result<Query<FilterUsersParams>, QueryRejection>,
) -> ApiResult<Json<Page<User>>> {
    let Query(params) = params?;
    let page = params
        .page_args()
        .validate()
        .map_err(ApiError::bad_request)?;

    let users = filter_users(&params.filter(), &page, &params.sort(), &state.server_deps).await?;
    Ok(Json(users))
}

pub async fn get_user_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let user_id = parse_user_id(&id)?;
    get_user(user_id, &state.server_deps)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

pub async fn get_user_by_email_handler(
    Extension(state): Extension<AxumAppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<User>> {
    get_user_by_email(&email, &state.server_deps)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

pub async fn update_user_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserInput>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let user_id = parse_user_id(&id)?;
    let Json(input) = body?;
    update_user(user_id, input, &state.server_deps)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

pub async fn delete_user_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let user_id = parse_user_id(&id)?;
    if delete_user(user_id, &state.server_deps).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("User"))
    }
}

pub async fn list_user_events_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    params: Result<Query<RoleFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<UserEvent>>> {
    let user_id = parse_user_id(&id)?;
    let Query(filter) = params?;
    let registrations = list_user_registrations(user_id, filter.role(), &state.server_deps).await?;
    Ok(Json(registrations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_params(query: &str) -> Result<FilterUsersParams, QueryRejection> {
        let uri: axum::http::Uri = format!("http://localhost/api/v1/users?{}", query)
            .parse()
            .unwrap();
        Query::try_from_uri(&uri).map(|Query(p)| p)
    }

    fn params(query: &str) -> FilterUsersParams {
        try_params(query).unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = params("");
        assert_eq!(p.page_args(), PageArgs::new(1, 10));
        assert_eq!(p.sort(), UserSort::default());
        assert_eq!(p.filter(), UserFilter::default());
    }

    #[test]
    fn test_blank_text_params_are_ignored() {
        let p = params("city=&jobTitle=CTO&sort_by=");
        let filter = p.filter();
        assert_eq!(filter.city, None);
        assert_eq!(filter.job_title.as_deref(), Some("CTO"));
        assert_eq!(p.sort().sort_by, None);
    }

    #[test]
    fn test_sort_order_parses_lowercase() {
        let p = params("sort_by=firstName&sort_order=desc");
        assert_eq!(p.sort(), UserSort::by("firstName", SortOrder::Desc));
    }

    #[test]
    fn test_negative_bounds_are_rejected() {
        assert!(try_params("min_events_hosted=-1").is_err());
        assert!(try_params("sort_order=sideways").is_err());
    }

    #[test]
    fn test_unparseable_id_is_not_found() {
        let err = parse_user_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
