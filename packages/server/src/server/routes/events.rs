//! `/api/v1/events` handlers, including user registrations

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    Json,
};

use crate::common::EventId;
use crate::domains::events::actions::{
    create_event, delete_event, get_event, get_event_by_slug, list_events, update_event,
};
use crate::domains::events::data::{CreateEventInput, CreatedEvent, UpdateEventInput};
use crate::domains::events::models::Event;
use crate::domains::user_events::actions::{
    list_event_registrations, register_user_for_event, unregister_user_from_event,
};
use crate::domains::user_events::data::{RegisterInput, RoleFilter};
use crate::domains::user_events::models::UserEvent;
use crate::server::app::AxumAppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::routes::users::parse_user_id;

fn parse_event_id(raw: &str) -> ApiResult<EventId> {
    EventId::parse(raw).map_err(|_| ApiError::not_found("Event"))
}

pub async fn create_event_handler(
    Extension(state): Extension<AxumAppState>,
    body: Result<Json<CreateEventInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedEvent>)> {
    let Json(input) = body?;
    let created = create_event(input, &state.server_deps).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_events_handler(
    Extension(state): Extension<AxumAppState>,
) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(list_events(&state.server_deps).await?))
}

pub async fn get_event_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Event>> {
    let event_id = parse_event_id(&id)?;
    get_event(event_id, &state.server_deps)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Event"))
}

pub async fn get_event_by_slug_handler(
    Extension(state): Extension<AxumAppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Event>> {
    get_event_by_slug(&slug, &state.server_deps)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Event"))
}

pub async fn update_event_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEventInput>, JsonRejection>,
) -> ApiResult<Json<Event>> {
    let event_id = parse_event_id(&id)?;
    let Json(input) = body?;
    update_event(event_id, input, &state.server_deps)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Event"))
}

pub async fn delete_event_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let event_id = parse_event_id(&id)?;
    if delete_event(event_id, &state.server_deps).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Event"))
    }
}

/// Registrations of an event, read through the event-id index
pub async fn list_event_users_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
    params: Result<Query<RoleFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<UserEvent>>> {
    let event_id = parse_event_id(&id)?;
    let Query(filter) = params?;
    let registrations =
        list_event_registrations(event_id, filter.role(), &state.server_deps).await?;
    Ok(Json(registrations))
}

pub async fn register_user_handler(
    Extension(state): Extension<AxumAppState>,
    Path((id, user_id)): Path<(String, String)>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<Json<UserEvent>> {
    let event_id = parse_event_id(&id)?;
    let user_id = parse_user_id(&user_id)?;
    let Json(input) = body?;
    let registration =
        register_user_for_event(event_id, user_id, &input.role, &state.server_deps).await?;
    Ok(Json(registration))
}

pub async fn unregister_user_handler(
    Extension(state): Extension<AxumAppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let event_id = parse_event_id(&id)?;
    let user_id = parse_user_id(&user_id)?;
    if unregister_user_from_event(event_id, user_id, &state.server_deps).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Registration"))
    }
}
