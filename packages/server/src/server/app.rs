//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{emails, events, health_handler, root_handler, users};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub server_deps: Arc<ServerDeps>,
}

/// Routes under `/api/v1`
fn api_router() -> Router {
    Router::new()
        // Users
        .route(
            "/users",
            post(users::create_user_handler).get(users::filter_users_handler),
        )
        .route("/users/by-email/:email", get(users::get_user_by_email_handler))
        .route(
            "/users/:id",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route("/users/:id/events", get(users::list_user_events_handler))
        // Events
        .route(
            "/events",
            post(events::create_event_handler).get(events::list_events_handler),
        )
        .route("/events/by-slug/:slug", get(events::get_event_by_slug_handler))
        .route(
            "/events/:id",
            get(events::get_event_handler)
                .put(events::update_event_handler)
                .delete(events::delete_event_handler),
        )
        .route("/events/:id/users", get(events::list_event_users_handler))
        .route(
            "/events/:id/users/:user_id",
            put(events::register_user_handler).delete(events::unregister_user_handler),
        )
        // Emails
        .route("/emails/send-emails", post(emails::send_emails_handler))
        .route("/emails/summary", get(emails::email_summary_handler))
}

/// Build the Axum application router around already-constructed dependencies.
pub fn build_app(server_deps: ServerDeps) -> Router {
    let app_state = AxumAppState {
        server_deps: Arc::new(server_deps),
    };

    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router())
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
