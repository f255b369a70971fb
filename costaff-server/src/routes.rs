// costaff-server/src/routes.rs

use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::USER_ID_HEADER;
use crate::context::ServerContext;
use crate::handlers;

pub fn router(ctx: Arc<ServerContext>) -> Router {
    let api = Router::new()
        .route("/api/health", get(handlers::health::health))
        // Member surface
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/checkin", post(handlers::checkins::submit))
        .route("/api/escalate", post(handlers::escalations::escalate))
        .route("/api/conversations", get(handlers::conversations::list))
        .route(
            "/api/conversations/{id}/messages",
            get(handlers::conversations::messages),
        )
        .route("/api/join/{token}", post(handlers::team::join))
        // Founder surface
        .route(
            "/api/workspace",
            post(handlers::workspace::create).get(handlers::workspace::get),
        )
        .route("/api/settings", put(handlers::workspace::update_settings))
        .route("/api/team", post(handlers::team::add).get(handlers::team::list))
        .route(
            "/api/team/{id}/deactivate",
            post(handlers::team::deactivate),
        )
        .route("/api/roles", post(handlers::roles::create).get(handlers::roles::list))
        .route(
            "/api/roles/{id}",
            put(handlers::roles::update).delete(handlers::roles::delete),
        )
        .route(
            "/api/documents",
            post(handlers::documents::upload).get(handlers::documents::list),
        )
        .route("/api/documents/{id}", delete(handlers::documents::delete))
        .route("/api/checkins", get(handlers::checkins::list))
        .route("/api/checkins/{id}/note", post(handlers::checkins::add_note))
        .route("/api/escalations", get(handlers::escalations::list))
        .route(
            "/api/escalations/{id}/respond",
            post(handlers::escalations::respond),
        )
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_origin(Any);

    api.layer(TraceLayer::new_for_http()).layer(cors)
}
