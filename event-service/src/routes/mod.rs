use axum::{
    extract::Request,
    middleware,
    routing::{get, post, put},
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServiceConfig;
use crate::handlers::{
    co_host_handlers::{add_co_host, list_co_hosts},
    event_handlers::{
        create_event, dashboard, get_event, list_events, list_upcoming, seed_test_events,
    },
    photo_handlers::{list_photos, upload_photo},
    profile_handlers::{get_my_profile, update_my_profile},
    rsvp_handlers::{list_attendees, submit_rsvp},
    stats_handlers::host_stats,
};
use rsvp_shared::auth::{auth_middleware, optional_auth_middleware};
use rsvp_shared::store::{postgrest::PostgrestStore, Store};

/// Creates a router backed by the hosted data API.
pub fn create_router(config: &ServiceConfig) -> Router {
    info!("Creating router with REST store at {}", config.backend.url);

    let store = Arc::new(PostgrestStore::new(&config.backend));
    create_router_with_store(store, &config.api_prefix)
}

/// Creates a router with a given store implementation
pub fn create_router_with_store<S>(store: Arc<S>, prefix: &str) -> Router
where
    S: Store + 'static,
{
    info!("Setting up API routes with prefix: '{}'", prefix);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    // Readable without signing in; the viewer is optional
    let public_routes = Router::new()
        .route("/dashboard", get(dashboard))
        .route("/events", get(list_events))
        .route("/events/upcoming", get(list_upcoming))
        .route("/events/:id", get(get_event))
        .route("/events/:id/attendees", get(list_attendees))
        .route("/events/:id/photos", get(list_photos))
        .route("/events/:id/co-hosts", get(list_co_hosts))
        .route_layer(middleware::from_fn(optional_auth_middleware))
        .with_state(store.clone());

    let member_routes = Router::new()
        .route("/events", post(create_event))
        .route("/events/test-data", post(seed_test_events))
        .route("/events/:id/rsvp", put(submit_rsvp))
        .route("/events/:id/photos", post(upload_photo))
        .route("/events/:id/co-hosts", post(add_co_host))
        .route("/users/me/stats", get(host_stats))
        .route("/profiles/me", get(get_my_profile).put(update_my_profile))
        .route_layer(middleware::from_fn(auth_middleware))
        .with_state(store);

    let api_routes = public_routes.merge(member_routes);

    let router = if prefix.is_empty() {
        api_routes
            .layer(cors)
            .layer(middleware::from_fn(logging_middleware))
    } else {
        Router::new()
            .nest(prefix, api_routes)
            .layer(cors)
            .layer(middleware::from_fn(logging_middleware))
    };

    info!(
        "Router configured with all routes and middleware under prefix: '{}'",
        prefix
    );

    router.fallback(|req: Request| async move {
        warn!("No route matched for: {} {}", req.method(), req.uri());
        (
            axum::http::StatusCode::NOT_FOUND,
            "The requested resource was not found".to_string(),
        )
    })
}
