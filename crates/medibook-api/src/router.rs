//! Route definitions, organized by domain and mounted under `/api`.

use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Builds the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(appointment_routes())
        .merge(rating_routes())
        .merge(notification_routes())
        .merge(admin_routes())
        .merge(doctor_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::upgrade))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// Appointments and slots share the `/appointments` prefix the web
/// client expects.
fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments/create", post(handlers::appointment::create))
        .route(
            "/appointments/patient",
            get(handlers::appointment::list_for_patient),
        )
        .route(
            "/appointments/doctor",
            get(handlers::appointment::list_for_doctor),
        )
        .route(
            "/appointments/doctor/recent",
            get(handlers::appointment::recent_for_doctor),
        )
        .route(
            "/appointments/admin/all",
            get(handlers::appointment::list_all),
        )
        .route(
            "/appointments/admin/recent",
            get(handlers::appointment::recent_all),
        )
        .route(
            "/appointments/{id}/status",
            put(handlers::appointment::update_status),
        )
        .route(
            "/appointments/{id}/comment",
            put(handlers::appointment::update_comment),
        )
        .route("/appointments/{id}", delete(handlers::appointment::cancel))
        .route(
            "/appointments/admin/{id}",
            put(handlers::appointment::admin_update)
                .delete(handlers::appointment::admin_delete),
        )
        .route(
            "/appointments/available-slots/{doctor_id}",
            get(handlers::slot::list_available),
        )
        .route("/appointments/doctor-slots", get(handlers::slot::list_own))
        .route(
            "/appointments/doctor-slots/{doctor_id}",
            get(handlers::slot::list_for_doctor),
        )
        .route("/appointments/add-slot", post(handlers::slot::add_own))
        .route(
            "/appointments/add-slot/{doctor_id}",
            post(handlers::slot::add_for_doctor),
        )
        .route(
            "/appointments/slot/{id}",
            put(handlers::slot::update).delete(handlers::slot::delete),
        )
        .route(
            "/appointments/admin/slot/{id}",
            put(handlers::slot::update).delete(handlers::slot::delete),
        )
}

fn rating_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/doctor-ratings/can-rate/{doctor_id}",
            get(handlers::rating::can_rate),
        )
        .route(
            "/doctor-ratings/{doctor_id}",
            get(handlers::rating::list_for_doctor)
                .post(handlers::rating::submit)
                .put(handlers::rating::revise),
        )
        .route(
            "/doctor-ratings/{doctor_id}/{rating_id}",
            delete(handlers::rating::remove),
        )
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/mark-read",
            post(handlers::notification::mark_read),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(handlers::admin::stats))
        .route("/admin/users", get(handlers::admin::users))
        .route(
            "/admin/users/{id}/active",
            put(handlers::admin::set_active),
        )
}

fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/doctors", get(handlers::doctor::list))
        .route("/doctors/{id}", get(handlers::doctor::get))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
