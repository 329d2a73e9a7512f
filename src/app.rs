use crate::handlers::{self, auth, dashboard, stats};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/dashboard/moods", post(dashboard::create))
        .route("/dashboard/moods/:id/update", post(dashboard::update))
        .route("/dashboard/moods/:id/delete", post(dashboard::delete))
        .route("/statistics", get(stats::stats_page))
        .route("/statistics/analyze", post(stats::analyze))
        .route("/statistics/plan", post(stats::plan))
        .route("/statistics/plan/download", post(stats::download))
        .route_layer(middleware::from_fn(handlers::require_session));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/change-password",
            get(auth::change_password_page).post(auth::change_password),
        )
        .route("/logout", post(auth::logout))
        .merge(protected)
        .with_state(state)
}
