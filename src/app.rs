use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/attendance",
            get(handlers::list_attendance).post(handlers::create_attendance),
        )
        .route(
            "/api/attendance/quarter/:quarter",
            get(handlers::attendance_by_quarter),
        )
        .route("/api/attendance/month/:month", get(handlers::attendance_by_month))
        .route("/api/attendance/date/:date", get(handlers::attendance_on))
        .route(
            "/api/attendance/:date",
            put(handlers::update_attendance).delete(handlers::delete_attendance),
        )
        .route(
            "/api/quarter-settings",
            get(handlers::list_quarter_settings).post(handlers::create_quarter_settings),
        )
        .route(
            "/api/quarter-settings/:quarter",
            get(handlers::get_quarter_settings).put(handlers::update_quarter_settings),
        )
        .route(
            "/api/app-settings",
            get(handlers::get_app_settings)
                .post(handlers::create_app_settings)
                .put(handlers::update_app_settings),
        )
        .route("/api/progress", get(handlers::current_progress))
        .route("/api/progress/:quarter", get(handlers::quarter_progress))
        .with_state(state)
}
