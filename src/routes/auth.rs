use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route(
            "/auth/teacher/{teacher_id}/students",
            get(handlers::list_students),
        )
        .route(
            "/auth/user/{user_id}/update-password",
            put(handlers::update_password),
        )
}
