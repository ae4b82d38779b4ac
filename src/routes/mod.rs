pub mod auth;
pub mod chatbot;
pub mod mood;
pub mod presentation;

use axum::Router;

use crate::state::AppState;

/// All API routes, merged. `main` adds the root route and middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(mood::router())
        .merge(chatbot::router())
        .merge(presentation::router())
}
