use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::chatbot;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::mood::repository::{MoodRepository, SqliteMoodRepository};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chatbot/ask", post(ask))
        .route("/chatbot/{user_id}", get(suggestion))
}

// -- Request/Response types --

#[derive(Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub reply: String,
}

#[derive(Serialize)]
pub struct SuggestionResponse {
    pub user_id: i64,
    pub mood: String,
    pub suggestion: String,
}

// -- Handlers --

/// GET /chatbot/{user_id}
/// Mood-based suggestion from the user's latest entry; users can only ask
/// about themselves.
pub async fn suggestion(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Response> {
    if user.id != user_id {
        return Err(AppError::Forbidden(
            "You can only ask the chatbot about yourself".into(),
        ));
    }

    let repo = SqliteMoodRepository::new(state.db.clone());
    let latest = repo
        .latest_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No mood entry found for this user.".into()))?;

    let response = SuggestionResponse {
        user_id,
        suggestion: chatbot::suggestion_for(&latest.mood).to_string(),
        mood: latest.mood,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// POST /chatbot/ask
pub async fn ask(Json(req): Json<AskRequest>) -> AppResult<Response> {
    let response = AskResponse {
        reply: chatbot::reply_to(&req.message).to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db;
    use crate::db::models::Role;
    use rusqlite::params;

    fn test_state() -> AppState {
        AppState {
            db: db::test_pool(),
            config: Config::default(),
        }
    }

    fn seed_student_with_mood(state: &AppState, mood: &str) -> i64 {
        let conn = state.db.get().unwrap();
        conn.execute(
            "INSERT INTO users (username, password_hash, teacher_id) VALUES ('s', 'x', NULL)",
            [],
        )
        .unwrap();
        let id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO moods (user_id, class_id, score, mood) VALUES (?1, 1, 10, ?2)",
            params![id, mood],
        )
        .unwrap();
        id
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn suggestion_uses_latest_mood() {
        let state = test_state();
        let id = seed_student_with_mood(&state, "Curious");

        let caller = CurrentUser {
            id,
            username: "s".to_string(),
            role: Role::Teacher,
        };
        let response = suggestion(State(state), caller, Path(id)).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["mood"], "Curious");
        assert!(body["suggestion"].as_str().unwrap().contains("exploring"));
    }

    #[tokio::test]
    async fn suggestion_404_without_entries() {
        let state = test_state();
        let conn = state.db.get().unwrap();
        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES ('s', 'x')",
            [],
        )
        .unwrap();
        let id = conn.last_insert_rowid();
        drop(conn);

        let caller = CurrentUser {
            id,
            username: "s".to_string(),
            role: Role::Teacher,
        };
        let err = suggestion(State(state), caller, Path(id)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn suggestion_is_self_only() {
        let state = test_state();
        let id = seed_student_with_mood(&state, "Normal");

        let caller = CurrentUser {
            id: id + 100,
            username: "other".to_string(),
            role: Role::Teacher,
        };
        let err = suggestion(State(state), caller, Path(id)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn ask_returns_keyword_reply() {
        let response = ask(Json(AskRequest {
            message: "hello bot".to_string(),
        }))
        .await
        .unwrap();
        let body = body_json(response).await;
        assert!(body["reply"].as_str().unwrap().contains("Hello"));
    }
}
