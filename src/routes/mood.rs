use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::mood::aggregate;
use crate::mood::recommend;
use crate::mood::repository::{MoodRepository, SqliteMoodRepository};
use crate::mood::scoring;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mood/submit", post(submit))
        .route("/mood/class/{class_id}/summary", get(class_summary))
        .route(
            "/mood/class/{class_id}/recommendation",
            get(class_recommendation),
        )
        .route("/mood/history/{user_id}", get(history))
        .route(
            "/mood/teacher/{teacher_id}/class-summary",
            get(teacher_summary),
        )
}

// -- Request/Response types --

#[derive(Deserialize)]
pub struct SubmitMoodRequest {
    pub answers: Vec<i64>,
    pub class_id: i64,
}

#[derive(Serialize)]
pub struct SubmitMoodResponse {
    pub score: i64,
    pub mood: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ClassSummaryResponse {
    pub class_id: i64,
    pub average_score: f64,
    pub mood_distribution: BTreeMap<String, i64>,
    pub suggested_template: String,
    pub template_sections: Vec<String>,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub most_common_mood: String,
    pub recommendation: String,
}

#[derive(Serialize)]
pub struct HistoryItem {
    pub timestamp: String,
    pub score: i64,
    pub mood: String,
}

#[derive(Serialize)]
pub struct TeacherSummaryResponse {
    pub teacher_id: i64,
    pub total_entries: usize,
    pub average_score: f64,
    pub mood_distribution: BTreeMap<String, i64>,
    pub most_common_mood: String,
}

// -- Handlers --

/// POST /mood/submit
/// Student-only; identity comes from the session, not the request body.
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SubmitMoodRequest>,
) -> AppResult<Response> {
    if user.is_teacher() {
        return Err(AppError::Forbidden(
            "Only students can submit mood entries".into(),
        ));
    }

    let (score, mood) = scoring::score_answers(&req.answers);

    let repo = SqliteMoodRepository::new(state.db.clone());
    let entry = repo.insert(user.id, req.class_id, score, mood).await?;

    tracing::info!(
        user_id = user.id,
        class_id = req.class_id,
        score,
        mood = %mood,
        "recorded mood entry"
    );

    let response = SubmitMoodResponse {
        score: entry.score,
        mood: entry.mood,
        message: "Mood recorded successfully!".to_string(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// GET /mood/class/{class_id}/summary
pub async fn class_summary(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(class_id): Path<i64>,
) -> AppResult<Response> {
    let repo = SqliteMoodRepository::new(state.db.clone());
    let entries = repo.for_class(class_id).await?;

    let summary = aggregate::summarize(&entries)
        .ok_or_else(|| AppError::NotFound("No mood data found for this class.".into()))?;

    let template = recommend::template_for(&summary.most_common_mood);
    let response = ClassSummaryResponse {
        class_id,
        average_score: summary.average_score,
        mood_distribution: summary.histogram,
        suggested_template: template.to_string(),
        template_sections: recommend::template_sections(template)
            .iter()
            .map(|s| s.to_string())
            .collect(),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// GET /mood/class/{class_id}/recommendation
pub async fn class_recommendation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(class_id): Path<i64>,
) -> AppResult<Response> {
    let repo = SqliteMoodRepository::new(state.db.clone());
    let entries = repo.for_class(class_id).await?;

    let summary = aggregate::summarize(&entries)
        .ok_or_else(|| AppError::NotFound("No mood data found for this class.".into()))?;

    let response = RecommendationResponse {
        recommendation: recommend::recommendation_for(&summary.most_common_mood).to_string(),
        most_common_mood: summary.most_common_mood,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// GET /mood/history/{user_id}
/// Accessible to the user themselves and to their teacher.
pub async fn history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Response> {
    if user.id != user_id {
        let target = db::find_user(&state.db, user_id)?
            .ok_or_else(|| AppError::NotFound("User not found.".into()))?;
        let is_their_teacher = user.is_teacher() && target.teacher_id == Some(user.id);
        if !is_their_teacher {
            return Err(AppError::Forbidden(
                "You cannot view another user's mood history".into(),
            ));
        }
    }

    let repo = SqliteMoodRepository::new(state.db.clone());
    let entries = repo.for_user(user_id).await?;

    if entries.is_empty() {
        return Err(AppError::NotFound(
            "No mood history found for this user.".into(),
        ));
    }

    let items: Vec<HistoryItem> = entries
        .into_iter()
        .map(|e| HistoryItem {
            timestamp: e.timestamp,
            score: e.score,
            mood: e.mood,
        })
        .collect();
    Ok((StatusCode::OK, Json(items)).into_response())
}

/// GET /mood/teacher/{teacher_id}/class-summary
/// Teacher-only; aggregates across the teacher's whole roster.
pub async fn teacher_summary(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(teacher_id): Path<i64>,
) -> AppResult<Response> {
    if !user.is_teacher() {
        return Err(AppError::Forbidden(
            "Only teachers can view roster summaries".into(),
        ));
    }
    if user.id != teacher_id {
        return Err(AppError::Forbidden(
            "Teachers can only view their own roster".into(),
        ));
    }

    let repo = SqliteMoodRepository::new(state.db.clone());
    let entries = repo.for_teacher(teacher_id).await?;

    let summary = aggregate::summarize(&entries)
        .ok_or_else(|| AppError::NotFound("No mood data found for this roster.".into()))?;

    let response = TeacherSummaryResponse {
        teacher_id,
        total_entries: summary.total_entries,
        average_score: summary.average_score,
        mood_distribution: summary.histogram,
        most_common_mood: summary.most_common_mood,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}
