use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use rusqlite::params;
use serde::Serialize;

use crate::db::models::Presentation;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/presentation/upload", post(upload))
        .route("/presentation/class/{class_id}", get(list_for_class))
        .route("/presentation/class/{class_id}/latest", get(latest))
}

// -- Response types --

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_path: String,
    pub title: String,
    pub class_id: i64,
}

#[derive(Serialize)]
pub struct PresentationItem {
    pub title: String,
    pub file_path: String,
    pub upload_timestamp: String,
}

#[derive(Serialize)]
pub struct LatestResponse {
    pub class_id: i64,
    pub title: String,
    pub file_path: String,
    pub upload_timestamp: String,
}

/// Reduce an uploaded filename to a safe final path component. Directory
/// separators and anything outside [A-Za-z0-9._-] are replaced.
fn sanitize_filename(name: &str) -> String {
    let base = std::path::Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload.bin");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}

// -- Handlers --

/// POST /presentation/upload (multipart: class_id, title, file)
/// Teacher-only. The file is stored as `{class_id}_{filename}` under the
/// configured storage directory.
pub async fn upload(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Response> {
    if !user.is_teacher() {
        return Err(AppError::Forbidden(
            "Only teachers can upload presentations".into(),
        ));
    }

    let mut class_id: Option<i64> = None;
    let mut title: Option<String> = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("class_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let parsed = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AppError::BadRequest("class_id must be an integer".into()))?;
                class_id = Some(parsed);
            }
            Some("title") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                title = Some(text.trim().to_string());
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(sanitize_filename)
                    .unwrap_or_else(|| "upload.bin".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, data));
            }
            _ => {}
        }
    }

    let class_id = class_id.ok_or_else(|| AppError::BadRequest("class_id is required".into()))?;
    let title = title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("title is required".into()))?;
    let (filename, data) = file.ok_or_else(|| AppError::BadRequest("file is required".into()))?;

    let uploads_dir = state.config.uploads_path().clone();
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;

    let dest = uploads_dir.join(format!("{}_{}", class_id, filename));
    tokio::fs::write(&dest, &data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store file: {}", e)))?;

    let file_path = dest.to_string_lossy().to_string();

    let conn = state.db.get()?;
    conn.execute(
        "INSERT INTO presentations (class_id, title, file_path) VALUES (?1, ?2, ?3)",
        params![class_id, title, file_path],
    )?;

    tracing::info!(class_id, %title, %file_path, "stored presentation");

    let response = UploadResponse {
        message: "Presentation uploaded successfully.".to_string(),
        file_path,
        title,
        class_id,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

fn presentation_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Presentation> {
    Ok(Presentation {
        id: row.get(0)?,
        class_id: row.get(1)?,
        title: row.get(2)?,
        file_path: row.get(3)?,
        upload_timestamp: row.get(4)?,
    })
}

/// GET /presentation/class/{class_id}
pub async fn list_for_class(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(class_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, class_id, title, file_path, upload_timestamp FROM presentations
         WHERE class_id = ?1 ORDER BY upload_timestamp ASC, id ASC",
    )?;
    let presentations = stmt
        .query_map(params![class_id], presentation_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    if presentations.is_empty() {
        return Err(AppError::NotFound(
            "No presentations found for this class.".into(),
        ));
    }

    let items: Vec<PresentationItem> = presentations
        .into_iter()
        .map(|p| PresentationItem {
            title: p.title,
            file_path: p.file_path,
            upload_timestamp: p.upload_timestamp,
        })
        .collect();
    Ok((StatusCode::OK, Json(items)).into_response())
}

/// GET /presentation/class/{class_id}/latest
/// Returns an explicit empty-state message instead of a 404 when nothing has
/// been uploaded yet.
pub async fn latest(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(class_id): Path<i64>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    let result = conn.query_row(
        "SELECT id, class_id, title, file_path, upload_timestamp FROM presentations
         WHERE class_id = ?1 ORDER BY upload_timestamp DESC, id DESC LIMIT 1",
        params![class_id],
        presentation_from_row,
    );

    match result {
        Ok(p) => {
            let response = LatestResponse {
                class_id: p.class_id,
                title: p.title,
                file_path: p.file_path,
                upload_timestamp: p.upload_timestamp,
            };
            Ok((StatusCode::OK, Json(response)).into_response())
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "No presentation has been uploaded for this class yet."
            })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
