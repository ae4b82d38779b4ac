use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::auth::{password, session};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

// -- Request/Response types --

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub username: String,
    pub is_teacher: bool,
}

#[derive(Serialize)]
pub struct StudentSummary {
    pub user_id: i64,
    pub username: String,
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub new_password: String,
}

// -- Cookie helpers --

fn session_cookie(name: &str, token: &str, max_age_hours: u64) -> String {
    let max_age_secs = max_age_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", name)
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

// -- Handlers --

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Response> {
    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }
    if req.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    if db::find_user_by_username(&state.db, &username)?.is_some() {
        return Err(AppError::Conflict("This username is already taken.".into()));
    }

    // A student must reference an existing teacher account.
    if let Some(teacher_id) = req.teacher_id {
        let teacher = db::find_user(&state.db, teacher_id)?
            .ok_or_else(|| AppError::BadRequest("Referenced teacher does not exist".into()))?;
        if !teacher.role().is_teacher() {
            return Err(AppError::BadRequest(
                "Referenced user is not a teacher".into(),
            ));
        }
    }

    let password_hash =
        password::hash(&req.password).map_err(|e| AppError::Internal(e.to_string()))?;

    let conn = state.db.get()?;
    conn.execute(
        "INSERT INTO users (username, password_hash, teacher_id, class_id) VALUES (?1, ?2, ?3, ?4)",
        params![username, password_hash, req.teacher_id, req.class_id],
    )?;
    let user_id = conn.last_insert_rowid();

    tracing::info!(user_id, %username, "registered new user");

    let response = RegisterResponse {
        message: "Registration successful!".to_string(),
        user_id,
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    let user = db::find_user_by_username(&state.db, req.username.trim())?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = session::create_session(&state.db, user.id, state.config.auth.session_hours)?;
    let cookie = session_cookie(
        &state.config.auth.cookie_name,
        &token,
        state.config.auth.session_hours,
    );

    let response = LoginResponse {
        message: "Login successful!".to_string(),
        user_id: user.id,
        is_teacher: user.role().is_teacher(),
        username: user.username,
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    )
        .into_response())
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = cookie_value(&headers, &state.config.auth.cookie_name) {
        session::delete_session(&state.db, token)?;
    }

    Ok((
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            clear_session_cookie(&state.config.auth.cookie_name),
        )],
        Json(serde_json::json!({ "message": "Logged out." })),
    )
        .into_response())
}

/// GET /auth/teacher/{teacher_id}/students
/// Teacher-only; a teacher can only list their own roster.
pub async fn list_students(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(teacher_id): Path<i64>,
) -> AppResult<Response> {
    if !user.is_teacher() {
        return Err(AppError::Forbidden("Only teachers can list students".into()));
    }
    if user.id != teacher_id {
        return Err(AppError::Forbidden(
            "Teachers can only list their own students".into(),
        ));
    }

    let conn = state.db.get()?;
    let mut stmt =
        conn.prepare("SELECT id, username FROM users WHERE teacher_id = ?1 ORDER BY username")?;
    let students = stmt
        .query_map(params![teacher_id], |row| {
            Ok(StudentSummary {
                user_id: row.get(0)?,
                username: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if students.is_empty() {
        return Err(AppError::NotFound(
            "No students found for this teacher.".into(),
        ));
    }

    Ok((StatusCode::OK, Json(students)).into_response())
}

/// PUT /auth/user/{user_id}/update-password
pub async fn update_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdatePasswordRequest>,
) -> AppResult<Response> {
    if user.id != user_id {
        return Err(AppError::Forbidden(
            "You can only change your own password".into(),
        ));
    }
    if req.new_password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }

    let target = db::find_user(&state.db, user_id)?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

    let password_hash =
        password::hash(&req.new_password).map_err(|e| AppError::Internal(e.to_string()))?;

    let conn = state.db.get()?;
    conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE id = ?2",
        params![password_hash, target.id],
    )?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Password updated." })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::models::Role;

    fn test_state() -> AppState {
        AppState {
            db: db::test_pool(),
            config: Config::default(),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register_user(state: &AppState, username: &str, teacher_id: Option<i64>) -> i64 {
        let response = register(
            State(state.clone()),
            Json(RegisterRequest {
                username: username.to_string(),
                password: "secret".to_string(),
                teacher_id,
                class_id: None,
            }),
        )
        .await
        .unwrap();
        body_json(response).await["user_id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let state = test_state();
        register_user(&state, "alice", None).await;

        let err = register(
            State(state),
            Json(RegisterRequest {
                username: "alice".to_string(),
                password: "other".to_string(),
                teacher_id: None,
                class_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_unknown_teacher_ref() {
        let state = test_state();
        let err = register(
            State(state),
            Json(RegisterRequest {
                username: "bob".to_string(),
                password: "secret".to_string(),
                teacher_id: Some(999),
                class_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn register_rejects_student_as_teacher_ref() {
        let state = test_state();
        let teacher = register_user(&state, "teacher", None).await;
        let student = register_user(&state, "student", Some(teacher)).await;

        let err = register(
            State(state),
            Json(RegisterRequest {
                username: "other".to_string(),
                password: "secret".to_string(),
                teacher_id: Some(student),
                class_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let state = test_state();
        register_user(&state, "alice", None).await;

        let err = login(
            State(state),
            Json(LoginRequest {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn login_sets_session_cookie_and_reports_role() {
        let state = test_state();
        let teacher = register_user(&state, "teacher", None).await;
        register_user(&state, "student", Some(teacher)).await;

        let response = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "teacher".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("balanceed_session="));

        let body = body_json(response).await;
        assert_eq!(body["is_teacher"], true);
        assert_eq!(body["username"], "teacher");

        let response = login(
            State(state),
            Json(LoginRequest {
                username: "student".to_string(),
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["is_teacher"], false);
    }

    #[tokio::test]
    async fn student_cannot_list_students() {
        let state = test_state();
        let teacher = register_user(&state, "teacher", None).await;
        let student = register_user(&state, "student", Some(teacher)).await;

        let caller = CurrentUser {
            id: student,
            username: "student".to_string(),
            role: Role::Student {
                teacher_id: teacher,
            },
        };
        let err = list_students(State(state), caller, Path(teacher))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn teacher_lists_own_students() {
        let state = test_state();
        let teacher = register_user(&state, "teacher", None).await;
        register_user(&state, "student1", Some(teacher)).await;
        register_user(&state, "student2", Some(teacher)).await;

        let caller = CurrentUser {
            id: teacher,
            username: "teacher".to_string(),
            role: Role::Teacher,
        };
        let response = list_students(State(state), caller, Path(teacher))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn teacher_with_no_students_gets_404() {
        let state = test_state();
        let teacher = register_user(&state, "teacher", None).await;

        let caller = CurrentUser {
            id: teacher,
            username: "teacher".to_string(),
            role: Role::Teacher,
        };
        let err = list_students(State(state), caller, Path(teacher))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_password_is_self_only() {
        let state = test_state();
        let alice = register_user(&state, "alice", None).await;
        let bob = register_user(&state, "bob", None).await;

        let caller = CurrentUser {
            id: bob,
            username: "bob".to_string(),
            role: Role::Teacher,
        };
        let err = update_password(
            State(state.clone()),
            caller,
            Path(alice),
            Json(UpdatePasswordRequest {
                new_password: "stolen".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Self-update works, and the new password logs in.
        let caller = CurrentUser {
            id: alice,
            username: "alice".to_string(),
            role: Role::Teacher,
        };
        update_password(
            State(state.clone()),
            caller,
            Path(alice),
            Json(UpdatePasswordRequest {
                new_password: "newpass".to_string(),
            }),
        )
        .await
        .unwrap();

        login(
            State(state),
            Json(LoginRequest {
                username: "alice".to_string(),
                password: "newpass".to_string(),
            }),
        )
        .await
        .unwrap();
    }
}
