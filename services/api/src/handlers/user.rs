use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use optica_domain::pagination::{PageMeta, PageRequest};
use optica_domain::role::Role;

use crate::authz::{Actor, require_admin};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase,
    ResetPasswordUseCase, SignupUseCase, UpdateUserInput, UpdateUserUseCase,
};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: &'static str,
    #[serde(serialize_with = "optica_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "optica_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::domain::types::User> for UserResponse {
    fn from(user: crate::domain::types::User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            role: user.role.as_str(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn parse_role(s: &str) -> Result<Role, ApiError> {
    Role::from_str_opt(s).ok_or_else(|| ApiError::field("role", "must be sales or admin"))
}

// ── POST /signup ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Only mounted when `REGISTRATION_MODE=open`.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let usecase = SignupUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(body.email, body.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub meta: PageMeta,
}

pub async fn list_users(
    actor: Actor,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<UserListResponse>, ApiError> {
    require_admin(&actor)?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let (users, meta) = usecase.execute(page).await?;
    Ok(Json(UserListResponse {
        items: users.into_iter().map(Into::into).collect(),
        meta,
    }))
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

pub async fn create_user(
    actor: Actor,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_admin(&actor)?;
    let role = match body.role.as_deref() {
        Some(s) => parse_role(s)?,
        None => Role::default(),
    };
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            email: body.email,
            password: body.password,
            role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    actor: Actor,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&actor)?;
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

pub async fn update_user(
    actor: Actor,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_admin(&actor)?;
    let role = body.role.as_deref().map(parse_role).transpose()?;
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            user_id,
            UpdateUserInput {
                email: body.email,
                password: body.password,
                role,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_user(
    actor: Actor,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&actor)?;
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(&actor, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /users/{id}/reset-password ──────────────────────────────────────────

#[derive(Serialize)]
pub struct ResetPasswordResponse {
    pub temp_password: String,
}

pub async fn reset_password(
    actor: Actor,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ResetPasswordResponse>, ApiError> {
    require_admin(&actor)?;
    let usecase = ResetPasswordUseCase {
        repo: state.user_repo(),
    };
    let output = usecase.execute(user_id).await?;
    Ok(Json(ResetPasswordResponse {
        temp_password: output.temp_password,
    }))
}
