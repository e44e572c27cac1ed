use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::authz::Actor;
use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::session::{LoginInput, LoginUseCase, LogoutUseCase};

// ── POST /session ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_exp: u64,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        token: output.token,
        token_exp: output.token_exp,
        user: output.user.into(),
    }))
}

// ── DELETE /session ──────────────────────────────────────────────────────────

pub async fn logout(actor: Actor, State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let usecase = LogoutUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(actor.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
