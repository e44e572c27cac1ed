use chrono::Utc;
use uuid::Uuid;

use crate::auth::password::{dummy_verify, verify_password};
use crate::auth::token::issue_token;
use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
    pub token_exp: u64,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let Some(user) = self.repo.find_by_email(&input.email).await? else {
            // Keep timing comparable to the known-email path.
            dummy_verify(&input.password);
            return Err(ApiError::InvalidCredentials);
        };

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        let (token, token_exp) = issue_token(&user, &self.jwt_secret)?;
        Ok(LoginOutput {
            user,
            token,
            token_exp,
        })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

/// Rotates the caller's `jti`, stranding every outstanding token.
pub struct LogoutUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> LogoutUseCase<R> {
    pub async fn execute(&self, actor_id: Uuid) -> Result<(), ApiError> {
        let mut user = self
            .repo
            .find_by_id(actor_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        user.jti = Uuid::now_v7();
        user.updated_at = Utc::now();
        self.repo.update(&user).await
    }
}
