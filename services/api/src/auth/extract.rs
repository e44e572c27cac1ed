//! Bearer token extractor.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::token::validate_token;
use crate::authz::Actor;
use crate::domain::repository::UserRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_owned)
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(parts);
        let secret = state.jwt_secret.clone();
        let users = state.user_repo();

        async move {
            let token = token.ok_or(ApiError::Unauthorized)?;
            let claims = validate_token(&token, &secret)?;
            let user_id = claims
                .sub
                .parse::<Uuid>()
                .map_err(|_| ApiError::Unauthorized)?;
            let jti = claims
                .jti
                .parse::<Uuid>()
                .map_err(|_| ApiError::Unauthorized)?;

            // The token is only as good as the jti it carries. A logout or
            // password change rotates the user's jti and strands every token
            // issued before it.
            let user = users
                .find_by_id(user_id)
                .await?
                .ok_or(ApiError::Unauthorized)?;
            if user.jti != jti {
                return Err(ApiError::Unauthorized);
            }

            Ok(Actor {
                id: user.id,
                role: user.role,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: Vec<(&str, &str)>) -> Parts {
        let mut builder = Request::builder().method("GET").uri("/test");
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let (parts, _body) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn should_extract_bearer_token() {
        let parts = parts_with_headers(vec![("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn should_ignore_non_bearer_authorization() {
        let parts = parts_with_headers(vec![("authorization", "Basic dXNlcjpwdw==")]);
        assert_eq!(bearer_token(&parts), None);
        assert_eq!(bearer_token(&parts_with_headers(vec![])), None);
    }
}
