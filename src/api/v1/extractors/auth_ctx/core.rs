use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::error::AppError;
use crate::state::AppState;

use super::AuthCtx;

/// Extractor handing the AuthCtx to a handler.
///
/// Assumes the access middleware already inserted an AuthCtx into
/// request.extensions(). The two rejection cases are deliberately distinct:
/// - no Authorization header at all -> 401
/// - header present but no AuthCtx attached (middleware missing or bypassed)
///   -> 403
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Err(AppError::Unauthorized("Authorization required"));
        }

        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Forbidden("User authentication failed"))
    }
}
