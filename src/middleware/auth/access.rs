//! Bearer token verification -> AuthCtx into request extensions.
//!
//! Authorization (who may touch which record) stays in the handlers; this
//! layer only establishes who the caller is. The extracted token is a local
//! binding scoped to this call, nothing about it outlives the request.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Apply bearer authentication to the given router.
///
/// Example:
/// ```ignore
/// let users = users_routes();
/// let users = middleware::auth::access::apply(users, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor on its own, so the
    // state is passed explicitly via from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let claims = match state.auth.authenticate(header_value) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = ?err,
                "bearer token verification failed"
            );
            return Err(err.into());
        }
    };

    let auth_ctx = AuthCtx::new(claims.user_id, claims.role);

    // middleware -> extractor hand-off
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
