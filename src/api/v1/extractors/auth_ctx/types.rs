/*
 * Responsibility
 * - the "verified caller" type as handlers see it
 * - the middleware verifies and stores it in request extensions; handlers
 *   only ever receive this type
 *
 * Notes
 * - user_id and role come from the token claims, nothing else. A still-valid
 *   token with a stale role keeps that role until expiry.
 */

use crate::services::auth::Role;

/// Context attached to an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub user_id: i64,
    pub role: Role,
}

impl AuthCtx {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }
}
