/*
 * Responsibility
 * - users request/response DTOs
 * - the update request is the field allow-list: anything else in the body is
 *   dropped at deserialization and never reaches the store
 */
use serde::{Deserialize, Serialize};

use crate::repos::store::{UpdateFields, UserRecord};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

impl From<UpdateUserRequest> for UpdateFields {
    fn from(req: UpdateUserRequest) -> Self {
        UpdateFields {
            username: req.username,
            email: req.email,
            bio: req.bio,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
}

impl From<UserRecord> for UserResponse {
    fn from(r: UserRecord) -> Self {
        UserResponse {
            id: r.id,
            username: r.username,
            email: r.email,
            role: r.role,
            bio: r.bio,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: &'static str,
    #[serde(rename = "affectedRows")]
    pub affected_rows: u64,
}
