/*
 * Responsibility
 * - the data-store boundary handlers are written against
 * - handlers see tagged results (Ok(Some)/Ok(None)/Err) and nothing of SQL
 */
use async_trait::async_trait;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
}

/// Partial update, restricted to the updatable fields.
///
/// A `None` field is left untouched. Anything outside this set never reaches
/// the store.
#[derive(Debug, Clone, Default)]
pub struct UpdateFields {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}

/// User-record store.
///
/// Implementations must be safe to share across requests (`Arc<dyn UserStore>`).
/// Atomicity of concurrent updates/deletes to the same record is the store's
/// responsibility; callers only decide whether the call may happen.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn fetch_own_profile(&self, user_id: i64) -> RepoResult<Option<UserRecord>>;

    async fn fetch_by_id(&self, id: i64) -> RepoResult<Option<UserRecord>>;

    async fn update_fields(
        &self,
        id: i64,
        fields: UpdateFields,
    ) -> RepoResult<Option<UserRecord>>;

    // Returns the number of deleted rows. A delete blocked by a referential
    // constraint surfaces as RepoError::Constraint.
    async fn delete_by_id(&self, id: i64) -> RepoResult<u64>;

    async fn list_all(&self) -> RepoResult<Vec<UserRecord>>;
}
