//! In-memory UserStore for handler tests (no database required).

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{UpdateFields, UserRecord, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<BTreeMap<i64, UserRecord>>,
    // Ids whose deletion violates a reference, mirroring an FK constraint.
    referenced: Mutex<HashSet<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: UserRecord) {
        self.users.lock().unwrap().insert(record.id, record);
    }

    pub fn mark_referenced(&self, id: i64) {
        self.referenced.lock().unwrap().insert(id);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn fetch_own_profile(&self, user_id: i64) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn fetch_by_id(&self, id: i64) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn update_fields(
        &self,
        id: i64,
        fields: UpdateFields,
    ) -> RepoResult<Option<UserRecord>> {
        let mut users = self.users.lock().unwrap();
        let Some(record) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = fields.username {
            record.username = username;
        }
        if let Some(email) = fields.email {
            record.email = email;
        }
        if let Some(bio) = fields.bio {
            record.bio = Some(bio);
        }
        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<u64> {
        if self.referenced.lock().unwrap().contains(&id) {
            return Err(RepoError::Constraint {
                message: "User cannot be deleted while related records exist".to_string(),
            });
        }
        let removed = self.users.lock().unwrap().remove(&id);
        Ok(if removed.is_some() { 1 } else { 0 })
    }

    async fn list_all(&self) -> RepoResult<Vec<UserRecord>> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }
}
