/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 * - store behind Arc<dyn UserStore>, auth behind Arc (Clone cheap)
 */
use std::sync::Arc;

use crate::repos::store::UserStore;
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, auth: Arc<AuthService>) -> Self {
        Self { store, auth }
    }
}
