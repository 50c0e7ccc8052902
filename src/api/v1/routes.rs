/*
 * Responsibility
 * - the v1 URL structure
 * - /health stays public; everything under /users requires a bearer token
 * - /me and /all are declared as literals so they never collide with /{id}
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    users::{delete_user, get_my_profile, get_user, list_users, update_user},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let users = Router::new()
        .route("/me", get(get_my_profile))
        .route("/all", get(list_users))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        );

    let users = middleware::auth::access::apply(users, state);

    Router::new()
        .route("/health", get(health))
        .nest("/users", users)
}
