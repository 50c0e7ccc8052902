/*
 * Responsibility
 * - /users handlers: profile, lookup, update, delete, listing
 * - each handler carries its own access rule; there is no generic policy
 *   function. A denial returns before the store is ever called.
 *
 * Rules
 * - GET /me        any authenticated caller, own record
 * - GET /{id}      any authenticated caller, any record (intentionally so;
 *                  narrowing this would change observable behavior)
 * - PATCH /{id}    caller is the target or an admin
 * - DELETE /{id}   caller is the target or an admin
 * - GET /all       admin only
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::v1::dto::users::{DeleteUserResponse, UpdateUserRequest, UpdateUserResponse, UserResponse},
    api::v1::extractors::AuthCtxExtractor,
    error::AppError,
    state::AppState,
};

pub async fn get_my_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let record = state
        .store
        .fetch_own_profile(auth.user_id)
        .await?
        .ok_or(AppError::not_found("User"))?;

    Ok(Json(record.into()))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(_auth): AuthCtxExtractor,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    // Any authenticated caller may fetch any record, regardless of role or
    // ownership.
    let record = state
        .store
        .fetch_by_id(id)
        .await?
        .ok_or(AppError::not_found("User"))?;

    Ok(Json(record.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, AppError> {
    if auth.user_id != id && !auth.role.is_admin() {
        return Err(AppError::Forbidden("Not authorized to update this user"));
    }

    let record = state
        .store
        .update_fields(id, req.into())
        .await?
        .ok_or(AppError::not_found("User"))?;

    Ok(Json(UpdateUserResponse {
        message: "User updated successfully",
        user: record.into(),
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(id): Path<i64>,
) -> Result<Json<DeleteUserResponse>, AppError> {
    if auth.user_id != id && !auth.role.is_admin() {
        return Err(AppError::Forbidden("Not authorized to delete this user"));
    }

    // A constraint violation surfaces as 409 with the store's message.
    let affected_rows = state.store.delete_by_id(id).await?;
    if affected_rows == 0 {
        return Err(AppError::not_found("User"));
    }

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully",
        affected_rows,
    }))
}

pub async fn list_users(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    if !auth.role.is_admin() {
        return Err(AppError::Forbidden("Not authorized to view all users"));
    }

    let records = state.store.list_all().await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::routing::get;
    use axum::Router;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::api::v1::routes;
    use crate::repos::memory::MemoryStore;
    use crate::repos::store::{UserRecord, UserStore};
    use crate::services::auth::AuthService;
    use crate::state::AppState;

    const SECRET: &str = "handler-test-secret";

    fn record(id: i64, username: &str, role: &str) -> UserRecord {
        UserRecord {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role: role.to_string(),
            bio: None,
        }
    }

    // Seeds: 1 = admin, 2 and 5 = plain users, 7 = user other rows reference.
    fn seeded_state() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.insert(record(1, "alice", "admin"));
        store.insert(record(2, "bob", "user"));
        store.insert(record(5, "carol", "user"));
        store.insert(record(7, "dave", "user"));
        store.mark_referenced(7);

        let auth = Arc::new(AuthService::new(SECRET, 0));
        let state = AppState::new(store.clone(), auth);
        (state, store)
    }

    fn app(state: AppState) -> Router {
        routes(state.clone()).with_state(state)
    }

    fn token(user_id: i64, role: &str) -> String {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 600;
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "userId": user_id, "role": role, "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (state, _) = seeded_state();
        let (status, body) = send(app(state), Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn every_operation_requires_authorization_header() {
        let (state, _) = seeded_state();
        let cases = [
            (Method::GET, "/users/me"),
            (Method::GET, "/users/all"),
            (Method::GET, "/users/5"),
            (Method::PATCH, "/users/5"),
            (Method::DELETE, "/users/5"),
        ];
        for (method, uri) in cases {
            let (status, body) = send(app(state.clone()), method.clone(), uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body["error"], "Authorization required", "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::GET,
            "/users/me",
            Some("not-a-jwt"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn me_returns_own_profile() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::GET,
            "/users/me",
            Some(&token(2, "user")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 2);
        assert_eq!(body["username"], "bob");
        assert_eq!(body["email"], "bob@example.com");
    }

    #[tokio::test]
    async fn me_of_unknown_user_is_not_found() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::GET,
            "/users/me",
            Some(&token(99, "user")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn any_authenticated_caller_may_read_any_user() {
        let (state, _) = seeded_state();
        // Plain user 2 reads user 5: allowed regardless of ownership.
        let (status, body) = send(
            app(state),
            Method::GET,
            "/users/5",
            Some(&token(2, "user")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 5);
        assert_eq!(body["username"], "carol");
    }

    #[tokio::test]
    async fn repeated_reads_return_the_same_payload() {
        let (state, _) = seeded_state();
        let bearer = token(2, "user");
        let (s1, b1) = send(
            app(state.clone()),
            Method::GET,
            "/users/5",
            Some(&bearer),
            None,
        )
        .await;
        let (s2, b2) = send(app(state), Method::GET, "/users/5", Some(&bearer), None).await;
        assert_eq!(s1, StatusCode::OK);
        assert_eq!(s1, s2);
        assert_eq!(b1, b2);
    }

    #[tokio::test]
    async fn reading_a_missing_user_is_not_found() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::GET,
            "/users/99",
            Some(&token(2, "user")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn user_may_update_own_record() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::PATCH,
            "/users/2",
            Some(&token(2, "user")),
            Some(json!({ "username": "bobby", "bio": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["username"], "bobby");
        assert_eq!(body["user"]["bio"], "hello");
    }

    #[tokio::test]
    async fn user_may_not_update_someone_else() {
        let (state, store) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::PATCH,
            "/users/5",
            Some(&token(2, "user")),
            Some(json!({ "username": "hijacked" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not authorized to update this user");

        // Denied before delegation: the record is untouched.
        let untouched = store.fetch_by_id(5).await.unwrap().unwrap();
        assert_eq!(untouched.username, "carol");
    }

    #[tokio::test]
    async fn admin_may_update_anyone() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::PATCH,
            "/users/5",
            Some(&token(1, "admin")),
            Some(json!({ "email": "carol@corp.example" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "carol@corp.example");
    }

    #[tokio::test]
    async fn updating_a_missing_user_is_not_found_even_for_admin() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::PATCH,
            "/users/99",
            Some(&token(1, "admin")),
            Some(json!({ "username": "ghost" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn update_drops_fields_outside_the_allow_list() {
        let (state, store) = seeded_state();
        let (status, _) = send(
            app(state),
            Method::PATCH,
            "/users/2",
            Some(&token(2, "user")),
            Some(json!({ "username": "bob2", "role": "admin", "id": 999 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let updated = store.fetch_by_id(2).await.unwrap().unwrap();
        assert_eq!(updated.username, "bob2");
        // role/id never reach the store
        assert_eq!(updated.role, "user");
        assert_eq!(updated.id, 2);
    }

    #[tokio::test]
    async fn user_may_delete_own_record() {
        let (state, store) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::DELETE,
            "/users/5",
            Some(&token(5, "user")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");
        assert_eq!(body["affectedRows"], 1);
        assert!(store.fetch_by_id(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn user_may_not_delete_someone_else() {
        let (state, store) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::DELETE,
            "/users/5",
            Some(&token(2, "user")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not authorized to delete this user");
        assert!(store.fetch_by_id(5).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn admin_may_delete_any_user() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::DELETE,
            "/users/5",
            Some(&token(1, "admin")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");
        assert_eq!(body["affectedRows"], 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_user_is_not_found() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::DELETE,
            "/users/99",
            Some(&token(1, "admin")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn deleting_a_referenced_user_is_a_conflict() {
        let (state, store) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::DELETE,
            "/users/7",
            Some(&token(1, "admin")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "User cannot be deleted while related records exist"
        );
        assert!(store.fetch_by_id(7).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn listing_requires_admin() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::GET,
            "/users/all",
            Some(&token(2, "user")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Not authorized to view all users");
    }

    #[tokio::test]
    async fn admin_may_list_everyone() {
        let (state, _) = seeded_state();
        let (status, body) = send(
            app(state),
            Method::GET,
            "/users/all",
            Some(&token(1, "admin")),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().expect("array body");
        assert_eq!(users.len(), 4);
    }

    #[tokio::test]
    async fn bypassed_authenticator_yields_forbidden() {
        // A route wired without the access middleware: the header is present
        // but no AuthCtx was ever attached.
        let (state, _) = seeded_state();
        let bare = Router::new()
            .route("/me", get(super::get_my_profile))
            .with_state(state);

        let (status, body) = send(bare, Method::GET, "/me", Some(&token(2, "user")), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "User authentication failed");
    }
}
