use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::delete,
    Router,
};
use miniblog_backend_lib::error::AppError;
use miniblog_backend_lib::middleware::{require_auth, CurrentUser};
use miniblog_backend_lib::AppState;
use miniblog_common::{Action, PrincipalId, ResourceRef};
use tower::ServiceExt;

use crate::test_utils::{login, register, test_state};

async fn delete_article(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state
        .auth
        .authorize_mutation(principal, ResourceRef::article(id), Action::Delete)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/articles/{id}", delete(delete_article))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

fn delete_request(id: u64, token: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut request = Request::builder()
        .method("DELETE")
        .uri(format!("/articles/{id}"));
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    Ok(request.body(Body::empty())?)
}

#[tokio::test]
async fn test_protected_delete() -> anyhow::Result<()> {
    let (state, resources) = test_state();
    state
        .auth
        .register(register("alice", "a@x.com", "secret1"))
        .await?;
    let token = state.auth.login(login("a@x.com", "secret1")).await?.token;

    let own = resources.create_article(PrincipalId(1));
    let foreign = resources.create_article(PrincipalId(2));
    let app = router(state);

    let response = app.clone().oneshot(delete_request(own.id.0, None)?).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(delete_request(own.id.0, Some(&token))?)
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(delete_request(foreign.id.0, Some(&token))?)
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.oneshot(delete_request(404, Some(&token))?).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
