use miniblog_backend_lib::auth::RejectionReason;
use miniblog_backend_lib::error::{AppError, ErrorKind};
use miniblog_common::{Action, PrincipalId, ResourceId, ResourceRef};

use crate::test_utils::{login, register, test_state};

#[tokio::test]
async fn test_register_login_and_foreign_article() -> anyhow::Result<()> {
    let (state, resources) = test_state();

    let user = state
        .auth
        .register(register("alice", "a@x.com", "secret1"))
        .await?;
    assert_eq!(user.id, PrincipalId(1));
    assert_eq!(user.email, "a@x.com");

    let response = state.auth.login(login("a@x.com", "secret1")).await?;
    assert_eq!(response.user.id, PrincipalId(1));

    let principal = state
        .auth
        .authenticate_request(&format!("Bearer {}", response.token))?;
    assert_eq!(principal, PrincipalId(1));

    // Article written by someone else
    let article = resources.create_article(PrincipalId(2));
    let err = state
        .auth
        .authorize_mutation(principal, article, Action::Update)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(err.status_code().as_u16(), 403);

    // Own article
    let own = resources.create_article(principal);
    state
        .auth
        .authorize_mutation(principal, own, Action::Delete)
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_comment_ownership_is_independent_of_article() -> anyhow::Result<()> {
    let (state, resources) = test_state();
    let article = resources.create_article(PrincipalId(1));
    let comment = resources.create_comment(article.id, PrincipalId(2))?;

    state
        .auth
        .authorize_mutation(PrincipalId(2), comment, Action::Delete)
        .await?;
    assert!(matches!(
        state
            .auth
            .authorize_mutation(PrincipalId(1), comment, Action::Delete)
            .await,
        Err(AppError::Forbidden { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_comment_on_missing_article() {
    let (_, resources) = test_state();
    assert!(resources.create_comment(ResourceId(99), PrincipalId(1)).is_err());
}

#[tokio::test]
async fn test_deleted_article_is_not_found() {
    let (state, resources) = test_state();
    let article = resources.create_article(PrincipalId(1));
    let comment = resources.create_comment(article.id, PrincipalId(1)).unwrap();
    assert!(resources.remove(article));

    for resource in [article, comment] {
        let err = state
            .auth
            .authorize_mutation(PrincipalId(1), resource, Action::Update)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
    assert!(matches!(
        state
            .auth
            .authorize_mutation(PrincipalId(1), ResourceRef::article(article.id.0), Action::Update)
            .await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_duplicate_accounts() {
    let (state, _) = test_state();
    state
        .auth
        .register(register("alice", "a@x.com", "secret1"))
        .await
        .unwrap();

    for input in [
        register("bob", "a@x.com", "secret1"),
        register("alice", "b@x.com", "secret1"),
    ] {
        let err = state.auth.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateAccount));
        assert_eq!(err.status_code().as_u16(), 400);
    }

    // Rejected attempts do not consume ids
    let bob = state
        .auth
        .register(register("bob", "b@x.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(bob.id, PrincipalId(2));
}

#[tokio::test]
async fn test_bad_login() {
    let (state, _) = test_state();
    state
        .auth
        .register(register("alice", "a@x.com", "secret1"))
        .await
        .unwrap();

    for input in [login("a@x.com", "wrong-one"), login("nobody@x.com", "secret1")] {
        let err = state.auth.login(input).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }
}

#[tokio::test]
async fn test_invalid_registration_input() {
    let (state, _) = test_state();
    for input in [
        register("", "a@x.com", "secret1"),
        register("alice", "not-an-email", "secret1"),
        register("alice", "a@x.com", "12345"),
    ] {
        let err = state.auth.register(input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }
}

#[tokio::test]
async fn test_authenticate_rejections() {
    let (state, _) = test_state();
    assert!(matches!(
        state.auth.authenticate_request("Token abc"),
        Err(AppError::MalformedHeader)
    ));
    assert!(matches!(
        state.auth.authenticate_request("Bearer not.a.jwt"),
        Err(AppError::InvalidToken(RejectionReason::Malformed))
    ));
}
