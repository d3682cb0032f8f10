use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use miniblog_backend_lib::auth::RejectionReason;
use miniblog_backend_lib::error::{AppError, ErrorKind};
use miniblog_common::{Action, ResourceRef};
use serde_json::Value;

#[test]
fn test_error_kinds() {
    assert_eq!(AppError::DuplicateAccount.kind(), ErrorKind::InputValidation);
    assert_eq!(AppError::InvalidCredentials.kind(), ErrorKind::Authentication);
    assert_eq!(
        AppError::InvalidToken(RejectionReason::BadSignature).kind(),
        ErrorKind::Authentication
    );
    assert_eq!(
        AppError::Forbidden {
            action: Action::Delete,
            resource: ResourceRef::comment(1),
        }
        .kind(),
        ErrorKind::Authorization
    );
    assert_eq!(AppError::NotFound(ResourceRef::article(1)).kind(), ErrorKind::NotFound);
    assert_eq!(AppError::Storage("down".into()).kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_error_response_shape() {
    let response = AppError::Forbidden {
        action: Action::Delete,
        resource: ResourceRef::comment(9),
    }
    .into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "AUTHZ_001");
    assert_eq!(
        body["error"]["message"],
        "You are not authorized to delete this comment"
    );
}

#[tokio::test]
async fn test_internal_details_stay_out_of_sanitized_message() {
    let error = AppError::Storage("connection refused at 10.0.0.3".into());
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!error.sanitized_message().contains("10.0.0.3"));
}
