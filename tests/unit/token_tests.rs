use miniblog_backend_lib::auth::{RejectionReason, TokenService, TOKEN_TTL};
use miniblog_common::PrincipalId;

#[test]
fn test_token_carries_principal() {
    let tokens = TokenService::new(b"unit-secret");
    let token = tokens.issue(PrincipalId(42)).unwrap();

    assert_eq!(token.split('.').count(), 3);
    assert_eq!(tokens.validate(&token), Ok(PrincipalId(42)));
}

#[test]
fn test_lifetime_is_seven_days() {
    let tokens = TokenService::new(b"unit-secret");
    let issued_at = 1_700_000_000;
    let token = tokens.issue_at(PrincipalId(1), issued_at).unwrap();
    let ttl = TOKEN_TTL.as_secs() as i64;

    let claims = tokens.validate_at(&token, issued_at).unwrap();
    assert_eq!(claims.exp - claims.iat, ttl);
    assert!(tokens.validate_at(&token, issued_at + ttl - 1).is_ok());
    assert_eq!(
        tokens.validate_at(&token, issued_at + ttl).unwrap_err(),
        RejectionReason::Expired
    );
}

#[test]
fn test_secret_is_bound_to_service() {
    let ours = TokenService::new(b"unit-secret");
    let theirs = TokenService::new(b"other-secret");
    let token = theirs.issue(PrincipalId(1)).unwrap();

    assert_eq!(ours.validate(&token), Err(RejectionReason::BadSignature));
}

#[test]
fn test_not_a_token() {
    let tokens = TokenService::new(b"unit-secret");
    for input in ["", "abc", "a.b", "a.b.c.d", "Bearer x"] {
        assert_eq!(tokens.validate(input), Err(RejectionReason::Malformed), "{input}");
    }
}
