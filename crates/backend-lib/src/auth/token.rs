// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying `{user_id, exp, iat}`. They are
//! self-contained: validity depends only on the signature and the expiry, and
//! nothing is stored server-side. There is no revocation; a leaked token is
//! valid until it expires.
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use miniblog_common::PrincipalId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token lifetime (time to live)
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// The only accepted signing algorithm
const EXPECTED_ALG: &str = "HS256";

/// Why a token was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("token could not be parsed")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token uses an unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("token is missing a required claim")]
    MissingClaim,
}

impl RejectionReason {
    /// Short stable label, for metrics
    pub fn label(self) -> &'static str {
        match self {
            RejectionReason::Malformed => "malformed",
            RejectionReason::BadSignature => "bad_signature",
            RejectionReason::Expired => "expired",
            RejectionReason::UnexpectedAlgorithm => "unexpected_algorithm",
            RejectionReason::MissingClaim => "missing_claim",
        }
    }
}

/// Signing failed. Only reachable through a broken key or serializer.
#[derive(Error, Debug)]
#[error("failed to sign token: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// Claims of a verified token
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claims {
    pub user_id: PrincipalId,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,
}

impl Claims {
    /// Check if the token is expired at `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// Claims as they arrive on the wire, before presence checks
#[derive(Deserialize)]
struct WireClaims {
    user_id: Option<u64>,
    exp: Option<i64>,
    iat: Option<i64>,
}

#[derive(Deserialize)]
struct WireHeader {
    alg: String,
}

/// Issues and validates tokens with a process-wide secret.
///
/// The secret is injected at construction; nothing here reads the
/// environment.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry and claim presence are checked against typed claims below,
        // with an injectable clock and no leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `principal`, valid for [`TOKEN_TTL`] from now
    pub fn issue(&self, principal: PrincipalId) -> Result<String, SigningError> {
        self.issue_at(principal, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(&self, principal: PrincipalId, issued_at: i64) -> Result<String, SigningError> {
        let claims = Claims {
            user_id: principal,
            exp: issued_at.saturating_add(TOKEN_TTL.as_secs() as i64),
            iat: issued_at,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Validate a token and return the principal it names
    pub fn validate(&self, token: &str) -> Result<PrincipalId, RejectionReason> {
        self.validate_at(token, Utc::now().timestamp())
            .map(|claims| claims.user_id)
    }

    /// Validate a token as if the current time were `now`
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, RejectionReason> {
        check_algorithm(token)?;

        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => RejectionReason::BadSignature,
                ErrorKind::InvalidAlgorithm => RejectionReason::UnexpectedAlgorithm,
                ErrorKind::ExpiredSignature => RejectionReason::Expired,
                ErrorKind::MissingRequiredClaim(_) => RejectionReason::MissingClaim,
                _ => RejectionReason::Malformed,
            })?;

        let wire = data.claims;
        let (Some(user_id), Some(exp), Some(iat)) = (wire.user_id, wire.exp, wire.iat) else {
            return Err(RejectionReason::MissingClaim);
        };
        if user_id == 0 {
            return Err(RejectionReason::Malformed);
        }

        let claims = Claims {
            user_id: PrincipalId(user_id),
            exp,
            iat,
        };
        if claims.is_expired_at(now) {
            return Err(RejectionReason::Expired);
        }
        Ok(claims)
    }
}

/// Reject anything whose header does not name HS256 before touching the key.
///
/// `jsonwebtoken` cannot even parse headers for algorithms it does not know
/// (`none`, for one), which would surface as a parse error instead of an
/// algorithm mismatch.
fn check_algorithm(token: &str) -> Result<(), RejectionReason> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(RejectionReason::Malformed);
    };

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| RejectionReason::Malformed)?;
    let header: WireHeader =
        serde_json::from_slice(&raw).map_err(|_| RejectionReason::Malformed)?;

    if header.alg != EXPECTED_ALG {
        return Err(RejectionReason::UnexpectedAlgorithm);
    }
    Ok(())
}
