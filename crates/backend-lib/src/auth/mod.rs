// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication and ownership authorization.
//!
//! `password`, `token`, `header` and `ownership` are pure and never log;
//! `DefaultAuth` wires them to the storage collaborators.

pub mod header;
pub mod ownership;
pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use header::bearer_token;
pub use ownership::{authorize, ensure_owner, Verdict};
pub use password::{CredentialVerifier, HashingError, MIN_PASSWORD_LENGTH};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{Claims, RejectionReason, SigningError, TokenService, TOKEN_TTL};
