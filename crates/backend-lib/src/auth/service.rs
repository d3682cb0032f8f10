// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the boundary the HTTP layer
//! talks to for registration, login and per-request checks.
use async_trait::async_trait;
use miniblog_common::{Action, LoginInput, LoginResponse, PrincipalId, RegisterInput, ResourceRef, UserView};

use crate::error::AppError;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and return its public view
    async fn register(&self, input: RegisterInput) -> Result<UserView, AppError>;

    /// Check credentials and issue a token
    async fn login(&self, input: LoginInput) -> Result<LoginResponse, AppError>;

    /// Resolve a raw `Authorization` header value to a verified principal
    fn authenticate_request(&self, header: &str) -> Result<PrincipalId, AppError>;

    /// Allow `action` on `resource` only for its recorded owner
    async fn authorize_mutation(
        &self,
        principal: PrincipalId,
        resource: ResourceRef,
        action: Action,
    ) -> Result<(), AppError>;
}
