use async_trait::async_trait;
use metrics::counter;
use miniblog_common::{Action, LoginInput, LoginResponse, PrincipalId, RegisterInput, ResourceRef, UserView};
use zeroize::Zeroize;

use super::{bearer_token, ensure_owner, AuthService, CredentialVerifier, TokenService};
use crate::config::Settings;
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::{CredentialStore, NewCredential, ResourceStore, StoreError};
use crate::validation::{validate_login, validate_register};

/// Default [`AuthService`] over pluggable credential and resource stores
pub struct DefaultAuth<C, R> {
    credentials: C,
    resources: R,
    verifier: CredentialVerifier,
    tokens: TokenService,
    min_password_length: usize,
}

impl<C, R> DefaultAuth<C, R>
where
    C: CredentialStore,
    R: ResourceStore,
{
    pub fn new(
        credentials: C,
        resources: R,
        verifier: CredentialVerifier,
        tokens: TokenService,
        min_password_length: usize,
    ) -> Self {
        Self {
            credentials,
            resources,
            verifier,
            tokens,
            min_password_length,
        }
    }

    /// Wire the service from validated settings
    pub fn from_settings(settings: &Settings, credentials: C, resources: R) -> anyhow::Result<Self> {
        Ok(Self::new(
            credentials,
            resources,
            settings.password.verifier()?,
            TokenService::new(settings.auth.jwt_secret.as_bytes()),
            settings.password.min_length,
        ))
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

fn storage_error(e: StoreError) -> AppError {
    AppError::Storage(e.to_string())
}

fn login_failed() -> AppError {
    counter!(keys::LOGIN_FAILED).increment(1);
    AppError::InvalidCredentials
}

#[async_trait]
impl<C, R> AuthService for DefaultAuth<C, R>
where
    C: CredentialStore,
    R: ResourceStore,
{
    async fn register(&self, mut input: RegisterInput) -> Result<UserView, AppError> {
        validate_register(&input, self.min_password_length)?;

        // scrypt blocks; run it off the async workers
        let verifier = self.verifier;
        let mut password = std::mem::take(&mut input.password);
        let password_hash =
            tokio::task::spawn_blocking(move || verifier.hash_secure(&mut password)).await??;

        let record = self
            .credentials
            .create(NewCredential {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(field) => {
                    tracing::debug!(?field, "registration rejected, account exists");
                    AppError::DuplicateAccount
                },
                other => storage_error(other),
            })?;

        counter!(keys::USER_REGISTERED).increment(1);
        tracing::info!(user_id = %record.id, "user registered");
        Ok(record.view())
    }

    async fn login(&self, input: LoginInput) -> Result<LoginResponse, AppError> {
        validate_login(&input)?;

        let record = match self.credentials.find_by_email(&input.email).await {
            Ok(record) => Some(record),
            Err(StoreError::NotFound) => None,
            Err(e) => return Err(storage_error(e)),
        };

        // Unknown emails pay for a full scrypt run too
        let verifier = self.verifier;
        let LoginInput { mut password, .. } = input;
        let stored_hash = record.as_ref().map(|r| r.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || {
            let ok = match &stored_hash {
                Some(hash) => verifier.verify(&password, hash),
                None => verifier.verify_absent(&password),
            };
            password.zeroize();
            ok
        })
        .await?;

        let record = match record {
            Some(record) if verified => record,
            Some(record) => {
                tracing::debug!(user_id = %record.id, "login rejected, wrong password");
                return Err(login_failed());
            },
            None => {
                tracing::debug!("login rejected, unknown email");
                return Err(login_failed());
            },
        };

        let token = self.tokens.issue(record.id)?;
        counter!(keys::LOGIN_SUCCEEDED).increment(1);
        counter!(keys::TOKEN_ISSUED).increment(1);
        tracing::info!(user_id = %record.id, "user logged in");

        Ok(LoginResponse {
            token,
            user: record.view(),
        })
    }

    fn authenticate_request(&self, header: &str) -> Result<PrincipalId, AppError> {
        let token = bearer_token(header)?;
        self.tokens.validate(token).map_err(|reason| {
            counter!(keys::TOKEN_REJECTED, "reason" => reason.label()).increment(1);
            tracing::debug!(%reason, "token rejected");
            AppError::InvalidToken(reason)
        })
    }

    async fn authorize_mutation(
        &self,
        principal: PrincipalId,
        resource: ResourceRef,
        action: Action,
    ) -> Result<(), AppError> {
        let owner = self
            .resources
            .owner_of(resource)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::NotFound(resource),
                other => storage_error(other),
            })?;

        ensure_owner(principal, owner, resource, action).inspect_err(|_| {
            counter!(keys::MUTATION_DENIED).increment(1);
            tracing::info!(%principal, %resource, %action, "mutation denied, not the owner");
        })
    }
}
