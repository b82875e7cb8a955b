//! Bearer-token identity resolution.
//!
//! Identity verification is an external collaborator: the API hands the
//! bearer token to an [`IdentityProvider`] and gets back the account
//! identifier. The production implementation asks the auth service over
//! HTTP; tests and local development use [`StaticIdentityProvider`] with
//! a fixed token map.

use std::collections::BTreeMap;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use serde::Deserialize;
use uuid::Uuid;

use clicker_types::AccountId;

/// Errors raised while resolving a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request carried no `Authorization: Bearer` header.
    #[error("authorization header required")]
    MissingCredential,

    /// The credential was rejected by the identity provider.
    #[error("invalid auth user")]
    InvalidCredential,

    /// The identity provider could not be reached or answered garbage.
    #[error("identity provider failure: {0}")]
    Provider(String),
}

/// Resolves an opaque bearer token to an account identifier.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve `token` to the account it authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] for unknown or expired
    /// tokens, [`AuthError::Provider`] when the provider itself fails.
    async fn resolve(&self, token: &str) -> Result<AccountId, AuthError>;
}

/// Extract the bearer token from the request headers.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredential`] when the header is absent or
/// not a bearer credential.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredential)
}

// ---------------------------------------------------------------------------
// HTTP identity provider
// ---------------------------------------------------------------------------

/// The auth service's user-info payload; only the id matters here.
#[derive(Debug, Deserialize)]
struct UserInfo {
    id: Uuid,
}

/// Identity provider backed by the auth service's user-info endpoint.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl HttpIdentityProvider {
    /// Create a provider for the auth service at `base_url`.
    ///
    /// `service_key` is sent as the `apikey` header on every request.
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            service_key: service_key.to_owned(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<AccountId, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if response.status().is_client_error() {
            return Err(AuthError::InvalidCredential);
        }
        if !response.status().is_success() {
            return Err(AuthError::Provider(format!(
                "auth service answered {}",
                response.status()
            )));
        }

        let user: UserInfo = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("malformed user payload: {e}")))?;
        Ok(AccountId::from(user.id))
    }
}

// ---------------------------------------------------------------------------
// Static identity provider
// ---------------------------------------------------------------------------

/// Identity provider with a fixed token-to-account map.
///
/// For tests and local development only; unknown tokens are rejected
/// exactly like the HTTP provider rejects them.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    tokens: BTreeMap<String, AccountId>,
}

impl StaticIdentityProvider {
    /// An empty provider rejecting every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` as authenticating `account`.
    #[must_use]
    pub fn with_token(mut self, token: &str, account: AccountId) -> Self {
        self.tokens.insert(token.to_owned(), account);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<AccountId, AuthError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or(AuthError::InvalidCredential)
    }
}
