//! Authentication primitives.
//!
//! The engine only needs an identity for `created_by`/`performed_by`
//! attribution; user management lives elsewhere. Two methods are supported:
//! `none` (every request is anonymous) and `api_key`.

mod api_key;
mod none;

pub use api_key::ApiKeyAuthenticator;
pub use none::NoneAuthenticator;

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AuthConfig, AuthMethod};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    NotAuthenticated,

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

/// Request information for authentication.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    /// Lowercased header name -> value.
    pub headers: HashMap<String, String>,
    pub source_ip: IpAddr,
}

/// Authenticated identity attached to each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub method: String,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            method: "none".to_string(),
        }
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a request and return the identity.
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError>;

    /// Name of this authentication method.
    fn method_name(&self) -> &'static str;
}

/// Build the authenticator selected by configuration.
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::ApiKey => {
            let key = config.api_key.clone().ok_or_else(|| {
                AuthError::ConfigurationError("auth.api_key is required for api_key method".into())
            })?;
            Ok(Box::new(ApiKeyAuthenticator::new(key)))
        }
    }
}
