//! Caller authentication.
//!
//! Committing an import requires a bearer token signed with the service's
//! shared secret. Tokens are issued elsewhere; this module only verifies them
//! and turns the claims into an [`Identity`].

use crate::error::AuthError;
use common::model::identity::Identity;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: u64,
}

pub trait Authenticator {
    /// Checks the raw `Authorization` header value.
    fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AuthError>;
}

/// Verifies HS256 JSON Web Tokens.
#[derive(Clone)]
pub struct JwtAuthenticator {
    secret: Option<String>,
}

impl JwtAuthenticator {
    pub fn new(secret: Option<String>) -> Self {
        JwtAuthenticator {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let token = authorization
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let secret = self.secret.as_deref().ok_or(AuthError::SecretNotConfigured)?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(Identity {
            id: data.claims.id,
            email: data.claims.email,
        })
    }
}
