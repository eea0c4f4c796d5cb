//! JWT access-token verification
//!
//! Tokens are minted elsewhere; this service only checks the signature,
//! issuer and expiry and reads the subject and granted scopes.

use std::collections::HashSet;

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Scope;

/// Secret used when nothing is configured. Never accepted for serving.
pub const PLACEHOLDER_SECRET: &str = "super-secret-key-change-in-production";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key the tokens are signed with
    pub secret: String,
    /// Expected issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| PLACEHOLDER_SECRET.to_string()),
            issuer: "account-panel".to_string(),
        }
    }
}

/// Access token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (username)
    pub sub: String,
    /// Granted scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl AccessClaims {
    /// Known scopes in the token; unknown names are ignored.
    pub fn granted_scopes(&self) -> HashSet<Scope> {
        self.scopes
            .iter()
            .filter_map(|s| match s.parse::<Scope>() {
                Ok(scope) => Some(scope),
                Err(e) => {
                    debug!(subject = %self.sub, "Ignoring scope: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub(crate) fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            issuer: "account-panel".to_string(),
        }
    }

    /// Sign a token the way the external issuer would.
    pub(crate) fn sign(sub: &str, scopes: &[&str], config: &JwtConfig, ttl: Duration) -> String {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: sub.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_subject_and_scopes() {
        let config = test_config();
        let token = sign("alice", &["login", "view-accounts"], &config, Duration::hours(1));

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(
            claims.granted_scopes(),
            HashSet::from([Scope::Login, Scope::ViewAccounts])
        );
    }

    #[test]
    fn unknown_scopes_are_dropped() {
        let config = test_config();
        let token = sign("alice", &["login", "servers.admin"], &config, Duration::hours(1));
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.granted_scopes(), HashSet::from([Scope::Login]));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = sign("alice", &["login"], &config, Duration::hours(1));
        let other = JwtConfig {
            secret: "other".into(),
            ..test_config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let config = test_config();
        let token = sign("alice", &["login"], &config, Duration::hours(1));
        let other = JwtConfig {
            issuer: "someone-else".into(),
            ..test_config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let token = sign("alice", &["login"], &config, Duration::hours(-2));
        assert!(verify_token(&token, &config).is_err());
    }
}
