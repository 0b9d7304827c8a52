//! Session tokens: HS256 JWTs stored in the session cookie.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yatube_core::ports::{AuthError, TokenClaims, TokenService};

const DEV_SECRET: &str = "yatube-dev-secret";
const DEFAULT_LIFETIME_HOURS: i64 = 24;
const DEFAULT_ISSUER: &str = "yatube";

/// Session token settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEV_SECRET.to_string(),
            expiration_hours: DEFAULT_LIFETIME_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|hours| hours.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        if config.uses_dev_secret() {
            let production = matches!(
                std::env::var("RUST_ENV").as_deref(),
                Ok("production") | Ok("prod")
            );
            if production {
                tracing::error!("JWT_SECRET is unset in production; sessions can be forged");
            } else {
                tracing::warn!("JWT_SECRET is unset, signing sessions with the development secret");
            }
        }

        config
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_SECRET
    }
}

/// What goes inside a session token.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User id.
    sub: String,
    username: String,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Issues and checks session tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        let issued = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iss: self.config.issuer.clone(),
            iat: issued.timestamp(),
            exp: (issued + TimeDelta::hours(self.config.expiration_hours)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;
        let claims = data.claims;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            username: claims.username,
            exp: claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        TimeDelta::hours(self.config.expiration_hours).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(edit: impl FnOnce(&mut JwtConfig)) -> JwtTokenService {
        let mut config = JwtConfig {
            secret: "session-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "yatube-test".to_string(),
        };
        edit(&mut config);
        JwtTokenService::new(config)
    }

    #[test]
    fn test_session_carries_user() {
        let tokens = service(|_| {});
        let user_id = Uuid::new_v4();

        let claims = tokens
            .validate_token(&tokens.generate_token(user_id, "leo").unwrap())
            .unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.username, "leo");
    }

    #[test]
    fn test_garbage_cookie_is_rejected() {
        let result = service(|_| {}).validate_token("not-a-token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let tokens = service(|_| {});
        let mut token = tokens.generate_token(Uuid::new_v4(), "leo").unwrap();
        token.push('x');

        assert!(tokens.validate_token(&token).is_err());
    }

    #[test]
    fn test_other_secret_or_issuer_is_rejected() {
        let token = service(|_| {})
            .generate_token(Uuid::new_v4(), "leo")
            .unwrap();

        assert!(
            service(|c| c.secret = "another-secret".into())
                .validate_token(&token)
                .is_err()
        );
        assert!(
            service(|c| c.issuer = "elsewhere".into())
                .validate_token(&token)
                .is_err()
        );
    }

    #[test]
    fn test_expired_session() {
        let tokens = service(|c| c.expiration_hours = -2);
        let token = tokens.generate_token(Uuid::new_v4(), "leo").unwrap();

        assert!(matches!(
            tokens.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_cookie_lifetime_matches_token() {
        assert_eq!(service(|c| c.expiration_hours = 24).expiration_seconds(), 86_400);
        assert!(JwtConfig::default().uses_dev_secret());
    }
}
