//! JWT token service
//!
//! Issues, validates and parses access tokens. Refresh tokens are opaque
//! database rows, not JWTs (see `db::tokens`).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (should be at least 32 bytes)
    pub secret: String,
    /// Access token lifetime in minutes
    pub expiration_minutes: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl JwtConfig {
    /// Build from the signing secret and lifetime. Issuer and audience can
    /// be overridden via JWT_ISSUER / JWT_AUDIENCE.
    pub fn new(secret: String, expiration_minutes: i64) -> Self {
        Self {
            secret,
            expiration_minutes,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "market-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "market-clients".to_string()),
        }
    }
}

/// Access token payload.
///
/// Registered claims first, then the user context. `token_type` is always
/// "access" so a stolen refresh token can never pass as a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id, as a decimal string
    pub sub: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    pub username: String,
    pub role: String,
    pub token_type: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("token rejected: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("signature mismatch")]
    InvalidSignature,

    #[error("could not sign token: {0}")]
    GenerationFailed(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::InvalidToken(e.to_string()),
        }
    }
}

/// Holds the derived signing keys so they are computed once at startup.
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    /// Sign an access token for the user.
    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let issued = Utc::now();
        let expires = issued + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires.timestamp(),
            iat: issued.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            username: username.to_string(),
            role: role.to_string(),
            token_type: "access".to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Decode and validate signature, expiry, issuer and audience.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&self.config.audience));
        validation.set_issuer(std::slice::from_ref(&self.config.issuer));
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Extract the bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Current user context (parsed from JWT claims)
///
/// Created by the extractor; declare it as a handler argument to protect
/// the route.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken("subject is not a numeric user id".to_string()))?;

        Ok(Self {
            id,
            username: claims.username,
            role: claims.role,
        })
    }
}

impl CurrentUser {
    /// Whether this user has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret-unit-test-secret!!!".to_string(),
            expiration_minutes: 60,
            issuer: "market-server".to_string(),
            audience: "market-clients".to_string(),
        }
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let service = JwtService::new(test_config());

        let token = service
            .generate_token(42, "john_doe", "user")
            .expect("signing must succeed");
        let claims = service
            .validate_token(&token)
            .expect("own token must validate");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "john_doe");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = JwtConfig {
            expiration_minutes: -10,
            ..test_config()
        };
        let service = JwtService::new(config);

        let token = service
            .generate_token(1, "old", "user")
            .expect("signing must succeed");

        match service.validate_token(&token) {
            Err(JwtError::ExpiredToken) => {}
            other => panic!("expected ExpiredToken, got {:?}", other.map(|c| c.sub)),
        }
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let issuing = JwtService::new(test_config());
        let validating = JwtService::new(JwtConfig {
            audience: "other-clients".to_string(),
            ..test_config()
        });

        let token = issuing
            .generate_token(1, "alice", "user")
            .expect("signing must succeed");

        assert!(validating.validate_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = JwtService::new(test_config());
        let token = service.generate_token(1, "alice", "user").unwrap();

        let mut forged = token.clone();
        forged.pop();
        forged.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(service.validate_token(&forged).is_err());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(
            JwtService::extract_from_header("Bearer abc.def.ghi"),
            Some("abc.def.ghi")
        );
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("bearer abc"), None);
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = JwtService::new(test_config());
        let token = service.generate_token(7, "eva", "admin").unwrap();
        let claims = service.validate_token(&token).unwrap();

        let user = CurrentUser::try_from(claims).expect("numeric sub must parse");
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "eva");
        assert!(user.is_admin());
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            exp: 0,
            iat: 0,
            iss: String::new(),
            aud: String::new(),
            username: "x".to_string(),
            role: "user".to_string(),
            token_type: "access".to_string(),
        };

        assert!(CurrentUser::try_from(claims).is_err());
    }
}
