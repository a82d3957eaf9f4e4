//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! claims carry the caller's role and the flattened permission actions, so
//! authorization never needs a database round-trip.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rbac_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{env_non_empty, env_parse, ConfigError};

/// Access-token payload.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// The user's email address.
    pub email: String,
    /// The user's role id.
    pub role_id: DbId,
    /// The user's role name (e.g. `"admin"`).
    pub role: String,
    /// Permission actions granted through the role, sorted.
    pub permissions: Vec<String>,
    pub iat: i64,
    /// Unix seconds; `iat` plus the configured lifetime.
    pub exp: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Identity and grants to embed in a new token.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: DbId,
    pub email: &'a str,
    pub role_id: DbId,
    pub role: &'a str,
    pub permissions: &'a [String],
}

/// Signing secret and token lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds (default: 3600).
    pub access_token_expiry_secs: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .finish()
    }
}

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Default access token expiry in seconds.
const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 3600;

impl JwtConfig {
    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }

    /// Read `JWT_SECRET` and `JWT_ACCESS_EXPIRY_SECS`.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_SECS` | no       | `3600`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env_non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let access_token_expiry_secs =
            env_parse("JWT_ACCESS_EXPIRY_SECS", DEFAULT_ACCESS_EXPIRY_SECS)?;

        Ok(Self {
            secret,
            access_token_expiry_secs,
        })
    }
}

/// Generate an HS256 access token, returning it with the signed claims.
pub fn generate_access_token(
    subject: &TokenSubject<'_>,
    config: &JwtConfig,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: subject.user_id,
        email: subject.email.to_string(),
        role_id: subject.role_id,
        role: subject.role.to_string(),
        permissions: subject.permissions.to_vec(),
        iat: now,
        exp: now + config.access_token_expiry_secs,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(&Header::new(ALGORITHM), &claims, &config.encoding_key())?;
    Ok((token, claims))
}

/// Check the signature and expiry of `token` and return its claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(ALGORITHM);
    decode::<Claims>(token, &config.decoding_key(), &validation).map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-signing-secret".to_string(),
            access_token_expiry_secs: 3600,
        }
    }

    fn subject(permissions: &[String]) -> TokenSubject<'_> {
        TokenSubject {
            user_id: 42,
            email: "ada@example.com",
            role_id: 1,
            role: "admin",
            permissions,
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let config = config();
        let permissions = vec!["GetRole".to_string(), "GetUser".to_string()];
        let (token, issued) = generate_access_token(&subject(&permissions), &config)
            .unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role_id, 1);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.permissions, permissions);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config();

        // Past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            email: "ada@example.com".to_string(),
            role_id: 1,
            role: "admin".to_string(),
            permissions: vec![],
            iat: now - 600,
            exp: now - 300,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &config.encoding_key()).unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let signer = config();
        let verifier = JwtConfig {
            secret: "some-other-secret".to_string(),
            ..config()
        };

        let (token, _) = generate_access_token(&subject(&[]), &signer).unwrap();
        assert!(validate_token(&token, &verifier).is_err());
    }

    #[test]
    fn claims_use_camel_case_keys() {
        let (_, claims) = generate_access_token(&subject(&[]), &config()).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("roleId").is_some());
        assert!(json.get("role_id").is_none());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("signing-secret"));
    }
}
