//! Device token issuance and verification
//!
//! Devices trade their credentials for a short-lived HS256 access token and a
//! long-lived refresh token. The access token is an opaque capability proving
//! which device/session namespace a request may touch.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use plushpal_config::AuthConfig;

use crate::state::AppState;
use crate::ServerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    device_id: String,
    exp: i64,
    typ: TokenType,
}

/// A validated device claim: (device identifier, expiry)
#[derive(Debug, Clone)]
pub struct DeviceClaims {
    pub device_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies device tokens
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret_key.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
        }
    }

    pub fn issue_access(&self, device_id: &str) -> Result<String, ServerError> {
        self.issue(device_id, TokenType::Access, self.access_ttl)
    }

    pub fn issue_refresh(&self, device_id: &str) -> Result<String, ServerError> {
        self.issue(device_id, TokenType::Refresh, self.refresh_ttl)
    }

    fn issue(&self, device_id: &str, typ: TokenType, ttl: Duration) -> Result<String, ServerError> {
        let claims = Claims {
            device_id: device_id.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            typ,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ServerError::Internal(format!("token encoding failed: {}", e)))
    }

    pub fn verify_access(&self, token: &str) -> Result<DeviceClaims, ServerError> {
        self.verify(token, TokenType::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<DeviceClaims, ServerError> {
        self.verify(token, TokenType::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<DeviceClaims, ServerError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| ServerError::Auth(format!("token rejected: {}", e)))?;

        if data.claims.typ != expected {
            return Err(ServerError::Auth("wrong token type".to_string()));
        }

        Ok(DeviceClaims {
            device_id: data.claims.device_id,
            expires_at: DateTime::from_timestamp(data.claims.exp, 0).unwrap_or_else(Utc::now),
        })
    }
}

/// Bearer-token extractor for protected routes
#[async_trait]
impl FromRequestParts<AppState> for DeviceClaims {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServerError::Auth("missing authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServerError::Auth("expected a bearer token".to_string()))?;

        state.auth.verify_access(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            secret_key: "test-secret".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn access_token_round_trip() {
        let issuer = issuer();
        let token = issuer.issue_access("toy-42").unwrap();
        let claims = issuer.verify_access(&token).unwrap();
        assert_eq!(claims.device_id, "toy-42");
        assert!(claims.expires_at > Utc::now());
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let issuer = issuer();
        let refresh = issuer.issue_refresh("toy-42").unwrap();
        assert!(issuer.verify_access(&refresh).is_err());
        assert!(issuer.verify_refresh(&refresh).is_ok());
    }

    #[test]
    fn expired_token_rejected() {
        let issuer = issuer();
        // well past the default validation leeway
        let token = issuer
            .issue("toy-42", TokenType::Access, Duration::minutes(-10))
            .unwrap();
        assert!(issuer.verify_access(&token).is_err());
    }

    #[test]
    fn wrong_signing_key_rejected() {
        let token = issuer().issue_access("toy-42").unwrap();
        let other = TokenIssuer::new(&AuthConfig {
            secret_key: "different-secret".to_string(),
            ..Default::default()
        });
        assert!(other.verify_access(&token).is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(issuer().verify_access("not.a.jwt").is_err());
    }
}
