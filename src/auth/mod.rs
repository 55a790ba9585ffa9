use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

/// Token claims. `sub` is the tenant every data operation is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// A string or an array of strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidKey(String),
    InvalidSecret,
    SigningUnavailable,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            JwtError::InvalidKey(msg) => write!(f, "Invalid JWT public key: {}", msg),
            JwtError::InvalidSecret => write!(f, "JWT secret not configured"),
            JwtError::SigningUnavailable => write!(f, "Token signing requires an HS256 secret"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Verifies bearer tokens, and mints them when a shared secret is configured.
pub struct JwtAuth {
    decoding: DecodingKey,
    encoding: Option<EncodingKey>,
    validation: Validation,
    issuer: Option<String>,
    audience: Option<String>,
}

impl JwtAuth {
    /// An RS256 public key wins over the HS256 secret when both are set.
    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        let (decoding, encoding, mut validation) = match security.jwt_public_key_pem.as_deref() {
            Some(pem) => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| JwtError::InvalidKey(e.to_string()))?;
                (key, None, Validation::new(Algorithm::RS256))
            }
            None => {
                if security.jwt_secret.is_empty() {
                    return Err(JwtError::InvalidSecret);
                }
                let secret = security.jwt_secret.as_bytes();
                (
                    DecodingKey::from_secret(secret),
                    Some(EncodingKey::from_secret(secret)),
                    Validation::new(Algorithm::HS256),
                )
            }
        };

        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = security.jwt_issuer.as_deref() {
            validation.set_issuer(&[issuer]);
        }
        match security.jwt_audience.as_deref() {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding,
            encoding,
            validation,
            issuer: security.jwt_issuer.clone(),
            audience: security.jwt_audience.clone(),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;
        if data.claims.sub.trim().is_empty() {
            return Err(JwtError::InvalidToken("empty subject".to_string()));
        }
        Ok(data.claims)
    }

    /// Mint an HS256 token for `subject`, carrying the configured issuer and
    /// audience so it passes [`JwtAuth::verify`].
    pub fn issue(&self, subject: &str, ttl_minutes: i64) -> Result<String, JwtError> {
        let key = self.encoding.as_ref().ok_or(JwtError::SigningUnavailable)?;
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone().map(serde_json::Value::String),
        };
        encode(&Header::new(Algorithm::HS256), &claims, key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }
}
