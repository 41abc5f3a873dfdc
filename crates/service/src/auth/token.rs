use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use models::auth::AuthenticatedUser;
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

/// Identity claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "IdUser")]
    pub id_user: String,
    #[serde(rename = "UserName")]
    pub user_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "IsActiveUser")]
    pub is_active_user: String,
    #[serde(rename = "CreatedAtUser")]
    pub created_at_user: String,
    #[serde(rename = "UpdatedAtUser")]
    pub updated_at_user: String,
    pub jti: String,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Whole seconds between issue and expiry.
    pub expires_in: i64,
}

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Expired,
    Invalid,
}

/// Signs and checks HS256 tokens with the configured secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, expiration_hours: f64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Config("JWT secret key is not configured".into()));
        }
        if expiration_hours > configs::MAX_EXPIRATION_HOURS {
            return Err(AuthError::Config(format!(
                "JWT expiration of {expiration_hours} hours exceeds {}",
                configs::MAX_EXPIRATION_HOURS
            )));
        }
        let hours = if expiration_hours.is_finite() && expiration_hours > 0.0 { expiration_hours } else { 6.0 };
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::milliseconds((hours * 3_600_000.0) as i64),
        })
    }

    pub fn from_config(cfg: &configs::JwtConfig) -> Result<Self, AuthError> {
        Self::new(&cfg.secret_key, cfg.expiration_hours)
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime.num_seconds()
    }

    pub fn issue(&self, user: &AuthenticatedUser, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now + self.lifetime;
        let stamp = now.to_rfc3339();
        let claims = Claims {
            id_user: user.user_id.to_string(),
            user_name: user.username.clone(),
            email: user.email.clone(),
            is_active_user: user.is_active.to_string(),
            created_at_user: stamp.clone(),
            updated_at_user: stamp,
            jti: uuid::Uuid::new_v4().to_string(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(e.to_string()))?;
        Ok(IssuedToken { token, expires_at, expires_in: self.lifetime_secs() })
    }

    /// Signature and expiry are checked with no clock skew allowance.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                _ => TokenRejection::Invalid,
            })
    }
}
