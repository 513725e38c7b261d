//! Bearer-token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the stable user id plus display metadata.
//! Verification checks the signature and the expiry; anything else about the
//! account is looked up fresh per request.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::ServerError;

/// Default token validity, in days.
pub const DEFAULT_TOKEN_DAYS: i64 = 30;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    #[serde(default)]
    pub nick_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub login_type: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity_days: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, validity_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validity_days,
        }
    }

    /// Issue a token for a resolved user.
    pub fn issue(
        &self,
        user_id: &str,
        nick_name: Option<String>,
        avatar_url: Option<String>,
        login_type: &str,
    ) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            nick_name,
            avatar_url,
            login_type: login_type.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.validity_days)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| ServerError::Generic(format!("failed to issue token: {err}")))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ServerError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ServerError::Unauthorized("token invalid or expired".to_string()))
    }
}
