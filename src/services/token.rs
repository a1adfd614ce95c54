use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppError;

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expire_minutes: i64,
}

impl TokenService {
    pub fn new(secret: String, expire_minutes: i64) -> Self {
        Self {
            secret,
            expire_minutes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.effective_secret_key(),
            config.effective_token_expire_minutes(),
        )
    }

    pub fn create_access_token(&self, subject: &str) -> Result<String, AppError> {
        let expire = Utc::now() + Duration::minutes(self.expire_minutes);
        let claims = Claims {
            sub: subject.to_string(),
            exp: expire.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}
