use crate::config::Config;
use crate::errors::AppError;
use crate::services::token::{Claims, TokenService};

/// Verifies admin credentials and mints access tokens.
///
/// The configured plaintext password is bcrypt-hashed once at startup so the
/// running process never keeps it around for comparison.
#[derive(Clone)]
pub struct AuthService {
    admin_username: String,
    admin_password_hash: String,
    tokens: TokenService,
}

impl AuthService {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let admin_password_hash =
            bcrypt::hash(config.effective_admin_password(), bcrypt::DEFAULT_COST)
                .map_err(|_| AppError::Internal)?;

        Ok(Self {
            admin_username: config.effective_admin_username(),
            admin_password_hash,
            tokens: TokenService::from_config(config),
        })
    }

    /// Returns a signed access token when the credentials match the admin account.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let password_ok =
            bcrypt::verify(password, &self.admin_password_hash).unwrap_or(false);
        if username != self.admin_username || !password_ok {
            return Err(AppError::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }
        self.tokens.create_access_token(username)
    }

    /// Validates an `Authorization: Bearer <token>` header value.
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Claims, AppError> {
        let header = header
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected a Bearer token".to_string()))?;
        self.tokens.decode_access_token(token)
    }
}
