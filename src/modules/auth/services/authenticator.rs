use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};

use crate::config::AuthConfig;
use crate::core::{AppError, Result};
use crate::modules::auth::models::AuthenticatedUser;

/// Checks login attempts against the single configured account
pub struct Authenticator<'a> {
    config: &'a AuthConfig,
}

impl<'a> Authenticator<'a> {
    pub fn new(config: &'a AuthConfig) -> Self {
        Self { config }
    }

    /// Verify a username/password pair
    ///
    /// # Errors
    /// - `Configuration` when no account is configured
    /// - `Unauthorized` when either half does not match
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthenticatedUser> {
        let (expected_username, password_hash) = self.config.credentials().ok_or_else(|| {
            AppError::configuration("Authentication system is not properly configured")
        })?;

        // Always run the hash check so a wrong username costs the same as a wrong password.
        let password_ok = verify_password(password, password_hash)?;
        if username != expected_username || !password_ok {
            tracing::warn!(username = %username, "Rejected login attempt");
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        Ok(AuthenticatedUser::new(username))
    }

    /// Check the headers the frontend adds to every login call
    pub fn check_client_headers(
        &self,
        app_auth: Option<&str>,
        requested_with: Option<&str>,
    ) -> Result<()> {
        if app_auth != Some(self.config.app_auth_key.as_str())
            || requested_with != Some("XMLHttpRequest")
        {
            return Err(AppError::forbidden("Unauthorized access"));
        }
        Ok(())
    }
}

/// Hash a password into an Argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against an Argon2 PHC string
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::configuration(format!("Invalid password hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
