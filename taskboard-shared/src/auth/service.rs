/// The auth service
///
/// Owns the process-wide token secret and exposes the three authentication
/// operations: registration, login, and the bearer-token gate. The secret is
/// handed in at construction (from configuration) and never read ad hoc.
///
/// The gate, [`AuthService::verify_bearer`], is a plain function over the
/// request's `Authorization` header value. Protected handlers call it first
/// and get back either the caller's identity or a typed failure; nothing is
/// injected behind the handler's back.
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::jwt::{self, Claims, JwtError};
use super::password::{self, PasswordError};
use crate::models::user::{CreateUser, User};

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration attempted with an email that is already taken
    #[error("A user with this email already exists")]
    DuplicateEmail,

    /// Login with an unknown email or a wrong password
    ///
    /// The two cases are deliberately indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer credential on the request
    #[error("Missing bearer token")]
    MissingToken,

    /// Bearer credential failed signature, expiry, or issuer checks
    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[source] JwtError),

    /// Could not sign a token at login
    #[error("Failed to issue token: {0}")]
    TokenCreation(#[source] JwtError),

    /// Password hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Underlying store failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Registration, login, and token verification
///
/// Cheap to clone; holds only the signing secret.
#[derive(Clone)]
pub struct AuthService {
    secret: String,
}

impl AuthService {
    /// Creates an auth service signing with `secret`
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Registers a new account
    ///
    /// Fails with [`AuthError::DuplicateEmail`] if a user with that email
    /// already exists. Checked explicitly before the insert, with the
    /// store's unique index as the backstop against a concurrent insert.
    /// Returns the created user and no token; the caller logs in separately.
    pub async fn register(
        &self,
        pool: &PgPool,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        if User::find_by_email(pool, email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = password::hash_password(password)?;

        let user = User::create(
            pool,
            CreateUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
            },
        )
        .await
        .map_err(|e| match e {
            // Lost the race against a concurrent registration for the same
            // email; the unique index reports it.
            sqlx::Error::Database(db) if db.constraint() == Some("users_email_key") => {
                AuthError::DuplicateEmail
            }
            other => AuthError::Database(other),
        })?;

        debug!(user_id = %user.id, "registered new user");
        Ok(user)
    }

    /// Verifies credentials and issues a 1-hour bearer token
    ///
    /// Fails with [`AuthError::InvalidCredentials`] if the email is unknown
    /// or the password does not match the stored hash.
    pub async fn login(&self, pool: &PgPool, email: &str, password: &str) -> Result<String, AuthError> {
        let user = User::find_by_email(pool, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        User::record_login(pool, user.id).await?;

        let token = jwt::create_token(&Claims::new(user.id), &self.secret)
            .map_err(AuthError::TokenCreation)?;

        debug!(user_id = %user.id, "issued login token");
        Ok(token)
    }

    /// The bearer-token gate
    ///
    /// Takes the raw `Authorization` header value from a request and returns
    /// the authenticated user's identity.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingToken`] if the header is absent or does not
    ///   carry a `Bearer` credential
    /// - [`AuthError::InvalidToken`] if signature, expiry, or issuer checks
    ///   fail
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Uuid, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        let claims = jwt::validate_token(token, &self.secret).map_err(AuthError::InvalidToken)?;

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn service() -> AuthService {
        AuthService::new(SECRET)
    }

    #[test]
    fn test_verify_bearer_missing_header() {
        let result = service().verify_bearer(None);
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_verify_bearer_wrong_scheme() {
        let result = service().verify_bearer(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_verify_bearer_garbage_token() {
        let result = service().verify_bearer(Some("Bearer not-a-token"));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_verify_bearer_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = jwt::create_token(&Claims::new(user_id), SECRET).unwrap();

        let verified = service()
            .verify_bearer(Some(&format!("Bearer {}", token)))
            .unwrap();
        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_verify_bearer_expired_token() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-60));
        let token = jwt::create_token(&claims, SECRET).unwrap();

        let result = service().verify_bearer(Some(&format!("Bearer {}", token)));
        assert!(matches!(
            result,
            Err(AuthError::InvalidToken(JwtError::Expired))
        ));
    }

    #[test]
    fn test_verify_bearer_foreign_secret() {
        let token = jwt::create_token(&Claims::new(Uuid::new_v4()), "some-other-32-byte-secret-key!!!").unwrap();

        let result = service().verify_bearer(Some(&format!("Bearer {}", token)));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
