use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::AppError;
use crate::models::User;
use crate::repository::UserRepository;
use crate::state::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const UNKNOWN_AUTH_ERROR: &str = "Unknown authentication error.";

const MIN_PASSWORD_LEN: usize = 6;

/// Container for the authenticated user's id stored in request extensions.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Uuid);

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's UUID as a string.
    pub sub: String,
    pub exp: usize,
}

/// Sign-in form.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Checks the shape of the credentials before any lookup happens.
    fn is_well_formed(&self) -> bool {
        self.email.validate_email() && self.password.chars().count() >= MIN_PASSWORD_LEN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Unknown email, wrong password or malformed credentials
    CredentialsSignin,
    /// The stored hash could not be checked
    HashVerification,
    /// The session token could not be signed
    SessionIssue,
}

/// Sign-in failure reported back to the login form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("authentication failed: {kind:?}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    /// Single-line message shown on the login form.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::CredentialsSignin => INVALID_CREDENTIALS,
            _ => UNKNOWN_AUTH_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn { token: String },
    Rejected(String),
}

/// Signs users in with email and password and issues session tokens.
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    secret: String,
    ttl_seconds: i64,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            users,
            secret: secret.into(),
            ttl_seconds,
        }
    }

    /// Resolves the user matching `credentials`.
    ///
    /// Returns `Ok(None)` when the credentials are malformed, the user does
    /// not exist or the password does not match.
    ///
    /// # Errors
    ///
    /// A failed user lookup propagates as-is. A stored hash that bcrypt
    /// cannot read is an `AuthError` of kind `HashVerification`.
    pub async fn authorize(&self, credentials: &Credentials) -> anyhow::Result<Option<User>> {
        if credentials.is_well_formed() {
            let Some(user) = self.users.find_user_by_email(&credentials.email).await? else {
                info!("No user found for the given email");
                return Ok(None);
            };

            let matches = bcrypt::verify(&credentials.password, &user.password).map_err(|e| {
                warn!("Password hash for user {} could not be verified: {}", user.id, e);
                AuthError::new(AuthErrorKind::HashVerification)
            })?;

            if matches {
                return Ok(Some(user));
            }
        }

        info!("Invalid credentials provided");
        Ok(None)
    }

    /// Runs a sign-in attempt and maps authentication failures to messages.
    ///
    /// Any error that is not an `AuthError` propagates to the caller.
    pub async fn authenticate(&self, credentials: &Credentials) -> anyhow::Result<LoginOutcome> {
        match self.sign_in(credentials).await {
            Ok(token) => Ok(LoginOutcome::SignedIn { token }),
            Err(e) => match e.downcast_ref::<AuthError>() {
                Some(auth_error) => Ok(LoginOutcome::Rejected(auth_error.user_message().to_string())),
                None => Err(e),
            },
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> anyhow::Result<String> {
        let user = self
            .authorize(credentials)
            .await?
            .ok_or(AuthError::new(AuthErrorKind::CredentialsSignin))?;

        info!("User {} signed in", user.id);
        Ok(self.issue_token(user.id)?)
    }

    /// Signs a session token for `user_id`.
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let exp = Utc::now().timestamp() + self.ttl_seconds;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: usize::try_from(exp).unwrap_or(0),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            warn!("Failed to sign session token: {}", e);
            AuthError::new(AuthErrorKind::SessionIssue)
        })
    }

    /// Verifies a session token and returns its user id.
    pub fn verify_token(&self, token: &str) -> Option<Uuid> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let claims = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
            .ok()?
            .claims;
        Uuid::parse_str(&claims.sub).ok()
    }
}

/// Middleware to validate a Bearer session token in the `Authorization` header.
///
/// On success the request is forwarded with a `CurrentUser` extension; on
/// failure `AppError::Unauthorized` is returned.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let user_id = state
        .auth
        .verify_token(token)
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser(user_id));

    Ok(next.run(req).await)
}
