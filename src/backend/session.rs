use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{FieldErrors, OverlayError, RecordId, Result};
use crate::runtime::{Session, SessionProvider, SessionUser};

/// Stored account: identity plus the bcrypt hash of its password.
#[derive(Debug, Clone)]
struct Account {
    user: SessionUser,
    password_hash: String,
}

/// In-memory account registry and the active session slot.
///
/// One session at a time: signing in replaces the active session, signing
/// out clears it. Owner scoping everywhere else derives from the active
/// session's user id.
pub struct SessionService {
    accounts: RwLock<HashMap<String, Account>>,
    active: RwLock<Option<Session>>,
}

impl SessionService {
    pub fn new() -> Self {
        SessionService {
            accounts: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Hashes a password with bcrypt at the default cost factor.
    fn hash_password(password: &str) -> Result<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|err| OverlayError::Internal(format!("password hashing failed: {err}")))
    }

    /// Verifies a password against a stored hash. A malformed hash counts
    /// as a mismatch.
    fn verify_password(password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    fn validate_credentials(email: &str, password: &str) -> Result<()> {
        let mut errors = FieldErrors::new();
        if email.trim().is_empty() || !email.contains('@') {
            errors.push("email", "must be a valid email address");
        }
        if password.len() < 8 {
            errors.push("password", "must be at least 8 characters long");
        }
        errors.into_result()
    }

    /// Registers an account and signs it in.
    ///
    /// # Errors
    /// `OverlayError::Validation` for malformed credentials,
    /// `OverlayError::Conflict` when the email is already registered.
    pub async fn sign_up(
        &self,
        email: &str,
        name: Option<&str>,
        password: &str,
    ) -> Result<Session> {
        Self::validate_credentials(email, password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(OverlayError::Conflict(format!(
                "account '{email}' already exists"
            )));
        }

        let user = SessionUser {
            id: RecordId::new(Uuid::new_v4().to_string()),
            email: email.to_string(),
            name: name.map(str::to_string),
        };
        accounts.insert(
            email.to_string(),
            Account {
                user: user.clone(),
                password_hash: Self::hash_password(password)?,
            },
        );
        drop(accounts);

        let session = Session { user };
        *self.active.write().await = Some(session.clone());
        Ok(session)
    }

    /// Authenticates and activates a session.
    ///
    /// # Errors
    /// `OverlayError::Forbidden` for an unknown email or a wrong password;
    /// the message does not reveal which.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(email)
            .ok_or_else(|| OverlayError::Forbidden("invalid email or password".into()))?;
        if !Self::verify_password(password, &account.password_hash) {
            return Err(OverlayError::Forbidden("invalid email or password".into()));
        }
        let session = Session {
            user: account.user.clone(),
        };
        drop(accounts);

        *self.active.write().await = Some(session.clone());
        Ok(session)
    }

    pub async fn sign_out(&self) {
        *self.active.write().await = None;
    }

    /// Returns the active session.
    ///
    /// # Errors
    /// `OverlayError::Unauthenticated` when nobody is signed in.
    pub async fn current(&self) -> Result<Session> {
        self.active
            .read()
            .await
            .clone()
            .ok_or(OverlayError::Unauthenticated)
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for SessionService {
    async fn current_session(&self) -> Result<Session> {
        self.current().await
    }
}
