//! Shared-password login and the in-memory session store.
//!
//! There is exactly one credential pair. A successful login issues an opaque
//! access token that stays valid until it expires or is revoked by logout.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Deliberately says nothing about which half was wrong
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// The single configured username/password pair
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token handed out on a successful login
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthService {
    credentials: AdminCredentials,
    sessions: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(credentials: AdminCredentials, session_ttl: Duration) -> Self {
        Self {
            credentials,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Check the pair and issue a fresh token on a match
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        // Evaluate both halves so timing does not reveal which one failed
        let username_ok = constant_time_eq(username.as_bytes(), self.credentials.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.credentials.password.as_bytes());

        if !(username_ok & password_ok) {
            warn!("Rejected login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let token = AccessToken {
            value: Uuid::new_v4().to_string(),
            expires_at: now + self.session_ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(token.value.clone(), token.expires_at);

        info!("Admin logged in; {} live sessions", sessions.len());
        Ok(token)
    }

    pub async fn is_authenticated(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        match sessions.get(token) {
            Some(expires_at) => *expires_at > Utc::now(),
            None => false,
        }
    }

    /// Revoke the token if there is one. Always succeeds.
    pub async fn logout(&self, token: Option<&str>) {
        let Some(token) = token else {
            debug!("Logout without a session cookie");
            return;
        };

        let removed = self.sessions.write().await.remove(token).is_some();
        if removed {
            info!("Admin logged out");
        } else {
            debug!("Logout for an unknown or expired session");
        }
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    let mut diff = left.len() ^ right.len();
    for (index, byte) in left.iter().enumerate() {
        let other = right.get(index % right.len().max(1)).copied().unwrap_or(0);
        diff |= usize::from(byte ^ other);
    }
    diff == 0
}
