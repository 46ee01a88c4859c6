// File: src/auth.rs
// Purpose: Password hashing, in-memory sessions, flash messages and the login gate

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::{Database, User};
use crate::error::AppError;
use crate::state::AppState;

pub const DEFAULT_ADMIN_USER: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
    #[error("password check was interrupted")]
    Interrupted(#[from] tokio::task::JoinError),
}

// ============================================================================
// PASSWORDS
// ============================================================================

/// Hash a password into an Argon2 PHC string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    // 16 random bytes from a v4 UUID make the salt
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::Hash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::MalformedHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Look the user up and check the password off the async runtime
pub async fn authenticate(
    db: &Database,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = db.find_user(username.trim()).await? else {
        return Ok(None);
    };

    let password = password.to_string();
    let stored = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(AuthError::from)??;

    Ok(valid.then_some(user))
}

/// Create the default administrator when it does not exist yet
///
/// Returns `true` when the account was created.
pub async fn ensure_admin(db: &Database) -> anyhow::Result<bool> {
    if db.find_user(DEFAULT_ADMIN_USER).await?.is_some() {
        return Ok(false);
    }

    let hash = hash_password(DEFAULT_ADMIN_PASSWORD)?;
    db.create_user(DEFAULT_ADMIN_USER, &hash).await?;
    tracing::info!("Created default user '{}'", DEFAULT_ADMIN_USER);
    Ok(true)
}

// ============================================================================
// FLASH MESSAGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    /// Bootstrap alert class
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "alert-success",
            FlashLevel::Danger => "alert-danger",
        }
    }
}

/// One-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

// ============================================================================
// SESSIONS
// ============================================================================

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    expires_at: Instant,
    flashes: Vec<Flash>,
}

impl Session {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Server-side sessions keyed by the id stored in the cookie
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self, user: &User) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            user_id: user.id,
            username: user.username.clone(),
            expires_at: Instant::now() + self.ttl,
            flashes: Vec::new(),
        };
        self.inner.write().await.insert(id, session);
        id
    }

    /// Live session for this id; expired ones are dropped on the way
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let now = Instant::now();
        {
            let sessions = self.inner.read().await;
            match sessions.get(&id) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                None => return None,
                Some(_) => {}
            }
        }

        self.inner.write().await.remove(&id);
        None
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn push_flash(&self, id: Uuid, flash: Flash) {
        if let Some(session) = self.inner.write().await.get_mut(&id) {
            session.flashes.push(flash);
        }
    }

    /// Pending flashes, cleared once read
    pub async fn take_flashes(&self, id: Uuid) -> Vec<Flash> {
        self.inner
            .write()
            .await
            .get_mut(&id)
            .map(|session| std::mem::take(&mut session.flashes))
            .unwrap_or_default()
    }

    /// Drop every expired session, returning how many went
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }
}

// ============================================================================
// COOKIES
// ============================================================================

/// Read one cookie from the Cookie header
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(name: &str, id: Uuid, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name,
        id,
        ttl.as_secs()
    )
}

pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

// ============================================================================
// EXTRACTOR
// ============================================================================

/// The logged-in user; rejects with a redirect to `/login`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: Uuid,
    pub user_id: i64,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = read_cookie(&parts.headers, &state.config.auth.cookie_name)
            .and_then(|value| Uuid::parse_str(&value).ok())
            .ok_or(AppError::Unauthorized)?;

        let session = state
            .sessions
            .get(session_id)
            .await
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser {
            session_id,
            user_id: session.user_id,
            username: session.username,
        })
    }
}
