use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use shared::domain::{Credentials, User, UserId};
use tracing::{debug, info};

use crate::error::AuthError;

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<User, AuthError>;
}

struct MockAccount {
    user: User,
    password: String,
}

/// In-process stand-in for an identity provider, with a fixed account list.
pub struct MockAuthenticator {
    accounts: Vec<MockAccount>,
    latency: Duration,
}

impl MockAuthenticator {
    pub fn new(latency: Duration) -> Self {
        let account = |id, email: &str, name: &str| MockAccount {
            user: User {
                id: UserId(id),
                email: email.into(),
                name: name.into(),
            },
            password: "password123".into(),
        };
        Self {
            accounts: vec![
                account(1, "admin@company.com", "Admin User"),
                account(2, "hr@company.com", "HR Manager"),
            ],
            latency,
        }
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.accounts
            .iter()
            .find(|a| a.user.email == credentials.email && a.password == credentials.password)
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidCredentials)
    }
}

/// Remembers the signed-in user between runs in a small JSON file.
pub struct SessionStore {
    path: PathBuf,
    user: Option<User>,
}

impl SessionStore {
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let user = match tokio::fs::read(&path).await {
            Ok(raw) => Some(
                serde_json::from_slice(&raw)
                    .map_err(|err| session_error(&path, "decode", err))?,
            ),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(session_error(&path, "read", err)),
        };
        debug!(path = %path.display(), signed_in = user.is_some(), "session loaded");
        Ok(Self { path, user })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub async fn login_success(&mut self, user: User) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| session_error(parent, "create directory for", err))?;
        }
        let raw = serde_json::to_vec_pretty(&user)
            .map_err(|err| session_error(&self.path, "encode", err))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|err| session_error(&self.path, "write", err))?;
        info!(email = %user.email, "signed in");
        self.user = Some(user);
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(session_error(&self.path, "remove", err)),
        }
        if let Some(user) = self.user.take() {
            info!(email = %user.email, "signed out");
        }
        Ok(())
    }
}

fn session_error(path: &Path, action: &str, err: impl std::fmt::Display) -> AuthError {
    AuthError::Session(format!("failed to {action} '{}': {err}", path.display()))
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
