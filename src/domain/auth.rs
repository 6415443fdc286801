//! Registration and login on top of a credential store
//!
//! The store keeps one `(username, password)` pair per service key; the
//! email is the service key and the display name is the username.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Stored credential pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Failure of the underlying secure store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("credential store unavailable: {0}")]
pub struct StoreError(pub String);

/// Secure storage keyed by service
pub trait CredentialStore {
    fn get(&self, service: &str) -> Result<Option<Credentials>, StoreError>;
    fn set(&mut self, service: &str, credentials: Credentials) -> Result<(), StoreError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Box<S> {
    fn get(&self, service: &str) -> Result<Option<Credentials>, StoreError> {
        (**self).get(service)
    }

    fn set(&mut self, service: &str, credentials: Credentials) -> Result<(), StoreError> {
        (**self).set(service, credentials)
    }
}

/// User-visible authentication failures, all retryable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AuthError {
    #[error("Wrong credentials")]
    WrongCredentials,
    #[error("Such user already exists, please log in instead")]
    UserExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unknown error")]
    Unknown,
}

impl From<StoreError> for AuthError {
    fn from(_: StoreError) -> Self {
        AuthError::Unknown
    }
}

/// Account operations used by the signup screen
#[derive(Debug)]
pub struct AuthService<S> {
    store: S,
}

impl<S: CredentialStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an account for `email` unless one already exists
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        if self.store.get(email)?.is_some() {
            debug!(email, "registration rejected, account exists");
            return Err(AuthError::UserExists);
        }

        self.store.set(
            email,
            Credentials {
                username: name.to_owned(),
                password: password.to_owned(),
            },
        )?;
        info!(email, "account registered");
        Ok(())
    }

    /// Checks the password and returns the stored display name
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let Some(credentials) = self.store.get(email)? else {
            return Err(AuthError::UserNotFound);
        };

        if credentials.password == password {
            info!(email, "login succeeded");
            Ok(credentials.username)
        } else {
            debug!(email, "login rejected, wrong password");
            Err(AuthError::WrongCredentials)
        }
    }
}
