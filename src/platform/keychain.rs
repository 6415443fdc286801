//! In-memory credential store
//!
//! Stands in for the device keychain: one credential pair per service key,
//! lost when the process exits.

use std::collections::HashMap;

use crate::domain::auth::{CredentialStore, Credentials, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryKeychain {
    entries: HashMap<String, Credentials>,
    unavailable: bool,
}

impl InMemoryKeychain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent access fail, as a locked keychain would
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError("keychain locked".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl CredentialStore for InMemoryKeychain {
    fn get(&self, service: &str) -> Result<Option<Credentials>, StoreError> {
        self.check_available()?;
        Ok(self.entries.get(service).cloned())
    }

    fn set(&mut self, service: &str, credentials: Credentials) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.insert(service.to_owned(), credentials);
        Ok(())
    }
}
