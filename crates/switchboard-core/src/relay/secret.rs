//! Where relays read their upstream secrets from.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::SecretString;

/// Read-only lookup of named secrets, consulted on every request.
pub trait SecretSource: Send + Sync {
    /// The secret stored under `name`, or `None` if absent or empty.
    fn get(&self, name: &str) -> Option<SecretString>;
}

impl<T: SecretSource + ?Sized> SecretSource for Arc<T> {
    fn get(&self, name: &str) -> Option<SecretString> {
        (**self).get(name)
    }
}

/// Fixed in-memory secrets.
#[derive(Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl SecretSource for StaticSecrets {
    fn get(&self, name: &str) -> Option<SecretString> {
        self.values
            .get(name)
            .filter(|v| !v.is_empty())
            .map(|v| SecretString::from(v.clone()))
    }
}
