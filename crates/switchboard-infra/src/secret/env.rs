//! Environment variable secret source.
//!
//! Read on every lookup, so a rotated key takes effect without a restart.

use secrecy::SecretString;

use switchboard_core::relay::SecretSource;

#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecrets;

impl EnvSecrets {
    pub fn new() -> Self {
        Self
    }
}

impl SecretSource for EnvSecrets {
    fn get(&self, name: &str) -> Option<SecretString> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!(env = name, "Secret variable is not valid unicode, ignoring");
                None
            }
        }
    }
}
