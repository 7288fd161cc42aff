//! Capability -> provider table.
//!
//! Built once at startup from the built-in table, optionally overridden per
//! capability by `[[capabilities]]` config entries, and read-only afterwards.

use std::collections::BTreeMap;

use switchboard_types::capability::Capability;
use switchboard_types::config::{CapabilityConfig, SwitchboardConfig};
use switchboard_types::error::{ConfigError, DispatchError};
use switchboard_types::provider::{DailyLimit, ProviderDescriptor};

use super::builtin;

#[derive(Debug, Clone)]
struct CapabilityEntry {
    providers: Vec<ProviderDescriptor>,
    fallback: String,
}

/// Ordered providers and the designated fallback for every capability.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    entries: BTreeMap<Capability, CapabilityEntry>,
}

impl ProviderRegistry {
    /// Build and validate a table covering every capability.
    ///
    /// Each designated fallback must be unbounded.
    pub fn new(configs: Vec<CapabilityConfig>) -> Result<Self, ConfigError> {
        Self::build(configs, true)
    }

    /// Like [`ProviderRegistry::new`] but accepts a metered fallback.
    ///
    /// With such a table a capability can run out of budget entirely and
    /// dispatch answers with `QuotaExhausted`.
    pub fn new_lenient(configs: Vec<CapabilityConfig>) -> Result<Self, ConfigError> {
        Self::build(configs, false)
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        Self::assemble(builtin::capability_table())
    }

    /// The built-in table with whole capabilities replaced by `overrides`.
    pub fn with_overrides(overrides: Vec<CapabilityConfig>) -> Result<Self, ConfigError> {
        let mut seen = Vec::new();
        for config in &overrides {
            if seen.contains(&config.capability) {
                return Err(ConfigError::DuplicateCapability(config.capability));
            }
            seen.push(config.capability);
        }

        let mut merged: Vec<CapabilityConfig> = builtin::capability_table()
            .into_iter()
            .filter(|c| !seen.contains(&c.capability))
            .collect();
        merged.extend(overrides);
        Self::new(merged)
    }

    /// The table a config file describes: built-in unless it lists capabilities.
    pub fn from_config(config: &SwitchboardConfig) -> Result<Self, ConfigError> {
        if config.capabilities.is_empty() {
            Ok(Self::builtin())
        } else {
            Self::with_overrides(config.capabilities.clone())
        }
    }

    fn build(configs: Vec<CapabilityConfig>, require_unbounded: bool) -> Result<Self, ConfigError> {
        let mut seen = Vec::new();
        for config in &configs {
            if seen.contains(&config.capability) {
                return Err(ConfigError::DuplicateCapability(config.capability));
            }
            seen.push(config.capability);
            validate_entry(config, require_unbounded)?;
        }

        if let Some(missing) = Capability::ALL.iter().find(|c| !seen.contains(c)) {
            return Err(ConfigError::EmptyCapability(*missing));
        }

        Ok(Self::assemble(configs))
    }

    fn assemble(configs: Vec<CapabilityConfig>) -> Self {
        let entries = configs
            .into_iter()
            .map(|c| {
                (
                    c.capability,
                    CapabilityEntry {
                        providers: c.providers,
                        fallback: c.fallback,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Providers for `capability` in preference order.
    pub fn providers_for(&self, capability: Capability) -> &[ProviderDescriptor] {
        self.entries
            .get(&capability)
            .map(|e| e.providers.as_slice())
            .unwrap_or(&[])
    }

    /// Like [`ProviderRegistry::providers_for`], parsing the capability name.
    pub fn providers_for_name(&self, name: &str) -> Result<&[ProviderDescriptor], DispatchError> {
        let capability: Capability = name.parse()?;
        Ok(self.providers_for(capability))
    }

    /// The provider tried once after a fallback-eligible failure.
    pub fn designated_fallback(&self, capability: Capability) -> Option<&ProviderDescriptor> {
        let entry = self.entries.get(&capability)?;
        entry.providers.iter().find(|p| p.name == entry.fallback)
    }

    /// Capabilities with their providers, in declaration order.
    pub fn all(&self) -> impl Iterator<Item = (Capability, &[ProviderDescriptor])> {
        Capability::ALL
            .into_iter()
            .map(move |capability| (capability, self.providers_for(capability)))
    }

    /// Daily limit per provider name.
    ///
    /// Counters are keyed by name, so a provider listed under two capabilities
    /// reports the first limit found.
    pub fn limits(&self) -> BTreeMap<String, DailyLimit> {
        let mut limits = BTreeMap::new();
        for (_, providers) in self.all() {
            for provider in providers {
                limits
                    .entry(provider.name.clone())
                    .or_insert(provider.daily_limit);
            }
        }
        limits
    }
}

fn validate_entry(config: &CapabilityConfig, require_unbounded: bool) -> Result<(), ConfigError> {
    let capability = config.capability;
    if config.providers.is_empty() {
        return Err(ConfigError::EmptyCapability(capability));
    }

    for (i, provider) in config.providers.iter().enumerate() {
        if config.providers[..i].iter().any(|p| p.name == provider.name) {
            return Err(ConfigError::DuplicateProvider {
                capability,
                name: provider.name.clone(),
            });
        }
    }

    let fallback = config
        .providers
        .iter()
        .find(|p| p.name == config.fallback)
        .ok_or_else(|| ConfigError::UnknownFallback {
            capability,
            name: config.fallback.clone(),
        })?;

    if require_unbounded && !fallback.daily_limit.is_unbounded() {
        return Err(ConfigError::BoundedFallback {
            capability,
            name: fallback.name.clone(),
        });
    }
    Ok(())
}
