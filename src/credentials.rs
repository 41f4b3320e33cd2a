// file: src/credentials.rs
// description: provider api key resolution with session overrides and explicit reload
// reference: session-scoped settings layered over environment configuration

use crate::config::Config;
use crate::error::ProviderKind;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::RwLock;
use tracing::{debug, info};

pub const PRIMARY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];
pub const SECONDARY_ENV_VARS: &[&str] = &["DEEPSEEK_API_KEY"];

/// Opaque provider secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tail: String = self
            .0
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        write!(f, "****{}", tail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Session,
    Environment,
    ConfigFile,
}

#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub key: ApiKey,
    pub source: CredentialSource,
}

/// Point-in-time view of both provider credentials.
#[derive(Debug, Clone, Default)]
pub struct CredentialSnapshot {
    pub primary: Option<ResolvedCredential>,
    pub secondary: Option<ResolvedCredential>,
}

impl CredentialSnapshot {
    pub fn get(&self, provider: ProviderKind) -> Option<&ResolvedCredential> {
        match provider {
            ProviderKind::Primary => self.primary.as_ref(),
            ProviderKind::Secondary => self.secondary.as_ref(),
        }
    }

    pub fn primary_key(&self) -> Option<&ApiKey> {
        self.primary.as_ref().map(|c| &c.key)
    }

    pub fn secondary_key(&self) -> Option<&ApiKey> {
        self.secondary.as_ref().map(|c| &c.key)
    }
}

#[derive(Debug, Default)]
struct CredentialState {
    overrides: HashMap<ProviderKind, ApiKey>,
    environment: HashMap<ProviderKind, ApiKey>,
    config_file: HashMap<ProviderKind, ApiKey>,
}

/// Credentials constructed once per session and shared with the pipeline.
///
/// Lookups never touch the process environment; call [`CredentialStore::reload`]
/// to pick up changes made after construction.
pub struct CredentialStore {
    state: RwLock<CredentialState>,
    env_reader: fn(&str) -> Option<String>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn from_config(config: &Config) -> Self {
        Self::with_env_reader(config, |name| env::var(name).ok())
    }

    /// Builds a store that reads environment values through `env_reader`.
    pub fn with_env_reader(config: &Config, env_reader: fn(&str) -> Option<String>) -> Self {
        let store = Self {
            state: RwLock::new(CredentialState::default()),
            env_reader,
        };
        store.reload(config);
        store
    }

    /// Re-reads environment and config-file values. Session overrides survive.
    pub fn reload(&self, config: &Config) {
        let mut environment = HashMap::new();
        for (provider, names) in [
            (ProviderKind::Primary, PRIMARY_ENV_VARS),
            (ProviderKind::Secondary, SECONDARY_ENV_VARS),
        ] {
            if let Some(key) = names
                .iter()
                .filter_map(|name| (self.env_reader)(name))
                .find_map(|value| ApiKey::parse(&value))
            {
                environment.insert(provider, key);
            }
        }

        let mut config_file = HashMap::new();
        if let Some(key) = config.primary.api_key.as_deref().and_then(ApiKey::parse) {
            config_file.insert(ProviderKind::Primary, key);
        }
        if let Some(key) = config.secondary.api_key.as_deref().and_then(ApiKey::parse) {
            config_file.insert(ProviderKind::Secondary, key);
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.environment = environment;
        state.config_file = config_file;
        debug!(
            "Credentials reloaded (env: {}, config: {})",
            state.environment.len(),
            state.config_file.len()
        );
    }

    /// Sets or clears (with a blank value) the session override for a provider.
    pub fn set_override(&self, provider: ProviderKind, raw: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        match ApiKey::parse(raw) {
            Some(key) => {
                info!("Session API key set for {} provider", provider);
                state.overrides.insert(provider, key);
            }
            None => {
                info!("Session API key cleared for {} provider", provider);
                state.overrides.remove(&provider);
            }
        }
    }

    pub fn resolve(&self, provider: ProviderKind) -> Option<ResolvedCredential> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        let sources = [
            (CredentialSource::Session, &state.overrides),
            (CredentialSource::Environment, &state.environment),
            (CredentialSource::ConfigFile, &state.config_file),
        ];

        sources.into_iter().find_map(|(source, map)| {
            map.get(&provider).map(|key| ResolvedCredential {
                key: key.clone(),
                source,
            })
        })
    }

    pub fn snapshot(&self) -> CredentialSnapshot {
        CredentialSnapshot {
            primary: self.resolve(ProviderKind::Primary),
            secondary: self.resolve(ProviderKind::Secondary),
        }
    }
}
