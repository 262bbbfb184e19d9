//! Read-only view of the translation provider settings.
//!
//! Provider selection and credential storage belong to the settings layer;
//! the orchestrator only asks which provider is active and what its key is.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use secrecy::{ExposeSecret, SecretString};

/// A provider API key. Cloning shares the underlying secret.
#[derive(Clone)]
pub struct Credential(Arc<SecretString>);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::new(SecretString::from(value.into())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Narrow interface over the credential store.
pub trait ProviderStore: Send + Sync {
    /// Id of the provider the user selected, if any.
    fn active_provider(&self) -> Option<String>;

    /// Stored API key for `provider`.
    fn credential_for(&self, provider: &str) -> Option<Credential>;
}

/// Result of looking up the active provider for a submission.
#[derive(Debug, Clone)]
pub enum ProviderResolution {
    Missing,
    MissingKey { provider: String },
    Ready { provider: String, credential: Credential },
}

/// Resolves the active provider and its trimmed credential.
pub fn resolve_provider(store: &dyn ProviderStore) -> ProviderResolution {
    let provider = match store.active_provider() {
        Some(p) if !p.trim().is_empty() => p,
        _ => return ProviderResolution::Missing,
    };

    match store.credential_for(&provider) {
        Some(credential) if !credential.is_blank() => {
            let credential = Credential::new(credential.expose().trim());
            ProviderResolution::Ready {
                provider,
                credential,
            }
        }
        _ => ProviderResolution::MissingKey { provider },
    }
}

#[derive(Default)]
struct ProviderState {
    active: Option<String>,
    keys: HashMap<String, Credential>,
}

/// In-memory provider store, filled by the settings layer.
#[derive(Default)]
pub struct InMemoryProviderStore {
    state: RwLock<ProviderState>,
}

impl InMemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `provider` active and keyed with `api_key`.
    pub fn with_active(provider: &str, api_key: &str) -> Self {
        let store = Self::new();
        store.set_credential(provider, api_key);
        store.set_active(Some(provider));
        store
    }

    pub fn set_active(&self, provider: Option<&str>) {
        let mut state = self.write();
        state.active = provider.map(|p| p.to_string());
    }

    pub fn set_credential(&self, provider: &str, api_key: &str) {
        let mut state = self.write();
        state
            .keys
            .insert(provider.to_string(), Credential::new(api_key));
    }

    pub fn remove_credential(&self, provider: &str) {
        self.write().keys.remove(provider);
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProviderState> {
        match self.state.write() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Provider store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl ProviderStore for InMemoryProviderStore {
    fn active_provider(&self) -> Option<String> {
        let state = match self.state.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.active.clone()
    }

    fn credential_for(&self, provider: &str) -> Option<Credential> {
        let state = match self.state.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.keys.get(provider).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("sk-secret");
        assert_eq!(format!("{:?}", credential), "Credential([REDACTED])");
        assert_eq!(credential.expose(), "sk-secret");
    }

    #[test]
    fn test_resolve_missing_provider() {
        let store = InMemoryProviderStore::new();
        assert!(matches!(
            resolve_provider(&store),
            ProviderResolution::Missing
        ));
    }

    #[test]
    fn test_resolve_blank_key() {
        let store = InMemoryProviderStore::with_active("deepl", "   ");
        match resolve_provider(&store) {
            ProviderResolution::MissingKey { provider } => assert_eq!(provider, "deepl"),
            other => panic!("unexpected resolution: {:?}", other),
        }

        store.remove_credential("deepl");
        assert!(matches!(
            resolve_provider(&store),
            ProviderResolution::MissingKey { .. }
        ));
    }

    #[test]
    fn test_resolve_ready_trims_key() {
        let store = InMemoryProviderStore::with_active("openai", "  sk-123 \n");
        match resolve_provider(&store) {
            ProviderResolution::Ready {
                provider,
                credential,
            } => {
                assert_eq!(provider, "openai");
                assert_eq!(credential.expose(), "sk-123");
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_remove_credential_recovers_poisoned_lock() {
        let store = Arc::new(InMemoryProviderStore::with_active("openai", "sk-1"));
        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.state.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(store.state.is_poisoned());

        store.remove_credential("openai");
        assert!(matches!(
            resolve_provider(store.as_ref()),
            ProviderResolution::MissingKey { .. }
        ));
    }
}
