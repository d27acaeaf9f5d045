use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::service::{RemoteError, RemoteService};

/// Endpoint value shipped in templates before a real URL is filled in.
pub const PLACEHOLDER_ENDPOINT: &str = "YOUR_WEB_APP_URL_HERE";

/// Backend that talks to the deployed Apps Script web app.
pub const APPS_SCRIPT_BACKEND: &str = "apps-script";

/// Backend that fabricates answers without touching the network.
pub const SIMULATION_BACKEND: &str = "simulation";

/// Default time allowed for one remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote endpoint configuration.
///
/// The backend is derived from `endpoint`: an unset, blank or placeholder
/// endpoint selects [`SIMULATION_BACKEND`], anything else
/// [`APPS_SCRIPT_BACKEND`].
///
/// | endpoint                                   | backend       |
/// |--------------------------------------------|---------------|
/// | `None`, `""`, `YOUR_WEB_APP_URL_HERE`      | `simulation`  |
/// | `https://script.google.com/macros/s/…/exec` | `apps-script` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Web app URL; see the table above.
    pub endpoint: Option<String>,
    /// Time allowed for one call before it resolves to a timeout.
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RemoteConfig {
    /// The configured endpoint, unless it is blank or the placeholder.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != PLACEHOLDER_ENDPOINT)
    }

    pub fn is_simulation(&self) -> bool {
        self.endpoint().is_none()
    }

    /// Name of the backend this configuration selects.
    pub fn backend_name(&self) -> &'static str {
        if self.is_simulation() {
            SIMULATION_BACKEND
        } else {
            APPS_SCRIPT_BACKEND
        }
    }
}

/// One implementation per remote backend. Each backend crate exports a unit
/// struct that implements this trait and is registered with a
/// [`RemoteRegistry`] at startup.
#[async_trait]
pub trait RemoteFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use service for `config`.
    async fn create(
        &self,
        config: &RemoteConfig,
    ) -> Result<Box<dyn RemoteService>, RemoteError>;
}

/// Registry of [`RemoteFactory`] instances, keyed by backend name.
pub struct RemoteRegistry {
    factories: HashMap<&'static str, Box<dyn RemoteFactory>>,
}

impl RemoteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a backend factory, replacing any with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RemoteFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching [`RemoteConfig::backend_name`].
    ///
    /// # Errors
    /// * [`RemoteError::Configuration`]: no factory is registered for the
    ///   selected backend.
    /// * Any error the chosen factory itself returns.
    pub async fn create(
        &self,
        config: &RemoteConfig,
    ) -> Result<Box<dyn RemoteService>, RemoteError> {
        let backend = config.backend_name();
        let factory = self.factories.get(backend).ok_or_else(|| {
            RemoteError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                backend,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}

impl Default for RemoteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
