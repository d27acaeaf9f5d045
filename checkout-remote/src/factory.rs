use async_trait::async_trait;
use checkout_core::remote::{
    APPS_SCRIPT_BACKEND, RemoteConfig, RemoteError, RemoteFactory, RemoteRegistry,
    RemoteService, SIMULATION_BACKEND,
};
use reqwest::{Client, Url};
use tracing::{info, warn};

use crate::apps_script::AppsScriptService;
use crate::simulation::SimulatedService;

/// [`RemoteFactory`] for a deployed Apps Script web app.
///
/// ```rust,no_run
/// use checkout_core::remote::RemoteRegistry;
/// use checkout_remote::AppsScriptFactory;
///
/// let mut registry = RemoteRegistry::new();
/// registry.register(Box::new(AppsScriptFactory));
/// ```
pub struct AppsScriptFactory;

#[async_trait]
impl RemoteFactory for AppsScriptFactory {
    fn backend_name(&self) -> &'static str {
        APPS_SCRIPT_BACKEND
    }

    /// Build a client for `config.endpoint`, which must be an absolute
    /// http(s) URL. The per-call timeout is enforced by the service.
    async fn create(
        &self,
        config: &RemoteConfig,
    ) -> Result<Box<dyn RemoteService>, RemoteError> {
        let endpoint = config
            .endpoint()
            .ok_or_else(|| RemoteError::Configuration("no web app endpoint configured".to_string()))?;

        let url = Url::parse(endpoint)
            .map_err(|e| RemoteError::Configuration(format!("invalid endpoint '{endpoint}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RemoteError::Configuration(format!(
                "endpoint must be http or https, got '{}'",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| RemoteError::Configuration(e.to_string()))?;

        info!(endpoint, timeout = ?config.timeout, "using Apps Script backend");
        Ok(Box::new(AppsScriptService::new(client, endpoint, config.timeout)))
    }
}

/// [`RemoteFactory`] for the offline simulation backend.
pub struct SimulationFactory;

#[async_trait]
impl RemoteFactory for SimulationFactory {
    fn backend_name(&self) -> &'static str {
        SIMULATION_BACKEND
    }

    async fn create(
        &self,
        _config: &RemoteConfig,
    ) -> Result<Box<dyn RemoteService>, RemoteError> {
        warn!("web app endpoint not configured, running in simulation mode");
        Ok(Box::new(SimulatedService::default()))
    }
}

/// A registry with every backend this crate provides.
pub fn default_registry() -> RemoteRegistry {
    let mut registry = RemoteRegistry::new();
    registry.register(Box::new(AppsScriptFactory));
    registry.register(Box::new(SimulationFactory));
    registry
}
