pub mod api;
pub mod factory;
pub mod service;

pub use factory::{
    APPS_SCRIPT_BACKEND, DEFAULT_TIMEOUT, PLACEHOLDER_ENDPOINT, RemoteConfig, RemoteFactory,
    RemoteRegistry, SIMULATION_BACKEND,
};
pub use service::{RemoteError, RemoteParams, RemoteResponse, RemoteService, ResponseStatus};
