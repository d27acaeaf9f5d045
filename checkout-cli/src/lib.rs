pub mod app;
pub mod config;
pub mod form_loader;
pub mod logging;
pub mod prompt;
