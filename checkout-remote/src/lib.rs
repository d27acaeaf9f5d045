pub mod apps_script;
pub mod factory;
pub mod simulation;

pub use apps_script::AppsScriptService;
pub use factory::{AppsScriptFactory, SimulationFactory, default_registry};
pub use simulation::{SIMULATED_DELAY, SIMULATED_USER, SimulatedService};
