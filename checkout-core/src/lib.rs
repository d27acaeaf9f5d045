pub mod calculations;
pub mod checkout;
pub mod format;
pub mod models;
pub mod remote;
pub mod session;
pub mod validation;

pub use checkout::{
    CheckoutSummary, LoginError, MessageType, PendingCheckout, StatusMessage, SubmitOutcome,
};
pub use models::*;
pub use remote::{RemoteConfig, RemoteError, RemoteService};
pub use session::Session;
pub use validation::ValidationError;
