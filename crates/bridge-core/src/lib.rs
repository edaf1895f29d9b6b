pub mod config;
pub mod error;
pub mod range;
pub mod reconcile;
pub mod row;
pub mod store;
pub mod tracker;

mod upstream;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use reconcile::{BatchOutcome, BatchReport, Reconciler};
