//! livefetch engine - orchestration layer
//!
//! Connects the pure snapshot and diff machinery of `livefetch-core` to a
//! backend: store connectors, the async results controller with its change
//! feed, and controller configuration.

pub mod config;
pub mod connector;
pub mod controller;
pub mod memory;

pub use config::ControllerConfig;
pub use connector::{ConnectorError, StoreConnector};
pub use controller::{ChangeNotification, ControllerState, RefreshOutcome, ResultsController};
pub use memory::MemoryConnector;
