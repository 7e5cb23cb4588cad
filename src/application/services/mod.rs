//! Application services - Relay orchestration

pub mod relay_service;

pub use relay_service::{RelayOptions, RelayOutcome, RelayService};
