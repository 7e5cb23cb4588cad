//! Application layer - Use cases
//!
//! This layer contains:
//! - Services: Relay orchestration
//! - Errors: Domain-specific errors
//! - Messaging: Webhook body parsing

pub mod errors;
pub mod services;
pub mod messaging;
