//! Domain layer - Core types with no I/O
//!
//! This layer contains:
//! - Entities: Inbound messages and outbound replies
//! - Traits: Abstractions for infrastructure (Bot)

pub mod entities;
pub mod traits;
