//! Message handling - Webhook body parsing

pub mod parser;

pub use parser::MessageParser;
