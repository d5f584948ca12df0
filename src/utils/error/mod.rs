//! Error handling utilities
//!
//! Crate-level errors for configuration loading. Invocation failures use
//! [`crate::core::a2a::A2AError`].

pub mod error;

// Re-export commonly used types
pub use error::*;
