//! Utility modules
//!
//! - **error**: Crate-level error type and result alias

pub mod error; // Error handling
