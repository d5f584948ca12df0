//! Core functionality
//!
//! This module contains the remote agent invocation logic.

pub mod a2a;
