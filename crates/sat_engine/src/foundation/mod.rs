//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and SAT helpers
//! - Logging utilities

pub mod math;
pub mod logging;
