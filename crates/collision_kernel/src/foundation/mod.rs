//! Foundation module - Core utilities and types
//!
//! This module provides the fundamental pieces the kernel is built on:
//! - Math types, tolerances and small helpers
//! - Logging utilities

pub mod math;
pub mod logging;
