//! Shared utilities for ClassChat packages.

pub mod logger;
pub mod time;
