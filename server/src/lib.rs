//! Server library module.
//!
//! This module exposes testable components from the server binary.
//! The main binary and integration tests can both use these exports.

pub mod bot;
