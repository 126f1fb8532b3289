//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - mockall has lifetime issues with traits containing `&str` parameters
//! - Manual mocks are more explicit and easier to debug
//! - We control exactly what they return without macro magic
//!
//! `AppState` is generic over the port implementations, so gateway
//! round-trips in `integration_tests` run against these mocks through
//! axum-test.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
