//! Shared test helpers for `anteroom-core` integration tests.
//!
//! These helpers provide in-memory fakes for every core port so service
//! tests can focus on behaviour instead of boilerplate.

pub mod fakes;
