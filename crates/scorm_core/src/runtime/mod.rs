//! Attempt runtime: launch configuration, list counters and the data-model
//! engine.
//!
//! # Responsibility
//! - Turn host launch options into one live engine per attempt.
//! - Keep store, counters and lifecycle consistent within each call.
//!
//! # Invariants
//! - Single-threaded: every operation completes before the next starts.
//! - Notification handlers never re-enter the engine.

pub mod config;
pub mod counts;
pub mod engine;
