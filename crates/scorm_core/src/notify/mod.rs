//! Notification bus for runtime lifecycle and mutation events.
//!
//! # Responsibility
//! - Let embedding code observe engine operations without the engine knowing
//!   who listens.
//!
//! # Invariants
//! - Handlers for one event fire in registration order.
//! - Handlers are not isolated from each other: a panicking handler unwinds
//!   through `emit` and later handlers for that emission do not run.

pub mod bus;
