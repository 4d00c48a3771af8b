//! Host-side journal of content writes awaiting persistence.
//!
//! # Responsibility
//! - Record changed elements as timestamped entries while content runs.
//! - Seal pending entries into batches on commit and keep them until the host
//!   confirms delivery.
//!
//! # Invariants
//! - Element counters and batch ids strictly increase.
//! - The journal performs no I/O.

pub mod recorder;
