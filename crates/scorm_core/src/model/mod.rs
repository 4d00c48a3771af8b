//! Data-model value types.
//!
//! # Responsibility
//! - Define the key schema, display mode and timestamped element shapes used
//!   by the runtime engine and its collaborators.
//!
//! # Invariants
//! - Element values are text; numeric meaning only exists inside key parsing.

pub mod element;
pub mod key;
pub mod mode;
