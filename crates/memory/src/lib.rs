//! Session-scoped memory for Sahayak.
//!
//! Profile memory holds the facts collected about the user during one
//! session. It is owned exclusively by its session and discarded with it.

pub mod profile;

pub use profile::{FieldEntry, ProfileMemory, ProposeOutcome};
