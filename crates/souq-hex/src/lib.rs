//! souq-hex: the bootstrap sequence (probe, schema, seed) and the process
//! handoff, written against the `ReferenceStore` port.

pub mod catalog;
pub mod config;
pub mod errors;

pub mod application;

pub use souq_types::{domain, ports};

pub mod outbound; // process launcher
