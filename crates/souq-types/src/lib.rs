//! souq-types: reference-data domain model and the storage port the
//! bootstrap sequence talks to.

pub mod domain;
pub mod ports;
