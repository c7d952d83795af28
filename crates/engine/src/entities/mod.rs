//! Entity modules - domain capability encapsulation.
//!
//! They depend on storage ports and provide the building blocks for use cases.

pub mod adventures;

pub use adventures::{Adventures, ExecutionDomain, GateError, Working};
