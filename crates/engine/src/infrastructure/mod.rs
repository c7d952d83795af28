//! Infrastructure - ports and their in-process adapters.

pub mod clock;
pub mod memory;
pub mod ports;
pub mod session_guard;
pub mod settings;
