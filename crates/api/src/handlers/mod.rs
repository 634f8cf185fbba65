//! Request handlers, one module per resource area.

pub mod fixtures;
pub mod seasons;
pub mod teams;
