//! Domain core for the season lifecycle & fixture scheduling engine.
//!
//! Everything in this crate is pure computation over plain types — no
//! database, no I/O — so the db, engine, and api crates can all share it
//! and the scheduling algorithms stay independently unit-testable.

pub mod error;
pub mod lifecycle;
pub mod roundrobin;
pub mod schedule;
pub mod season;
pub mod types;
