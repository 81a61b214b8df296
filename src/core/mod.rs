// syslogview - core/mod.rs
//
// Core filtering kernel: line store, timestamp extraction, filters.
// Must NOT depend on: platform, app, or any I/O crate directly.

pub mod filter;
pub mod model;
pub mod timestamp;
