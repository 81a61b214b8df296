// syslogview - app/mod.rs
//
// Application layer: viewer state driven by a front end.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod state;
