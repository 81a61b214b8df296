// syslogview - platform/mod.rs
//
// Platform abstraction layer: config file location and loading, input reading.
// Dependencies: core (for mode and parser types), directories, memmap2.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
