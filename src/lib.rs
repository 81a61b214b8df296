// syslogview - lib.rs
//
// Library entry point. The filtering kernel lives in `core`; `app` wraps it in
// a stateful viewer, `platform` handles config and input, `util` carries
// errors, constants and logging.
//
// The command-line front end lives in `main.rs` and is not part of the
// library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
