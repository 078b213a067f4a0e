//! Command line entry logic
//!
//! The binary in `src/bin` only parses arguments and delegates here.

pub mod server;

pub use server::{ServerArgs, run_server_mode};
