//! Configuration management for the resolver service
//!
//! This module handles loading and managing configuration settings
//! for the HTTP server and the resolution engine.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
