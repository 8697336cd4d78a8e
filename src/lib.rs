pub mod cleanup;
pub mod config;
pub mod event;
pub mod format;
pub mod logging;
pub mod service;
pub mod system;
