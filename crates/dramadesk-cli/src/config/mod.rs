//! Backend configuration.

pub mod storage;
mod types;

pub use types::Settings;
