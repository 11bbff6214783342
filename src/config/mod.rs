//! Configuration module for the headless fetch middleware
//!
//! Process-wide settings are read once at middleware construction and frozen
//! into an immutable [`HeadlessConfig`] value that every session launch reads
//! without mutation.

// Sub-modules
pub mod settings;
pub mod types;

// Re-exports for public API
pub use settings::{
    BLOCK_ADS_KEY, BROWSER_EXECUTABLE_KEY, DRIVER_ARGUMENTS_KEY, DRIVER_EXECUTABLE_KEY,
    DRIVER_NAME_KEY, Settings,
};
pub use types::{DriverKind, HeadlessConfig};
