//! Process-wide settings consumed at middleware construction
//!
//! Mirrors the loosely-typed settings object a crawl pipeline carries: string
//! keys mapped to JSON values. The middleware reads the recognized keys below
//! exactly once, in [`HeadlessConfig::from_settings`](super::HeadlessConfig::from_settings);
//! unrecognized keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Selects which browser backend to launch (required).
pub const DRIVER_NAME_KEY: &str = "HEADLESS_DRIVER_NAME";
/// Path to the backend binary (required).
pub const DRIVER_EXECUTABLE_KEY: &str = "HEADLESS_DRIVER_EXECUTABLE_PATH";
/// Optional override for which browser binary the backend launches.
pub const BROWSER_EXECUTABLE_KEY: &str = "HEADLESS_BROWSER_EXECUTABLE_PATH";
/// Optional list of startup arguments forwarded verbatim to the backend.
pub const DRIVER_ARGUMENTS_KEY: &str = "HEADLESS_DRIVER_ARGUMENTS";
/// Optional bool enabling the bundled content-blocking extension.
pub const BLOCK_ADS_KEY: &str = "HEADLESS_BLOCK_ADS";

/// Loosely-typed settings map read at middleware construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    values: HashMap<String, Value>,
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a string value; non-string values and missing keys yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Read a path value from a string entry.
    #[must_use]
    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_str(key).map(PathBuf::from)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// Read a list of strings; non-string entries are skipped.
    #[must_use]
    pub fn get_str_list(&self, key: &str) -> Option<Vec<String>> {
        self.values.get(key).and_then(Value::as_array).map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
    }
}
