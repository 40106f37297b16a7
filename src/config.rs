use std::collections::HashMap;

use log::debug;

/// Keys and defaults for the cosmetic settings the front-end reads.
///
/// Keys are dotted and namespaced; nothing here affects correctness, a
/// missing store simply yields the defaults.
pub mod keys {
    /// Members fetched per unfold of one pointer row
    pub const UNFOLD_CHUNK: &str = "scopeview.variables.unfold-chunk";
    pub const DEFAULT_UNFOLD_CHUNK: i64 = 50;

    /// Rows of the frame given to the log pane
    pub const LOG_PANE_HEIGHT: &str = "scopeview.ui.log-pane-height";
    pub const DEFAULT_LOG_PANE_HEIGHT: i64 = 7;

    /// Log ring buffer cap
    pub const MAX_LOG_LINES: &str = "scopeview.ui.max-log-lines";
    pub const DEFAULT_MAX_LOG_LINES: i64 = 1000;

    /// Bytes shown per memory dump row
    pub const MEMORY_ROW_BYTES: &str = "scopeview.memory.row-bytes";
    pub const DEFAULT_MEMORY_ROW_BYTES: i64 = 16;
}

/// Generic typed key/value settings store.
///
/// Getters return `None` both for missing keys and for keys holding a
/// different type; callers fall back to their defaults either way.
pub trait ConfigStore {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn get_int(&self, key: &str) -> Option<i64>;
    fn get_double(&self, key: &str) -> Option<f64>;
    fn get_string_list(&self, key: &str) -> Option<Vec<String>>;

    fn set_string(&mut self, key: &str, value: &str);
    fn set_bool(&mut self, key: &str, value: bool);
    fn set_int(&mut self, key: &str, value: i64);
    fn set_double(&mut self, key: &str, value: f64);
    fn set_string_list(&mut self, key: &str, value: &[String]);
}

#[derive(Debug, Clone, PartialEq)]
enum ConfigValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Double(f64),
    List(Vec<String>),
}

/// In-memory `ConfigStore`; the durable backend is an external concern
#[derive(Debug, Default)]
pub struct MemoryConfig {
    values: HashMap<String, ConfigValue>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &str) -> Option<&ConfigValue> {
        let value = self.values.get(key);
        if value.is_none() {
            debug!("config key \"{}\" unset, using default", key);
        }
        value
    }
}

impl ConfigStore for MemoryConfig {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            ConfigValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn get_double(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            ConfigValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            ConfigValue::List(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), ConfigValue::Str(value.to_string()));
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), ConfigValue::Bool(value));
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), ConfigValue::Int(value));
    }

    fn set_double(&mut self, key: &str, value: f64) {
        self.values
            .insert(key.to_string(), ConfigValue::Double(value));
    }

    fn set_string_list(&mut self, key: &str, value: &[String]) {
        self.values
            .insert(key.to_string(), ConfigValue::List(value.to_vec()));
    }
}
