//! Layered option resolution.

use std::sync::Arc;

use config::{Config, Value};

use crate::deps::OptionApi;

/// Resolves option values with "most specific wins" precedence.
///
/// The fallback handed to the host's persisted lookup is, in order:
/// an explicitly supplied caller default, then the configured default from
/// the defaults tree, then the absent sentinel [`Value::Null`]. The host
/// returns the persisted value when one exists, else that fallback.
///
/// There is no caching; every call re-queries the host.
pub struct OptionStore {
    /// Configured app-wide defaults, keyed by option name.
    defaults: Config,
    /// The host's persisted option lookup.
    api: Arc<dyn OptionApi>,
}

impl OptionStore {
    /// Create a store over the configured defaults and the host lookup.
    pub fn new(defaults: Config, api: Arc<dyn OptionApi>) -> Self {
        Self { defaults, api }
    }

    /// Get an option value using only the configured defaults as fallback.
    pub fn get(&self, option: &str) -> Value {
        self.get_or(option, None)
    }

    /// Get an option value, letting the call site override the configured
    /// default.
    pub fn get_or(&self, option: &str, caller_default: Option<Value>) -> Value {
        let fallback = match caller_default {
            Some(value) => value,
            None if self.defaults.contains(option) => self
                .defaults
                .get(option)
                .map(Clone::clone)
                .unwrap_or(Value::Null),
            None => Value::Null,
        };
        self.api.get_option(option, fallback)
    }
}
