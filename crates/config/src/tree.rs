//! The read-only configuration tree.

use std::path::Path;

use crate::{Error, Map, Value, loader};

/// An immutable, key-addressable wrapper around a loaded configuration
/// mapping.
///
/// The tree is a thin associative facade: only the top level is addressed
/// by key, nested structure is opaque payload interpreted by consumers.
/// There is no mutation API; construct once, read forever.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Top-level keys and their payloads, in document order.
    root: Map,
}

impl Config {
    /// Wrap an in-memory mapping.
    pub fn from_map(root: Map) -> Self {
        Self { root }
    }

    /// Load a configuration from a RON resource at `path`.
    ///
    /// Fails with [`Error::Read`], [`Error::Parse`] or
    /// [`Error::NotAMapping`] when the resource cannot be turned into a
    /// top-level mapping.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        loader::load_from_path(path)
    }

    /// Check whether the config has a specific key.
    pub fn contains(&self, key: &str) -> bool {
        self.root.contains(key)
    }

    /// Get the value of a specific key.
    ///
    /// Calling this for an absent key is a contract violation; callers are
    /// expected to check [`Config::contains`] first. The resulting
    /// [`Error::MissingKey`] is not meant to be recovered from.
    pub fn get(&self, key: &str) -> Result<&Value, Error> {
        self.root.get(key).ok_or_else(|| Error::MissingKey {
            key: key.to_string(),
        })
    }

    /// Iterate the top-level keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys()
    }
}

impl From<Map> for Config {
    fn from(root: Map) -> Self {
        Self::from_map(root)
    }
}
