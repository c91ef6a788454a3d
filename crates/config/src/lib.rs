//! Read-only configuration trees for adminkit.
//!
//! A [`Config`] wraps a nested mapping loaded once at startup, either from
//! an in-memory [`Map`] or from a RON resource on disk. It supports three
//! operations: existence check, single-key fetch, and ordered key
//! enumeration. Everything below the top level is an untyped [`Value`]
//! interpreted by whoever consumes the tree.

mod error;
mod loader;
mod tree;
mod value;

#[cfg(test)]
mod test_parse;

pub use error::Error;
pub use loader::{load_from_path, load_from_str};
pub use tree::Config;
pub use value::{Map, Value};
