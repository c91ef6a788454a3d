//! Parse and load configuration resources.
//!
//! A config resource is a RON document whose top level is a mapping, e.g.
//!
//! ```ron
//! {
//!     "pages": { "my-page": { "page_title": "My Page" } },
//!     "settings": {},
//! }
//! ```
//!
//! Loading captures the document's value; anything other than a mapping at
//! the top level is rejected. All failure modes (unreadable file, parse
//! error, wrong top-level shape) are reported through [`Error`] with the
//! originating path attached.

use std::{fs, path::Path};

use tracing::debug;

use crate::{Config, Error, Value, error::excerpt_at};

/// Load a [`Config`] from a RON resource at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: format!("could not read config resource: {}", e),
    })?;
    debug!("loading config resource: {}", path.display());
    load_from_str(&source, Some(path))
}

/// Parse a [`Config`] from in-memory RON source.
///
/// `path` is only used to annotate errors.
pub fn load_from_str(source: &str, path: Option<&Path>) -> Result<Config, Error> {
    let value: Value = ron::from_str(source).map_err(|e| {
        let pos = e.span.start;
        Error::Parse {
            path: path.map(Path::to_path_buf),
            line: pos.line,
            col: pos.col,
            message: e.code.to_string(),
            excerpt: excerpt_at(source, pos.line, pos.col),
        }
    })?;

    match value {
        Value::Map(map) => Ok(Config::from_map(map)),
        other => Err(Error::NotAMapping {
            path: path.map(Path::to_path_buf),
            found: other.kind(),
        }),
    }
}
