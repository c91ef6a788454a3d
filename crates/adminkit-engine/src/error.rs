//! Error types for the registration engine.

use std::result::Result as StdResult;

use thiserror::Error;

use crate::deps::HostError;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the registration engine.
///
/// Every variant carries enough context (operation name, entry key) to
/// locate the offending config entry.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested registration operation does not exist.
    #[error("no registration operation named \"{target}\"")]
    InvalidTarget {
        /// The unresolvable operation name (possibly empty).
        target: String,
    },

    /// A required parameter had neither a named argument nor a declared
    /// default, or an argument did not fit the operation's signature.
    #[error("cannot bind arguments for \"{target}\": {message}")]
    Binding {
        /// Operation whose arguments failed to bind.
        target: String,
        /// What went wrong, naming the parameter.
        message: String,
    },

    /// The host rejected an otherwise well-bound invocation.
    #[error("invoking \"{target}\" failed: {source}")]
    Invocation {
        /// Operation that was invoked.
        target: String,
        /// The host's failure.
        #[source]
        source: HostError,
    },

    /// A config entry did not have the structural shape the registrar
    /// expects (e.g. a scalar where a mapping is required).
    #[error("config entry \"{entry}\" has unexpected shape, expected {expected}")]
    BadShape {
        /// Key of the malformed entry.
        entry: String,
        /// Description of the expected shape.
        expected: &'static str,
    },

    /// Wrapper attaching the config entry key to a nested failure.
    #[error("failed to register entry \"{entry}\"")]
    Entry {
        /// Key of the entry being processed when the failure occurred.
        entry: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Errors surfaced by the configuration layer.
    #[error(transparent)]
    Config(#[from] config::Error),
}

impl Error {
    /// Wrap a nested failure with the key of the entry being processed.
    pub fn for_entry(entry: &str, source: Self) -> Self {
        Self::Entry {
            entry: entry.to_string(),
            source: Box::new(source),
        }
    }
}
