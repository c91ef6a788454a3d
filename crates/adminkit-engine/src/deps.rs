//! Host-environment capabilities consumed by the engine.
//!
//! The engine never talks to an admin panel directly; everything it needs
//! from the host is modelled as an injected trait so tests can substitute
//! recording doubles. See [`crate::test_support`] for the doubles.

use config::Value;
use thiserror::Error;

use crate::view::RenderThunk;

/// Failure reported by the host while performing a registration or lookup.
#[derive(Debug, Error, Clone)]
#[error("{0}")]
pub struct HostError(pub String);

/// Result alias for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Opaque handle returned by host page registration.
///
/// Retained for bookkeeping only; the engine never dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHook(u64);

impl PageHook {
    /// Wrap a host-assigned identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The host-assigned identifier.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Registration primitives of the host admin panel.
///
/// Parameter order matches the binder's per-operation tables in
/// [`crate::binder`]; render callbacks are handed over as eagerly built
/// [`RenderThunk`] values the host invokes when it paints the
/// corresponding UI region.
pub trait AdminApi {
    /// Register a top-level menu page. Returns the host's page handle.
    fn add_menu_page(
        &mut self,
        page_title: &str,
        menu_title: &str,
        capability: &str,
        menu_slug: &str,
        render: RenderThunk,
        icon_url: Option<&str>,
        position: Option<i64>,
    ) -> HostResult<PageHook>;

    /// Register a page below an existing parent menu entry.
    fn add_submenu_page(
        &mut self,
        parent_slug: &str,
        page_title: &str,
        menu_title: &str,
        capability: &str,
        menu_slug: &str,
        render: RenderThunk,
    ) -> HostResult<PageHook>;

    /// Register a persisted option group. The sanitizer, when present, is a
    /// host-resolved callback identifier passed through verbatim.
    fn register_setting(
        &mut self,
        option_group: &str,
        option_name: &str,
        sanitizer: Option<&str>,
    ) -> HostResult<()>;

    /// Register a settings section on `page`.
    fn add_settings_section(
        &mut self,
        section: &str,
        title: &str,
        render: RenderThunk,
        page: &str,
    ) -> HostResult<()>;

    /// Register a settings field within `section` on `page`.
    fn add_settings_field(
        &mut self,
        field: &str,
        title: &str,
        render: RenderThunk,
        page: &str,
        section: &str,
    ) -> HostResult<()>;
}

/// Shared registry of page slugs already claimed by any actor.
///
/// Several independent consumers may share one page; the registrar skips a
/// page whose slug is already present here.
pub trait SlugRegistry {
    /// Whether `slug` is already registered somewhere in the host.
    fn is_registered(&self, slug: &str) -> bool;
}

/// Persisted option lookup of the host.
pub trait OptionApi {
    /// Return the persisted value for `name`, or `fallback` when none is
    /// stored.
    fn get_option(&self, name: &str, fallback: Value) -> Value;
}
