//! Config-driven registration engine for CMS admin settings pages.
//!
//! The engine walks a declarative [`config::Config`] tree describing admin
//! pages, settings, sections and fields, and registers each entry with the
//! hosting platform through the injected [`AdminApi`] trait. Registration
//! is two-phase: [`Registrar::add_pages`] runs while the host builds its
//! admin menu, [`Registrar::init_settings`] when it initializes settings.
//! UI is never painted during the walk; instead each entry gets a
//! [`RenderThunk`] the host fires later, which loads a view template,
//! interpolates placeholders (field thunks resolve the owning setting's
//! stored value through a layered [`OptionStore`]) and filters the result
//! against an [`AllowedTags`] policy.

pub mod binder;
pub mod deps;
pub mod error;
pub mod escape;
pub mod menu;
pub mod options;
pub mod registrar;
pub mod test_support;
pub mod view;

#[cfg(test)]
mod test_registrar;

pub use binder::{Arg, ArgMap, ArgumentBinder, HostOp, ParamSpec};
pub use deps::{AdminApi, HostError, HostResult, OptionApi, PageHook, SlugRegistry};
pub use error::{Error, Result};
pub use escape::{AllowedTags, filter};
pub use options::OptionStore;
pub use registrar::Registrar;
pub use view::{RenderContext, RenderThunk, View, ViewSpec};
