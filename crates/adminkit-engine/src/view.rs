//! Views and deferred render thunks.
//!
//! Registration and rendering are temporally separated: the registrar
//! builds [`RenderThunk`] values eagerly while walking the config, the
//! host invokes them later, one at a time, when it paints the matching UI
//! region. A thunk's captured state is plain data and can be inspected in
//! tests.

use std::{collections::BTreeMap, fmt, fs, path::PathBuf, sync::Arc};

use config::Value;
use tracing::warn;

use crate::{
    escape::{self, AllowedTags},
    options::OptionStore,
};

/// Key/value context handed to a view at render time. Created fresh per
/// render invocation, never persisted.
pub type RenderContext = BTreeMap<String, Value>;

/// Reference to a renderable template.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSpec {
    /// Path to a template file, read at render time.
    Path(PathBuf),
    /// Pre-built inline template text.
    Inline(String),
}

impl ViewSpec {
    /// Build a view reference from a config `view` value.
    ///
    /// A string is a template path; a map with a `template` key is an
    /// inline template. Anything else is unsupported and yields `None`
    /// (the caller logs and renders empty).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(path) => Some(Self::Path(PathBuf::from(path))),
            Value::Map(map) => map
                .get("template")
                .and_then(Value::as_str)
                .map(|t| Self::Inline(t.to_string())),
            _ => None,
        }
    }
}

/// A renderable template.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Where the template text comes from.
    spec: ViewSpec,
}

impl View {
    /// Create a view over the given template reference.
    pub fn new(spec: ViewSpec) -> Self {
        Self { spec }
    }

    /// Render the view against `context`.
    ///
    /// An unreadable template path renders as the empty string, never an
    /// error: one broken view must not blank an entire admin page.
    pub fn render(&self, context: &RenderContext) -> String {
        let template = match &self.spec {
            ViewSpec::Path(path) => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("view {} is unreadable ({}), rendering empty", path.display(), e);
                    return String::new();
                }
            },
            ViewSpec::Inline(text) => text.clone(),
        };
        interpolate(&template, context)
    }
}

/// Replace `{{name}}` placeholders with values from `context`.
///
/// Dotted names (`{{options.first_name}}`) descend into nested maps.
/// Unknown placeholders render as the empty string.
fn interpolate(template: &str, context: &RenderContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                if let Some(value) = lookup(context, name) {
                    out.push_str(&value.to_string());
                }
                rest = &after[end + 2..];
            }
            None => {
                // Unterminated placeholder: keep the text as-is.
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolve a (possibly dotted) placeholder name inside the context.
fn lookup<'ctx>(context: &'ctx RenderContext, name: &str) -> Option<&'ctx Value> {
    let mut parts = name.split('.');
    let mut current = context.get(parts.next()?)?;
    for part in parts {
        current = current.as_map()?.get(part)?;
    }
    Some(current)
}

/// Deferred, parameterless render invocation bound to a view reference and
/// its context.
///
/// The thunk resolves everything lazily at [`RenderThunk::render`] time:
/// the template file is read then, and the option value (for field thunks)
/// is re-queried from the layered store on every call. Output is filtered
/// against the allowed-tag policy before the host sees it.
#[derive(Clone)]
pub struct RenderThunk {
    /// The view to render; `None` renders empty output.
    view: Option<ViewSpec>,
    /// Static extra context captured at registration time.
    context: RenderContext,
    /// For field thunks: the layered store and the owning setting name,
    /// resolved into the `options` context key per invocation.
    options: Option<(Arc<OptionStore>, String)>,
    /// Tag policy applied to the rendered output.
    tags: Arc<AllowedTags>,
}

impl RenderThunk {
    /// Create a thunk for `view` under the given tag policy.
    pub fn new(view: Option<ViewSpec>, tags: Arc<AllowedTags>) -> Self {
        Self {
            view,
            context: RenderContext::new(),
            options: None,
            tags,
        }
    }

    /// Attach static extra context.
    pub fn with_context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }

    /// Attach a layered option lookup for `setting`, resolved per render
    /// into the `options` context key.
    pub fn with_options(mut self, store: Arc<OptionStore>, setting: &str) -> Self {
        self.options = Some((store, setting.to_string()));
        self
    }

    /// The captured view reference.
    pub fn view(&self) -> Option<&ViewSpec> {
        self.view.as_ref()
    }

    /// The setting name this thunk resolves options for, if any.
    pub fn setting(&self) -> Option<&str> {
        self.options.as_ref().map(|(_, name)| name.as_str())
    }

    /// Render the captured view, filtered against the tag policy.
    pub fn render(&self) -> String {
        let Some(spec) = &self.view else {
            return String::new();
        };
        let mut context = self.context.clone();
        if let Some((store, setting)) = &self.options {
            context.insert("options".to_string(), store.get(setting));
        }
        let html = View::new(spec.clone()).render(&context);
        escape::filter(&html, &self.tags)
    }
}

impl fmt::Debug for RenderThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderThunk")
            .field("view", &self.view)
            .field("context", &self.context)
            .field("setting", &self.setting())
            .finish_non_exhaustive()
    }
}
