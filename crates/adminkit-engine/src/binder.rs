//! Named-argument binding onto the host's positional operations.
//!
//! The config format supplies registration data as named fields; the host
//! operations take long fixed positional parameter lists whose order and
//! arity differ between similar operations (a top-level page and a
//! sub-page differ in one parameter). The binder decouples the two with a
//! static per-operation parameter table: for each declared parameter in
//! order, use the named argument of the same name, else the declared
//! default, else fail.

use std::collections::BTreeMap;

use config::Value;

use crate::{
    Error, Result,
    deps::{AdminApi, HostError, PageHook},
    view::RenderThunk,
};

/// One argument in a named bag or a bound positional list.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A plain configuration value.
    Value(Value),
    /// A deferred render callback.
    Render(RenderThunk),
}

impl Arg {
    /// Short kind name for error messages.
    fn kind(&self) -> &'static str {
        match self {
            Self::Value(v) => v.kind(),
            Self::Render(_) => "render callback",
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<RenderThunk> for Arg {
    fn from(thunk: RenderThunk) -> Self {
        Self::Render(thunk)
    }
}

/// Named argument bag assembled from a config entry.
pub type ArgMap = BTreeMap<String, Arg>;

/// One declared parameter of a host operation.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Parameter name, matching the config field that supplies it.
    pub name: &'static str,
    /// Declared default, for parameters a config entry may omit.
    pub default: Option<fn() -> Value>,
}

/// The absent-value default shared by all optional parameters.
fn default_null() -> Value {
    Value::Null
}

/// Required parameter.
const fn required(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        default: None,
    }
}

/// Optional parameter defaulting to null.
const fn optional(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        default: Some(default_null),
    }
}

/// The fixed set of host registration operations the binder can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOp {
    /// `add_menu_page`: register a top-level admin page.
    AddMenuPage,
    /// `add_submenu_page`: register a page below a parent menu entry.
    AddSubmenuPage,
    /// `register_setting`: register a persisted option group.
    RegisterSetting,
    /// `add_settings_section`: register a section on a settings page.
    AddSettingsSection,
    /// `add_settings_field`: register a field within a section.
    AddSettingsField,
}

impl HostOp {
    /// The operation's wire name, as referenced by the registrar.
    pub fn name(self) -> &'static str {
        match self {
            Self::AddMenuPage => "add_menu_page",
            Self::AddSubmenuPage => "add_submenu_page",
            Self::RegisterSetting => "register_setting",
            Self::AddSettingsSection => "add_settings_section",
            Self::AddSettingsField => "add_settings_field",
        }
    }

    /// Resolve an operation by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add_menu_page" => Some(Self::AddMenuPage),
            "add_submenu_page" => Some(Self::AddSubmenuPage),
            "register_setting" => Some(Self::RegisterSetting),
            "add_settings_section" => Some(Self::AddSettingsSection),
            "add_settings_field" => Some(Self::AddSettingsField),
            _ => None,
        }
    }

    /// The operation's declared parameters, in positional order.
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Self::AddMenuPage => const {
                &[
                    required("page_title"),
                    required("menu_title"),
                    required("capability"),
                    required("menu_slug"),
                    required("render"),
                    optional("icon_url"),
                    optional("position"),
                ]
            },
            Self::AddSubmenuPage => const {
                &[
                    required("parent_slug"),
                    required("page_title"),
                    required("menu_title"),
                    required("capability"),
                    required("menu_slug"),
                    required("render"),
                ]
            },
            Self::RegisterSetting => const {
                &[
                    required("option_group"),
                    required("option_name"),
                    optional("sanitizer"),
                ]
            },
            Self::AddSettingsSection => const {
                &[
                    required("section"),
                    required("title"),
                    required("render"),
                    required("page"),
                ]
            },
            Self::AddSettingsField => const {
                &[
                    required("field"),
                    required("title"),
                    required("render"),
                    required("page"),
                    required("section"),
                ]
            },
        }
    }
}

/// Maps named argument bags onto positional host invocations.
///
/// Stateless; held by the registrar as a component rather than mixed into
/// it, so the binding behavior is testable on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArgumentBinder;

impl ArgumentBinder {
    /// Create a binder.
    pub fn new() -> Self {
        Self
    }

    /// Assemble the positional argument list for `op` from a named bag.
    ///
    /// Extra named arguments not matching any declared parameter are
    /// ignored; a missing argument without a declared default is a
    /// [`Error::Binding`] fault.
    pub fn bind(&self, op: HostOp, args: &ArgMap) -> Result<Vec<Arg>> {
        op.params()
            .iter()
            .map(|param| match args.get(param.name) {
                Some(arg) => Ok(arg.clone()),
                None => match param.default {
                    Some(default) => Ok(Arg::Value(default())),
                    None => Err(Error::Binding {
                        target: op.name().to_string(),
                        message: format!("missing required parameter \"{}\"", param.name),
                    }),
                },
            })
            .collect()
    }

    /// Resolve `target`, bind `args`, and invoke the host operation.
    ///
    /// Returns the page hook for page operations, `None` otherwise. A
    /// host-side failure is re-wrapped as [`Error::Invocation`] carrying
    /// the target name; it is never swallowed.
    pub fn invoke(
        &self,
        host: &mut dyn AdminApi,
        target: &str,
        args: &ArgMap,
    ) -> Result<Option<PageHook>> {
        let Some(op) = HostOp::from_name(target) else {
            return Err(Error::InvalidTarget {
                target: target.to_string(),
            });
        };
        let bound = self.bind(op, args)?;
        dispatch(host, op, bound)
    }
}

/// Apply a bound positional list to the typed host method for `op`.
fn dispatch(host: &mut dyn AdminApi, op: HostOp, bound: Vec<Arg>) -> Result<Option<PageHook>> {
    let mut args = ArgList::new(op, bound);
    match op {
        HostOp::AddMenuPage => {
            let page_title = args.str()?;
            let menu_title = args.str()?;
            let capability = args.str()?;
            let menu_slug = args.str()?;
            let render = args.render()?;
            let icon_url = args.opt_str()?;
            let position = args.opt_int()?;
            let hook = host
                .add_menu_page(
                    &page_title,
                    &menu_title,
                    &capability,
                    &menu_slug,
                    render,
                    icon_url.as_deref(),
                    position,
                )
                .map_err(|e| invocation(op, e))?;
            Ok(Some(hook))
        }
        HostOp::AddSubmenuPage => {
            let parent_slug = args.str()?;
            let page_title = args.str()?;
            let menu_title = args.str()?;
            let capability = args.str()?;
            let menu_slug = args.str()?;
            let render = args.render()?;
            let hook = host
                .add_submenu_page(
                    &parent_slug,
                    &page_title,
                    &menu_title,
                    &capability,
                    &menu_slug,
                    render,
                )
                .map_err(|e| invocation(op, e))?;
            Ok(Some(hook))
        }
        HostOp::RegisterSetting => {
            let option_group = args.str()?;
            let option_name = args.str()?;
            let sanitizer = args.opt_str()?;
            host.register_setting(&option_group, &option_name, sanitizer.as_deref())
                .map_err(|e| invocation(op, e))?;
            Ok(None)
        }
        HostOp::AddSettingsSection => {
            let section = args.str()?;
            let title = args.str()?;
            let render = args.render()?;
            let page = args.str()?;
            host.add_settings_section(&section, &title, render, &page)
                .map_err(|e| invocation(op, e))?;
            Ok(None)
        }
        HostOp::AddSettingsField => {
            let field = args.str()?;
            let title = args.str()?;
            let render = args.render()?;
            let page = args.str()?;
            let section = args.str()?;
            host.add_settings_field(&field, &title, render, &page, &section)
                .map_err(|e| invocation(op, e))?;
            Ok(None)
        }
    }
}

/// Wrap a host failure with the invoked operation's name.
fn invocation(op: HostOp, source: HostError) -> Error {
    Error::Invocation {
        target: op.name().to_string(),
        source,
    }
}

/// Cursor over a bound positional list, converting arguments to the types
/// the host method expects. Mismatches are binder faults, reported with
/// the parameter name from the operation's table.
struct ArgList {
    /// Operation being dispatched, for error context.
    op: HostOp,
    /// Remaining arguments, front first.
    items: std::vec::IntoIter<Arg>,
    /// Index of the next parameter in the operation's table.
    index: usize,
}

impl ArgList {
    /// Wrap a bound list for `op`.
    fn new(op: HostOp, bound: Vec<Arg>) -> Self {
        Self {
            op,
            items: bound.into_iter(),
            index: 0,
        }
    }

    /// Take the next argument.
    fn next(&mut self) -> Result<(Arg, &'static str)> {
        let name = self
            .op
            .params()
            .get(self.index)
            .map_or("<extra>", |p| p.name);
        self.index += 1;
        match self.items.next() {
            Some(arg) => Ok((arg, name)),
            None => Err(self.fault(name, "argument list exhausted")),
        }
    }

    /// Take a required string.
    fn str(&mut self) -> Result<String> {
        let (arg, name) = self.next()?;
        match arg {
            Arg::Value(Value::Str(s)) => Ok(s),
            other => Err(self.fault(name, &format!("expected a string, got {}", other.kind()))),
        }
    }

    /// Take an optional string; null means absent.
    fn opt_str(&mut self) -> Result<Option<String>> {
        let (arg, name) = self.next()?;
        match arg {
            Arg::Value(Value::Null) => Ok(None),
            Arg::Value(Value::Str(s)) => Ok(Some(s)),
            other => Err(self.fault(
                name,
                &format!("expected a string or null, got {}", other.kind()),
            )),
        }
    }

    /// Take an optional integer; null means absent.
    fn opt_int(&mut self) -> Result<Option<i64>> {
        let (arg, name) = self.next()?;
        match arg {
            Arg::Value(Value::Null) => Ok(None),
            Arg::Value(Value::Int(n)) => Ok(Some(n)),
            other => Err(self.fault(
                name,
                &format!("expected an integer or null, got {}", other.kind()),
            )),
        }
    }

    /// Take a render callback.
    fn render(&mut self) -> Result<RenderThunk> {
        let (arg, name) = self.next()?;
        match arg {
            Arg::Render(thunk) => Ok(thunk),
            other => Err(self.fault(
                name,
                &format!("expected a render callback, got {}", other.kind()),
            )),
        }
    }

    /// Build a binding fault for parameter `name`.
    fn fault(&self, name: &str, message: &str) -> Error {
        Error::Binding {
            target: self.op.name().to_string(),
            message: format!("parameter \"{}\": {}", name, message),
        }
    }
}
