//! The configuration-driven registrar.
//!
//! Walks the `pages` and `settings` trees of a [`Config`] and drives the
//! host's registration primitives through the [`ArgumentBinder`]. The walk
//! is one-shot and two-phase, triggered by the host's lifecycle signals:
//! [`Registrar::add_pages`] during menu construction and
//! [`Registrar::init_settings`] during settings initialization. Render
//! thunks built along the way execute later, when the host paints the
//! matching UI region.

use std::sync::Arc;

use config::{Config, Map, Value};
use tracing::{debug, warn};

use crate::{
    Error, Result,
    binder::{Arg, ArgMap, ArgumentBinder},
    deps::{AdminApi, PageHook, SlugRegistry},
    escape::AllowedTags,
    options::OptionStore,
    view::{RenderThunk, ViewSpec},
};

/// Top-level config key holding the page descriptors.
const KEY_PAGES: &str = "pages";
/// Top-level config key holding the settings descriptors.
const KEY_SETTINGS: &str = "settings";

/// Registers an entire hierarchy of admin pages, settings, sections and
/// fields from a declarative configuration tree.
pub struct Registrar {
    /// The settings-page configuration.
    config: Config,
    /// Maps config entries onto host parameter lists.
    binder: ArgumentBinder,
    /// Layered option resolution, shared with field render thunks.
    options: Arc<OptionStore>,
    /// Tag policy applied to all rendered output.
    tags: Arc<AllowedTags>,
    /// Hooks returned by page registration, in registration order.
    page_hooks: Vec<PageHook>,
}

impl Registrar {
    /// Create a registrar over `config`, resolving options through
    /// `options`. The default allowed-tag policy (content plus form tags)
    /// applies.
    pub fn new(config: Config, options: Arc<OptionStore>) -> Self {
        Self {
            config,
            binder: ArgumentBinder::new(),
            options,
            tags: Arc::new(AllowedTags::default()),
            page_hooks: Vec::new(),
        }
    }

    /// Replace the allowed-tag policy.
    pub fn with_allowed_tags(mut self, tags: AllowedTags) -> Self {
        self.tags = Arc::new(tags);
        self
    }

    /// Hooks collected from page registration, in registration order.
    pub fn page_hooks(&self) -> &[PageHook] {
        &self.page_hooks
    }

    /// Phase A: register the configured pages with the host.
    ///
    /// Entries are processed in declared order. An entry whose slug is
    /// already present in the shared registry is skipped silently, which
    /// lets several independent consumers share one page. A missing
    /// `pages` key makes the whole phase a no-op.
    pub fn add_pages(&mut self, host: &mut dyn AdminApi, slugs: &dyn SlugRegistry) -> Result<()> {
        let Some(pages) = self.phase_entries(KEY_PAGES)? else {
            return Ok(());
        };
        for (slug, entry) in &pages {
            if slugs.is_registered(slug) {
                debug!("page \"{}\" already registered, skipping", slug);
                continue;
            }
            self.add_page_entry(host, slug, entry)
                .map_err(|e| Error::for_entry(slug, e))?;
        }
        Ok(())
    }

    /// Phase B: register the configured settings, sections and fields.
    ///
    /// A missing `settings` key makes the whole phase a no-op.
    pub fn init_settings(&mut self, host: &mut dyn AdminApi) -> Result<()> {
        let Some(settings) = self.phase_entries(KEY_SETTINGS)? else {
            return Ok(());
        };
        for (name, entry) in &settings {
            self.add_settings_entry(host, name, entry)
                .map_err(|e| Error::for_entry(name, e))?;
        }
        Ok(())
    }

    /// Fetch a phase's entry map, cloned out of the config so the walk can
    /// borrow `self` mutably. `None` when the key is absent.
    fn phase_entries(&self, key: &'static str) -> Result<Option<Map>> {
        if !self.config.contains(key) {
            debug!("no \"{}\" key in config, skipping phase", key);
            return Ok(None);
        }
        let map = self
            .config
            .get(key)?
            .as_map()
            .ok_or_else(|| Error::BadShape {
                entry: key.to_string(),
                expected: "a mapping of entries",
            })?
            .clone();
        Ok(Some(map))
    }

    /// Register a single page, as a sub-page when it declares a parent.
    fn add_page_entry(&mut self, host: &mut dyn AdminApi, slug: &str, entry: &Value) -> Result<()> {
        let entry = entry.as_map().ok_or_else(|| Error::BadShape {
            entry: slug.to_string(),
            expected: "a page descriptor map",
        })?;

        let target = if entry.contains("parent_slug") {
            "add_submenu_page"
        } else {
            "add_menu_page"
        };
        debug!("registering page \"{}\" via {}", slug, target);

        let mut args: ArgMap = entry
            .iter()
            .filter(|(key, _)| key.as_str() != "view")
            .map(|(key, value)| (key.clone(), Arg::Value(value.clone())))
            .collect();
        args.insert("menu_slug".to_string(), Arg::Value(Value::from(slug)));
        args.insert(
            "render".to_string(),
            Arg::Render(self.thunk(self.view_of(entry, slug))),
        );

        if let Some(hook) = self.binder.invoke(host, target, &args)? {
            self.page_hooks.push(hook);
        }
        Ok(())
    }

    /// Register one settings group and recurse into its sections.
    fn add_settings_entry(
        &mut self,
        host: &mut dyn AdminApi,
        name: &str,
        entry: &Value,
    ) -> Result<()> {
        let entry = entry.as_map().ok_or_else(|| Error::BadShape {
            entry: name.to_string(),
            expected: "a settings descriptor map",
        })?;

        // Default to using the same option group name as the settings name.
        let group = entry
            .get("option_group")
            .and_then(Value::as_str)
            .unwrap_or(name)
            .to_string();
        debug!("registering setting \"{}\" in group \"{}\"", name, group);

        let mut args = ArgMap::new();
        args.insert("option_group".to_string(), Arg::Value(Value::from(group.as_str())));
        args.insert("option_name".to_string(), Arg::Value(Value::from(name)));
        if let Some(sanitizer) = entry.get("sanitizer") {
            args.insert("sanitizer".to_string(), Arg::Value(sanitizer.clone()));
        }
        self.binder.invoke(host, "register_setting", &args)?;

        let Some(sections) = entry.get("sections") else {
            debug!("setting \"{}\" declares no sections", name);
            return Ok(());
        };
        let sections = sections.as_map().ok_or_else(|| Error::BadShape {
            entry: name.to_string(),
            expected: "a mapping of sections",
        })?;
        for (section_key, section) in sections {
            self.add_section(host, name, &group, section_key, section)
                .map_err(|e| Error::for_entry(section_key, e))?;
        }
        Ok(())
    }

    /// Register one section and recurse into its fields.
    fn add_section(
        &mut self,
        host: &mut dyn AdminApi,
        setting: &str,
        group: &str,
        key: &str,
        section: &Value,
    ) -> Result<()> {
        let section = section.as_map().ok_or_else(|| Error::BadShape {
            entry: key.to_string(),
            expected: "a section descriptor map",
        })?;

        let mut args = ArgMap::new();
        args.insert("section".to_string(), Arg::Value(Value::from(key)));
        if let Some(title) = section.get("title") {
            args.insert("title".to_string(), Arg::Value(title.clone()));
        }
        args.insert(
            "render".to_string(),
            Arg::Render(self.thunk(self.view_of(section, key))),
        );
        args.insert("page".to_string(), Arg::Value(Value::from(group)));
        self.binder.invoke(host, "add_settings_section", &args)?;

        let Some(fields) = section.get("fields") else {
            debug!("section \"{}\" declares no fields", key);
            return Ok(());
        };
        let fields = fields.as_map().ok_or_else(|| Error::BadShape {
            entry: key.to_string(),
            expected: "a mapping of fields",
        })?;
        for (field_key, field) in fields {
            self.add_field(host, setting, group, key, field_key, field)
                .map_err(|e| Error::for_entry(field_key, e))?;
        }
        Ok(())
    }

    /// Register one field, with a thunk that resolves the owning setting's
    /// option value at render time.
    fn add_field(
        &mut self,
        host: &mut dyn AdminApi,
        setting: &str,
        group: &str,
        section_key: &str,
        key: &str,
        field: &Value,
    ) -> Result<()> {
        let field = field.as_map().ok_or_else(|| Error::BadShape {
            entry: key.to_string(),
            expected: "a field descriptor map",
        })?;

        let thunk = self
            .thunk(self.view_of(field, key))
            .with_options(Arc::clone(&self.options), setting);

        let mut args = ArgMap::new();
        args.insert("field".to_string(), Arg::Value(Value::from(key)));
        if let Some(title) = field.get("title") {
            args.insert("title".to_string(), Arg::Value(title.clone()));
        }
        args.insert("render".to_string(), Arg::Render(thunk));
        args.insert("page".to_string(), Arg::Value(Value::from(group)));
        args.insert("section".to_string(), Arg::Value(Value::from(section_key)));
        self.binder.invoke(host, "add_settings_field", &args)?;
        Ok(())
    }

    /// Build a render thunk under the registrar's tag policy.
    fn thunk(&self, view: Option<ViewSpec>) -> RenderThunk {
        RenderThunk::new(view, Arc::clone(&self.tags))
    }

    /// Resolve an entry's `view` value, warning on unsupported shapes.
    fn view_of(&self, entry: &Map, name: &str) -> Option<ViewSpec> {
        let value = entry.get("view")?;
        let spec = ViewSpec::from_value(value);
        if spec.is_none() {
            warn!(
                "entry \"{}\": unsupported view value ({}), rendering empty",
                name,
                value.kind()
            );
        }
        spec
    }
}
