//! Test support doubles for the engine's host-facing traits.
//! These helpers are public to avoid dead_code warnings and are
//! lightweight. They are intended for use by the test suite only.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::Rc,
    sync::Arc,
};

use config::{Config, Map, Value};

use crate::{
    deps::{AdminApi, HostError, HostResult, OptionApi, PageHook, SlugRegistry},
    options::OptionStore,
    view::RenderThunk,
};

/// One recorded host invocation, with the fields the tests assert on.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    /// `add_menu_page` was invoked.
    MenuPage {
        /// Menu slug of the page.
        slug: String,
        /// Page title.
        title: String,
        /// Optional icon URL.
        icon_url: Option<String>,
        /// Optional menu position.
        position: Option<i64>,
    },
    /// `add_submenu_page` was invoked.
    SubmenuPage {
        /// Parent menu slug.
        parent: String,
        /// Menu slug of the page.
        slug: String,
    },
    /// `register_setting` was invoked.
    Setting {
        /// Option group.
        group: String,
        /// Option name.
        name: String,
        /// Optional sanitizer identifier.
        sanitizer: Option<String>,
    },
    /// `add_settings_section` was invoked.
    Section {
        /// Section key.
        id: String,
        /// Owning page (option group).
        page: String,
    },
    /// `add_settings_field` was invoked.
    Field {
        /// Field key.
        id: String,
        /// Owning page (option group).
        page: String,
        /// Owning section key.
        section: String,
    },
}

/// Slug registry shared between a host double and a test, so pages
/// registered through the host become visible to the registrar's
/// de-duplication check.
#[derive(Debug, Clone, Default)]
pub struct SharedSlugs(Rc<RefCell<Vec<String>>>);

impl SharedSlugs {
    /// Mark `slug` as registered.
    pub fn insert(&self, slug: &str) {
        self.0.borrow_mut().push(slug.to_string());
    }
}

impl SlugRegistry for SharedSlugs {
    fn is_registered(&self, slug: &str) -> bool {
        self.0.borrow().iter().any(|s| s == slug)
    }
}

/// Recording [`AdminApi`] double.
///
/// Registers everything, collects calls and render thunks, and reports
/// registered page slugs through its [`SharedSlugs`].
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Calls in invocation order.
    pub calls: Vec<HostCall>,
    /// Render thunks keyed by the slug/section/field they were
    /// registered under.
    pub thunks: BTreeMap<String, RenderThunk>,
    /// Slugs of pages registered through this host.
    pub slugs: SharedSlugs,
    /// When set, the named operation fails with a host error.
    pub fail_on: Option<String>,
    /// Next page hook id to hand out.
    next_hook: u64,
}

impl RecordingHost {
    /// Fail host-side when `op` matches `self.fail_on`.
    fn check_fail(&self, op: &str) -> HostResult<()> {
        match &self.fail_on {
            Some(fail) if fail == op => Err(HostError(format!("{} unavailable", op))),
            _ => Ok(()),
        }
    }

    /// Allocate the next page hook.
    fn next_hook(&mut self) -> PageHook {
        self.next_hook += 1;
        PageHook::new(self.next_hook)
    }
}

impl AdminApi for RecordingHost {
    fn add_menu_page(
        &mut self,
        page_title: &str,
        _menu_title: &str,
        _capability: &str,
        menu_slug: &str,
        render: RenderThunk,
        icon_url: Option<&str>,
        position: Option<i64>,
    ) -> HostResult<PageHook> {
        self.check_fail("add_menu_page")?;
        self.calls.push(HostCall::MenuPage {
            slug: menu_slug.to_string(),
            title: page_title.to_string(),
            icon_url: icon_url.map(str::to_string),
            position,
        });
        self.thunks.insert(menu_slug.to_string(), render);
        self.slugs.insert(menu_slug);
        Ok(self.next_hook())
    }

    fn add_submenu_page(
        &mut self,
        parent_slug: &str,
        _page_title: &str,
        _menu_title: &str,
        _capability: &str,
        menu_slug: &str,
        render: RenderThunk,
    ) -> HostResult<PageHook> {
        self.check_fail("add_submenu_page")?;
        self.calls.push(HostCall::SubmenuPage {
            parent: parent_slug.to_string(),
            slug: menu_slug.to_string(),
        });
        self.thunks.insert(menu_slug.to_string(), render);
        self.slugs.insert(menu_slug);
        Ok(self.next_hook())
    }

    fn register_setting(
        &mut self,
        option_group: &str,
        option_name: &str,
        sanitizer: Option<&str>,
    ) -> HostResult<()> {
        self.check_fail("register_setting")?;
        self.calls.push(HostCall::Setting {
            group: option_group.to_string(),
            name: option_name.to_string(),
            sanitizer: sanitizer.map(str::to_string),
        });
        Ok(())
    }

    fn add_settings_section(
        &mut self,
        section: &str,
        _title: &str,
        render: RenderThunk,
        page: &str,
    ) -> HostResult<()> {
        self.check_fail("add_settings_section")?;
        self.calls.push(HostCall::Section {
            id: section.to_string(),
            page: page.to_string(),
        });
        self.thunks.insert(section.to_string(), render);
        Ok(())
    }

    fn add_settings_field(
        &mut self,
        field: &str,
        _title: &str,
        render: RenderThunk,
        page: &str,
        section: &str,
    ) -> HostResult<()> {
        self.check_fail("add_settings_field")?;
        self.calls.push(HostCall::Field {
            id: field.to_string(),
            page: page.to_string(),
            section: section.to_string(),
        });
        self.thunks.insert(field.to_string(), render);
        Ok(())
    }
}

/// In-memory [`OptionApi`] double that records every lookup.
#[derive(Debug, Default)]
pub struct MemoryOptions {
    /// Persisted option values.
    persisted: RefCell<BTreeMap<String, Value>>,
    /// Names passed to `get_option`, in call order.
    lookups: RefCell<Vec<String>>,
}

impl MemoryOptions {
    /// Store a persisted value for `name`.
    pub fn persist(&self, name: &str, value: Value) {
        self.persisted.borrow_mut().insert(name.to_string(), value);
    }

    /// Names passed to `get_option` so far, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

impl OptionApi for MemoryOptions {
    fn get_option(&self, name: &str, fallback: Value) -> Value {
        self.lookups.borrow_mut().push(name.to_string());
        self.persisted
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or(fallback)
    }
}

/// An [`OptionStore`] over empty defaults and a fresh [`MemoryOptions`],
/// returned together for inspection.
pub fn memory_store() -> (Arc<OptionStore>, Arc<MemoryOptions>) {
    let api = Arc::new(MemoryOptions::default());
    let store = Arc::new(OptionStore::new(Config::from_map(Map::new()), api.clone()));
    (store, api)
}
