#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use config::{Config, Map, Value, load_from_str};

    use crate::{
        Error, Registrar,
        options::OptionStore,
        test_support::{HostCall, MemoryOptions, RecordingHost, SharedSlugs, memory_store},
    };

    /// A page phase config with one sub-page and one top-level page.
    const PAGES: &str = r#"{
        "pages": {
            "demo-settings": {
                "parent_slug": "settings",
                "page_title": "Demo Settings",
                "menu_title": "Demo",
                "capability": "manage_options",
                "view": { "template": "<p>demo</p>" },
            },
            "demo-dashboard": {
                "page_title": "Demo Dashboard",
                "menu_title": "Dashboard",
                "capability": "manage_options",
                "icon_url": "icons/demo.svg",
                "position": 42,
            },
        },
    }"#;

    /// A settings phase config with two sections of two fields each.
    const SETTINGS: &str = r#"{
        "settings": {
            "demo_settings": {
                "sanitizer": "trim",
                "sections": {
                    "names": {
                        "title": "Name Settings",
                        "view": { "template": "<p>Who are you?</p>" },
                        "fields": {
                            "first_name": {
                                "title": "First Name",
                                "view": { "template": "<input type=\"text\" name=\"first_name\" value=\"{{options.first_name}}\">" },
                            },
                            "last_name": { "title": "Last Name" },
                        },
                    },
                    "flags": {
                        "title": "Flags",
                        "fields": {
                            "enabled": { "title": "Enabled" },
                            "verbose": { "title": "Verbose" },
                        },
                    },
                },
            },
        },
    }"#;

    fn registrar(source: &str) -> Registrar {
        let cfg = load_from_str(source, None).unwrap();
        let (store, _) = memory_store();
        Registrar::new(cfg, store)
    }

    #[test]
    fn pages_register_in_declared_order_with_matching_ops() {
        let mut reg = registrar(PAGES);
        let mut host = RecordingHost::default();
        let slugs = SharedSlugs::default();

        reg.add_pages(&mut host, &slugs).unwrap();

        assert_eq!(host.calls.len(), 2);
        match &host.calls[0] {
            HostCall::SubmenuPage { parent, slug } => {
                assert_eq!(parent, "settings");
                assert_eq!(slug, "demo-settings");
            }
            other => panic!("expected submenu page first, got {:?}", other),
        }
        match &host.calls[1] {
            HostCall::MenuPage {
                slug,
                icon_url,
                position,
                ..
            } => {
                assert_eq!(slug, "demo-dashboard");
                assert_eq!(icon_url.as_deref(), Some("icons/demo.svg"));
                assert_eq!(*position, Some(42));
            }
            other => panic!("expected top-level page second, got {:?}", other),
        }
        assert_eq!(reg.page_hooks().len(), 2);
    }

    #[test]
    fn already_registered_slug_is_skipped() {
        let mut reg = registrar(PAGES);
        let mut host = RecordingHost::default();
        let slugs = SharedSlugs::default();
        slugs.insert("demo-settings");

        reg.add_pages(&mut host, &slugs).unwrap();

        assert_eq!(host.calls.len(), 1);
        assert!(matches!(&host.calls[0], HostCall::MenuPage { slug, .. } if slug == "demo-dashboard"));
        assert_eq!(reg.page_hooks().len(), 1);
    }

    #[test]
    fn second_pass_adds_no_hooks_once_all_slugs_are_registered() {
        let mut reg = registrar(PAGES);
        let mut host = RecordingHost::default();
        let slugs = host.slugs.clone();

        reg.add_pages(&mut host, &slugs).unwrap();
        assert_eq!(reg.page_hooks().len(), 2);

        // The host recorded both slugs during the first pass, so the second
        // walk of the same config skips every entry.
        reg.add_pages(&mut host, &slugs).unwrap();
        assert_eq!(reg.page_hooks().len(), 2);
        assert_eq!(host.calls.len(), 2);
    }

    #[test]
    fn missing_phase_keys_are_no_ops() {
        let mut reg = registrar("{}");
        let mut host = RecordingHost::default();
        let slugs = SharedSlugs::default();

        reg.add_pages(&mut host, &slugs).unwrap();
        reg.init_settings(&mut host).unwrap();

        assert!(host.calls.is_empty());
        assert!(reg.page_hooks().is_empty());
    }

    #[test]
    fn settings_tree_registers_in_nested_declared_order() {
        let mut reg = registrar(SETTINGS);
        let mut host = RecordingHost::default();

        reg.init_settings(&mut host).unwrap();

        let summary: Vec<String> = host
            .calls
            .iter()
            .map(|call| match call {
                HostCall::Setting { group, name, .. } => format!("setting:{}:{}", group, name),
                HostCall::Section { id, page } => format!("section:{}:{}", id, page),
                HostCall::Field { id, section, .. } => format!("field:{}:{}", id, section),
                other => panic!("unexpected call {:?}", other),
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                "setting:demo_settings:demo_settings",
                "section:names:demo_settings",
                "field:first_name:names",
                "field:last_name:names",
                "section:flags:demo_settings",
                "field:enabled:flags",
                "field:verbose:flags",
            ]
        );
    }

    #[test]
    fn sanitizer_and_option_group_pass_through() {
        let src = r#"{
            "settings": {
                "demo_settings": {
                    "option_group": "demo_group",
                    "sanitizer": "trim",
                    "sections": {},
                },
            },
        }"#;
        let mut reg = registrar(src);
        let mut host = RecordingHost::default();
        reg.init_settings(&mut host).unwrap();

        assert_eq!(
            host.calls,
            vec![HostCall::Setting {
                group: "demo_group".to_string(),
                name: "demo_settings".to_string(),
                sanitizer: Some("trim".to_string()),
            }]
        );
    }

    #[test]
    fn field_render_queries_the_option_store_once_per_invocation() {
        let cfg = load_from_str(SETTINGS, None).unwrap();
        let mut defaults = Map::new();
        let mut values = Map::new();
        values.insert("first_name", "Elliot");
        defaults.insert("demo_settings", Value::Map(values));

        let api = Arc::new(MemoryOptions::default());
        let store = Arc::new(OptionStore::new(Config::from_map(defaults), api.clone()));
        let mut reg = Registrar::new(cfg, store);
        let mut host = RecordingHost::default();
        reg.init_settings(&mut host).unwrap();

        let thunk = host.thunks.get("first_name").unwrap();
        assert_eq!(thunk.setting(), Some("demo_settings"));
        assert!(api.lookups().is_empty());

        let html = thunk.render();
        assert_eq!(api.lookups(), vec!["demo_settings".to_string()]);
        assert_eq!(
            html,
            r#"<input type="text" name="first_name" value="Elliot">"#
        );

        let _again = thunk.render();
        assert_eq!(api.lookups().len(), 2);
    }

    #[test]
    fn field_without_view_renders_empty() {
        let mut reg = registrar(SETTINGS);
        let mut host = RecordingHost::default();
        reg.init_settings(&mut host).unwrap();

        let thunk = host.thunks.get("last_name").unwrap();
        assert_eq!(thunk.render(), "");
    }

    #[test]
    fn page_with_unreadable_view_path_renders_empty() {
        let src = r#"{
            "pages": {
                "demo": {
                    "page_title": "T",
                    "menu_title": "M",
                    "capability": "manage_options",
                    "view": "no/such/view.html",
                },
            },
        }"#;
        let mut reg = registrar(src);
        let mut host = RecordingHost::default();
        reg.add_pages(&mut host, &SharedSlugs::default()).unwrap();

        assert_eq!(host.thunks.get("demo").unwrap().render(), "");
    }

    #[test]
    fn missing_required_field_is_reported_with_entry_context() {
        // The section lacks a title, which add_settings_section requires.
        let src = r#"{
            "settings": {
                "demo_settings": {
                    "sections": {
                        "untitled": { "fields": {} },
                    },
                },
            },
        }"#;
        let mut reg = registrar(src);
        let mut host = RecordingHost::default();
        let err = reg.init_settings(&mut host).unwrap_err();

        match err {
            Error::Entry { entry, source } => {
                assert_eq!(entry, "demo_settings");
                match *source {
                    Error::Entry { entry, source } => {
                        assert_eq!(entry, "untitled");
                        assert!(matches!(*source, Error::Binding { .. }));
                    }
                    other => panic!("expected nested Entry, got {:?}", other),
                }
            }
            other => panic!("expected Entry, got {:?}", other),
        }
    }

    #[test]
    fn host_failure_stops_the_phase_with_entry_context() {
        let mut reg = registrar(PAGES);
        let mut host = RecordingHost::default();
        host.fail_on = Some("add_submenu_page".to_string());

        let err = reg.add_pages(&mut host, &SharedSlugs::default()).unwrap_err();
        match err {
            Error::Entry { entry, source } => {
                assert_eq!(entry, "demo-settings");
                assert!(matches!(*source, Error::Invocation { .. }));
            }
            other => panic!("expected Entry, got {:?}", other),
        }
        // The failing entry came first; nothing was registered.
        assert!(host.calls.is_empty());
        assert!(reg.page_hooks().is_empty());
    }

    #[test]
    fn malformed_entry_is_a_shape_error() {
        let src = r#"{ "pages": { "demo": "not a map" } }"#;
        let mut reg = registrar(src);
        let mut host = RecordingHost::default();
        let err = reg.add_pages(&mut host, &SharedSlugs::default()).unwrap_err();
        match err {
            Error::Entry { entry, source } => {
                assert_eq!(entry, "demo");
                assert!(matches!(*source, Error::BadShape { .. }));
            }
            other => panic!("expected Entry, got {:?}", other),
        }
    }
}
