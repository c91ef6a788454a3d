#[cfg(test)]
mod tests {
    use std::{fs, io::Write as _};

    use crate::*; // bring Config, Value, Map and the loaders into scope

    /// A small but representative settings-page document.
    const SAMPLE: &str = r#"{
        "pages": {
            "demo-settings": {
                "parent_slug": "settings",
                "page_title": "Demo Settings",
                "menu_title": "Demo",
                "capability": "manage_options",
                "view": "views/options-page.html",
            },
        },
        "settings": {
            "demo_settings": {
                "sections": {
                    "demo_section": {
                        "title": "Name Settings",
                        "fields": {
                            "first_name": { "title": "First Name" },
                        },
                    },
                },
            },
        },
    }"#;

    #[test]
    fn top_level_keys_in_document_order() {
        let cfg = load_from_str(SAMPLE, None).unwrap();
        let keys: Vec<&str> = cfg.keys().collect();
        assert_eq!(keys, vec!["pages", "settings"]);
        assert!(cfg.contains("pages"));
        assert!(cfg.contains("settings"));
        assert!(!cfg.contains("views"));
    }

    #[test]
    fn map_entries_keep_declaration_order() {
        let src = r#"{
            "zeta": 1, "alpha": 2, "mid": 3, "beta": 4,
        }"#;
        let cfg = load_from_str(src, None).unwrap();
        let keys: Vec<&str> = cfg.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid", "beta"]);
    }

    #[test]
    fn nested_payload_is_reachable() {
        let cfg = load_from_str(SAMPLE, None).unwrap();
        let pages = cfg.get("pages").unwrap().as_map().unwrap();
        let page = pages.get("demo-settings").unwrap().as_map().unwrap();
        assert_eq!(page.get("capability").unwrap().as_str(), Some("manage_options"));
        assert_eq!(page.get("view").unwrap().as_str(), Some("views/options-page.html"));
    }

    #[test]
    fn get_on_absent_key_is_missing_key() {
        let cfg = Config::from_map(Map::new());
        match cfg.get("pages") {
            Err(Error::MissingKey { key }) => assert_eq!(key, "pages"),
            other => panic!("expected MissingKey, got {:?}", other),
        }
    }

    #[test]
    fn parse_error_reports_location() {
        let src = "{\n  \"pages\": {\n  \"oops\"\n}";
        let err = load_from_str(src, None).unwrap_err();
        match err {
            Error::Parse { line, ref excerpt, .. } => {
                assert!(line >= 1);
                assert!(!excerpt.is_empty());
            }
            other => panic!("expected Parse, got {:?}", other),
        }
        assert!(!err.pretty().is_empty());
    }

    #[test]
    fn non_mapping_top_level_is_rejected() {
        let err = load_from_str(r#"["pages"]"#, None).unwrap_err();
        match err {
            Error::NotAMapping { found, .. } => assert_eq!(found, "list"),
            other => panic!("expected NotAMapping, got {:?}", other),
        }
    }

    #[test]
    fn load_from_path_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings-page.ron");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let cfg = Config::from_path(&path).unwrap();
        assert!(cfg.contains("pages"));
    }

    #[test]
    fn load_from_missing_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_path(&dir.path().join("nope.ron")).unwrap_err();
        match err {
            Error::Read { path, .. } => assert!(path.is_some()),
            other => panic!("expected Read, got {:?}", other),
        }
    }

    #[test]
    fn scalar_values_parse() {
        let src = r#"{
            "flag": true,
            "count": 42,
            "ratio": 0.5,
            "label": "hello",
            "nothing": (),
            "items": [1, 2, 3],
        }"#;
        let cfg = load_from_str(src, None).unwrap();
        assert_eq!(cfg.get("flag").unwrap().as_bool(), Some(true));
        assert_eq!(cfg.get("count").unwrap().as_int(), Some(42));
        assert_eq!(cfg.get("label").unwrap().as_str(), Some("hello"));
        assert!(cfg.get("nothing").unwrap().is_null());
        assert_eq!(cfg.get("items").unwrap().as_list().unwrap().len(), 3);
    }
}
