#[cfg(test)]
mod tests {
    use ollie::catalog::{ModelCatalog, ModelDescriptor, SortBy};

    fn descriptor(id: &str, name: &str, priority: u32) -> ModelDescriptor {
        ModelDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: "general".to_string(),
            size_gb: 1.0,
            context_window: 8192,
            recommended_use: vec!["chat".to_string()],
            install_command: format!("ollama pull {}", id),
            enabled: true,
            priority,
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ModelCatalog::load(dir.path().join("missing.json"));

        assert_eq!(catalog.default_model(), "llama3.2:3b");
        assert!(catalog.by_id("llama3.2:3b").is_some());
        assert!(catalog.categories().contains_key("general"));
    }

    #[test]
    fn test_malformed_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");
        std::fs::write(&path, "{ not json").unwrap();

        let catalog = ModelCatalog::load(&path);
        assert_eq!(catalog.default_model(), "llama3.2:3b");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");

        let mut catalog = ModelCatalog::load(&path);
        catalog.add(descriptor("mistral:7b", "Mistral 7B", 2)).unwrap();
        catalog.set_default("mistral:7b").unwrap();
        catalog.disable("llama3.2:3b").unwrap();

        let reloaded = ModelCatalog::load(&path);
        assert_eq!(reloaded.default_model(), "mistral:7b");
        assert!(!reloaded.by_id("llama3.2:3b").unwrap().enabled);

        let mistral = reloaded.by_id("mistral:7b").unwrap();
        assert_eq!(mistral.name, "Mistral 7B");
        assert_eq!(mistral.priority, 2);
        assert_eq!(mistral.recommended_use, vec!["chat".to_string()]);
        assert!(reloaded.categories().contains_key("general"));
        assert_eq!(reloaded.settings().max_models_shown, 10);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ModelCatalog::load(dir.path().join("models.json"));

        assert!(catalog.add(descriptor("llama3.2:3b", "Dup", 1)).is_err());
    }

    #[test]
    fn test_set_default_unknown_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ModelCatalog::load(dir.path().join("models.json"));

        assert!(catalog.set_default("nope").is_err());
        assert_eq!(catalog.default_model(), "llama3.2:3b");
    }

    #[test]
    fn test_enable_disable_and_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ModelCatalog::load(dir.path().join("models.json"));
        catalog.add(descriptor("mistral:7b", "Mistral 7B", 2)).unwrap();

        assert_eq!(catalog.list_enabled(None).len(), 2);

        catalog.disable("mistral:7b").unwrap();
        let enabled = catalog.list_enabled(None);
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id, "llama3.2:3b");

        catalog.enable("mistral:7b").unwrap();
        assert_eq!(catalog.list_enabled(None).len(), 2);

        assert!(catalog.enable("nope").is_err());
    }

    #[test]
    fn test_listing_sort_orders() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ModelCatalog::load(dir.path().join("models.json"));
        catalog.add(descriptor("aaa:1b", "Zed Model", 5)).unwrap();
        catalog.add(descriptor("zzz:1b", "alpha model", 0)).unwrap();

        let by_priority = catalog.list_enabled(Some(SortBy::Priority));
        assert_eq!(by_priority[0].id, "zzz:1b");
        assert_eq!(by_priority[2].id, "aaa:1b");

        // Display names sort case-insensitively
        let by_name = catalog.list_enabled(Some(SortBy::Name));
        assert_eq!(by_name[0].name, "alpha model");
        assert_eq!(by_name[2].name, "Zed Model");
    }

    #[test]
    fn test_remove_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ModelCatalog::load(dir.path().join("models.json"));
        catalog.add(descriptor("mistral:7b", "Mistral 7B", 2)).unwrap();

        catalog.remove("mistral:7b").unwrap();
        assert!(catalog.by_id("mistral:7b").is_none());
        assert!(catalog.remove("mistral:7b").is_err());
    }

    // --- Availability matching ---

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_available_exact_match() {
        assert!(ModelCatalog::is_available(
            "mistral:7b",
            &names(&["mistral:7b"])
        ));
    }

    #[test]
    fn test_available_daemon_reports_latest_variant() {
        assert!(ModelCatalog::is_available(
            "llama3.2:3b",
            &names(&["llama3.2:3b:latest"])
        ));
        assert!(ModelCatalog::is_available(
            "llama3.2",
            &names(&["llama3.2:latest"])
        ));
    }

    #[test]
    fn test_available_daemon_reports_more_specific_tag() {
        assert!(ModelCatalog::is_available(
            "llama3.2",
            &names(&["llama3.2:3b"])
        ));
    }

    #[test]
    fn test_available_daemon_only_has_untagged_latest() {
        assert!(ModelCatalog::is_available(
            "mistral:7b",
            &names(&["mistral:latest"])
        ));
    }

    #[test]
    fn test_unavailable() {
        assert!(!ModelCatalog::is_available(
            "mistral:7b",
            &names(&["phi3:3.8b"])
        ));
        assert!(!ModelCatalog::is_available("mistral:7b", &[]));
        // A longer daemon name must not match on prefix alone
        assert!(!ModelCatalog::is_available(
            "llama3.2",
            &names(&["llama3.21:3b"])
        ));
    }

    #[test]
    fn test_availability_is_case_sensitive() {
        assert!(!ModelCatalog::is_available(
            "Mistral:7b",
            &names(&["mistral:7b"])
        ));
    }
}
