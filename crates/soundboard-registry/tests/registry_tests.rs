use soundboard_registry::*;
use soundboard_storage::{MapStore, MemoryStore, NameMap};

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> (Registry, MemoryStore) {
        let store = MemoryStore::new();
        let registry = Registry::open(store.clone()).unwrap();
        (registry, store)
    }

    #[test]
    fn test_add_sound_persists_tiles() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.action_for("Air Horn"),
            Some(&TileAction::Play("/s/a.mp3".into()))
        );
        assert_eq!(registry.key_for("Air Horn"), None);

        let saved = store.snapshot(Container::Tiles).unwrap();
        assert_eq!(saved.get("Air Horn"), Some("/s/a.mp3"));
        assert_eq!(store.save_count(Container::Bindings), 0);
    }

    #[test]
    fn test_add_sound_validation() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();

        assert!(matches!(
            registry.add_sound("", "/s/x.mp3"),
            Err(RegistryError::EmptyName)
        ));
        assert!(matches!(
            registry.add_sound("Klaxon", ""),
            Err(RegistryError::EmptyPath(_))
        ));
        assert!(matches!(
            registry.add_sound("Air Horn", "/s/other.mp3"),
            Err(RegistryError::DuplicateName(name)) if name == "Air Horn"
        ));
        assert!(matches!(
            registry.add_sound(RESERVED_TILE, "/s/new.mp3"),
            Err(RegistryError::DuplicateName(_))
        ));

        assert_eq!(registry.len(), 1);
        assert_eq!(store.save_count(Container::Tiles), 1);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let (mut registry, _) = open();
        registry.add_sound("horn", "/s/a.mp3").unwrap();
        registry.add_sound("Horn", "/s/b.mp3").unwrap();
        registry.add_sound("new", "/s/c.mp3").unwrap();

        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_key_scenario() {
        let (mut registry, _) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.rebind_key("Air Horn", Some("a".into())).unwrap();
        registry.add_sound("Klaxon", "/s/k.mp3").unwrap();

        let err = registry.rebind_key("Klaxon", Some("a".into())).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateKey { ref key, ref owner } if key == "a" && owner == "Air Horn"
        ));
        assert!(err.is_validation());

        assert_eq!(registry.key_for("Air Horn"), Some("a"));
        assert_eq!(registry.key_for("Klaxon"), None);
        assert_eq!(registry.resolve_key_press("a"), Some("Air Horn"));
    }

    #[test]
    fn test_rebind_returns_change_set() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();

        let changes = registry.rebind_key("Air Horn", Some("a".into())).unwrap();
        assert_eq!(changes.unbind, None);
        assert_eq!(
            changes.bind,
            Some(Binding {
                key: "a".into(),
                name: "Air Horn".into(),
                action: TileAction::Play("/s/a.mp3".into()),
            })
        );

        let changes = registry.rebind_key("Air Horn", Some("b".into())).unwrap();
        assert_eq!(changes.unbind.as_deref(), Some("a"));
        assert_eq!(changes.bind.map(|b| b.key), Some("b".to_string()));

        assert_eq!(registry.resolve_key_press("a"), None);
        assert_eq!(registry.resolve_key_press("b"), Some("Air Horn"));
        assert_eq!(
            store.snapshot(Container::Bindings).unwrap().get("Air Horn"),
            Some("b")
        );
    }

    #[test]
    fn test_unbind_releases_key() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.add_sound("Klaxon", "/s/k.mp3").unwrap();
        registry.rebind_key("Air Horn", Some("K".into())).unwrap();

        let changes = registry.rebind_key("Air Horn", None).unwrap();
        assert_eq!(changes.unbind.as_deref(), Some("K"));
        assert_eq!(changes.bind, None);
        assert!(!store
            .snapshot(Container::Bindings)
            .unwrap()
            .contains_key("Air Horn"));

        // The released key is free for any name, the reserved tile included
        registry.rebind_key("Klaxon", Some("K".into())).unwrap();
        registry.unbind_key("Klaxon").unwrap();
        registry.rebind_key(RESERVED_TILE, Some("K".into())).unwrap();
        assert_eq!(registry.resolve_key_press("K"), Some(RESERVED_TILE));
    }

    #[test]
    fn test_reserved_tile_binding() {
        let (mut registry, _) = open();

        let changes = registry.rebind_key(RESERVED_TILE, Some("n".into())).unwrap();
        assert_eq!(
            changes.bind.map(|b| b.action),
            Some(TileAction::PromptAdd)
        );
        assert_eq!(registry.key_label(RESERVED_TILE), "[n]");
    }

    #[test]
    fn test_rebind_unknown_tile() {
        let (mut registry, _) = open();
        assert!(matches!(
            registry.rebind_key("Ghost", Some("g".into())),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.rebind_key("New", Some(String::new())),
            Err(RegistryError::EmptyKey)
        ));
    }

    #[test]
    fn test_keys_are_compared_literally() {
        let (mut registry, _) = open();
        registry.add_sound("A", "/a").unwrap();
        registry.add_sound("B", "/b").unwrap();

        registry.rebind_key("A", Some("Control-a".into())).unwrap();
        registry.rebind_key("B", Some("control-A".into())).unwrap();

        assert_eq!(registry.resolve_key_press("Control-a"), Some("A"));
        assert_eq!(registry.resolve_key_press("control-A"), Some("B"));
    }

    #[test]
    fn test_rename_moves_sound_and_binding() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.add_sound("Klaxon", "/s/k.mp3").unwrap();
        registry.rebind_key("Air Horn", Some("a".into())).unwrap();

        registry.rename_tile("Air Horn", "Horn").unwrap();

        assert!(registry.tile("Air Horn").is_none());
        assert_eq!(registry.key_for("Horn"), Some("a"));
        assert_eq!(
            registry.tiles().iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["New", "Horn", "Klaxon"]
        );

        let tiles = store.snapshot(Container::Tiles).unwrap();
        let bindings = store.snapshot(Container::Bindings).unwrap();
        assert_eq!(tiles.get("Horn"), Some("/s/a.mp3"));
        assert!(!tiles.contains_key("Air Horn"));
        assert_eq!(bindings.get("Horn"), Some("a"));
        assert!(!bindings.contains_key("Air Horn"));
    }

    #[test]
    fn test_rename_unbound_tile_has_no_key_changes() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();

        let changes = registry.rename_tile("Air Horn", "Horn").unwrap();
        assert!(changes.is_empty());
        assert_eq!(store.save_count(Container::Bindings), 1);
    }

    #[test]
    fn test_rename_round_trip() {
        let (mut registry, _) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.rebind_key("Air Horn", Some("a".into())).unwrap();
        let before_tiles = registry.tiles_map();
        let before_bindings = registry.bindings_map();

        registry.rename_tile("Air Horn", "Horn2").unwrap();
        registry.rename_tile("Horn2", "Air Horn").unwrap();

        assert_eq!(registry.tiles_map(), before_tiles);
        assert_eq!(registry.bindings_map(), before_bindings);
    }

    #[test]
    fn test_rename_onto_existing_name() {
        let (mut registry, _) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.add_sound("Horn2", "/s/h.mp3").unwrap();

        assert!(matches!(
            registry.rename_tile("Air Horn", "Horn2"),
            Err(RegistryError::DuplicateName(name)) if name == "Horn2"
        ));
        assert_eq!(
            registry.action_for("Air Horn"),
            Some(&TileAction::Play("/s/a.mp3".into()))
        );
        assert_eq!(
            registry.action_for("Horn2"),
            Some(&TileAction::Play("/s/h.mp3".into()))
        );
    }

    #[test]
    fn test_rename_validation() {
        let (mut registry, _) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();

        assert!(matches!(
            registry.rename_tile("Ghost", "Spirit"),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            registry.rename_tile("Air Horn", ""),
            Err(RegistryError::EmptyName)
        ));
        assert!(matches!(
            registry.rename_tile("Air Horn", RESERVED_TILE),
            Err(RegistryError::DuplicateName(_))
        ));
        assert!(matches!(
            registry.rename_tile(RESERVED_TILE, "Add"),
            Err(RegistryError::ReservedTile(_))
        ));
        assert!(registry.contains("Air Horn"));
    }

    #[test]
    fn test_delete_removes_tile_and_binding() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.rebind_key("Air Horn", Some("a".into())).unwrap();

        let changes = registry.delete_tile("Air Horn").unwrap();
        assert_eq!(changes.unbind.as_deref(), Some("a"));
        assert_eq!(changes.bind, None);

        assert!(registry.is_empty());
        assert_eq!(registry.resolve_key_press("a"), None);
        assert!(store.snapshot(Container::Tiles).unwrap().is_empty());
        assert!(store.snapshot(Container::Bindings).unwrap().is_empty());
    }

    #[test]
    fn test_delete_reserved_tile_fails() {
        let (mut registry, _) = open();
        registry.rebind_key(RESERVED_TILE, Some("n".into())).unwrap();

        let err = registry.delete_tile(RESERVED_TILE).unwrap_err();
        assert!(matches!(err, RegistryError::ReservedTile(_)));
        assert_eq!(registry.key_for(RESERVED_TILE), Some("n"));
        assert!(matches!(
            registry.delete_tile("Ghost"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_storage_failure_keeps_mutation() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.rebind_key("Air Horn", Some("a".into())).unwrap();
        store.set_failing(Container::Bindings, true);

        let err = registry.rename_tile("Air Horn", "Horn").unwrap_err();
        assert!(!err.is_validation());
        let pending = err.pending_changes().unwrap();
        assert_eq!(pending.unbind.as_deref(), Some("a"));

        // Memory changed, the tiles container was still written
        assert_eq!(registry.key_for("Horn"), Some("a"));
        assert!(store.snapshot(Container::Tiles).unwrap().contains_key("Horn"));
        assert_eq!(
            store.snapshot(Container::Bindings).unwrap().get("Air Horn"),
            Some("a")
        );

        store.set_failing(Container::Bindings, false);
        registry.save_all().unwrap();
        assert_eq!(
            store.snapshot(Container::Bindings).unwrap().get("Horn"),
            Some("a")
        );
    }

    #[test]
    fn test_bind_all_in_display_order() {
        let store = MemoryStore::new()
            .with_map(
                Container::Tiles,
                [("Air Horn", "/s/a.mp3"), ("Klaxon", "/s/k.mp3")].into_iter().collect(),
            )
            .with_map(
                Container::Bindings,
                [("Klaxon", "k"), ("New", "n"), ("Air Horn", "a")].into_iter().collect(),
            );
        let registry = Registry::open(store).unwrap();

        let keys: Vec<_> = registry.bind_all().into_iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["n", "a", "k"]);
    }

    #[test]
    fn test_persisted_state_reloads() {
        let (mut registry, store) = open();
        registry.add_sound("Air Horn", "/s/a.mp3").unwrap();
        registry.rebind_key("Air Horn", Some("a".into())).unwrap();
        registry.rebind_key(RESERVED_TILE, Some("n".into())).unwrap();

        let reloaded = Registry::open(store.clone()).unwrap();
        assert_eq!(reloaded.tiles(), registry.tiles());
        assert_eq!(
            store.load(Container::Bindings).unwrap(),
            [("New", "n"), ("Air Horn", "a")].into_iter().collect::<NameMap>()
        );
    }
}
