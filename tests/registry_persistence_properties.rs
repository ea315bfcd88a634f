//! Property-based tests for on-disk persistence
//!
//! Whatever sequence of edits a session makes, a new session opened on the
//! same directory sees the same tiles, in the same order, with the same keys.

use proptest::prelude::*;
use soundboard_registry::{CorruptPolicy, Registry};
use soundboard_storage::FileSystemStore;

#[derive(Debug, Clone)]
enum Edit {
    Add(String),
    Rename(String, String),
    Bind(String, String),
    Unbind(String),
    Delete(String),
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("New".to_string()),
        "[a-c]{1,2}",
        "[A-C] [a-b]",
        Just("Air \"Horn\"".to_string()),
    ]
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        name_strategy().prop_map(Edit::Add),
        (name_strategy(), name_strategy()).prop_map(|(a, b)| Edit::Rename(a, b)),
        (name_strategy(), "[xyz]|Control-[xy]").prop_map(|(n, k)| Edit::Bind(n, k)),
        name_strategy().prop_map(Edit::Unbind),
        name_strategy().prop_map(Edit::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_reopen_sees_same_state(edits in prop::collection::vec(edit_strategy(), 0..25)) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileSystemStore::new(temp_dir.path()).unwrap();
        let mut registry = Registry::open(store.clone()).unwrap();

        for edit in &edits {
            let _ = match edit {
                Edit::Add(name) => registry.add_sound(name.clone(), format!("/s/{}.mp3", name)).map(|_| ()),
                Edit::Rename(from, to) => registry.rename_tile(from, to.clone()).map(|_| ()),
                Edit::Bind(name, key) => registry.rebind_key(name, Some(key.clone())).map(|_| ()),
                Edit::Unbind(name) => registry.unbind_key(name).map(|_| ()),
                Edit::Delete(name) => registry.delete_tile(name).map(|_| ()),
            };
        }

        let (reopened, warnings) = Registry::open_with(store, CorruptPolicy::Fail).unwrap();
        prop_assert!(warnings.is_empty(), "unexpected load fixes: {:?}", warnings);
        prop_assert_eq!(reopened.tiles(), registry.tiles());
        prop_assert_eq!(reopened.bindings_map(), registry.bindings_map());
    }
}
