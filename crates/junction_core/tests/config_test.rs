//! Integration tests for configuration loading.

use junction_core::{Component, ConfigError, EntityStore, EventBus, JunctionConfig};

#[derive(Debug, PartialEq)]
struct Score(u64);
impl Component for Score {}

fn temp_config_path() -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("junction_config_{id}.toml"))
}

#[test]
fn test_load_from_file_and_build() {
    let path = temp_config_path();
    let text = r#"
[store]
elements_per_chunk = 16
initial_entity_capacity = 128

[events]
default_mailbox_capacity = 4
"#;
    std::fs::write(&path, text).unwrap();

    let config = JunctionConfig::load(&path).unwrap();
    assert_eq!(config.store.elements_per_chunk, 16);
    assert_eq!(config.store.initial_entity_capacity, 128);
    assert_eq!(config.events.default_mailbox_capacity, 4);

    let mut store = EntityStore::with_config(&config.store);
    let e = store.create_entity();
    store.add_component(e, Score(7));
    assert_eq!(store.get_component::<Score>(e), Some(&Score(7)));

    let mut bus: EventBus = EventBus::with_config(&config.events);
    let mailbox = bus.subscribe_queued_default::<u8>();
    assert_eq!(mailbox.capacity(), 4);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_zero_chunk_size_is_rejected() {
    let err = JunctionConfig::from_toml_str("[store]\nelements_per_chunk = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().starts_with("invalid configuration"));
}

#[test]
fn test_unknown_file_is_io_error() {
    let err = JunctionConfig::load(temp_config_path()).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
