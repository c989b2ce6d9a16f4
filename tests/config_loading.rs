//! Loading model configuration from disk

use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use trellis::{Model, ModelConfig, ModelFlags, TrellisError, World};

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_builds_model() {
    let file = write_config(".yaml", "indexes:\n  - spo\n  - ops\ngraphs: true\n");
    let config = ModelConfig::load(file.path()).unwrap();
    let flags = config.to_flags().unwrap();
    assert!(flags.contains(ModelFlags::INDEX_OPS | ModelFlags::INDEX_GRAPHS));

    let model = Model::new(Arc::new(World::new()), flags).unwrap();
    assert_eq!(model.index_orders().len(), 4);
}

#[test]
fn test_load_json() {
    let file = write_config(".json", r#"{"indexes": ["pso"], "store_cursors": true}"#);
    let config = ModelConfig::load(file.path()).unwrap();
    assert_eq!(
        config.to_flags().unwrap(),
        ModelFlags::INDEX_PSO | ModelFlags::STORE_CURSORS
    );
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, TrellisError::Io(_)));
}

#[test]
fn test_load_malformed_yaml() {
    let file = write_config(".yaml", "indexes: [spo\n");
    assert!(matches!(
        ModelConfig::load(file.path()),
        Err(TrellisError::Config(_))
    ));
}
