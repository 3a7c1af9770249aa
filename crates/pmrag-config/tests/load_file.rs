use std::collections::HashMap;
use std::io::Write;

use pmrag_config::{ApiProvider, Config, ConfigError};
use tempfile::NamedTempFile;

fn no_env() -> HashMap<&'static str, &'static str> {
    HashMap::new()
}

#[test]
fn loads_explicit_file_and_overlays_env() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[postgres]
schema = "pm"
table = "work_items"

[embedding]
provider = "openai"
model = "text-embedding-3-small"
dimensions = 1536

[eval]
output_dir = "runs"
"#
    )
    .unwrap();

    let env: HashMap<&str, &str> = [("OPENAI_API_KEY", "sk-test")].into_iter().collect();
    let config = Config::load(Some(file.path()), &env).unwrap();

    assert_eq!(config.postgres.schema, "pm");
    assert_eq!(config.postgres.table, "work_items");
    assert_eq!(config.embedding.api.provider, ApiProvider::OpenAI);
    assert_eq!(config.eval.output_dir.to_str(), Some("runs"));

    let creds = config.embedding.api.credentials().unwrap();
    assert_eq!(creds.api_key, "sk-test");
}

#[test]
fn missing_explicit_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = Config::load(Some(&path), &no_env()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn invalid_values_fail_validation() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[agent]\nsql_threshold = 2.0").unwrap();
    let err = Config::load(Some(file.path()), &no_env()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn secrets_are_not_serialized() {
    let env: HashMap<&str, &str> = [
        ("POSTGRES_PASSWORD", "hunter2"),
        ("AZURE_OPENAI_API_KEY", "azure-key"),
    ]
    .into_iter()
    .collect();
    let mut config = Config::default();
    config.apply_env(&env).unwrap();

    let rendered = toml::to_string(&config).unwrap();
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("azure-key"));
}
