//! Loading the runtime configuration from disk

use std::io::Write;

use rivet_runtime::{ConfigError, InvocationArg, InvocationError, OverloadPolicy, RuntimeConfig};
use tempfile::NamedTempFile;

use super::harness::*;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_file_drives_runtime() {
    let file = write_config(
        r#"
numeric_widening = false
overloads = "reject-ambiguous"
"#,
    );
    let config = RuntimeConfig::from_file(file.path()).unwrap();
    assert_eq!(config.overloads, OverloadPolicy::RejectAmbiguous);

    let runtime = runtime_with(config);
    assert!(!runtime.config().numeric_widening);

    let printer = runtime.create_instance("Printer", &[]).unwrap();
    let err = printer
        .invoke("sum", &[InvocationArg::from(1_i32), InvocationArg::from(2_i32)])
        .unwrap_err();
    assert!(matches!(err, InvocationError::MethodNotFound { .. }));
}

#[test]
fn test_json_depth_from_config() {
    let file = write_config("max_json_depth = 1\n");
    let runtime = runtime_with(RuntimeConfig::from_file(file.path()).unwrap());
    let printer = runtime.create_instance("Printer", &[]).unwrap();

    let flat = rivet_runtime::JsonArg::new("Array", "[1, 2]");
    assert!(printer.invoke("print", &[InvocationArg::from(flat)]).is_ok());

    let nested = rivet_runtime::JsonArg::new("Array", "[[1], [2]]");
    let err = printer.invoke("print", &[InvocationArg::from(nested)]).unwrap_err();
    assert!(matches!(err, InvocationError::Argument(_)));
}

#[test]
fn test_invalid_files() {
    let missing = std::env::temp_dir().join("rivet-no-such-config.toml");
    assert!(matches!(RuntimeConfig::from_file(&missing), Err(ConfigError::IoError(_))));

    let file = write_config("overloads = \"sometimes\"\n");
    assert!(matches!(RuntimeConfig::from_file(file.path()), Err(ConfigError::ParseError(_))));

    let file = write_config("max_json_depth = 0\n");
    assert!(matches!(RuntimeConfig::from_file(file.path()), Err(ConfigError::ValidationError(_))));
}
