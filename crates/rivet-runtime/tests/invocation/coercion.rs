//! JSON argument descriptors coerced into typed values

use rivet_runtime::{InvocationArg, InvocationError, JsonArg, Value};
use serde::Serialize;

use super::harness::*;

#[derive(Serialize)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn test_serde_argument_builds_instance() {
    let runtime = runtime();
    let a = InvocationArg::new(&Point { x: 1, y: 2 }, "Point").unwrap();
    let b = InvocationArg::new(&Point { x: 4, y: -2 }, "Point").unwrap();

    let distance = runtime.invoke_static("Geometry", "manhattan", &[a, b]).unwrap();
    assert_eq!(distance.value(), &Value::i32(7));
}

#[test]
fn test_missing_keys_keep_defaults() {
    let runtime = runtime();
    let origin = InvocationArg::from(JsonArg::new("Point", "{}"));
    let partial = InvocationArg::from(JsonArg::new("Point", r#"{"y": 5}"#));

    let distance = runtime.invoke_static("Geometry", "manhattan", &[origin, partial]).unwrap();
    assert_eq!(distance.value(), &Value::i32(5));
}

#[test]
fn test_unknown_field_rejected() {
    let runtime = runtime();
    let bad = InvocationArg::from(JsonArg::new("Point", r#"{"x": 1, "z": 2}"#));
    let origin = InvocationArg::from(JsonArg::new("Point", "{}"));

    let err = runtime.invoke_static("Geometry", "manhattan", &[bad, origin]).unwrap_err();
    assert!(matches!(err, InvocationError::Argument(ref msg) if msg.contains("'z'")));
}

#[test]
fn test_descriptor_from_the_wire() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 0);

    let wire = r#"{"class_name":"Integer","json":"17"}"#;
    let descriptor: JsonArg = serde_json::from_str(wire).unwrap();
    dummy.invoke("setI", &[InvocationArg::from(descriptor)]).unwrap();
    assert_eq!(dummy.invoke("getI", &[]).unwrap().value(), &Value::i32(17));
}

#[test]
fn test_malformed_json() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 0);
    let err = dummy
        .invoke("setI", &[InvocationArg::from(JsonArg::new("Integer", "1 2"))])
        .unwrap_err();
    assert!(matches!(err, InvocationError::Json(_)));
}

#[test]
fn test_wrong_shape_for_class() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 0);
    for json in [r#""12""#, "1.5", "3000000000", "[1]"] {
        let err = dummy
            .invoke("setI", &[InvocationArg::from(JsonArg::new("Integer", json))])
            .unwrap_err();
        assert!(matches!(err, InvocationError::Argument(_)), "{} should be rejected", json);
    }
}

#[test]
fn test_unknown_argument_class() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 0);
    let err = dummy
        .invoke("setI", &[InvocationArg::from(JsonArg::new("Imaginary", "1"))])
        .unwrap_err();
    assert!(matches!(err, InvocationError::ClassNotFound(ref name) if name == "Imaginary"));
}

#[test]
fn test_string_slice_becomes_array() {
    let runtime = runtime();
    let printer = runtime.create_instance("Printer", &[]).unwrap();
    let result = printer
        .invoke("print", &[InvocationArg::from(&["arg1", "arg2"][..])])
        .unwrap();
    assert_eq!(result.value().as_str(), Some("object:[arg1, arg2]"));
}

#[test]
fn test_null_argument_reaches_body() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 3);
    dummy.invoke("setI", &[InvocationArg::null("Integer")]).unwrap();

    let field = dummy.field("i").unwrap();
    assert!(field.value().is_null());
    assert_eq!(field.class_name(), "Integer");
}
