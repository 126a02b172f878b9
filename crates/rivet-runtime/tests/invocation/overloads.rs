//! Overload selection, widening and inherited statics

use rivet_runtime::{InvocationArg, InvocationError, OverloadPolicy, RuntimeConfig, Value};

use super::harness::*;

fn print(arg: InvocationArg) -> String {
    let runtime = runtime();
    let printer = runtime.create_instance("Printer", &[]).unwrap();
    let result = printer.invoke("print", &[arg]).unwrap();
    result.value().as_str().unwrap_or_default().to_string()
}

#[test]
fn test_overload_by_argument_class() {
    assert_eq!(print(InvocationArg::from("hi")), "string:hi");
    assert_eq!(print(InvocationArg::from(4_i32)), "integer:4");
    assert_eq!(print(InvocationArg::from(true)), "object:true");
    assert_eq!(print(InvocationArg::from(2.5_f64)), "object:2.5");
}

#[test]
fn test_declared_class_drives_selection() {
    let runtime = runtime();
    let printer = runtime.create_instance("Printer", &[]).unwrap();
    let as_object = runtime.wrap(Value::string("hi"), "Object").unwrap();

    let result = printer.invoke("print", &[InvocationArg::from(&as_object)]).unwrap();
    assert_eq!(result.value().as_str(), Some("object:hi"));
}

#[test]
fn test_null_argument_uses_its_class() {
    let result = print(InvocationArg::null("String"));
    assert_eq!(result, "string:null");
}

#[test]
fn test_widening() {
    let runtime = runtime();
    let printer = runtime.create_instance("Printer", &[]).unwrap();

    let sum = printer
        .invoke("sum", &[InvocationArg::from(2_i32), InvocationArg::from(3_i8)])
        .unwrap();
    assert_eq!(sum.value(), &Value::i64(5));
    assert_eq!(sum.class_name(), "Long");

    let half = printer.invoke("half", &[InvocationArg::from('d')]).unwrap();
    assert_eq!(half.value(), &Value::f64(50.0));
}

#[test]
fn test_widening_disabled() {
    let runtime = runtime_with(RuntimeConfig {
        numeric_widening: false,
        ..RuntimeConfig::default()
    });
    let printer = runtime.create_instance("Printer", &[]).unwrap();

    let err = printer
        .invoke("sum", &[InvocationArg::from(2_i32), InvocationArg::from(3_i32)])
        .unwrap_err();
    assert_eq!(err.to_string(), "No method Printer.sum(Integer, Integer) found");

    let sum = printer
        .invoke("sum", &[InvocationArg::from(2_i64), InvocationArg::from(3_i64)])
        .unwrap();
    assert_eq!(sum.value(), &Value::i64(5));
}

#[test]
fn test_ambiguous_overloads() {
    let args = [InvocationArg::from(1_i32), InvocationArg::from(2_i32)];

    let runtime = runtime();
    let printer = runtime.create_instance("Printer", &[]).unwrap();
    let first = printer.invoke("pair", &args).unwrap();
    assert_eq!(first.value().as_str(), Some("integer-object"));

    let strict = runtime_with(RuntimeConfig {
        overloads: OverloadPolicy::RejectAmbiguous,
        ..RuntimeConfig::default()
    });
    let printer = strict.create_instance("Printer", &[]).unwrap();
    let err = printer.invoke("pair", &args).unwrap_err();
    assert!(matches!(err, InvocationError::AmbiguousMethod { candidates: 2, .. }));

    let exact = printer
        .invoke("pair", &[InvocationArg::from(1_i32), InvocationArg::from("x")])
        .unwrap();
    assert_eq!(exact.value().as_str(), Some("integer-object"));
}

#[test]
fn test_builtin_overloads() {
    let runtime = runtime();
    let from_int = runtime
        .invoke_static("Integer", "valueOf", &[InvocationArg::from(8_i32)])
        .unwrap();
    let from_str = runtime
        .invoke_static("Integer", "valueOf", &[InvocationArg::from(" 8 ")])
        .unwrap();
    assert_eq!(from_int.value(), from_str.value());
}

#[test]
fn test_static_methods_are_inherited() {
    let runtime = runtime();
    let result = runtime
        .invoke_static("ChildWithStatic", "methodWithArg", &[InvocationArg::from(5_i32)])
        .unwrap();
    assert_eq!(result.value().as_str(), Some("5"));
}

#[test]
fn test_instance_and_static_lookups_are_separate() {
    let runtime = runtime();
    let err = runtime.invoke_static("Dummy", "getI", &[]).unwrap_err();
    assert!(matches!(err, InvocationError::MethodNotFound { .. }));

    let dummy = new_dummy(&runtime, 1);
    let err = dummy.invoke_static("getI", &[]).unwrap_err();
    assert!(matches!(err, InvocationError::MethodNotFound { .. }));
}

#[test]
fn test_constructor_overloads() {
    let runtime = runtime();
    let empty = runtime.create_instance("Dummy", &[]).unwrap();
    assert_eq!(empty.invoke("getI", &[]).unwrap().value(), &Value::i32(0));

    let err = runtime
        .create_instance("Dummy", &[InvocationArg::from("nope")])
        .unwrap_err();
    assert_eq!(err.to_string(), "No constructor Dummy(String) found");

    let err = runtime
        .create_instance("ChildDummy", &[InvocationArg::from(1_i32)])
        .unwrap_err();
    assert!(matches!(err, InvocationError::ConstructorNotFound { .. }));
}
