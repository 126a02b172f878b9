//! Instance and static calls through invocation handles

use rivet_runtime::{Invocation, InvocationArg, Value};
use serde::Deserialize;

use super::harness::*;

#[test]
fn test_method_matches() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 33);

    let result = dummy.invoke("getI", &[]).unwrap();
    assert_eq!(result.runtime_class_name(), Some("Integer"));
    assert_eq!(result.class_name(), "Integer");
    assert_eq!(result.value(), &Value::i32(33));
}

#[test]
fn test_static_method_matches() {
    let runtime = runtime();
    let class = runtime.class_handle("DummyWithStatic").unwrap();

    let result = class.invoke_static("method", &[]).unwrap();
    assert_eq!(result.runtime_class_name(), Some("String"));
    assert_eq!(result.value().as_str(), Some("method product"));
}

#[test]
fn test_with_arg() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 33);

    let three = runtime.wrap(Value::i32(3), "Integer").unwrap();
    dummy.invoke("setI", &[InvocationArg::from(three)]).unwrap();

    let result = dummy.invoke("getI", &[]).unwrap();
    assert_eq!(result.runtime_class_name(), Some("Integer"));
    assert_eq!(result.value(), &Value::i32(3));
}

#[test]
fn test_static_method_with_arg() {
    let runtime = runtime();
    let class = runtime.class_handle("DummyWithStatic").unwrap();

    let three = runtime.wrap(Value::i32(3), "Integer").unwrap();
    let result = class.invoke_static("methodWithArg", &[InvocationArg::from(&three)]).unwrap();
    assert_eq!(result.runtime_class_name(), Some("String"));
    assert_eq!(result.value().as_str(), Some("3"));
}

#[test]
fn test_json_arg_reaches_setter() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 1);
    dummy.invoke("setI", &[InvocationArg::from(42_i32)]).unwrap();
    assert_eq!(dummy.invoke("getI", &[]).unwrap().to_rust::<i32>().unwrap(), 42);
}

#[test]
fn test_void_method_returns_null() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 1);
    let result = dummy.invoke("setI", &[InvocationArg::from(2_i32)]).unwrap();
    assert!(result.value().is_null());
    assert_eq!(result.class_name(), "Void");
}

#[test]
fn test_inherited_builtin_methods() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 5);

    let name = dummy.invoke("getClassName", &[]).unwrap();
    assert_eq!(name.value().as_str(), Some("Dummy"));

    let same = dummy.invoke("equals", &[InvocationArg::from(&dummy)]).unwrap();
    assert_eq!(same.value(), &Value::bool(true));

    let other = new_dummy(&runtime, 5);
    let different = dummy.invoke("equals", &[InvocationArg::from(&other)]).unwrap();
    assert_eq!(different.value(), &Value::bool(false));
}

#[test]
fn test_results_are_receivers() {
    let runtime = runtime();
    let s = runtime.create_instance("String", &[InvocationArg::from("a,b,c")]).unwrap();

    let parts = s.invoke("split", &[InvocationArg::from(",")]).unwrap();
    assert_eq!(parts.class_name(), "Array");
    assert_eq!(parts.invoke("length", &[]).unwrap().value(), &Value::i32(3));

    let second = parts.invoke("get", &[InvocationArg::from(1_i32)]).unwrap();
    assert_eq!(second.class_name(), "Object");
    assert_eq!(second.runtime_class_name(), Some("String"));

    let as_string = Invocation::cast(&second, "String").unwrap();
    let upper = as_string.invoke("toUpperCase", &[]).unwrap();
    assert_eq!(upper.value().as_str(), Some("B"));
}

#[test]
fn test_nested_invocation_from_body() {
    let runtime = runtime();
    let result = runtime
        .invoke_static(
            "Geometry",
            "largest",
            &[
                InvocationArg::from(4_i32),
                InvocationArg::from(11_i32),
                InvocationArg::from(7_i32),
            ],
        )
        .unwrap();
    assert_eq!(result.value(), &Value::i32(11));
}

#[test]
fn test_field_access() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 9);
    let field = dummy.field("i").unwrap();
    assert_eq!(field.class_name(), "Integer");
    assert_eq!(field.value(), &Value::i32(9));
}

#[test]
fn test_to_rust_round_trip() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    let runtime = runtime();
    let point = runtime
        .create_instance("Point", &[])
        .unwrap();
    assert_eq!(runtime.to_rust::<Point>(point.clone()).unwrap(), Point { x: 0, y: 0 });
    assert_eq!(point.to_json().unwrap(), r#"{"x":0,"y":0}"#);

    let words = runtime
        .create_instance("String", &[InvocationArg::from("x y")])
        .unwrap()
        .invoke("split", &[InvocationArg::from(" ")])
        .unwrap();
    assert_eq!(words.to_rust::<Vec<String>>().unwrap(), vec!["x", "y"]);
}

#[test]
fn test_runtime_shared_across_threads() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 0);

    std::thread::scope(|scope| {
        for t in 0..4_i32 {
            let runtime = runtime.clone();
            scope.spawn(move || {
                for i in 0..50_i32 {
                    let result = runtime
                        .invoke_static("Integer", "max", &[InvocationArg::from(t), InvocationArg::from(i)])
                        .unwrap();
                    assert_eq!(result.value(), &Value::i32(t.max(i)));
                }
            });
        }
        scope.spawn(|| {
            for i in 0..50_i32 {
                dummy.invoke("setI", &[InvocationArg::from(i)]).unwrap();
            }
        });
    });

    assert_eq!(dummy.invoke("getI", &[]).unwrap().value(), &Value::i32(49));
}
