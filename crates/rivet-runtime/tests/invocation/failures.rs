//! Error propagation: missing methods, thrown errors and panics

use std::error::Error as _;

use rivet_runtime::{InvocationArg, InvocationError, RuntimeConfig, ThrownError, Value};

use super::harness::*;

#[test]
fn test_no_method_found() {
    let runtime = runtime();
    let err = new_dummy(&runtime, 33).invoke("nonExisting", &[]).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "No method Dummy.nonExisting() found");
}

#[test]
fn test_error_during_invocation() {
    let runtime = runtime();
    let failing = runtime.create_instance("FailingDummy", &[]).unwrap();

    let err = failing.invoke("throwException", &[]).unwrap_err();
    let thrown = err.thrown().unwrap();
    assert_eq!(thrown, &ThrownError::runtime("this is a test"));
    assert!(!thrown.is_panic());
    assert_eq!(
        err.to_string(),
        "Error while invoking FailingDummy.throwException: RuntimeError: this is a test"
    );
    assert!(err.source().is_some());
}

#[test]
fn test_panic_becomes_thrown_error() {
    let runtime = runtime();
    let failing = runtime.create_instance("FailingDummy", &[]).unwrap();

    let err = failing.invoke("panicking", &[]).unwrap_err();
    let thrown = err.thrown().unwrap();
    assert!(thrown.is_panic());
    assert_eq!(thrown.message, "boom");

    // the runtime stays usable after a caught panic
    assert!(failing.invoke("getClassName", &[]).is_ok());
}

#[test]
#[should_panic(expected = "boom")]
fn test_panic_propagates_when_not_caught() {
    let runtime = runtime_with(RuntimeConfig {
        catch_panics: false,
        ..RuntimeConfig::default()
    });
    let failing = runtime.create_instance("FailingDummy", &[]).unwrap();
    let _ = failing.invoke("panicking", &[]);
}

#[test]
fn test_builtin_errors_are_thrown() {
    let runtime = runtime();
    let err = runtime
        .invoke_static("Integer", "parseInt", &[InvocationArg::from("twelve")])
        .unwrap_err();
    assert_eq!(err.thrown().unwrap().class_name, "NumberFormatError");

    let s = runtime.create_instance("String", &[InvocationArg::from("abc")]).unwrap();
    let err = s.invoke("charAt", &[InvocationArg::from(5_i32)]).unwrap_err();
    assert_eq!(err.thrown().unwrap().class_name, "IndexOutOfBoundsError");
}

#[test]
fn test_no_receiver() {
    let runtime = runtime();
    let class = runtime.class_handle("Dummy").unwrap();
    let err = class.invoke("getI", &[]).unwrap_err();
    assert!(matches!(err, InvocationError::NoReceiver { ref class, ref method } if class == "Dummy" && method == "getI"));

    let null = runtime.wrap(Value::Null, "Dummy").unwrap();
    assert!(matches!(null.invoke("getI", &[]), Err(InvocationError::NoReceiver { .. })));
    assert!(matches!(null.field("i"), Err(InvocationError::NoReceiver { .. })));
}

#[test]
fn test_unknown_classes() {
    let runtime = runtime();
    assert!(matches!(
        runtime.create_instance("Ghost", &[]),
        Err(InvocationError::ClassNotFound(_))
    ));
    assert!(matches!(
        runtime.invoke_static("Ghost", "boo", &[]),
        Err(InvocationError::ClassNotFound(_))
    ));
    assert!(matches!(runtime.class_handle("Ghost"), Err(InvocationError::ClassNotFound(_))));
    assert!(!runtime.has_class("Ghost"));
}

#[test]
fn test_registration_errors() {
    let runtime = runtime();
    let err = runtime.register_class(dummy()).unwrap_err();
    assert!(matches!(err, InvocationError::Registry(_)));

    let orphan = rivet_runtime::ClassDef::builder("Orphan").extends("Ghost").build();
    assert!(matches!(runtime.register_class(orphan), Err(InvocationError::Registry(_))));

    let boxed = rivet_runtime::ClassDef::builder("MyInt").extends("Integer").build();
    assert!(matches!(runtime.register_class(boxed), Err(InvocationError::Registry(_))));

    let typo = rivet_runtime::ClassDef::builder("Greeter")
        .method("greet", &[], "Strng", |_, _| Ok(Value::string("hi")))
        .build();
    assert!(matches!(runtime.register_class(typo), Err(InvocationError::Registry(_))));
    assert!(!runtime.has_class("Greeter"));
}

#[test]
fn test_handle_argument_must_match_its_class() {
    let runtime = runtime();
    let dummy = new_dummy(&runtime, 5);

    let forged = InvocationArg::from_value(Value::string("not an int"), "Integer");
    let err = dummy.invoke("setI", &[forged]).unwrap_err();
    assert!(err.is_cast_error());
    assert_eq!(err.to_string(), "Cannot cast String to Integer");

    // the field keeps its value
    let field = dummy.field("i").unwrap();
    assert_eq!(field.value(), &Value::i32(5));
    assert_eq!(dummy.invoke("getI", &[]).unwrap().value(), &Value::i32(5));

    let err = runtime
        .create_instance("Dummy", &[InvocationArg::from_value(Value::bool(true), "Integer")])
        .unwrap_err();
    assert!(err.is_cast_error());
}
