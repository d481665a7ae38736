//! Tests for namespace proxying: member resolution, caching, and recording.

use std::rc::Rc;

use proctor::{Kwargs, Namespace, Resolved, StaticNamespace, TestContext, TraceError, Value};
use serde_json::json;

fn media_library() -> Rc<dyn Namespace> {
    StaticNamespace::new()
        .set_constant("QUIT", json!(12))
        .set_constant("K_UP", json!(273))
        .set_function("get_ticks", |_, _| json!(1042))
        .set_function("draw", |args, _| json!(args.len()))
        .set_module(
            "display",
            StaticNamespace::new()
                .set_function("set_mode", |args, _| {
                    args.first().cloned().unwrap_or(Value::Null)
                })
                .set_function("flip", |_, _| Value::Null),
        )
        .shared()
}

fn backed_context() -> TestContext {
    TestContext::with_defaults(Some(media_library())).expect("setup")
}

fn unbacked_context() -> TestContext {
    TestContext::with_defaults(None).expect("setup")
}

#[test]
fn constants_resolve_to_real_values_unwrapped() {
    let ctx = backed_context();
    let mock = ctx.mock();

    assert_eq!(mock.constant("QUIT").expect("resolve"), json!(12));
    assert_eq!(mock.constant("K_UP").expect("resolve"), json!(273));

    // Repeated resolution yields the identical value and records nothing.
    assert_eq!(mock.constant("QUIT").expect("resolve"), json!(12));
    assert!(ctx.log().is_empty());
}

#[test]
fn callables_are_wrapped_exactly_once() {
    let ctx = backed_context();
    let mock = ctx.mock();

    let first = mock.callable("draw").expect("resolve");
    let second = mock.callable("draw").expect("resolve");
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn first_invocation_records_exact_name_args_and_kwargs() {
    let ctx = backed_context();
    let kwargs = Kwargs::from([("color".to_string(), json!("red"))]);

    ctx.mock()
        .call_with_kwargs("draw", &[json!(10), json!(20)], &kwargs)
        .expect("invoke");

    let record = ctx.find_first("draw").expect("recorded");
    assert_eq!(record.name(), "draw");
    assert_eq!(record.args(), &[json!(10), json!(20)]);
    assert_eq!(record.kwargs(), &kwargs);
    assert_eq!(ctx.log().len(), 1);
}

#[test]
fn unknown_member_fails_when_backed() {
    let ctx = backed_context();
    let err = ctx.mock().resolve("nonexistent").unwrap_err();
    assert!(matches!(err, TraceError::UnknownMember(name) if name == "nonexistent"));
}

#[test]
fn unbacked_calls_return_neutral_default_and_still_record() {
    let ctx = unbacked_context();

    let result = ctx.mock().call("draw", &[json!(10), json!(20)]).expect("invoke");
    assert_eq!(result, Value::Null);

    let record = ctx.find_first("draw").expect("recorded");
    assert_eq!(record.args(), &[json!(10), json!(20)]);
    assert!(record.kwargs().is_empty());
}

#[test]
fn unbacked_mode_synthesizes_nested_modules() {
    let ctx = unbacked_context();
    let display = ctx.mock().module("display").expect("synthesized");

    display.call("flip", &[]).expect("invoke");
    assert!(ctx.find_first("display.flip").is_some());
}

#[test]
fn unbacked_names_keep_their_first_resolved_kind() {
    let ctx = unbacked_context();
    let mock = ctx.mock();

    // Resolved as a callable first, the name stays a callable.
    mock.call("display", &[]).expect("invoke");
    let err = mock.module("display").unwrap_err();
    assert!(matches!(err, TraceError::NotAModule(name) if name == "display"));

    // Resolved as a module first, both uses keep working.
    let events = mock.module("events").expect("synthesized");
    events.call("poll", &[]).expect("invoke");
    assert!(mock.module("events").is_ok());
}

#[test]
fn nested_calls_share_one_ordered_log() {
    let ctx = backed_context();
    let mock = ctx.mock();
    let display = mock.module("display").expect("resolve");

    mock.call("draw", &[json!(1)]).expect("invoke");
    display.call("flip", &[]).expect("invoke");
    mock.call("draw", &[json!(2)]).expect("invoke");

    let names: Vec<String> = ctx
        .log()
        .snapshot()
        .iter()
        .map(|record| record.name().to_string())
        .collect();
    assert_eq!(names, vec!["draw", "display.flip", "draw"]);
}

#[test]
fn resolving_a_constant_as_callable_is_an_error() {
    let ctx = backed_context();
    let err = ctx.mock().callable("QUIT").unwrap_err();
    assert!(matches!(err, TraceError::NotCallable(name) if name == "QUIT"));
}

#[test]
fn nested_module_resolution_is_cached() {
    let ctx = backed_context();
    let mock = ctx.mock();

    let first = mock.module("display").expect("resolve");
    let second = mock.module("display").expect("resolve");
    assert!(Rc::ptr_eq(&first, &second));

    match mock.resolve("display").expect("resolve") {
        Resolved::Module(third) => assert!(Rc::ptr_eq(&first, &third)),
        _ => panic!("expected a nested module"),
    }
}
