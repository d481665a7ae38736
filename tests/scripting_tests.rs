//! Tests for scripted return values, passthrough, and call budgets.

use std::rc::Rc;

use proctor::{Namespace, StaticNamespace, TestContext, TraceError, Value};
use serde_json::json;

fn media_library() -> Rc<dyn Namespace> {
    StaticNamespace::new()
        .set_function("get_ticks", |_, _| json!(1042))
        .set_function("draw", |_, _| json!("drawn"))
        .shared()
}

fn backed_context() -> TestContext {
    TestContext::with_defaults(Some(media_library())).expect("setup")
}

#[test]
fn passthrough_forwards_unscripted_calls_to_the_real_callable() {
    let ctx = backed_context();
    let result = ctx.mock().call("get_ticks", &[]).expect("invoke");
    assert_eq!(result, json!(1042));
}

#[test]
fn scripted_values_come_back_fifo_then_passthrough_applies() {
    let ctx = backed_context();
    ctx.callable("get_ticks")
        .expect("resolve")
        .script_returns([json!(1), json!(2)]);

    let mock = ctx.mock();
    assert_eq!(mock.call("get_ticks", &[]).expect("invoke"), json!(1));
    assert_eq!(mock.call("get_ticks", &[]).expect("invoke"), json!(2));
    assert_eq!(mock.call("get_ticks", &[]).expect("invoke"), json!(1042));
}

#[test]
fn scripted_values_then_neutral_default_without_passthrough() {
    let ctx = backed_context();
    ctx.set_passthrough(false);
    ctx.callable("draw").expect("resolve").push_return(json!("scripted"));

    let mock = ctx.mock();
    assert_eq!(mock.call("draw", &[]).expect("invoke"), json!("scripted"));
    assert_eq!(mock.call("draw", &[]).expect("invoke"), Value::Null);
}

#[test]
fn scripted_values_answer_even_with_passthrough_enabled() {
    let ctx = backed_context();
    assert!(ctx.passthrough());
    ctx.callable("draw").expect("resolve").push_return(json!(7));

    assert_eq!(ctx.mock().call("draw", &[]).expect("invoke"), json!(7));
}

#[test]
fn budget_allows_n_calls_then_rejects_with_named_error() {
    let ctx = backed_context();
    ctx.callable("draw").expect("resolve").limit_calls(2);

    let mock = ctx.mock();
    mock.call("draw", &[]).expect("first call");
    mock.call("draw", &[]).expect("second call");

    let err = mock.call("draw", &[]).unwrap_err();
    match err {
        TraceError::CallBudgetExceeded { name, limit } => {
            assert_eq!(name, "draw");
            assert_eq!(limit, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The rejected call is still recorded.
    assert_eq!(ctx.call_count("draw"), 3);
}

#[test]
fn budget_rejection_persists_on_later_calls() {
    let ctx = backed_context();
    ctx.callable("draw").expect("resolve").limit_calls(0);

    let mock = ctx.mock();
    assert!(mock.call("draw", &[]).is_err());
    assert!(mock.call("draw", &[]).is_err());
    assert_eq!(ctx.call_count("draw"), 2);
}

#[test]
fn clearing_the_limit_restores_unlimited_calls() {
    let ctx = backed_context();
    let draw = ctx.callable("draw").expect("resolve");
    draw.limit_calls(0);

    let mock = ctx.mock();
    assert!(mock.call("draw", &[]).is_err());

    draw.clear_limit();
    assert!(mock.call("draw", &[]).is_ok());
}

#[test]
fn clearing_the_script_restores_passthrough() {
    let ctx = backed_context();
    let ticks = ctx.callable("get_ticks").expect("resolve");
    ticks.script_returns([json!(1), json!(2)]);

    ticks.clear_script();
    assert_eq!(ticks.pending_returns(), 0);
    assert_eq!(ctx.mock().call("get_ticks", &[]).expect("invoke"), json!(1042));
}

#[test]
fn unscripted_calls_leave_the_queue_untouched() {
    let ctx = backed_context();
    let ticks = ctx.callable("get_ticks").expect("resolve");

    ticks.push_return(json!(5));
    assert_eq!(ticks.pending_returns(), 1);

    ctx.mock().call("get_ticks", &[]).expect("invoke");
    assert_eq!(ticks.pending_returns(), 0);
}
