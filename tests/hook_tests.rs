//! Tests for hook execution: registration order, halt short-circuiting,
//! after-request mutation, route_exception delivery, and session binding.

use cascade_router::{App, Dispatcher, Flow, HandlerOutput, Session};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mod common;
use common::{env, init_tracing};

#[test]
fn test_hooks_run_in_registration_order_before_handler() {
    init_tracing();
    let trace: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let mut app = App::new("ordered-hooks");
    let t = Arc::clone(&trace);
    app.before(move |_app, _ctx| {
        t.lock().unwrap().push("h1");
        Ok(())
    });
    let t = Arc::clone(&trace);
    app.before(move |_app, _ctx| {
        t.lock().unwrap().push("h2");
        Ok(())
    });
    let t = Arc::clone(&trace);
    app.get("/x", move |_app, _ctx| {
        t.lock().unwrap().push("handler");
        Ok(HandlerOutput::Empty)
    });
    let t = Arc::clone(&trace);
    app.after(move |_app, _ctx| {
        t.lock().unwrap().push("after");
        Ok(())
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    dispatcher
        .dispatch(&env("GET", "/x"), None, None)
        .expect("dispatch");
    assert_eq!(*trace.lock().unwrap(), vec!["h1", "h2", "handler", "after"]);
}

#[test]
fn test_before_hook_halt_skips_handler_and_after_hook() {
    init_tracing();
    let handler_ran = Arc::new(AtomicBool::new(false));
    let after_ran = Arc::new(AtomicBool::new(false));

    let mut app = App::new("halting");
    app.before(|_app, ctx| {
        ctx.response.status = 403;
        ctx.response.set_text("denied");
        Err(ctx.halt())
    });
    let flag = Arc::clone(&handler_ran);
    app.get("/secret", move |_app, _ctx| {
        flag.store(true, Ordering::SeqCst);
        Ok(HandlerOutput::Content("secret".to_string()))
    });
    let flag = Arc::clone(&after_ran);
    app.after(move |_app, _ctx| {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    let resp = dispatcher
        .dispatch(&env("GET", "/secret"), None, None)
        .expect("dispatch");
    assert_eq!(resp.status, 403);
    assert_eq!(resp.text(), Some("denied"));
    assert!(!handler_ran.load(Ordering::SeqCst), "handler must not execute");
    assert!(!after_ran.load(Ordering::SeqCst), "after_request must not run");
}

#[test]
fn test_before_hook_redirect() {
    init_tracing();
    let mut app = App::new("redirecting");
    app.before(|_app, ctx| {
        if ctx.session().is_none() {
            return Err(Flow::redirect("/login"));
        }
        Ok(())
    });
    app.get("/account", |_app, _ctx| Ok(HandlerOutput::Content("account".to_string())));

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    let resp = dispatcher
        .dispatch(&env("GET", "/account"), None, None)
        .expect("dispatch");
    assert_eq!(resp.status, 302);
    assert_eq!(resp.get_header("location"), Some("/login"));

    // With a session bound the hook lets the handler run
    let session = Session::new(serde_json::json!({ "user": "u1" }));
    let resp = dispatcher
        .dispatch(&env("GET", "/account"), None, Some(session))
        .expect("dispatch");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.text(), Some("account"));
}

#[test]
fn test_halt_from_handler_skips_after_hook() {
    init_tracing();
    let after_ran = Arc::new(AtomicBool::new(false));

    let mut app = App::new("handler-halt");
    app.get("/teapot", |_app, _ctx| Err(Flow::halt(418, "short and stout")));
    let flag = Arc::clone(&after_ran);
    app.after(move |_app, _ctx| {
        flag.store(true, Ordering::SeqCst);
        Ok(())
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    let resp = dispatcher
        .dispatch(&env("GET", "/teapot"), None, None)
        .expect("dispatch");
    assert_eq!(resp.status, 418);
    assert_eq!(resp.text(), Some("short and stout"));
    assert!(!after_ran.load(Ordering::SeqCst));
}

#[test]
fn test_after_hook_can_mutate_response() {
    init_tracing();
    let mut app = App::new("mutating");
    app.get("/x", |_app, _ctx| Ok(HandlerOutput::Content("body".to_string())));
    app.after(|_app, ctx| {
        ctx.response
            .set_header("x-request-seen", "true".to_string());
        Ok(())
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    let resp = dispatcher
        .dispatch(&env("GET", "/x"), None, None)
        .expect("dispatch");
    assert_eq!(resp.get_header("x-request-seen"), Some("true"));
    assert_eq!(resp.text(), Some("body"));
}

#[test]
fn test_route_exception_hook_runs_exactly_once_with_detail() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen_detail: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    let mut app = App::new("exceptional");
    app.get("/boom", |_app, _ctx| Err(Flow::Fail(anyhow::anyhow!("wires crossed"))));
    let count = Arc::clone(&calls);
    let detail = Arc::clone(&seen_detail);
    app.on_exception(move |_app, ctx| {
        count.fetch_add(1, Ordering::SeqCst);
        *detail.lock().unwrap() = ctx.error().map(str::to_string);
        Ok(())
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    let err = dispatcher
        .dispatch(&env("GET", "/boom"), None, None)
        .expect_err("handler fails");
    assert_eq!(err.status(), 500);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        seen_detail.lock().unwrap().as_deref(),
        Some("wires crossed")
    );
}

#[test]
fn test_failing_before_hook_synthesizes_500() {
    init_tracing();
    let handler_ran = Arc::new(AtomicBool::new(false));

    let mut app = App::new("hook-fails");
    app.before(|_app, _ctx| Err(Flow::Fail(anyhow::anyhow!("hook exploded"))));
    let flag = Arc::clone(&handler_ran);
    app.get("/x", move |_app, _ctx| {
        flag.store(true, Ordering::SeqCst);
        Ok(HandlerOutput::Empty)
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    let err = dispatcher
        .dispatch(&env("GET", "/x"), None, None)
        .expect_err("hook fails");
    assert_eq!(err.status(), 500);
    assert!(!handler_ran.load(Ordering::SeqCst));
}

#[test]
fn test_session_visible_to_handler() {
    init_tracing();
    let mut app = App::new("sessions");
    app.get("/me", |_app, ctx| {
        let user = ctx
            .session()
            .and_then(|s| s.get("user"))
            .and_then(|v| v.as_str())
            .unwrap_or("anonymous")
            .to_string();
        Ok(HandlerOutput::Content(user))
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(app);

    let session = Session::new(serde_json::json!({ "user": "u42" }));
    let resp = dispatcher
        .dispatch(&env("GET", "/me"), None, Some(session))
        .expect("dispatch");
    assert_eq!(resp.text(), Some("u42"));

    // No session supplied: nothing is bound
    let resp = dispatcher
        .dispatch(&env("GET", "/me"), None, None)
        .expect("dispatch");
    assert_eq!(resp.text(), Some("anonymous"));
}
