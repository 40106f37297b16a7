use std::sync::{Arc, Mutex};

use scopeview::config::MemoryConfig;
use scopeview::engine::interface::{StopEvent, StopReason};
use scopeview::engine::stack::StackFrame;
use scopeview::tui::app::Command;
use scopeview::vartree::columns;
use scopeview::{App, DebuggerEngine, EngineError, EngineEvent, EngineRequest, ScriptedEngine};

mockall::mock! {
    pub Engine {}

    impl DebuggerEngine for Engine {
        fn name(&self) -> &str;
        fn submit(&mut self, request: EngineRequest) -> Result<(), EngineError>;
        fn poll(&mut self) -> Vec<EngineEvent>;
    }
}

fn recording_engine() -> (MockEngine, Arc<Mutex<Vec<EngineRequest>>>) {
    let submitted = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&submitted);

    let mut engine = MockEngine::new();
    engine.expect_name().return_const("mock".to_string());
    engine.expect_poll().returning(Vec::new);
    engine.expect_submit().returning(move |request| {
        log.lock().unwrap().push(request);
        Ok(())
    });
    (engine, submitted)
}

fn stop_in(function: &str) -> EngineEvent {
    EngineEvent::Stopped(StopEvent {
        reason: StopReason::Breakpoint,
        has_frame: true,
        frame: Some(StackFrame::new(0, 0x1000, function).with_location("main.c", 10)),
        thread_id: 1,
    })
}

/// Drain until the request/response ping-pong settles
fn settle(app: &mut App) {
    for _ in 0..8 {
        app.drain_engine();
    }
}

#[test]
fn test_stop_triggers_panel_refresh_requests() {
    let (engine, submitted) = recording_engine();
    let mut app = App::new(Box::new(engine), &MemoryConfig::new());

    app.handle_engine_event(stop_in("process_order"));

    let requests = submitted.lock().unwrap();
    assert!(requests.contains(&EngineRequest::ListFrames));
    assert!(requests.contains(&EngineRequest::ListLocalVariables));
    assert!(requests.contains(&EngineRequest::ListRegisters));
}

#[test]
fn test_stop_reevaluates_monitored_expressions() {
    let (engine, submitted) = recording_engine();
    let mut app = App::new(Box::new(engine), &MemoryConfig::new());

    app.execute_command(Command::Monitor("order.total".to_string()));
    app.handle_engine_event(stop_in("process_order"));

    let requests = submitted.lock().unwrap();
    let evaluations = requests
        .iter()
        .filter(|r| {
            matches!(r, EngineRequest::PrintVariableValue { qname } if qname == "order.total")
        })
        .count();
    // Once on add, once for the stop
    assert_eq!(evaluations, 2);
}

#[test]
fn test_full_session_against_the_scripted_engine() {
    let mut app = App::new(Box::new(ScriptedEngine::new()), &MemoryConfig::new());

    app.execute_command(Command::Run);
    settle(&mut app);

    assert_eq!(app.attached_pid, Some(4242));
    assert!(!app.stack.frames().is_empty());
    assert_eq!(app.stack.frames()[0].function, "process_order");
    assert!(!app.registers.registers().is_empty());

    // Locals landed under the anchors
    let count = app.locals.find("count").unwrap().expect("count row");
    assert_eq!(app.locals.store().text(count, columns::VALUE).unwrap(), "3");
}

#[test]
fn test_monitored_expression_lifecycle() {
    let mut app = App::new(Box::new(ScriptedEngine::new()), &MemoryConfig::new());
    app.execute_command(Command::Run);
    settle(&mut app);

    app.execute_command(Command::Monitor("count".to_string()));
    settle(&mut app);

    // The expression sits under the in-scope anchor, unhighlighted
    let watch_store = app.watch.store();
    let anchors = watch_store.children(None).unwrap().to_vec();
    let in_scope_rows = watch_store.children(Some(anchors[0])).unwrap().to_vec();
    assert_eq!(in_scope_rows.len(), 1);
    let row = in_scope_rows[0];
    assert_eq!(watch_store.text(row, columns::NAME).unwrap(), "count");
    assert_eq!(watch_store.text(row, columns::VALUE).unwrap(), "3");
    assert!(!watch_store.flag(row, columns::CHANGED).unwrap());

    // Stepping in the same frame changes the value and highlights it
    app.execute_command(Command::Step);
    settle(&mut app);

    let watch_store = app.watch.store();
    let row = watch_store.children(Some(anchors[0])).unwrap()[0];
    assert_eq!(watch_store.text(row, columns::VALUE).unwrap(), "4");
    assert!(watch_store.flag(row, columns::CHANGED).unwrap());

    // Finishing the frame moves the expression out of scope
    app.execute_command(Command::Finish);
    settle(&mut app);

    let watch_store = app.watch.store();
    assert!(watch_store.children(Some(anchors[0])).unwrap().is_empty());
    assert_eq!(watch_store.children(Some(anchors[1])).unwrap().len(), 1);

    // And unmonitoring clears both anchors
    app.execute_command(Command::Unmonitor("count".to_string()));
    settle(&mut app);
    let watch_store = app.watch.store();
    assert!(watch_store.children(Some(anchors[0])).unwrap().is_empty());
    assert!(watch_store.children(Some(anchors[1])).unwrap().is_empty());
}

#[test]
fn test_new_frame_rebuilds_locals_without_highlights() {
    let mut app = App::new(Box::new(ScriptedEngine::new()), &MemoryConfig::new());
    app.execute_command(Command::Run);
    settle(&mut app);

    app.execute_command(Command::Finish);
    settle(&mut app);

    // The locals panel now shows the outer frame, freshly populated
    assert!(app.locals.find("count").unwrap().is_none());
    let queue_len = app
        .locals
        .find("queue_len")
        .unwrap()
        .expect("outer frame local");
    let store = app.locals.store();
    assert!(!store.flag(queue_len, columns::CHANGED).unwrap());
}

#[test]
fn test_unfold_through_the_app() {
    let mut app = App::new(Box::new(ScriptedEngine::new()), &MemoryConfig::new());
    app.execute_command(Command::Run);
    settle(&mut app);

    let cursor = app.locals.find("cursor").unwrap().expect("cursor row");
    {
        let store = app.locals.store();
        // Folded pointer renders a single placeholder child
        let children = store.children(Some(cursor)).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(store.text(children[0], columns::NAME).unwrap(), "*cursor");
        assert_eq!(store.text(children[0], columns::VALUE).unwrap(), "");
    }

    app.handle_engine_event(EngineEvent::VariableUnfolded {
        qname: "cursor".to_string(),
        variable: {
            let mut engine = ScriptedEngine::new();
            engine.submit(EngineRequest::Attach { pid: 1 }).unwrap();
            engine.poll();
            engine
                .submit(EngineRequest::UnfoldVariable {
                    qname: "cursor".to_string(),
                })
                .unwrap();
            engine
                .poll()
                .into_iter()
                .find_map(|e| match e {
                    EngineEvent::VariableUnfolded { variable, .. } => Some(variable),
                    _ => None,
                })
                .unwrap()
        },
    });

    let value = app.locals.find("cursor->value").unwrap().expect("member row");
    let store = app.locals.store();
    assert_eq!(store.text(value, columns::VALUE).unwrap(), "10");
}

#[test]
fn test_memory_and_processes_land_in_their_panels() {
    let mut app = App::new(Box::new(ScriptedEngine::new()), &MemoryConfig::new());
    app.execute_command(Command::Run);
    settle(&mut app);

    app.execute_command(Command::Memory(0x1000, 64));
    settle(&mut app);
    assert_eq!(app.current_view, scopeview::View::Memory);

    app.execute_command(Command::Processes);
    settle(&mut app);
    assert!(!app.process_picker.visible().is_empty());
}
