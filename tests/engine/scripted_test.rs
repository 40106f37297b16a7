use scopeview::engine::interface::{StopReason};
use scopeview::{DebuggerEngine, EngineError, EngineEvent, EngineRequest, ScriptedEngine};

fn attach(engine: &mut ScriptedEngine) {
    engine
        .submit(EngineRequest::Attach { pid: 4242 })
        .unwrap();
    engine.poll();
}

fn locals(engine: &mut ScriptedEngine) -> Vec<scopeview::Variable> {
    engine.submit(EngineRequest::ListLocalVariables).unwrap();
    for event in engine.poll() {
        if let EngineEvent::LocalVariablesListed(vars) = event {
            return vars;
        }
    }
    panic!("no locals listed");
}

#[test]
fn test_requests_need_an_inferior() {
    let mut engine = ScriptedEngine::new();
    let err = engine.submit(EngineRequest::ListLocalVariables).unwrap_err();
    assert_eq!(err, EngineError::NotAttached);
}

#[test]
fn test_attach_stops_with_a_frame() {
    let mut engine = ScriptedEngine::new();
    engine.submit(EngineRequest::Attach { pid: 4242 }).unwrap();

    let events = engine.poll();
    let stopped = events.iter().find_map(|e| match e {
        EngineEvent::Stopped(stop) => Some(stop.clone()),
        _ => None,
    });
    let stop = stopped.expect("attach produces a stop");
    assert_eq!(stop.reason, StopReason::Breakpoint);
    assert!(stop.has_frame);
    assert_eq!(stop.frame.unwrap().function, "process_order");
}

#[test]
fn test_locals_include_folded_pointer() {
    let mut engine = ScriptedEngine::new();
    attach(&mut engine);

    let vars = locals(&mut engine);
    let count = vars.iter().find(|v| v.name() == "count").unwrap();
    assert_eq!(count.value(), "3");

    let cursor = vars.iter().find(|v| v.name() == "cursor").unwrap();
    assert!(cursor.needs_unfolding());
    assert!(cursor.members().is_empty());
}

#[test]
fn test_stepping_perturbs_values() {
    let mut engine = ScriptedEngine::new();
    attach(&mut engine);

    engine.submit(EngineRequest::Step).unwrap();
    engine.poll();

    let vars = locals(&mut engine);
    let count = vars.iter().find(|v| v.name() == "count").unwrap();
    assert_eq!(count.value(), "4");
}

#[test]
fn test_unfold_returns_one_more_level() {
    let mut engine = ScriptedEngine::new();
    attach(&mut engine);

    engine
        .submit(EngineRequest::UnfoldVariable {
            qname: "cursor".to_string(),
        })
        .unwrap();
    let events = engine.poll();
    let unfolded = events
        .iter()
        .find_map(|e| match e {
            EngineEvent::VariableUnfolded { variable, .. } => Some(variable.clone()),
            _ => None,
        })
        .expect("unfold completion");

    assert!(!unfolded.needs_unfolding());
    assert_eq!(unfolded.members().len(), 1);
    let pointee = &unfolded.members()[0];
    assert_eq!(pointee.name(), "*cursor");
    assert_eq!(pointee.qualified_name(), "*cursor");
    let names: Vec<&str> = pointee.members().iter().map(|m| m.name()).collect();
    assert_eq!(names, ["value", "next"]);
    assert_eq!(pointee.members()[1].qualified_name(), "cursor->next");
}

#[test]
fn test_member_expression_evaluates() {
    let mut engine = ScriptedEngine::new();
    attach(&mut engine);

    engine
        .submit(EngineRequest::PrintVariableValue {
            qname: "order.total".to_string(),
        })
        .unwrap();
    let events = engine.poll();
    let printed = events
        .iter()
        .find_map(|e| match e {
            EngineEvent::VariableValuePrinted { qname, variable } if qname == "order.total" => {
                Some(variable.clone())
            }
            _ => None,
        })
        .expect("value completion");

    assert!(printed.in_scope());
    assert_eq!(printed.value(), "19.90");
    assert_eq!(printed.type_name(), "double");
}

#[test]
fn test_locals_fall_out_of_scope_after_finish() {
    let mut engine = ScriptedEngine::new();
    attach(&mut engine);

    engine.submit(EngineRequest::Finish).unwrap();
    engine.poll();

    engine
        .submit(EngineRequest::PrintVariableValue {
            qname: "count".to_string(),
        })
        .unwrap();
    let events = engine.poll();
    let count = events
        .iter()
        .find_map(|e| match e {
            EngineEvent::VariableValuePrinted { qname, variable } if qname == "count" => {
                Some(variable.clone())
            }
            _ => None,
        })
        .expect("value completion");
    assert!(!count.in_scope());

    // Globals stay visible in the outer frame
    engine
        .submit(EngineRequest::PrintVariableValue {
            qname: "g_verbose".to_string(),
        })
        .unwrap();
    let events = engine.poll();
    let verbose = events
        .iter()
        .find_map(|e| match e {
            EngineEvent::VariableValuePrinted { qname, variable } if qname == "g_verbose" => {
                Some(variable.clone())
            }
            _ => None,
        })
        .expect("value completion");
    assert!(verbose.in_scope());
}

#[test]
fn test_frame_selection_switches_locals() {
    let mut engine = ScriptedEngine::new();
    attach(&mut engine);

    engine
        .submit(EngineRequest::SelectFrame { number: 1 })
        .unwrap();
    engine.poll();

    let vars = locals(&mut engine);
    assert!(vars.iter().any(|v| v.name() == "queue_len"));
    assert!(!vars.iter().any(|v| v.name() == "count"));
}
