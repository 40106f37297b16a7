use scopeview::{parse_command, AppCommand};
use test_case::test_case;

#[test]
fn test_basic_commands() {
    assert_eq!(parse_command("continue"), Ok(AppCommand::Continue));
    assert_eq!(parse_command("step"), Ok(AppCommand::Step));
    assert_eq!(parse_command("next"), Ok(AppCommand::Next));
    assert_eq!(parse_command("finish"), Ok(AppCommand::Finish));
    assert_eq!(parse_command("run"), Ok(AppCommand::Run));
    assert_eq!(parse_command("quit"), Ok(AppCommand::Quit));
    assert_eq!(parse_command("detach"), Ok(AppCommand::Detach));
    assert_eq!(parse_command("processes"), Ok(AppCommand::Processes));
    assert_eq!(parse_command("globals"), Ok(AppCommand::Globals));
}

#[test]
fn test_aliases() {
    assert_eq!(parse_command("c"), Ok(AppCommand::Continue));
    assert_eq!(parse_command("s"), Ok(AppCommand::Step));
    assert_eq!(parse_command("n"), Ok(AppCommand::Next));
    assert_eq!(parse_command("r"), Ok(AppCommand::Run));
    assert_eq!(parse_command("q"), Ok(AppCommand::Quit));
    assert_eq!(parse_command("ps"), Ok(AppCommand::Processes));
}

#[test_case("monitor order.total", AppCommand::Monitor("order.total".to_string()) ; "monitor expression")]
#[test_case("watch cursor->value", AppCommand::Monitor("cursor->value".to_string()) ; "watch alias")]
#[test_case("unmonitor count", AppCommand::Unmonitor("count".to_string()) ; "unmonitor expression")]
#[test_case("print *cursor", AppCommand::Print("*cursor".to_string()) ; "print dereference")]
#[test_case("type order", AppCommand::TypeOf("order".to_string()) ; "type of expression")]
#[test_case("deref cursor", AppCommand::Deref("cursor".to_string()) ; "pointed value")]
#[test_case("attach 4242", AppCommand::Attach(4242) ; "attach pid")]
#[test_case("frame 2", AppCommand::Frame(2) ; "select frame")]
#[test_case("memory 0x1000 64", AppCommand::Memory(0x1000, 64) ; "memory hex address")]
#[test_case("memory 4096 32", AppCommand::Memory(4096, 32) ; "memory decimal address")]
fn test_parameterized_commands(input: &str, expected: AppCommand) {
    assert_eq!(parse_command(input), Ok(expected));
}

#[test]
fn test_memory_defaults_length() {
    assert_eq!(parse_command("memory 0x2000"), Ok(AppCommand::Memory(0x2000, 256)));
}

#[test]
fn test_malformed_arguments_are_errors() {
    assert!(parse_command("attach notapid").is_err());
    assert!(parse_command("frame minusone").is_err());
    assert!(parse_command("memory").is_err());
    assert!(parse_command("monitor").is_err());
    assert!(parse_command("print").is_err());
}

#[test]
fn test_unknown_commands_do_not_error() {
    // Verify malformed commands return Unknown, not errors or panics
    match parse_command("") {
        Ok(AppCommand::Unknown(text)) => assert!(text.is_empty()),
        other => panic!("expected Unknown, got {:?}", other),
    }
    assert!(matches!(
        parse_command("foobar"),
        Ok(AppCommand::Unknown(_))
    ));
}

#[test]
fn test_very_long_input() {
    // A very long expression must parse without truncation or panic
    let long_expression = "a".repeat(10000);
    let result = parse_command(&format!("monitor {}", long_expression));
    match result {
        Ok(AppCommand::Monitor(expr)) => assert_eq!(expr.len(), 10000),
        other => panic!("expected Monitor, got {:?}", other),
    }
}

#[test]
fn test_injection_shaped_input_stays_inert() {
    // Command text is data; shell-looking input is just an expression or
    // an unknown command, never anything executable
    let attempts = [
        "quit; rm -rf /",
        "monitor x || true",
        "print `id`",
        "attach $(whoami)",
    ];
    for attempt in attempts {
        let result = parse_command(attempt);
        match result {
            Ok(AppCommand::Monitor(_)) | Ok(AppCommand::Print(_)) | Ok(AppCommand::Unknown(_)) => {}
            Err(_) => {}
            other => panic!("unexpected parse for {:?}: {:?}", attempt, other),
        }
    }
}

#[test]
fn test_unicode_handling() {
    // Unicode input must not crash the parser
    let inputs = ["monitor 你好", "print 😊", "看看"];
    for input in inputs {
        let _ = parse_command(input);
    }
}
