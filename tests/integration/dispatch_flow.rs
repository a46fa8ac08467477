//! Integration tests for line dispatch: splitting, resolution, binding, handlers

use nestcli::value::ParamKind;
use nestcli::{BindError, Command, DispatchError, Printer, Shell};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::integration::recording_shell;

#[test]
fn test_nested_commands_on_one_line() {
    let (shell, log) = recording_shell();
    shell.dispatch("mode advanced 3;mode").unwrap();
    assert_eq!(*log.lock(), vec!["mode advanced 3", "mode"]);
}

#[test]
fn test_shorter_name_takes_remaining_words() {
    let (shell, log) = recording_shell();
    // `mode` takes no arguments; surplus words are ignored
    shell.dispatch("mode basic please").unwrap();
    assert_eq!(*log.lock(), vec!["mode"]);
}

#[test]
fn test_double_separator_executes_nothing() {
    let (shell, log) = recording_shell();
    let err = shell.dispatch("mode;;mode advanced 1").unwrap_err();
    assert!(matches!(err, DispatchError::Syntax(_)));
    assert!(log.lock().is_empty());
}

#[test]
fn test_leading_and_trailing_separators() {
    let (shell, log) = recording_shell();
    shell.dispatch(";mode;").unwrap();
    shell.dispatch("   ").unwrap();
    assert_eq!(*log.lock(), vec!["mode"]);
}

#[test]
fn test_unterminated_quote_is_syntax_error() {
    let (shell, log) = recording_shell();
    assert!(matches!(
        shell.dispatch("mode; set \"1 true"),
        Err(DispatchError::Syntax(_))
    ));
    assert!(log.lock().is_empty());
}

#[test]
fn test_typed_arguments() {
    let (shell, log) = recording_shell();
    shell
        .dispatch("set -128 t; set 0x7f FALSE; set 0b101 1; set 010 True")
        .unwrap();
    assert_eq!(
        *log.lock(),
        vec![
            "set -128 true",
            "set 127 false",
            "set 5 true",
            "set 8 true"
        ]
    );
}

#[test]
fn test_binding_failures_are_classified() {
    let (shell, _) = recording_shell();

    let err = shell.dispatch("set 128 true").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Bind {
            source: BindError::IntegerOverflow { index: 0, .. },
            ..
        }
    ));

    let err = shell.dispatch("set 1 yes").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Bind {
            source: BindError::InvalidArgument { index: 1, .. },
            ..
        }
    ));

    let err = shell.dispatch("set 1").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Bind {
            source: BindError::MissingArguments {
                expected: 2,
                got: 1
            },
            ..
        }
    ));

    let err = shell.dispatch("mode advanced -1").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Bind {
            ref command,
            source: BindError::InvalidArgument { index: 0, .. },
        } if command == "mode advanced"
    ));
}

#[test]
fn test_failure_stops_the_rest_of_the_line() {
    let (shell, log) = recording_shell();
    assert!(shell.dispatch("mode; set 999 t; mode").is_err());
    assert_eq!(*log.lock(), vec!["mode"]);
}

#[test]
fn test_command_handler_suppresses_failure() {
    let (mut shell, log) = recording_shell();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let sink_log = Arc::clone(&log);
    shell.register(
        Command::new("level", move |n: u16| sink_log.lock().push(format!("level {}", n)))
            .error_handler(move |command, args, err| {
                sink.lock().push(format!("{} {:?} {:?}", command.name(), args, err.index()));
                Ok(())
            }),
    );

    shell.dispatch("level 70000; mode").unwrap();
    assert_eq!(*seen.lock(), vec![r#"level ["70000"] Some(0)"#]);
    assert_eq!(*log.lock(), vec!["mode"]);
}

#[test]
fn test_command_handler_can_replace_the_error() {
    let (mut shell, _) = recording_shell();
    shell.register(
        Command::new("level", |_n: u16| {}).error_handler(|command, _, _| {
            Err(DispatchError::CommandNotFound(command.name().to_string()))
        }),
    );

    let err = shell.dispatch("level x").unwrap_err();
    assert!(matches!(err, DispatchError::CommandNotFound(ref n) if n == "level"));
}

#[test]
fn test_own_handler_takes_precedence_over_global() {
    let (mut shell, _) = recording_shell();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&calls);
    shell.set_error_handler(move |command, _, _| {
        sink.lock().push(format!("global {}", command.name()));
        Ok(())
    });
    let sink = Arc::clone(&calls);
    shell.register(Command::new("level", |_n: u16| {}).error_handler(move |_, _, _| {
        sink.lock().push("own".to_string());
        Ok(())
    }));

    shell.dispatch("level x; set x y").unwrap();
    assert_eq!(*calls.lock(), vec!["own", "global set"]);
}

#[test]
fn test_not_found_handler() {
    let (mut shell, log) = recording_shell();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    shell.set_not_found_handler(move |name| {
        sink.lock().push(name.to_string());
        Ok(())
    });

    shell.dispatch("unknown arg; mode").unwrap();
    assert_eq!(*seen.lock(), vec!["unknown"]);
    assert_eq!(*log.lock(), vec!["mode"]);
}

#[test]
fn test_operation_errors_propagate() {
    let mut shell = Shell::with_printer(Printer::buffer().0);
    shell.register(Command::new("fail", |reason: String| -> anyhow::Result<()> {
        anyhow::bail!("refused: {}", reason)
    }));

    let err = shell.dispatch("fail 'no way'").unwrap_err();
    match err {
        DispatchError::Command { command, source } => {
            assert_eq!(command, "fail");
            assert_eq!(source.to_string(), "refused: no way");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unsupported_kind_is_a_programmer_error() {
    let mut shell = Shell::with_printer(Printer::buffer().0);
    let called = Arc::new(Mutex::new(false));
    let sink = Arc::clone(&called);
    shell.register(Command::with_kinds(
        "odd",
        vec![ParamKind::Str, ParamKind::Other("Duration")],
        move |_values| {
            *sink.lock() = true;
            Ok(())
        },
    ));

    let err = shell.dispatch("odd a b").unwrap_err();
    match err {
        DispatchError::Bind { source, .. } => {
            assert!(source.is_programmer_error());
            assert_eq!(source.index(), Some(1));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!*called.lock());
}

#[test]
fn test_reregistering_overwrites() {
    let (mut shell, log) = recording_shell();
    let sink = Arc::clone(&log);
    let previous = shell.register(Command::new("mode", move || {
        sink.lock().push("new mode".to_string())
    }));
    assert!(previous.is_some());

    shell.dispatch("mode").unwrap();
    assert_eq!(*log.lock(), vec!["new mode"]);

    assert!(shell.remove("mode").is_some());
    shell.dispatch("mode").unwrap();
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_escaped_separator_is_literal() {
    let mut shell = Shell::with_printer(Printer::buffer().0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    shell.register(Command::new("say", move |a: String, b: String| {
        sink.lock().push(format!("{}|{}", a, b))
    }));

    shell.dispatch(r#"say x\; "y; z""#).unwrap();
    assert_eq!(*seen.lock(), vec!["x;|y; z"]);
}

#[test]
fn test_hash_prefixed_word_is_an_argument() {
    let mut shell = Shell::with_printer(Printer::buffer().0);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    shell.register(Command::new("echo", move |text: String| sink.lock().push(text)));

    shell.dispatch("echo #tag").unwrap();
    shell.dispatch("echo a#b; echo \"#quoted\"").unwrap();
    assert_eq!(*seen.lock(), vec!["#tag", "a#b", "#quoted"]);
}
