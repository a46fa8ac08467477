//! Integration tests for the prompt loop over scripted input

use nestcli::source::{Input, ScriptedSource};
use nestcli::{Command, DispatchError, Printer, Shell};

use crate::integration::recording_shell;

#[test]
fn test_loop_dispatches_until_eof() {
    let (shell, log) = recording_shell();
    let mut source = ScriptedSource::new(["mode", "", "set 1 t; mode advanced 9"]);
    shell.run(&mut source).unwrap();

    assert_eq!(*log.lock(), vec!["mode", "set 1 true", "mode advanced 9"]);
    assert_eq!(source.history(), &["mode", "set 1 t; mode advanced 9"]);
}

#[test]
fn test_first_error_ends_the_loop() {
    let (shell, log) = recording_shell();
    let mut source = ScriptedSource::new(["mode", "mode;;", "mode"]);
    let err = shell.run(&mut source).unwrap_err();

    assert!(matches!(err, DispatchError::Syntax(_)));
    assert_eq!(*log.lock(), vec!["mode"]);
    assert_eq!(source.remaining(), 1);
    // The failing line still reaches history
    assert_eq!(source.history(), &["mode", "mode;;"]);
}

#[test]
fn test_quit_command_ends_the_loop() {
    let (mut shell, log) = recording_shell();
    let quit = shell.quit_handle();
    shell.register(Command::new("quit", move || quit.quit()));

    let mut source = ScriptedSource::new(["mode", "quit", "mode"]);
    shell.run(&mut source).unwrap();
    assert_eq!(*log.lock(), vec!["mode"]);
    assert_eq!(source.remaining(), 1);

    shell.quit_handle().reset();
    shell.run(&mut source).unwrap();
    assert_eq!(*log.lock(), vec!["mode", "mode"]);
}

#[test]
fn test_ctrl_c() {
    let (mut shell, log) = recording_shell();
    let inputs = || {
        ScriptedSource::from_inputs([
            Input::Interrupted,
            Input::Line("mode".to_string()),
            Input::Eof,
        ])
    };

    shell.run(&mut inputs()).unwrap();
    assert_eq!(log.lock().len(), 1);

    shell.set_ctrl_c_aborts(true);
    assert!(matches!(
        shell.run(&mut inputs()),
        Err(DispatchError::PromptAborted)
    ));
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_initial_input_runs_before_prompting() {
    let (shell, log) = recording_shell();
    let mut source = ScriptedSource::new(["mode advanced 2"]);
    shell.run_with_input("mode; set 3 f", &mut source).unwrap();
    assert_eq!(*log.lock(), vec!["mode", "set 3 false", "mode advanced 2"]);
    assert_eq!(source.history(), &["mode advanced 2"]);
}

#[test]
fn test_banner_and_output_share_the_printer() {
    let (printer, buffer) = Printer::buffer();
    let mut shell = Shell::with_printer(printer);
    shell.set_banner("nestcli ready\n");
    let out = shell.printer();
    shell.register(Command::new("greet", move |name: String| {
        out.println(format!("hello {}", name))
    }));

    shell
        .run(&mut ScriptedSource::new(["greet 'big world'"]))
        .unwrap();
    assert_eq!(buffer.contents(), "nestcli ready\nhello big world\n");
}
