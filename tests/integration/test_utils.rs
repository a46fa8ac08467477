//! Shared test utilities for integration tests
//!
//! Provides an isolated XDG environment for config tests and a shell whose
//! commands record their calls.

use nestcli::{Command, Printer, Shell};
use parking_lot::Mutex as CallMutex;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Calls recorded by the commands of [`recording_shell`], in order.
pub type CallLog = Arc<CallMutex<Vec<String>>>;

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

const TRACKED_VARS: [&str; 6] = [
    "HOME",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "NESTCLI_PROMPT",
    "NESTCLI_BANNER",
    "NESTCLI_HISTORY__SIZE",
];

impl EnvState {
    fn capture() -> Self {
        Self {
            vars: TRACKED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with XDG_CONFIG_HOME, XDG_DATA_HOME and HOME inside `test_dir`.
///
/// The original environment is restored afterwards; a global mutex keeps
/// parallel tests from observing each other's variables.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_config_home = test_dir.path().join("config");
    let test_data_home = test_dir.path().join("data");
    let test_home = test_dir.path().join("home");

    std::fs::create_dir_all(&test_config_home).unwrap();
    std::fs::create_dir_all(&test_data_home).unwrap();
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());
    std::env::set_var("XDG_DATA_HOME", test_data_home.to_str().unwrap());
    for name in &TRACKED_VARS[3..] {
        std::env::remove_var(name);
    }

    let result = f();

    env_state.restore();

    result
}

/// A shell with `mode`, `mode advanced <u8>` and `set <i8> <bool>` registered.
pub fn recording_shell() -> (Shell, CallLog) {
    let log: CallLog = Arc::new(CallMutex::new(Vec::new()));
    let mut shell = Shell::with_printer(Printer::buffer().0);

    let sink = Arc::clone(&log);
    shell.register(Command::new("mode", move || sink.lock().push("mode".to_string())));

    let sink = Arc::clone(&log);
    shell.register(Command::new("mode advanced", move |level: u8| {
        sink.lock().push(format!("mode advanced {}", level))
    }));

    let sink = Arc::clone(&log);
    shell.register(Command::new("set", move |value: i8, flag: bool| {
        sink.lock().push(format!("set {} {}", value, flag))
    }));

    (shell, log)
}
