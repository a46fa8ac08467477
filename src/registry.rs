//! Command registry: name to command, overwrite on insert.

use crate::command::Command;
use std::collections::HashMap;

/// Registered commands keyed by their space-joined name.
///
/// Mutated only between dispatch cycles; resolution and completion only read it.
#[derive(Clone, Default)]
pub struct Registry {
    commands: HashMap<String, Command>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, returning the one it replaced.
    pub fn register(&mut self, command: Command) -> Option<Command> {
        for (index, kind) in command.unsupported_kinds() {
            tracing::warn!(
                command = %command.name(),
                index,
                kind = %kind,
                "command declares a parameter kind that cannot be bound"
            );
        }
        self.commands.insert(command.name().to_string(), command)
    }

    pub fn remove(&mut self, name: &str) -> Option<Command> {
        self.commands.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names starting with `prefix` (case-sensitive), sorted.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut names = self.names();
        names.retain(|name| name.starts_with(prefix));
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Extend<Command> for Registry {
    fn extend<T: IntoIterator<Item = Command>>(&mut self, iter: T) {
        for command in iter {
            self.register(command);
        }
    }
}

impl FromIterator<Command> for Registry {
    fn from_iter<T: IntoIterator<Item = Command>>(iter: T) -> Self {
        let mut registry = Registry::new();
        registry.extend(iter);
        registry
    }
}
