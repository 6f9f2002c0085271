//! Storage for registered commands.
//!
//! One flat map keyed by the lookup name. Variable accessors and per-command
//! help live under their two-word keys (`set x`, `get x`, `help x`) right
//! next to the user commands.

use std::collections::HashMap;

use super::command::ConsoleCommand;

/// Name-keyed, type-erased command table with deep-clone support.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn ConsoleCommand>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a command under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, command: Box<dyn ConsoleCommand>) {
        self.commands.insert(name.into(), command);
    }

    /// Remove and return the command stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn ConsoleCommand>> {
        self.commands.remove(name)
    }

    /// Look up a command by its exact name.
    pub fn get(&self, name: &str) -> Option<&dyn ConsoleCommand> {
        self.commands.get(name).map(|boxed| boxed.as_ref())
    }

    /// Check if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Iterate over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn ConsoleCommand)> {
        self.commands
            .iter()
            .map(|(name, command)| (name.as_str(), command.as_ref()))
    }

    /// Number of stored entries, synthetic descriptors included.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
