//! The console system aggregate.
//!
//! [`ConsoleSystem`] owns the command registry, both autocomplete trees, the
//! command history, the interaction log, and the script store, and runs the
//! dispatch path that ties them together. It is a [`Resource`] so the plugin
//! layer can hold exactly one per `App`, and it is `Clone`: a deep,
//! all-or-nothing duplication of every owned structure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use super::command::{
    ArgList, Command, CommandFn, ConsoleCommand, HelpEntry, VarGetCommand, VarSetCommand,
};
use super::error::ConsoleError;
use super::history::CommandHistory;
use super::item::{ItemType, LogStream, OutputLog};
use super::registry::CommandRegistry;
use super::script::Script;
use super::tokenizer::Line;
use super::trie::TernaryTrie;
use super::value::{assign_parsed, FromParsed, LogValue};

const WORD_SET: &str = "set";
const WORD_GET: &str = "get";
const WORD_HELP: &str = "help";
const ERR_NO_VAR: &str = "No variable provided";
const ERR_NOT_FOUND: &str = "Command doesn't exist and/or variable is not registered";

/// The embeddable command-interpreter engine.
///
/// # Examples
///
/// ```
/// use bevy_typed_console::core::{Arg, ConsoleSystem};
///
/// let mut console = ConsoleSystem::new();
/// console
///     .register_command(
///         "add",
///         "Adds two numbers",
///         |a: i32, b: i32| {
///             let _ = a + b;
///         },
///         (Arg::<i32>::new("a"), Arg::<i32>::new("b")),
///     )
///     .unwrap();
///
/// console.run_command("add 2 3");
/// assert_eq!(console.history().newest().map(String::as_str), Some("add 2 3"));
/// ```
#[derive(Resource)]
pub struct ConsoleSystem {
    registry: CommandRegistry,
    command_tree: TernaryTrie,
    variable_tree: TernaryTrie,
    history: CommandHistory,
    output: OutputLog,
    scripts: HashMap<String, Script>,
}

impl Default for ConsoleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ConsoleSystem {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            command_tree: self.command_tree.clone(),
            variable_tree: self.variable_tree.clone(),
            history: self.history.clone(),
            output: self.output.deep_clone(),
            scripts: self.scripts.clone(),
        }
    }
}

impl ConsoleSystem {
    /// Create an engine with the built-in `help`/`set`/`get` words seeded
    /// into the command autocomplete tree.
    pub fn new() -> Self {
        let mut system = Self {
            registry: CommandRegistry::new(),
            command_tree: TernaryTrie::new(),
            variable_tree: TernaryTrie::new(),
            history: CommandHistory::new(),
            output: OutputLog::new(),
            scripts: HashMap::new(),
        };

        system.command_tree.insert(WORD_HELP);
        system.variable_tree.insert(WORD_HELP);
        system.command_tree.insert(WORD_SET);
        system.command_tree.insert(WORD_GET);

        // `help help` behaves like any other per-command help entry.
        system.registry.insert(
            "help help",
            Box::new(HelpEntry::new(
                "help help",
                "Displays help info about command help",
                "help\n\t\t- Display commands information\n\n",
            )),
        );

        system
    }

    /// Register a strongly-typed command.
    ///
    /// The handler's parameter list must match the declared argument types
    /// exactly; a mismatch fails to compile. Registration fails at run time
    /// when the name is empty, contains whitespace, or is already taken. A
    /// `help <name>` descriptor is stored alongside the command and removed
    /// together with it.
    pub fn register_command<F, A>(
        &mut self,
        name: &str,
        description: &str,
        function: F,
        args: A,
    ) -> Result<(), ConsoleError>
    where
        A: ArgList,
        F: CommandFn<A::Values> + Clone,
    {
        let word = validate_name(name, "command")?;
        if self.registry.contains(&word) {
            return Err(ConsoleError::registration(format!(
                "Command '{}' already exists",
                word
            )));
        }

        self.command_tree.insert(&word);
        self.variable_tree.insert(&word);

        let command = Command::new(word.clone(), description, function, args);
        let help_key = format!("help {}", word);
        let help_entry = HelpEntry::new(
            help_key.clone(),
            format!("Displays help info about command {}", word),
            command.help(),
        );
        self.registry.insert(word, Box::new(command));
        self.registry.insert(help_key, Box::new(help_entry));
        Ok(())
    }

    /// Register a variable with direct construction from the parsed values.
    ///
    /// Synthesizes `get <name>` (logs the current value) and `set <name>`
    /// (parses the declared types and assigns into `storage`). The storage
    /// stays shared with the caller; a deep-copied system intentionally
    /// keeps pointing at the same storage.
    pub fn register_variable<T, A>(
        &mut self,
        name: &str,
        storage: &Arc<Mutex<T>>,
        args: A,
    ) -> Result<(), ConsoleError>
    where
        T: LogValue + FromParsed<A::Values> + Send + 'static,
        A: ArgList,
    {
        self.register_variable_with(name, storage, args, assign_parsed::<T, A::Values>)
    }

    /// Register a variable with a custom setter of shape
    /// `(storage, parsed values)`.
    pub fn register_variable_with<T, A, F>(
        &mut self,
        name: &str,
        storage: &Arc<Mutex<T>>,
        args: A,
        setter: F,
    ) -> Result<(), ConsoleError>
    where
        T: LogValue + Send + 'static,
        A: ArgList,
        F: Fn(&mut T, A::Values) + Send + Sync + Clone + 'static,
    {
        let word = validate_name(name, "variable")?;
        let get_key = format!("get {}", word);
        let set_key = format!("set {}", word);
        if self.registry.contains(&get_key) || self.registry.contains(&set_key) {
            return Err(ConsoleError::registration(format!(
                "Variable '{}' already exists",
                word
            )));
        }

        self.variable_tree.insert(&word);
        self.registry.insert(
            get_key.clone(),
            Box::new(VarGetCommand::new(
                get_key,
                format!("Gets the variable {}", word),
                Arc::clone(storage),
            )),
        );
        self.registry.insert(
            set_key.clone(),
            Box::new(VarSetCommand::new(
                set_key,
                format!("Sets the variable {}", word),
                args,
                Arc::clone(storage),
                setter,
            )),
        );
        Ok(())
    }

    /// Register a file-backed script. Loading is deferred to the first run.
    pub fn register_script(&mut self, name: &str, path: &str) -> Result<(), ConsoleError> {
        self.store_script(name, Script::from_file(path))
    }

    /// Register a script from lines already in memory.
    pub fn register_script_lines(
        &mut self,
        name: &str,
        lines: Vec<String>,
    ) -> Result<(), ConsoleError> {
        self.store_script(name, Script::from_lines(lines))
    }

    fn store_script(&mut self, name: &str, script: Script) -> Result<(), ConsoleError> {
        let word = validate_name(name, "script")?;
        if self.scripts.contains_key(&word) {
            return Err(ConsoleError::registration(format!(
                "Script '{}' already registered",
                word
            )));
        }
        self.variable_tree.insert(&word);
        self.scripts.insert(word, script);
        Ok(())
    }

    /// Remove a command and its paired `help <name>` descriptor.
    ///
    /// Both entries go together or not at all; unknown names are no-ops.
    pub fn unregister_command(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        let help_key = format!("help {}", name);
        if self.registry.contains(name) && self.registry.contains(&help_key) {
            self.command_tree.remove(name);
            self.variable_tree.remove(name);
            self.registry.remove(name);
            self.registry.remove(&help_key);
        }
    }

    /// Remove a variable's paired `set <name>`/`get <name>` descriptors.
    pub fn unregister_variable(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        let set_key = format!("set {}", name);
        let get_key = format!("get {}", name);
        if self.registry.contains(&set_key) && self.registry.contains(&get_key) {
            self.variable_tree.remove(name);
            self.registry.remove(&set_key);
            self.registry.remove(&get_key);
        }
    }

    /// Remove a registered script. Unknown names are no-ops.
    pub fn unregister_script(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        if self.scripts.remove(name).is_some() {
            self.variable_tree.remove(name);
        }
    }

    /// Dispatch one line of input.
    ///
    /// Empty or whitespace-only lines are ignored entirely. Anything else is
    /// echoed as a command-kind item, recorded in history, resolved through
    /// the registry (with the two-word `help`/`set`/`get` forms), and run.
    /// Every failure path produces exactly one error-kind item.
    pub fn run_command(&mut self, line: &str) {
        let scan = Line::new(line);
        let mut cursor = 0;
        let first = scan.next_token(&mut cursor);
        if first.start == scan.end() {
            return;
        }

        self.output.log(ItemType::Command).append(line);
        self.history.push(line);

        let mut name = scan.slice(first).to_string();
        let mut consumed_end = first.end;

        if name == WORD_HELP {
            let second = scan.next_token(&mut cursor);
            if second.start == scan.end() {
                self.general_help();
                return;
            }
            name.push(' ');
            name.push_str(scan.slice(second));
            consumed_end = second.end;
        } else if name == WORD_SET || name == WORD_GET {
            let second = scan.next_token(&mut cursor);
            if second.start == scan.end() {
                self.output.log(ItemType::Error).append(ERR_NO_VAR);
                return;
            }
            name.push(' ');
            name.push_str(scan.slice(second));
            consumed_end = second.end;
        }

        let Some(command) = self.registry.get(&name) else {
            self.output.log(ItemType::Error).append(ERR_NOT_FOUND);
            return;
        };

        let mut arguments = Line::new(scan.tail(consumed_end));
        let result = command.invoke(&mut arguments);
        self.output.push(result);
    }

    /// Replay a registered script through the normal dispatch path.
    ///
    /// Unknown names and load failures are logged as errors; stored lines
    /// run in file order, history recording included.
    pub fn run_script(&mut self, name: &str) {
        let Some(script) = self.scripts.get_mut(name) else {
            self.output
                .log(ItemType::Error)
                .append(format!("Script \"{}\" not found", name));
            return;
        };

        self.output
            .log(ItemType::Info)
            .append(format!("Running \"{}\"", name));

        if script.data().is_empty() {
            if let Err(err) = script.load() {
                self.output.log(ItemType::Error).append(err.to_string());
            }
        }

        let lines: Vec<String> = script.data().to_vec();
        for line in &lines {
            self.run_command(line);
        }
    }

    // General usage plus the help text of every registered user command.
    // Two-word accessor keys (set/get/help pairs) are skipped.
    fn general_help(&self) {
        self.output.log(ItemType::Log).append(
            "help [command_name:String] (Optional)\n\t\t- Display command(s) information\n",
        );
        self.output
            .log(ItemType::Log)
            .append("set [variable_name:String] [data]\n\t\t- Assign data to given variable\n");
        self.output
            .log(ItemType::Log)
            .append("get [variable_name:String]\n\t\t- Display data of given variable\n");

        for (key, command) in self.registry.iter() {
            if key.contains(' ') {
                continue;
            }
            self.output.log(ItemType::Log).append(command.help());
        }
    }

    /// Start a new interaction-log item and stream into it.
    pub fn log(&self, kind: ItemType) -> LogStream<'_> {
        self.output.log(kind)
    }

    /// The shared interaction log. Clone the handle into command handlers
    /// that want to emit output during dispatch.
    #[inline]
    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    /// Autocomplete tree over command names.
    #[inline]
    pub fn command_autocomplete(&self) -> &TernaryTrie {
        &self.command_tree
    }

    /// Mutable access to the command autocomplete tree.
    #[inline]
    pub fn command_autocomplete_mut(&mut self) -> &mut TernaryTrie {
        &mut self.command_tree
    }

    /// Autocomplete tree over variable and script names.
    #[inline]
    pub fn variable_autocomplete(&self) -> &TernaryTrie {
        &self.variable_tree
    }

    /// Mutable access to the variable autocomplete tree.
    #[inline]
    pub fn variable_autocomplete_mut(&mut self) -> &mut TernaryTrie {
        &mut self.variable_tree
    }

    /// The command history.
    #[inline]
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Mutable access to the command history.
    #[inline]
    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    /// The registered command map, synthetic descriptors included.
    #[inline]
    pub fn commands(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The registered scripts.
    #[inline]
    pub fn scripts(&self) -> &HashMap<String, Script> {
        &self.scripts
    }

    /// Mutable access to the registered scripts.
    #[inline]
    pub fn scripts_mut(&mut self) -> &mut HashMap<String, Script> {
        &mut self.scripts
    }
}

// Registration names must be a single non-empty token.
fn validate_name(name: &str, what: &str) -> Result<String, ConsoleError> {
    let scan = Line::new(name);
    let mut cursor = 0;
    let first = scan.next_token(&mut cursor);
    if first.start == scan.end() {
        return Err(ConsoleError::registration(format!(
            "Empty {} name given",
            what
        )));
    }
    if scan.next_token(&mut cursor).start != scan.end() {
        return Err(ConsoleError::registration(format!(
            "Whitespace separated {} names are forbidden",
            what
        )));
    }
    Ok(scan.slice(first).to_string())
}
