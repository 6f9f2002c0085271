//! Core console engine with zero optional dependencies.
//!
//! The fundamental building blocks:
//! - [`ConsoleSystem`] - the system aggregate: registry, dispatch, history,
//!   autocomplete, interaction log, scripts
//! - [`Arg`] / [`ArgValue`] - the typed argument grammar
//! - [`Command`] / [`ConsoleCommand`] - strongly-typed commands behind a
//!   type-erased, cloneable table
//! - [`TernaryTrie`] - ternary-search-tree autocomplete
//! - [`CommandHistory`] - circular input history
//! - [`Line`] - the raw-line scanner
//! - Messages for communication between layers

mod command;
mod console;
mod error;
mod events;
mod history;
mod item;
mod registry;
mod script;
mod tokenizer;
mod trie;
mod value;

pub use command::{Arg, ArgList, Command, CommandFn, ConsoleCommand};
pub use console::ConsoleSystem;
pub use error::ConsoleError;
pub use events::{ConsoleEventsPlugin, ConsoleInputEvent, ConsoleItemEvent, ConsoleScriptEvent};
pub use history::{CommandHistory, DEFAULT_HISTORY_CAPACITY};
pub use item::{Item, ItemLog, ItemType, LogStream, OutputLog};
pub use registry::CommandRegistry;
pub use script::Script;
pub use tokenizer::{is_reserved, Line, Span, RESERVED_CHARS};
pub use trie::TernaryTrie;
pub use value::{ArgValue, FromParsed, LogValue};
