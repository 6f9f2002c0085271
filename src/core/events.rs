//! Console messages for communication between layers.
//!
//! The presentation layer submits input and script requests as messages and
//! receives every new interaction-log item back as a message. It never
//! touches the engine directly except through the read accessors.

use bevy::prelude::*;

use super::item::{Item, ItemType};

/// A raw command line submitted to the console.
///
/// # Examples
///
/// ```ignore
/// fn submit(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("greet \"hello world\""));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to dispatch.
    pub line: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

/// A request to replay a registered script.
#[derive(Message, Debug, Clone)]
pub struct ConsoleScriptEvent {
    /// Name the script was registered under.
    pub name: String,
}

impl ConsoleScriptEvent {
    /// Create a new script-run request.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One interaction-log item, forwarded as it is appended.
#[derive(Message, Debug, Clone)]
pub struct ConsoleItemEvent {
    /// The item kind.
    pub kind: ItemType,
    /// The raw item text, without the display prefix.
    pub text: String,
    /// Milliseconds since process start.
    pub timestamp: u64,
}

impl ConsoleItemEvent {
    /// Build an event from a logged item.
    pub fn from_item(item: &Item) -> Self {
        Self {
            kind: item.kind,
            text: item.text.clone(),
            timestamp: item.timestamp,
        }
    }
}

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleScriptEvent>()
            .add_message::<ConsoleItemEvent>();
    }
}
