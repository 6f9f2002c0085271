//! A strongly-typed, embeddable developer console engine for Bevy.
//!
//! The engine resolves a line of input to a registered, typed command or
//! variable accessor, parses a small positional-argument grammar (primitives,
//! quoted strings, nested bracketed lists), invokes the bound handler, and
//! records the interaction: history, autocomplete, interaction log, script
//! playback. Rendering is someone else's job; a UI layer consumes the
//! engine through messages and the read accessors.
//!
//! - **Typed commands**: the handler's parameter list is checked against the
//!   declared arguments at compile time
//! - **Variables**: registered storage with synthesized `set x`/`get x`
//!   accessors
//! - **Autocomplete**: ternary-search-tree indices over command and variable
//!   names
//! - **History**: fixed-capacity circular input log
//! - **Scripts**: named line sequences replayed through normal dispatch
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_typed_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin)
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: ResMut<ConsoleSystem>) {
//!     console
//!         .register_command(
//!             "greet",
//!             "Greets someone",
//!             |who: String| info!("hello, {who}"),
//!             (Arg::<String>::new("who"),),
//!         )
//!         .unwrap();
//! }
//!
//! fn submit(mut events: MessageWriter<ConsoleInputEvent>) {
//!     events.write(ConsoleInputEvent::new("greet \"new player\""));
//! }
//! ```

use bevy::prelude::*;

pub mod core;

pub use core::{
    Arg, ArgList, ArgValue, Command, CommandFn, CommandHistory, CommandRegistry, ConsoleCommand,
    ConsoleError, ConsoleEventsPlugin, ConsoleInputEvent, ConsoleItemEvent, ConsoleScriptEvent,
    ConsoleSystem, FromParsed, Item, ItemLog, ItemType, Line, LogStream, LogValue, OutputLog,
    Script, Span, TernaryTrie,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Arg, ArgValue, ConsoleError, ConsoleInputEvent, ConsoleItemEvent, ConsoleScriptEvent,
        ConsoleSystem, Item, ItemType, OutputLog,
    };
    pub use crate::ConsolePlugin;
}

/// Main console plugin.
///
/// Installs the [`ConsoleSystem`] resource, registers the console messages,
/// and wires the Update pipeline: dispatch submitted input, replay requested
/// scripts, then forward every newly appended log item as a
/// [`ConsoleItemEvent`].
#[derive(Default)]
pub struct ConsolePlugin;

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConsoleSystem>()
            .init_resource::<ForwardedItems>()
            .add_plugins(ConsoleEventsPlugin)
            .add_systems(
                Update,
                (
                    process_console_input,
                    process_script_requests,
                    forward_console_items,
                )
                    .chain(),
            );
    }
}

/// How many log items have already been forwarded as messages.
#[derive(Resource, Default)]
struct ForwardedItems(usize);

/// Dispatch every submitted command line.
fn process_console_input(
    mut console: ResMut<ConsoleSystem>,
    mut input: MessageReader<ConsoleInputEvent>,
) {
    for event in input.read() {
        console.run_command(&event.line);
    }
}

/// Replay every requested script.
fn process_script_requests(
    mut console: ResMut<ConsoleSystem>,
    mut requests: MessageReader<ConsoleScriptEvent>,
) {
    for event in requests.read() {
        console.run_script(&event.name);
    }
}

/// Forward log items appended since the last frame.
fn forward_console_items(
    console: Res<ConsoleSystem>,
    mut forwarded: ResMut<ForwardedItems>,
    mut writer: MessageWriter<ConsoleItemEvent>,
) {
    let log = console.output().lock();
    let items = log.items();
    if forwarded.0 > items.len() {
        // The log was cleared since the last frame.
        forwarded.0 = 0;
    }
    for item in &items[forwarded.0..] {
        writer.write(ConsoleItemEvent::from_item(item));
    }
    forwarded.0 = items.len();
}
