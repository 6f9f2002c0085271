//! The interaction log: timestamped, typed output items.
//!
//! Command execution and system messages append [`Item`]s to an [`ItemLog`].
//! The log is shared through [`OutputLog`] so handler bodies can stream
//! extra output while dispatch holds the system aggregate.

use std::fmt::Display;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Milliseconds elapsed since the first item was created.
pub(crate) fn timestamp_ms() -> u64 {
    EPOCH.get_or_init(Instant::now).elapsed().as_millis() as u64
}

/// Kind of a log item.
///
/// `Command` echoes executed input, `Log` carries handler output, `Warning`
/// and `Error` report problems, `Info` is free-form, and `None` marks an
/// empty result that is never appended to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    /// An executed command line.
    Command,
    /// Output logged by a command.
    Log,
    /// A warning for the client.
    Warning,
    /// An error for the client.
    Error,
    /// Free-form information.
    Info,
    /// Empty item; filtered out of the log.
    None,
}

/// One log entry: a kind fixed at creation, a timestamp in milliseconds
/// relative to process start, and accumulated text. Text is only ever
/// appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The entry kind.
    pub kind: ItemType,
    /// Accumulated text.
    pub text: String,
    /// Milliseconds since the first item was created.
    pub timestamp: u64,
}

impl Item {
    /// Create an empty item of the given kind, stamped now.
    pub fn new(kind: ItemType) -> Self {
        Self {
            kind,
            text: String::new(),
            timestamp: timestamp_ms(),
        }
    }

    /// Append a displayable value to the item text.
    pub fn append(&mut self, value: impl Display) -> &mut Self {
        let _ = write!(self.text, "{}", value);
        self
    }

    /// Builder-style [`append`](Self::append).
    pub fn with(mut self, value: impl Display) -> Self {
        self.append(value);
        self
    }

    /// The styled string for display, with the per-kind prefix applied.
    pub fn formatted(&self) -> String {
        match self.kind {
            ItemType::Command => format!("> {}", self.text),
            ItemType::Log => format!("\t{}", self.text),
            ItemType::Warning => format!("\t[WARNING]: {}", self.text),
            ItemType::Error => format!("[ERROR]: {}", self.text),
            ItemType::Info => self.text.clone(),
            ItemType::None => String::new(),
        }
    }
}

/// An ordered, append-only sequence of [`Item`]s with a fluent append API.
///
/// # Examples
///
/// ```
/// use bevy_typed_console::core::{ItemLog, ItemType};
///
/// let mut log = ItemLog::default();
/// log.log(ItemType::Log).append("loaded ").append(3).append(" assets");
/// assert_eq!(log.items()[0].text, "loaded 3 assets");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemLog {
    items: Vec<Item>,
}

impl ItemLog {
    /// Start a new item of the given kind and return it for appending.
    pub fn log(&mut self, kind: ItemType) -> &mut Item {
        self.items.push(Item::new(kind));
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    /// Append an already-built item.
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// The logged items, oldest first.
    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of logged items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the log is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// A shared, lockable handle to an [`ItemLog`].
///
/// Cloning shares the underlying log; this is the handle command handlers
/// capture to stream output during dispatch. [`deep_clone`](Self::deep_clone)
/// duplicates the contents instead and backs the system aggregate's deep
/// copy.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    inner: Arc<Mutex<ItemLog>>,
}

impl OutputLog {
    /// Create an empty log handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the underlying log for direct access.
    pub fn lock(&self) -> MutexGuard<'_, ItemLog> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Start a new item and return a stream that appends into it.
    ///
    /// The stream holds the log lock until dropped.
    pub fn log(&self, kind: ItemType) -> LogStream<'_> {
        let mut guard = self.lock();
        guard.log(kind);
        LogStream { guard }
    }

    /// Append an already-built item, dropping `None`-kind items.
    pub fn push(&self, item: Item) {
        if item.kind != ItemType::None {
            self.lock().push(item);
        }
    }

    /// Duplicate the log contents into an independent handle.
    pub fn deep_clone(&self) -> Self {
        Self {
            inner: Arc::new(Mutex::new(self.lock().clone())),
        }
    }
}

/// Fluent writer into the most recent log item.
pub struct LogStream<'a> {
    guard: MutexGuard<'a, ItemLog>,
}

impl LogStream<'_> {
    /// Append a displayable value to the current item.
    pub fn append(mut self, value: impl Display) -> Self {
        if let Some(item) = self.guard.items.last_mut() {
            item.append(value);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_formatting_prefixes() {
        assert_eq!(Item::new(ItemType::Command).with("quit").formatted(), "> quit");
        assert_eq!(Item::new(ItemType::Log).with("hi").formatted(), "\thi");
        assert_eq!(
            Item::new(ItemType::Warning).with("careful").formatted(),
            "\t[WARNING]: careful"
        );
        assert_eq!(
            Item::new(ItemType::Error).with("boom").formatted(),
            "[ERROR]: boom"
        );
        assert_eq!(Item::new(ItemType::Info).with("plain").formatted(), "plain");
        assert_eq!(Item::new(ItemType::None).with("gone").formatted(), "");
    }

    #[test]
    fn test_item_append_accumulates() {
        let mut item = Item::new(ItemType::Log);
        item.append("x = ");
        item.append(3.5f32);
        assert_eq!(item.text, "x = 3.5");
    }

    #[test]
    fn test_item_log_fluent() {
        let mut log = ItemLog::default();
        log.log(ItemType::Error).append("bad ").append(404);
        assert_eq!(log.len(), 1);
        assert_eq!(log.items()[0].kind, ItemType::Error);
        assert_eq!(log.items()[0].text, "bad 404");
    }

    #[test]
    fn test_output_log_clone_shares() {
        let log = OutputLog::new();
        let handle = log.clone();
        handle.log(ItemType::Info).append("from handler");
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_output_log_deep_clone_is_independent() {
        let log = OutputLog::new();
        log.log(ItemType::Info).append("original");
        let copy = log.deep_clone();
        copy.log(ItemType::Info).append("copied");
        assert_eq!(log.lock().len(), 1);
        assert_eq!(copy.lock().len(), 2);
    }

    #[test]
    fn test_output_log_push_drops_none() {
        let log = OutputLog::new();
        log.push(Item::new(ItemType::None).with("invisible"));
        assert!(log.lock().is_empty());
        log.push(Item::new(ItemType::Log).with("visible"));
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_timestamps_monotonic() {
        let a = Item::new(ItemType::Log);
        let b = Item::new(ItemType::Log);
        assert!(b.timestamp >= a.timestamp);
    }
}
