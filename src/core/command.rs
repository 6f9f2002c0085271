//! Typed console commands.
//!
//! A command binds a name and description to a handler plus an ordered
//! argument declaration. The declaration is a tuple of [`Arg<T>`]s and the
//! handler must be a closure whose parameter list matches the declared types
//! exactly; a mismatch is a compile error at the registration call site.
//!
//! Commands of different shapes are stored behind the object-safe
//! [`ConsoleCommand`] trait, which also carries deep-clone support so the
//! whole system aggregate stays copyable.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use super::error::ConsoleError;
use super::item::{Item, ItemType};
use super::tokenizer::Line;
use super::value::{ArgValue, LogValue};

/// Fail unless at least one more token remains for the next argument.
pub(crate) fn ensure_argument(line: &Line, cursor: usize) -> Result<(), ConsoleError> {
    if line.peek_token(cursor).start >= line.end() {
        return Err(ConsoleError::parse(
            "Not enough arguments were given",
            line.as_str(),
        ));
    }
    Ok(())
}

/// The trailing null-argument rule: fail if anything but whitespace remains.
pub(crate) fn ensure_exhausted(line: &Line, cursor: usize) -> Result<(), ConsoleError> {
    if line.peek_token(cursor).start < line.end() {
        return Err(ConsoleError::parse(
            "Too many arguments were given",
            line.as_str(),
        ));
    }
    Ok(())
}

/// A named, typed argument declaration.
///
/// # Examples
///
/// ```
/// use bevy_typed_console::core::Arg;
///
/// let arg = Arg::<i32>::new("count");
/// assert_eq!(arg.info(), " [count:i32]");
/// ```
#[derive(Clone)]
pub struct Arg<T> {
    name: String,
    marker: PhantomData<fn() -> T>,
}

impl<T: ArgValue> Arg<T> {
    /// Declare an argument with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: PhantomData,
        }
    }

    /// The argument's display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Usage fragment in the form ` [name:TypeName]`.
    pub fn info(&self) -> String {
        format!(" [{}:{}]", self.name, T::type_name())
    }
}

/// An ordered argument declaration: a tuple of [`Arg<T>`]s, arity 0 to 8.
pub trait ArgList: Clone + Send + Sync + 'static {
    /// The tuple of parsed values handed to the handler.
    type Values: 'static;

    /// Parse every declared argument in order.
    fn parse(&self, line: &mut Line, cursor: &mut usize) -> Result<Self::Values, ConsoleError>;

    /// Concatenated usage fragments for help text.
    fn usage(&self) -> String;

    /// Number of declared arguments.
    fn count(&self) -> usize;
}

impl ArgList for () {
    type Values = ();

    fn parse(&self, _line: &mut Line, _cursor: &mut usize) -> Result<(), ConsoleError> {
        Ok(())
    }

    fn usage(&self) -> String {
        String::new()
    }

    fn count(&self) -> usize {
        0
    }
}

macro_rules! impl_arg_list {
    ($n:literal; $(($A:ident, $idx:tt)),+) => {
        impl<$($A: ArgValue),+> ArgList for ($(Arg<$A>,)+) {
            type Values = ($($A,)+);

            fn parse(
                &self,
                line: &mut Line,
                cursor: &mut usize,
            ) -> Result<Self::Values, ConsoleError> {
                Ok(($(
                    {
                        ensure_argument(line, *cursor)?;
                        $A::parse(line, cursor)?
                    },
                )+))
            }

            fn usage(&self) -> String {
                let mut usage = String::new();
                $( usage.push_str(&self.$idx.info()); )+
                usage
            }

            fn count(&self) -> usize {
                $n
            }
        }
    };
}

impl_arg_list!(1; (A0, 0));
impl_arg_list!(2; (A0, 0), (A1, 1));
impl_arg_list!(3; (A0, 0), (A1, 1), (A2, 2));
impl_arg_list!(4; (A0, 0), (A1, 1), (A2, 2), (A3, 3));
impl_arg_list!(5; (A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4));
impl_arg_list!(6; (A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4), (A5, 5));
impl_arg_list!(7; (A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4), (A5, 5), (A6, 6));
impl_arg_list!(8; (A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4), (A5, 5), (A6, 6), (A7, 7));

/// A handler invocable with a parsed value tuple.
///
/// Implemented for `Fn` closures whose parameter list matches the tuple
/// exactly; this is what makes `register_command` type-check declarations
/// against handlers at compile time.
pub trait CommandFn<V>: Send + Sync + 'static {
    /// Call the handler with the parsed values.
    fn call(&self, values: V);
}

impl<Func> CommandFn<()> for Func
where
    Func: Fn() + Send + Sync + 'static,
{
    fn call(&self, _values: ()) {
        (self)()
    }
}

macro_rules! impl_command_fn {
    ($(($A:ident, $idx:tt)),+) => {
        impl<Func, $($A),+> CommandFn<($($A,)+)> for Func
        where
            Func: Fn($($A),+) + Send + Sync + 'static,
        {
            fn call(&self, values: ($($A,)+)) {
                (self)($(values.$idx),+)
            }
        }
    };
}

impl_command_fn!((A0, 0));
impl_command_fn!((A0, 0), (A1, 1));
impl_command_fn!((A0, 0), (A1, 1), (A2, 2));
impl_command_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3));
impl_command_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4));
impl_command_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4), (A5, 5));
impl_command_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4), (A5, 5), (A6, 6));
impl_command_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4), (A5, 5), (A6, 6), (A7, 7));

/// Object-safe surface of a stored command.
///
/// `invoke` parses the remainder of the command line and runs the handler.
/// Parse failures never reach the handler; they come back as an error-kind
/// item prefixed with the command name. A `None`-kind result item means
/// "nothing extra to log".
pub trait ConsoleCommand: Send + Sync {
    /// Parse `input` and run the bound handler.
    fn invoke(&self, input: &mut Line) -> Item;

    /// Formatted help text: name, argument usage, description.
    fn help(&self) -> String;

    /// Number of declared arguments.
    fn argument_count(&self) -> usize;

    /// Deep-copy this command.
    fn clone_boxed(&self) -> Box<dyn ConsoleCommand>;
}

impl Clone for Box<dyn ConsoleCommand> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// A user command: handler plus argument declaration.
pub struct Command<F, A> {
    name: String,
    description: String,
    function: F,
    args: A,
}

impl<F, A> Command<F, A>
where
    A: ArgList,
    F: CommandFn<A::Values> + Clone,
{
    /// Create a command. Name validation happens at registration.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        function: F,
        args: A,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            function,
            args,
        }
    }
}

impl<F: Clone, A: Clone> Clone for Command<F, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            function: self.function.clone(),
            args: self.args.clone(),
        }
    }
}

impl<F, A> ConsoleCommand for Command<F, A>
where
    A: ArgList,
    F: CommandFn<A::Values> + Clone,
{
    fn invoke(&self, input: &mut Line) -> Item {
        let mut cursor = 0;
        let parsed = self.args.parse(input, &mut cursor).and_then(|values| {
            ensure_exhausted(input, cursor)?;
            Ok(values)
        });
        match parsed {
            Ok(values) => {
                self.function.call(values);
                Item::new(ItemType::None)
            }
            Err(err) => Item::new(ItemType::Error).with(format!("{}: {}", self.name, err)),
        }
    }

    fn help(&self) -> String {
        format!(
            "{}{}\n\t\t- {}\n\n",
            self.name,
            self.args.usage(),
            self.description
        )
    }

    fn argument_count(&self) -> usize {
        self.args.count()
    }

    fn clone_boxed(&self) -> Box<dyn ConsoleCommand> {
        Box::new(self.clone())
    }
}

/// Synthetic `help <name>` descriptor, paired with every registration.
///
/// Carries the target's help text rendered at registration time; commands
/// are immutable once stored, so the text cannot go stale.
#[derive(Clone)]
pub(crate) struct HelpEntry {
    name: String,
    description: String,
    text: String,
}

impl HelpEntry {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            text: text.into(),
        }
    }
}

impl ConsoleCommand for HelpEntry {
    fn invoke(&self, input: &mut Line) -> Item {
        match ensure_exhausted(input, 0) {
            Ok(()) => Item::new(ItemType::Log).with(&self.text),
            Err(err) => Item::new(ItemType::Error).with(format!("{}: {}", self.name, err)),
        }
    }

    fn help(&self) -> String {
        format!("{}\n\t\t- {}\n\n", self.name, self.description)
    }

    fn argument_count(&self) -> usize {
        0
    }

    fn clone_boxed(&self) -> Box<dyn ConsoleCommand> {
        Box::new(self.clone())
    }
}

/// Synthetic `get <name>` descriptor: logs the variable's current value.
pub(crate) struct VarGetCommand<T> {
    name: String,
    description: String,
    storage: Arc<Mutex<T>>,
}

impl<T> VarGetCommand<T> {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        storage: Arc<Mutex<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            storage,
        }
    }
}

impl<T> Clone for VarGetCommand<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<T> ConsoleCommand for VarGetCommand<T>
where
    T: LogValue + Send + 'static,
{
    fn invoke(&self, input: &mut Line) -> Item {
        match ensure_exhausted(input, 0) {
            Ok(()) => {
                let value = self.storage.lock().unwrap_or_else(|err| err.into_inner());
                Item::new(ItemType::Log).with(value.log_value())
            }
            Err(err) => Item::new(ItemType::Error).with(format!("{}: {}", self.name, err)),
        }
    }

    fn help(&self) -> String {
        format!("{}\n\t\t- {}\n\n", self.name, self.description)
    }

    fn argument_count(&self) -> usize {
        0
    }

    fn clone_boxed(&self) -> Box<dyn ConsoleCommand> {
        Box::new(self.clone())
    }
}

/// Synthetic `set <name>` descriptor: parses the declared types and hands
/// the values to the setter together with the shared storage slot.
pub(crate) struct VarSetCommand<T, A, F> {
    name: String,
    description: String,
    args: A,
    storage: Arc<Mutex<T>>,
    setter: F,
}

impl<T, A, F> VarSetCommand<T, A, F> {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        args: A,
        storage: Arc<Mutex<T>>,
        setter: F,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            args,
            storage,
            setter,
        }
    }
}

impl<T, A: Clone, F: Clone> Clone for VarSetCommand<T, A, F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            args: self.args.clone(),
            storage: Arc::clone(&self.storage),
            setter: self.setter.clone(),
        }
    }
}

impl<T, A, F> ConsoleCommand for VarSetCommand<T, A, F>
where
    T: Send + 'static,
    A: ArgList,
    F: Fn(&mut T, A::Values) + Send + Sync + Clone + 'static,
{
    fn invoke(&self, input: &mut Line) -> Item {
        let mut cursor = 0;
        let parsed = self.args.parse(input, &mut cursor).and_then(|values| {
            ensure_exhausted(input, cursor)?;
            Ok(values)
        });
        match parsed {
            Ok(values) => {
                let mut slot = self.storage.lock().unwrap_or_else(|err| err.into_inner());
                (self.setter)(&mut *slot, values);
                Item::new(ItemType::None)
            }
            Err(err) => Item::new(ItemType::Error).with(format!("{}: {}", self.name, err)),
        }
    }

    fn help(&self) -> String {
        format!(
            "{}{}\n\t\t- {}\n\n",
            self.name,
            self.args.usage(),
            self.description
        )
    }

    fn argument_count(&self) -> usize {
        self.args.count()
    }

    fn clone_boxed(&self) -> Box<dyn ConsoleCommand> {
        Box::new(self.clone())
    }
}
