//! # Commands
//!
//! A submitted line that starts with the escape character is a command:
//!
//! ```text
//! "\nick bob"  ──is_command──▶  strip escape  ──lookup──▶  NICK  ──execute──▶  CommandStatus
//!                                "nick bob"     (prefix,     │
//!                                               last wins)   └─ gets "nick bob", parses its own args
//! ```
//!
//! Commands are trait objects in a [`CommandRegistry`], kept in registration
//! order. Lookup is a case-insensitive *prefix* match of the command name
//! against the text, and when several names match the one registered last
//! wins. With `nick` registered before `nickall`, `nickall bob` runs `nickall`
//! while `nicka` runs `nick`, since `nickall` is not a prefix of `nicka`.
//!
//! A doubled escape is how a literal escape character is sent: `\\hi` is the
//! chat message `\hi`.

pub mod builtin;

use std::rc::Rc;

use log::warn;

use super::screen::Screen;
use super::state::UiState;

pub use builtin::register_builtins;

/// Outcome of running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The command reported its own error on the status line
    Failure,
    /// Nothing matched. Only the dispatcher returns this.
    NoSuchCommand,
    /// A resize was observed while the command held the keyboard; geometry
    /// must be recomputed before the next loop iteration.
    Resize,
}

/// Exclusive access handed to a running command.
pub struct CommandContext<'a> {
    pub state: &'a mut UiState,
    pub screen: &'a mut dyn Screen,
}

pub trait Command {
    fn name(&self) -> &str;

    /// Usage hint, e.g. `\NICK [NEW_NICKNAME]`
    fn syntax(&self) -> &str;

    fn help(&self) -> &str;

    /// Run with the full command text (escape stripped, name included).
    fn execute(&self, ctx: &mut CommandContext<'_>, line: &str) -> CommandStatus;
}

type Handler = dyn Fn(&mut CommandContext<'_>, &str) -> CommandStatus;

/// A command backed by a closure.
pub struct FnCommand {
    name: String,
    syntax: String,
    help: String,
    handler: Box<Handler>,
}

impl FnCommand {
    pub fn new(
        name: impl Into<String>,
        syntax: impl Into<String>,
        help: impl Into<String>,
        handler: impl Fn(&mut CommandContext<'_>, &str) -> CommandStatus + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            syntax: syntax.into(),
            help: help.into(),
            handler: Box::new(handler),
        }
    }
}

impl Command for FnCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn syntax(&self) -> &str {
        &self.syntax
    }

    fn help(&self) -> &str {
        &self.help
    }

    fn execute(&self, ctx: &mut CommandContext<'_>, line: &str) -> CommandStatus {
        (self.handler)(ctx, line)
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<Rc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command. Duplicate names are allowed but shadow earlier ones.
    pub fn register(&mut self, command: impl Command + 'static) {
        if self
            .entries
            .iter()
            .any(|c| c.name().eq_ignore_ascii_case(command.name()))
        {
            warn!("Command {} registered twice", command.name());
        }
        self.entries.push(Rc::new(command));
    }

    pub fn register_fn(
        &mut self,
        name: &str,
        syntax: &str,
        help: &str,
        handler: impl Fn(&mut CommandContext<'_>, &str) -> CommandStatus + 'static,
    ) {
        self.register(FnCommand::new(name, syntax, help, handler));
    }

    /// Registered commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> + '_ {
        self.entries.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last registered command whose name is a case-insensitive prefix of
    /// `text`.
    pub fn lookup(&self, text: &str) -> Option<Rc<dyn Command>> {
        let mut found = None;
        for command in &self.entries {
            let name = command.name();
            if text
                .get(..name.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(name))
            {
                found = Some(command.clone());
            }
        }
        found
    }
}

/// True iff `line` starts with `escape` and the next character is not `escape`.
pub fn is_command(line: &str, escape: char) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(escape) && chars.next() != Some(escape)
}

/// Text after the command name, trimmed. `None` when there is none.
pub fn argument<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.get(name.len()..)?.trim();
    (!rest.is_empty()).then_some(rest)
}

/// A submitted line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Still carries its leading escape
    Command(String),
    Message(String),
}

impl Submission {
    pub fn classify(line: String, escape: char) -> Self {
        if is_command(&line, escape) {
            return Submission::Command(line);
        }
        let mut chars = line.chars();
        if chars.next() == Some(escape) && chars.next() == Some(escape) {
            return Submission::Message(line[escape.len_utf8()..].to_string());
        }
        Submission::Message(line)
    }
}
