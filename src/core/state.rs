//! # UI State
//!
//! Everything the engine mutates, in one owned value:
//!
//! ```text
//! UiState
//! ├── geometry: Geometry            // transcript / input / status rectangles
//! ├── transcript: Transcript        // scrolling chat log + its row cursor
//! ├── editor: InputEditor           // message buffer + (line, col) cursor
//! ├── status: StatusBar             // normal / urgent overlay
//! ├── commands: CommandRegistry     // built-ins, in registration order
//! ├── session: Box<dyn ChatSession> // the chat collaborator
//! ├── escape: char                  // command prefix, default '\'
//! └── running: bool                 // event loop exits when false
//! ```
//!
//! Created once at startup and handed by `&mut` to the event loop and, through
//! [`CommandContext`], to whichever command is running.

use std::io;

use log::{debug, info, warn};

use super::commands::{
    CommandContext, CommandRegistry, CommandStatus, Submission, register_builtins,
};
use super::config::ResolvedConfig;
use super::editor::InputEditor;
use super::layout::Geometry;
use super::screen::{Keystroke, Screen};
use super::status::StatusBar;
use super::transcript::Transcript;
use crate::chat::ChatSession;

/// Sent to the channel and written to the transcript on join.
pub const CONNECTED_NOTICE: &str = "<Connected>";
/// Sent to the channel and written to the transcript on leave and shutdown.
pub const DISCONNECTED_NOTICE: &str = "<Disconnected>";
/// Normal status text while not in a channel.
pub const STATUS_DISCONNECTED: &str = "Disconnected";

pub struct UiState {
    pub geometry: Geometry,
    pub transcript: Transcript,
    pub editor: InputEditor,
    pub status: StatusBar,
    pub commands: CommandRegistry,
    pub session: Box<dyn ChatSession>,
    pub escape: char,
    pub running: bool,
}

impl UiState {
    /// Build the state for a terminal of `rows` × `cols` with the built-in
    /// commands registered.
    pub fn new(
        config: &ResolvedConfig,
        session: Box<dyn ChatSession>,
        rows: u16,
        cols: u16,
    ) -> Self {
        let geometry = Geometry::compute(rows, cols);
        let mut commands = CommandRegistry::new();
        register_builtins(&mut commands);

        Self {
            geometry,
            transcript: Transcript::new(geometry.transcript, config.timestamp_format.clone()),
            editor: InputEditor::new(geometry.input, config.prompt.clone()),
            status: StatusBar::new(STATUS_DISCONNECTED),
            commands,
            session,
            escape: config.escape,
            running: true,
        }
    }

    /// Recompute the regions and fit the transcript and editor to them.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        let geometry = Geometry::compute(rows, cols);
        self.transcript.resize(geometry.transcript);
        self.editor.resize(geometry.input);
        self.geometry = geometry;
        debug!("Resized to {}x{}: {:?}", rows, cols, geometry);
    }

    /// Route one keystroke. Only terminal I/O errors escape.
    pub fn handle_key(&mut self, key: Keystroke, screen: &mut dyn Screen) -> io::Result<()> {
        self.status.dismiss_on_keystroke();

        match key {
            Keystroke::Enter | Keystroke::Char('\n' | '\r') => {
                if let Some(submission) = self.editor.submit(self.escape) {
                    self.route(submission, screen)?;
                }
            }
            Keystroke::Backspace | Keystroke::Char('\u{7f}') => self.editor.delete_backward(),
            Keystroke::Char(ch) => {
                if let Err(e) = self.editor.insert_printable(ch) {
                    self.status.notify(e.to_string());
                }
            }
            Keystroke::Resize => self.resize_to(screen)?,
            Keystroke::Other(name) => {
                self.status.notify(format!("Unknown Key: {name}"));
            }
        }
        Ok(())
    }

    fn route(&mut self, submission: Submission, screen: &mut dyn Screen) -> io::Result<()> {
        match submission {
            Submission::Command(line) => match self.dispatch(&line, screen) {
                CommandStatus::NoSuchCommand => {
                    self.status.notify(format!("Unknown Command: {line}"));
                }
                CommandStatus::Resize => self.resize_to(screen)?,
                CommandStatus::Success | CommandStatus::Failure => {}
            },
            Submission::Message(text) => self.send_message(&text),
        }
        Ok(())
    }

    fn resize_to(&mut self, screen: &mut dyn Screen) -> io::Result<()> {
        let (rows, cols) = screen.size()?;
        self.resize(rows, cols);
        Ok(())
    }

    /// Run the command `line` names. A single leading escape is stripped
    /// before matching; the command receives the remaining text.
    pub fn dispatch(&mut self, line: &str, screen: &mut dyn Screen) -> CommandStatus {
        let text = line.strip_prefix(self.escape).unwrap_or(line);
        let Some(command) = self.commands.lookup(text) else {
            debug!("No command matches {:?}", text);
            return CommandStatus::NoSuchCommand;
        };

        let mut ctx = CommandContext {
            state: self,
            screen,
        };
        let status = command.execute(&mut ctx, text);
        info!("Command {} returned {:?}", command.name(), status);
        status
    }

    /// Send a chat line and echo it under our nickname once it is out.
    pub fn send_message(&mut self, text: &str) {
        match self.session.send(text) {
            Ok(()) => {
                let nickname = self.session.nickname();
                self.transcript.append(&nickname, text);
            }
            Err(e) => {
                debug!("Send failed: {}", e);
                self.status.notify(format!("Message not sent: {e}"));
            }
        }
    }

    /// Move at most one inbound message into the transcript.
    pub fn poll_inbound(&mut self) -> bool {
        match self.session.poll_receive() {
            Some(message) => {
                self.transcript.append(&message.nickname, &message.body);
                true
            }
            None => false,
        }
    }

    /// `Connected to <channel> as <nick>` or `Disconnected`.
    pub fn connection_summary(&self) -> String {
        match self.session.channel() {
            Some(channel) if self.session.is_connected() => {
                format!("Connected to {} as {}", channel, self.session.nickname())
            }
            _ => STATUS_DISCONNECTED.to_string(),
        }
    }

    pub fn refresh_connection_status(&mut self) {
        let summary = self.connection_summary();
        self.status.set_normal(summary);
    }

    /// Say goodbye on the channel (if any) and release the session.
    pub fn shutdown(&mut self) {
        if self.session.is_connected()
            && let Err(e) = self.session.send(DISCONNECTED_NOTICE)
        {
            warn!("Could not send disconnect notice: {}", e);
        }
        self.session.close();
    }
}
