//! # Core UI Engine
//!
//! Everything that decides what the terminal shows. It knows nothing about
//! any specific UI technology: the adapter feeds it [`screen::Keystroke`]s and
//! paints the character surfaces it keeps.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • UiState              │
//!                    │  • editor / transcript  │
//!                    │  • status / commands    │
//!                    │  • event_loop::run()    │
//!                    └───────┬──────────┬──────┘
//!                            │          │
//!                 Screen trait          ChatSession trait
//!                            ▼          ▼
//!                   ┌────────────┐  ┌────────────┐
//!                   │    TUI     │  │    chat    │
//!                   │  Adapter   │  │ (multicast)│
//!                   │ (ratatui)  │  │            │
//!                   └────────────┘  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`layout`]: region geometry for a terminal size
//! - [`surface`]: character-cell rows behind each region
//! - [`transcript`]: the scrolling chat log
//! - [`editor`]: the input buffer and its wrapping cursor
//! - [`status`]: normal/urgent status line
//! - [`commands`]: registry, dispatch and the built-in commands
//! - [`modal`]: the press-any-key sub-loop used by HELP, LIST and PEERLIST
//! - [`state`]: `UiState`, keystroke routing
//! - [`event_loop`]: the driver
//! - [`config`]: settings file, env and CLI resolution

pub mod commands;
pub mod config;
pub mod editor;
pub mod event_loop;
pub mod layout;
pub mod modal;
pub mod screen;
pub mod state;
pub mod status;
pub mod surface;
pub mod transcript;
