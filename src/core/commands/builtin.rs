//! Built-in commands.
//!
//! | Name       | Effect                                         |
//! |------------|------------------------------------------------|
//! | help       | modal help for one command                     |
//! | quit       | stop the event loop                            |
//! | clear      | erase transcript and input                     |
//! | nick       | show or change the nickname                    |
//! | list       | modal table of registered commands             |
//! | connect    | join a channel (default if omitted)            |
//! | disconnect | leave the channel                              |
//! | peerlist   | modal table of peers, refreshed while open     |
//!
//! Syntax strings are stored without the escape character; it is prefixed
//! when shown, so they stay right when the escape is reconfigured.

use chrono::{DateTime, Utc};
use log::{info, warn};

use super::{CommandContext, CommandRegistry, CommandStatus, argument};
use crate::chat::Peer;
use crate::core::modal::{Modal, ModalBody, ModalExtent, run_modal};
use crate::core::state::{CONNECTED_NOTICE, DISCONNECTED_NOTICE, STATUS_DISCONNECTED};

pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register_fn("help", "HELP [COMMAND]", "Get help text for command", help);
    registry.register_fn(
        "quit",
        "QUIT",
        "Gracefully exit mchat. Takes no arguments",
        quit,
    );
    registry.register_fn(
        "clear",
        "CLEAR",
        "Clear the chat and input windows. Takes no arguments",
        clear,
    );
    registry.register_fn(
        "nick",
        "NICK [NEW_NICKNAME]",
        "Get or set your chat nickname. Takes a new nickname as an argument",
        nick,
    );
    registry.register_fn("list", "LIST", "List loaded commands. Takes no arguments", list);
    registry.register_fn(
        "connect",
        "CONNECT [CHANNEL_NAME]",
        "Connect to a channel (defaults to the configured channel, usually #mchat)",
        connect,
    );
    registry.register_fn(
        "disconnect",
        "DISCONNECT",
        "Disconnect from the current channel",
        disconnect,
    );
    registry.register_fn(
        "peerlist",
        "PEERLIST",
        "Show a list of peers seen on the network",
        peerlist,
    );
}

fn help(ctx: &mut CommandContext<'_>, line: &str) -> CommandStatus {
    let escape = ctx.state.escape;
    let target = argument(line, "help").unwrap_or("help");
    let target = target.strip_prefix(escape).unwrap_or(target);

    let Some(command) = ctx.state.commands.lookup(target) else {
        ctx.state
            .status
            .notify(format!("{escape}HELP Could not find command {target}"));
        return CommandStatus::Failure;
    };

    let modal = Modal {
        title: format!("Command Help: {}", command.name()),
        extent: ModalExtent::Centered,
        body: ModalBody::Text(vec![
            format!("Syntax: {}{}", escape, command.syntax()),
            command.help().to_string(),
        ]),
    };
    run_modal(ctx, |_| modal.clone())
}

fn quit(ctx: &mut CommandContext<'_>, _line: &str) -> CommandStatus {
    info!("Quit requested");
    ctx.state.running = false;
    CommandStatus::Success
}

fn clear(ctx: &mut CommandContext<'_>, _line: &str) -> CommandStatus {
    ctx.state.transcript.clear();
    ctx.state.editor.clear();
    ctx.state.status.notify("Screen Cleared");
    CommandStatus::Success
}

fn nick(ctx: &mut CommandContext<'_>, line: &str) -> CommandStatus {
    let state = &mut *ctx.state;

    // Anything after the name is an attempted change, even bare whitespace
    let raw = line.get("nick".len()..).unwrap_or_default();
    if raw.is_empty() {
        let current = state.session.nickname();
        state.status.notify(format!("Your nickname is {current}"));
        return CommandStatus::Success;
    }
    let new_nick = raw.trim();

    let old_nick = state.session.nickname();
    if let Err(e) = state.session.set_nickname(new_nick) {
        warn!("Rejected nickname change: {}", e);
        state
            .status
            .notify(format!("{}NICK ERROR: Invalid Argument", state.escape));
        return CommandStatus::Failure;
    }

    if state.session.is_connected()
        && let Err(e) = state
            .session
            .send(&format!("{old_nick} has changed their nickname to {new_nick}"))
    {
        warn!("Could not announce nickname change: {}", e);
    }

    state.status.notify(format!("Your new nickname is {new_nick}"));
    state.refresh_connection_status();
    CommandStatus::Success
}

fn list(ctx: &mut CommandContext<'_>, _line: &str) -> CommandStatus {
    let escape = ctx.state.escape;
    let rows = ctx
        .state
        .commands
        .iter()
        .map(|command| {
            vec![
                format!("{escape}{}", command.name()),
                format!("{escape}{}", command.syntax()),
                command.help().to_string(),
            ]
        })
        .collect();

    let modal = Modal {
        title: "Commands".to_string(),
        extent: ModalExtent::Full,
        body: ModalBody::Table {
            headers: vec![
                "Command Name".to_string(),
                "Command Syntax".to_string(),
                "Command Description".to_string(),
            ],
            rows,
            widths: vec![25, 25, 50],
        },
    };
    run_modal(ctx, |_| modal.clone())
}

fn connect(ctx: &mut CommandContext<'_>, line: &str) -> CommandStatus {
    let state = &mut *ctx.state;

    if state.session.is_connected() {
        let channel = state.session.channel().unwrap_or_default();
        state.status.notify(format!("Already connected to {channel}"));
        return CommandStatus::Failure;
    }

    let requested = argument(line, "connect");
    if requested.is_some_and(|channel| !channel.starts_with('#')) {
        state
            .status
            .notify("Channel names must start with the # symbol");
        return CommandStatus::Failure;
    }

    if let Err(e) = state.session.connect(requested) {
        warn!("Connect to {:?} failed: {}", requested, e);
        state
            .status
            .notify("Could not connect to the requested channel");
        return CommandStatus::Failure;
    }

    let nickname = state.session.nickname();
    if let Err(e) = state.session.send(CONNECTED_NOTICE) {
        warn!("Could not announce join: {}", e);
    }
    state.transcript.append(&nickname, CONNECTED_NOTICE);
    state.refresh_connection_status();
    CommandStatus::Success
}

fn disconnect(ctx: &mut CommandContext<'_>, _line: &str) -> CommandStatus {
    let state = &mut *ctx.state;

    if !state.session.is_connected() {
        state.status.notify("Already Disconnected!");
        return CommandStatus::Failure;
    }

    let channel = state.session.channel().unwrap_or_default();
    let nickname = state.session.nickname();
    if let Err(e) = state.session.send(DISCONNECTED_NOTICE) {
        warn!("Could not announce leave: {}", e);
    }
    if let Err(e) = state.session.disconnect() {
        warn!("Disconnect from {} failed: {}", channel, e);
    }

    state.status.notify(format!("Disconnected from {channel}"));
    state.status.set_normal(STATUS_DISCONNECTED);
    state.transcript.append(&nickname, DISCONNECTED_NOTICE);
    CommandStatus::Success
}

fn peerlist(ctx: &mut CommandContext<'_>, _line: &str) -> CommandStatus {
    run_modal(ctx, |state| peer_modal(&state.session.peers(), Utc::now()))
}

/// The PEERLIST table as of `now`.
pub fn peer_modal(peers: &[Peer], now: DateTime<Utc>) -> Modal {
    let rows = peers
        .iter()
        .map(|peer| {
            let age = (now - peer.last_seen).num_seconds().max(0);
            vec![
                format!("{} (@{})", peer.nickname, peer.source),
                peer.channel.clone().unwrap_or_default(),
                format!("{age} seconds ago"),
            ]
        })
        .collect();

    Modal {
        title: "Peers".to_string(),
        extent: ModalExtent::Full,
        body: ModalBody::Table {
            headers: vec![
                "Nicknames".to_string(),
                "Connected Channel".to_string(),
                "Last Seen".to_string(),
            ],
            rows,
            widths: vec![34, 33, 33],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::screen::Keystroke;
    use crate::core::state::UiState;
    use crate::test_support::{FakeHandle, ScriptedScreen, test_state, transcript_text};
    use std::net::{IpAddr, Ipv4Addr};

    fn run(state: &mut UiState, line: &str) -> CommandStatus {
        let mut screen = ScriptedScreen::new(vec![Some(Keystroke::Enter)]);
        state.dispatch(line, &mut screen)
    }

    fn connected() -> (UiState, FakeHandle) {
        let (mut state, chat) = test_state();
        assert_eq!(run(&mut state, "\\connect"), CommandStatus::Success);
        chat.borrow_mut().sent.clear();
        state.status.unset_urgent();
        (state, chat)
    }

    #[test]
    fn test_connect_default_channel() {
        let (mut state, chat) = test_state();

        assert_eq!(run(&mut state, "\\CONNECT"), CommandStatus::Success);

        assert_eq!(state.status.visible().text, "Status: Connected to #mchat as tester");
        assert_eq!(chat.borrow().channel.as_deref(), Some("#mchat"));
        assert_eq!(chat.borrow().sent, [CONNECTED_NOTICE]);
        assert!(transcript_text(&state).contains("tester: <Connected>"));
    }

    #[test]
    fn test_connect_named_channel() {
        let (mut state, chat) = test_state();
        assert_eq!(run(&mut state, "\\connect #rust"), CommandStatus::Success);
        assert_eq!(chat.borrow().channel.as_deref(), Some("#rust"));
        assert_eq!(state.status.normal_text(), "Connected to #rust as tester");
    }

    #[test]
    fn test_connect_rejects_missing_hash() {
        let (mut state, chat) = test_state();
        assert_eq!(run(&mut state, "\\connect rust"), CommandStatus::Failure);
        assert_eq!(
            state.status.urgent_text(),
            "Channel names must start with the # symbol"
        );
        assert!(chat.borrow().channel.is_none());
    }

    #[test]
    fn test_connect_when_already_connected() {
        let (mut state, _) = connected();
        assert_eq!(run(&mut state, "\\connect #other"), CommandStatus::Failure);
        assert_eq!(state.status.urgent_text(), "Already connected to #mchat");
    }

    #[test]
    fn test_connect_failure() {
        let (mut state, chat) = test_state();
        chat.borrow_mut().fail_connect = true;
        assert_eq!(run(&mut state, "\\connect"), CommandStatus::Failure);
        assert_eq!(
            state.status.urgent_text(),
            "Could not connect to the requested channel"
        );
        assert_eq!(state.status.normal_text(), "Disconnected");
    }

    #[test]
    fn test_nick_reports_current() {
        let (mut state, _) = test_state();
        assert_eq!(run(&mut state, "\\nick"), CommandStatus::Success);
        assert_eq!(state.status.visible().text, "Status: Your nickname is tester");
    }

    #[test]
    fn test_nick_change_while_connected_broadcasts() {
        let (mut state, chat) = connected();

        assert_eq!(run(&mut state, "\\NICK newname"), CommandStatus::Success);

        assert_eq!(chat.borrow().nickname, "newname");
        assert_eq!(
            chat.borrow().sent,
            ["tester has changed their nickname to newname"]
        );
        assert_eq!(state.status.urgent_text(), "Your new nickname is newname");
        assert_eq!(state.status.normal_text(), "Connected to #mchat as newname");

        state.status.unset_urgent();
        assert_eq!(
            state.status.visible().text,
            "Status: Connected to #mchat as newname"
        );
    }

    #[test]
    fn test_nick_change_while_disconnected_is_quiet() {
        let (mut state, chat) = test_state();
        assert_eq!(run(&mut state, "\\nick bo"), CommandStatus::Success);
        assert!(chat.borrow().sent.is_empty());
        assert_eq!(state.status.normal_text(), "Disconnected");
    }

    #[test]
    fn test_nick_with_only_spaces_is_invalid() {
        let (mut state, chat) = test_state();
        assert_eq!(run(&mut state, "\\nick   "), CommandStatus::Failure);
        assert_eq!(state.status.urgent_text(), "\\NICK ERROR: Invalid Argument");
        assert_eq!(chat.borrow().nickname, "tester");
    }

    #[test]
    fn test_nick_rejects_long_name() {
        let (mut state, chat) = test_state();
        let line = format!("\\nick {}", "n".repeat(33));
        assert_eq!(run(&mut state, &line), CommandStatus::Failure);
        assert_eq!(state.status.urgent_text(), "\\NICK ERROR: Invalid Argument");
        assert_eq!(chat.borrow().nickname, "tester");
    }

    #[test]
    fn test_disconnect() {
        let (mut state, chat) = connected();

        assert_eq!(run(&mut state, "\\disconnect"), CommandStatus::Success);

        assert!(chat.borrow().channel.is_none());
        assert_eq!(chat.borrow().sent, [DISCONNECTED_NOTICE]);
        assert_eq!(state.status.urgent_text(), "Disconnected from #mchat");
        assert_eq!(state.status.normal_text(), "Disconnected");
        assert!(transcript_text(&state).contains("tester: <Disconnected>"));
    }

    #[test]
    fn test_disconnect_when_disconnected() {
        let (mut state, _) = test_state();
        assert_eq!(run(&mut state, "\\disconnect"), CommandStatus::Failure);
        assert_eq!(state.status.urgent_text(), "Already Disconnected!");
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let (mut state, _) = test_state();
        assert_eq!(run(&mut state, "\\quit"), CommandStatus::Success);
        assert!(!state.running);
    }

    #[test]
    fn test_clear_resets_transcript_and_input() {
        let (mut state, _) = connected();
        state.transcript.append("ana", "old news");

        assert_eq!(run(&mut state, "\\clear"), CommandStatus::Success);

        assert_eq!(state.transcript.cursor(), 1);
        assert!(!transcript_text(&state).contains("old news"));
        assert_eq!(state.editor.cursor(), (1, state.editor.col_start()));
        assert_eq!(state.status.urgent_text(), "Screen Cleared");
    }

    #[test]
    fn test_help_shows_modal_for_command() {
        let (mut state, _) = test_state();
        let mut screen = ScriptedScreen::new(vec![None, Some(Keystroke::Char('x'))]);

        let status = state.dispatch("\\help nick", &mut screen);

        assert_eq!(status, CommandStatus::Success);
        let modal = &screen.modal_frames[0];
        assert_eq!(modal.title, "Command Help: nick");
        assert_eq!(modal.extent, ModalExtent::Centered);
        let ModalBody::Text(lines) = &modal.body else {
            panic!("help should be text");
        };
        assert_eq!(lines[0], "Syntax: \\NICK [NEW_NICKNAME]");
    }

    #[test]
    fn test_help_defaults_to_itself_and_accepts_escaped_name() {
        let (mut state, _) = test_state();
        let mut screen = ScriptedScreen::new(vec![Some(Keystroke::Enter), Some(Keystroke::Enter)]);

        state.dispatch("\\help", &mut screen);
        state.dispatch("\\help \\quit", &mut screen);

        assert_eq!(screen.modal_frames[0].title, "Command Help: help");
        assert_eq!(screen.modal_frames[1].title, "Command Help: quit");
    }

    #[test]
    fn test_help_unknown_command() {
        let (mut state, _) = test_state();
        assert_eq!(run(&mut state, "\\help bogus"), CommandStatus::Failure);
        assert_eq!(
            state.status.urgent_text(),
            "\\HELP Could not find command bogus"
        );
    }

    #[test]
    fn test_modal_commands_propagate_resize() {
        for line in ["\\help", "\\list", "\\peerlist"] {
            let (mut state, _) = test_state();
            let mut screen = ScriptedScreen::new(vec![Some(Keystroke::Resize)]);
            assert_eq!(state.dispatch(line, &mut screen), CommandStatus::Resize, "{line}");
        }
    }

    #[test]
    fn test_list_table_has_every_command() {
        let (mut state, _) = test_state();
        let mut screen = ScriptedScreen::new(vec![Some(Keystroke::Enter)]);

        state.dispatch("\\list", &mut screen);

        let ModalBody::Table { headers, rows, .. } = &screen.modal_frames[0].body else {
            panic!("list should be a table");
        };
        assert_eq!(headers[0], "Command Name");
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], ["\\help", "\\HELP [COMMAND]", "Get help text for command"]);
        assert_eq!(rows[7][0], "\\peerlist");
    }

    #[test]
    fn test_peerlist_refreshes_while_open() {
        let (mut state, chat) = test_state();
        let mut screen = ScriptedScreen::new(vec![None, Some(Keystroke::Enter)]);
        chat.borrow_mut().peers.push(Peer {
            nickname: "ana".into(),
            channel: Some("#mchat".into()),
            last_seen: Utc::now(),
            source: IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)),
        });

        assert_eq!(state.dispatch("\\peerlist", &mut screen), CommandStatus::Success);
        assert_eq!(screen.modal_frames.len(), 2);
        let ModalBody::Table { rows, .. } = &screen.modal_frames[1].body else {
            panic!("peer list should be a table");
        };
        assert_eq!(rows[0][0], "ana (@10.0.0.7)");
    }

    #[test]
    fn test_peer_modal_rows() {
        let now = Utc::now();
        let peers = [
            Peer {
                nickname: "ana".into(),
                channel: Some("#mchat".into()),
                last_seen: now - chrono::Duration::seconds(12),
                source: IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)),
            },
            Peer {
                nickname: "bo".into(),
                channel: None,
                last_seen: now,
                source: IpAddr::V4(Ipv4Addr::new(192, 168, 1, 21)),
            },
        ];

        let modal = peer_modal(&peers, now);

        let ModalBody::Table { rows, .. } = modal.body else {
            panic!("peer list should be a table");
        };
        assert_eq!(rows[0], ["ana (@192.168.1.20)", "#mchat", "12 seconds ago"]);
        assert_eq!(rows[1], ["bo (@192.168.1.21)", "", "0 seconds ago"]);
    }
}
