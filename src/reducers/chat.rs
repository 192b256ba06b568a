//! Chat panel and message store reducer.
//!
//! The connection manager reports through `ChatMessageAppended`,
//! `ConnectionStatusChanged` and `ConnectionErrorSet`; everything else here
//! is a user action.

use crate::messages::{Command, Message};
use crate::state::AppState;
use crate::validation::validate_message;

/// Returns `true` when the message was handled by the chat reducer.
pub fn update(state: &mut AppState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    let chat = &mut state.chat;
    match msg {
        Message::OpenChatPanel => {
            chat.is_panel_open = true;
            cmds.push(Command::ConnectChat);
            true
        }
        Message::CloseChatPanel => {
            // The connection stays up while the panel is hidden.
            chat.is_panel_open = false;
            true
        }
        Message::ToggleChatPanel => {
            chat.is_panel_open = !chat.is_panel_open;
            if chat.is_panel_open {
                cmds.push(Command::ConnectChat);
            }
            true
        }
        Message::ClearChatMessages => {
            chat.messages.clear();
            true
        }
        Message::ChatDraftChanged(text) => {
            chat.draft = text.clone();
            chat.draft_error = None;
            true
        }
        Message::SubmitChatDraft => {
            match validate_message(&chat.draft) {
                Ok(text) => {
                    chat.draft_error = None;
                    cmds.push(Command::SendChat(text.to_string()));
                }
                Err(err) => chat.draft_error = Some(err.to_string()),
            }
            true
        }
        Message::ChatTextSent => {
            chat.draft.clear();
            chat.draft_error = None;
            true
        }
        Message::ChatSendFailed(error) => {
            chat.draft_error = Some(error.clone());
            true
        }
        Message::ReconnectChat => {
            chat.connection_error = None;
            cmds.push(Command::ConnectChat);
            true
        }
        Message::DismissChatError => {
            chat.connection_error = None;
            true
        }
        Message::DismissDraftError => {
            chat.draft_error = None;
            true
        }
        Message::ChatMessageAppended(message) => {
            chat.messages.push(message.clone());
            true
        }
        Message::ConnectionStatusChanged(connected) => {
            chat.is_connected = *connected;
            if *connected {
                chat.connection_error = None;
            }
            true
        }
        Message::ConnectionErrorSet(error) => {
            // Clearing the error says nothing about the connection itself.
            if error.is_some() {
                chat.is_connected = false;
            }
            chat.connection_error = error.clone();
            true
        }
        _ => false,
    }
}
