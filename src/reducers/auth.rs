//! Session reducer: restore, login, logout.

use crate::messages::{Command, Message};
use crate::state::{AppState, ChatSessionState};
use crate::validation::validate_login_form;

/// Returns `true` when the message was handled by the auth reducer.
pub fn update(state: &mut AppState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    match msg {
        Message::SessionRestored(session) => {
            state.auth.restored = true;
            state.auth.is_loading = false;
            state.auth.session = session.clone();
            if session.is_some() {
                debug_log!("Restored stored session");
                cmds.push(Command::SendMessage(Message::LoadFeed));
            }
            true
        }
        Message::LoginRequested(credentials) => {
            let errors = validate_login_form(&credentials.username, &credentials.password);
            let valid = errors.is_valid();
            state.auth.form_errors = errors;
            if valid {
                state.auth.is_loading = true;
                state.auth.error = None;
                cmds.push(Command::Login(credentials.clone()));
            }
            true
        }
        Message::LoginSucceeded(session) => {
            state.auth.session = Some(session.clone());
            state.auth.restored = true;
            state.auth.is_loading = false;
            state.auth.error = None;
            state.auth.form_errors = Default::default();
            cmds.push(Command::PersistSession(session.clone()));
            cmds.push(Command::SendMessage(Message::LoadFeed));
            true
        }
        Message::LoginFailed(error) => {
            state.auth.session = None;
            state.auth.is_loading = false;
            state.auth.error = Some(error.clone());
            cmds.push(Command::ClearSession);
            true
        }
        Message::Logout => {
            state.auth.session = None;
            state.auth.restored = true;
            state.auth.is_loading = false;
            state.auth.error = None;
            state.chat = ChatSessionState::default();
            state.feed.reset();
            cmds.push(Command::DisconnectChat);
            cmds.push(Command::ClearSession);
            true
        }
        Message::DismissAuthError => {
            state.auth.error = None;
            true
        }
        _ => false,
    }
}
