// src/update.rs
//
use crate::messages::{Command, Message};
use crate::state::AppState;

/// Route `msg` to the sub-reducer that owns it.  Returns `true` when state
/// may have changed and the view should be re-rendered.
pub fn update(state: &mut AppState, msg: Message, commands: &mut Vec<Command>) -> bool {
    if crate::reducers::auth::update(state, &msg, commands) {
        return true;
    }
    if crate::reducers::theme::update(state, &msg, commands) {
        return true;
    }
    if crate::reducers::chat::update(state, &msg, commands) {
        return true;
    }
    if crate::reducers::feed::update(state, &msg, commands) {
        return true;
    }

    debug_log!("Unhandled message: {:?}", msg);
    false
}
