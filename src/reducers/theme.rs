use crate::messages::{Command, Message};
use crate::state::AppState;

pub fn update(state: &mut AppState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    match msg {
        Message::ThemeLoaded(theme) => {
            state.theme = *theme;
            true
        }
        Message::ToggleTheme => {
            state.theme = state.theme.toggled();
            cmds.push(Command::PersistTheme(state.theme));
            true
        }
        _ => false,
    }
}
