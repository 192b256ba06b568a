//! Feed reducer.  Every path that can start a request goes through the
//! cache, which decides whether a request is actually issued.

use crate::feed::cache::RequestTag;
use crate::messages::{Command, Message};
use crate::state::AppState;

fn fetch(cmds: &mut Vec<Command>, tag: Option<RequestTag>) {
    if let Some(tag) = tag {
        cmds.push(Command::FetchPage(tag));
    }
}

/// Returns `true` when the message was handled by the feed reducer.
pub fn update(state: &mut AppState, msg: &Message, cmds: &mut Vec<Command>) -> bool {
    let feed = &mut state.feed;
    match msg {
        Message::LoadFeed => {
            if feed.visible_items().is_empty() {
                fetch(cmds, feed.request_page(0));
            }
            true
        }
        Message::SwitchFeedKind(kind) => {
            fetch(cmds, feed.switch_kind(*kind));
            true
        }
        Message::LoadMoreRequested => {
            fetch(cmds, feed.load_more());
            true
        }
        Message::RefreshFeed => {
            fetch(cmds, feed.refresh());
            true
        }
        Message::RetryFeed => {
            fetch(cmds, feed.retry());
            true
        }
        Message::PageLoaded { tag, page } => {
            let outcome = feed.complete(*tag, page.clone());
            debug_log!(
                "Feed: {} -> {:?} ({} items visible)",
                tag.request.cache_key(),
                outcome,
                feed.visible_items().len()
            );
            true
        }
        Message::PageFailed { tag, error } => {
            feed.fail(*tag, error.clone());
            true
        }
        _ => false,
    }
}
