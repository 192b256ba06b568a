// src/messages.rs
//
// Everything that can happen in the UI, plus the side effects the reducers
// ask for.
//
use crate::feed::cache::RequestTag;
use crate::models::{AuthSession, ChatMessage, Credentials, FeedKind, FeedPage, Theme};

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Session
    SessionRestored(Option<AuthSession>),
    LoginRequested(Credentials),
    LoginSucceeded(AuthSession),
    LoginFailed(String),
    Logout,
    DismissAuthError,

    // Theme
    ThemeLoaded(Theme),
    ToggleTheme,

    // Chat panel (user actions)
    OpenChatPanel,
    CloseChatPanel,
    ToggleChatPanel,
    ClearChatMessages,
    ChatDraftChanged(String),
    SubmitChatDraft,
    ChatTextSent,
    ChatSendFailed(String),
    ReconnectChat,
    DismissChatError,
    DismissDraftError,

    // Emitted by the connection manager
    ChatMessageAppended(ChatMessage),
    ConnectionStatusChanged(bool),
    ConnectionErrorSet(Option<String>),

    // Feed
    LoadFeed,
    SwitchFeedKind(FeedKind),
    LoadMoreRequested,
    RefreshFeed,
    RetryFeed,
    PageLoaded { tag: RequestTag, page: FeedPage },
    PageFailed { tag: RequestTag, error: String },
}

/// Side effects returned by the reducers and run by
/// [`crate::command_executors::execute`] once state is released.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Chain another message to be processed
    SendMessage(Message),
    /// Fetch one feed page; the tag comes back with the result.
    FetchPage(RequestTag),
    /// Run the (mock) login round-trip.
    Login(Credentials),
    PersistSession(AuthSession),
    ClearSession,
    PersistTheme(Theme),
    ConnectChat,
    DisconnectChat,
    SendChat(String),
}
