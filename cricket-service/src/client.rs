//! Conversation client for the cricket chat.
//!
//! Owns the message log and turn-taking for one session. The state machine in
//! [`transition`] is pure; [`ConversationClient`] executes its effects.
//! At most one request is outstanding at a time.

pub mod backend;
pub mod commands;
pub mod dispatcher;
pub mod state;
pub mod transition;

pub use backend::{ClientError, HttpProxyApi, ProxyApi};
pub use dispatcher::{ConversationClient, ConversationView};
pub use state::{ChatMessage, ConversationState, Phase, SAMPLE_QUESTIONS, Sender, Topic};
pub use transition::{Event, UserAction};
