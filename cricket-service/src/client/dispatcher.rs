//! Single-threaded event loop driving the conversation state machine.
//!
//! Network calls and the typing delay run as spawned tasks that only post
//! events back; all state changes happen here, one event at a time.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::i18n::I18n;
use crate::proxy::Resource;

use super::backend::ProxyApi;
use super::state::ConversationState;
use super::transition::{Effect, Event, Payload, Request, TransitionContext, UserAction, transition};

/// Whatever displays the conversation
pub trait ConversationView: Send {
    /// Called after every processed event
    fn render(&mut self, state: &ConversationState);

    fn scroll_to_bottom(&mut self) {}
}

pub struct ConversationClient<A, V> {
    state: ConversationState,
    api: Arc<A>,
    view: V,
    i18n: Arc<I18n>,
    reply_delay: Duration,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl<A: ProxyApi, V: ConversationView> ConversationClient<A, V> {
    pub fn new(api: A, view: V, i18n: Arc<I18n>, reply_delay: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: ConversationState::new(),
            api: Arc::new(api),
            view,
            i18n,
            reply_delay,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Apply one event and carry out its effects
    pub fn dispatch(&mut self, event: Event) {
        let ctx = TransitionContext {
            i18n: &self.i18n,
            now: Utc::now(),
            reply_delay: self.reply_delay,
        };
        let effects = transition(&mut self.state, event, &ctx);

        for effect in effects {
            match effect {
                Effect::Call(request) => self.spawn_call(request),
                Effect::ScheduleReply { text, delay } => self.spawn_reply_timer(text, delay),
                Effect::ScrollToBottom => self.view.scroll_to_bottom(),
            }
        }
        self.view.render(&self.state);
    }

    pub fn submit(&mut self, action: UserAction) {
        self.dispatch(Event::UserAction(action));
    }

    /// Process completions and timers until no turn is outstanding
    pub async fn settle(&mut self) {
        while self.state.is_awaiting_reply() {
            match self.events_rx.recv().await {
                Some(event) => self.dispatch(event),
                None => break,
            }
        }
    }

    /// Run until `actions` closes and the last turn has finished
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>) -> ConversationState {
        let mut actions_open = true;

        while actions_open || self.state.is_awaiting_reply() {
            tokio::select! {
                action = actions.recv(), if actions_open => match action {
                    Some(action) => self.submit(action),
                    None => actions_open = false,
                },
                Some(event) = self.events_rx.recv() => self.dispatch(event),
            }
        }

        debug!(messages = self.state.messages().len(), "Conversation ended");
        self.state
    }

    fn spawn_call(&self, request: Request) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let outcome = match request {
                Request::Ask { question, topic } => {
                    api.ask(&question, topic).await.map(Payload::Answer)
                }
                Request::Fetch(Resource::Fact) => {
                    api.fetch_text(Resource::Fact).await.map(Payload::Fact)
                }
                Request::Fetch(Resource::Joke) => {
                    api.fetch_text(Resource::Joke).await.map(Payload::Joke)
                }
                Request::Fetch(Resource::Quiz) => api.quiz().await.map(Payload::Quiz),
            };
            // The receiver only goes away with the client itself
            let _ = tx.send(Event::OperationCompleted(outcome));
        });
    }

    fn spawn_reply_timer(&self, text: String, delay: Duration) {
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::ReplyDue(text));
        });
    }
}
