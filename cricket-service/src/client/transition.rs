//! Pure state transitions for the conversation client.
//!
//! `transition` never performs I/O; it returns the effects the dispatcher
//! must carry out.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::i18n::I18n;
use crate::proxy::{Quiz, Resource};

use super::backend::ClientError;
use super::state::{ConversationState, Phase, SAMPLE_QUESTIONS, Sender, Topic, Turn};

/// Input from the person using the chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SubmitQuestion(String),
    /// Submit whatever is in the input box
    SubmitPending,
    QuickAction(Resource),
    SelectTopic(Topic),
    EditInput(String),
    PickSample(usize),
}

/// Successful proxy result, before client-side rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Answer(String),
    Fact(String),
    Joke(String),
    Quiz(Option<Quiz>),
}

#[derive(Debug)]
pub enum Event {
    UserAction(UserAction),
    OperationCompleted(Result<Payload, ClientError>),
    /// The typing delay for a finished operation has elapsed
    ReplyDue(String),
}

/// Outbound call to the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Ask { question: String, topic: Topic },
    Fetch(Resource),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Call(Request),
    ScheduleReply { text: String, delay: Duration },
    ScrollToBottom,
}

/// Inputs to a transition besides the state and event
pub struct TransitionContext<'a> {
    pub i18n: &'a I18n,
    pub now: DateTime<Utc>,
    pub reply_delay: Duration,
}

pub fn transition(
    state: &mut ConversationState,
    event: Event,
    ctx: &TransitionContext<'_>,
) -> Vec<Effect> {
    match event {
        Event::UserAction(action) => on_user_action(state, action, ctx),
        Event::OperationCompleted(outcome) => on_completed(state, outcome, ctx),
        Event::ReplyDue(text) => on_reply_due(state, text, ctx),
    }
}

fn on_user_action(
    state: &mut ConversationState,
    action: UserAction,
    ctx: &TransitionContext<'_>,
) -> Vec<Effect> {
    match action {
        UserAction::SubmitQuestion(text) => submit(state, text, ctx),
        UserAction::SubmitPending => {
            if state.is_awaiting_reply() {
                return vec![];
            }
            let text = state.pending_input().to_string();
            submit(state, text, ctx)
        }
        UserAction::QuickAction(resource) => {
            if state.is_awaiting_reply() {
                return vec![];
            }
            state.set_phase(Phase::AwaitingReply {
                turn: Turn::Quick(resource),
                reply_scheduled: false,
            });
            vec![Effect::Call(Request::Fetch(resource)), Effect::ScrollToBottom]
        }
        UserAction::SelectTopic(topic) => {
            state.set_topic(topic);
            vec![]
        }
        UserAction::EditInput(text) => {
            state.set_pending_input(text);
            vec![]
        }
        UserAction::PickSample(index) => {
            if let Some(sample) = SAMPLE_QUESTIONS.get(index) {
                state.set_pending_input(sample.question.to_string());
            }
            vec![]
        }
    }
}

fn submit(state: &mut ConversationState, text: String, ctx: &TransitionContext<'_>) -> Vec<Effect> {
    let question = text.trim();
    if question.is_empty() || state.is_awaiting_reply() {
        return vec![];
    }
    let question = question.to_string();

    state.push_message(Sender::User, question.clone(), ctx.now);
    state.clear_pending_input();
    state.set_phase(Phase::AwaitingReply {
        turn: Turn::Question,
        reply_scheduled: false,
    });

    vec![
        Effect::Call(Request::Ask {
            question,
            topic: state.topic(),
        }),
        Effect::ScrollToBottom,
    ]
}

fn on_completed(
    state: &mut ConversationState,
    outcome: Result<Payload, ClientError>,
    ctx: &TransitionContext<'_>,
) -> Vec<Effect> {
    let Phase::AwaitingReply {
        turn,
        reply_scheduled: false,
    } = state.phase()
    else {
        return vec![];
    };

    let text = match outcome {
        Ok(payload) => reply_text(turn, payload, ctx.i18n),
        Err(e) => {
            tracing::debug!(error = %e, "Chat turn failed");
            apology(turn, ctx.i18n)
        }
    };

    state.set_phase(Phase::AwaitingReply {
        turn,
        reply_scheduled: true,
    });
    vec![Effect::ScheduleReply {
        text,
        delay: ctx.reply_delay,
    }]
}

fn on_reply_due(
    state: &mut ConversationState,
    text: String,
    ctx: &TransitionContext<'_>,
) -> Vec<Effect> {
    if !matches!(
        state.phase(),
        Phase::AwaitingReply {
            reply_scheduled: true,
            ..
        }
    ) {
        return vec![];
    }

    state.push_message(Sender::Assistant, text, ctx.now);
    state.set_phase(Phase::Idle);
    vec![Effect::ScrollToBottom]
}

fn reply_text(turn: Turn, payload: Payload, i18n: &I18n) -> String {
    let text = match payload {
        Payload::Answer(text) | Payload::Fact(text) | Payload::Joke(text) => text,
        Payload::Quiz(quiz) => quiz.map(|q| q.render()).unwrap_or_default(),
    };
    if !text.is_empty() {
        return text;
    }

    match turn {
        Turn::Question => i18n.get("en", "chat-ask-empty", None),
        Turn::Quick(_) => i18n.get("en", "chat-quick-empty", None),
    }
}

fn apology(turn: Turn, i18n: &I18n) -> String {
    match turn {
        Turn::Question => i18n.get("en", "chat-ask-failed", None),
        Turn::Quick(resource) => {
            i18n.format("en", "chat-quick-failed", &[("action", resource.as_str())])
        }
    }
}
