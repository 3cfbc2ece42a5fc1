//! In-memory conversation state for one chat session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::proxy::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry in the conversation log; never modified after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Question category, sent upstream as `query_type`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[default]
    General,
    Rules,
    Players,
    History,
    Statistics,
    Techniques,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::General,
        Topic::Rules,
        Topic::Players,
        Topic::History,
        Topic::Statistics,
        Topic::Techniques,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::General => "general",
            Topic::Rules => "rules",
            Topic::Players => "players",
            Topic::History => "history",
            Topic::Statistics => "statistics",
            Topic::Techniques => "techniques",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == wanted)
            .ok_or_else(|| format!("Unknown topic: {}", s.trim()))
    }
}

/// Starter prompt offered before the first message
#[derive(Debug, Clone, Copy)]
pub struct SampleQuestion {
    pub title: &'static str,
    pub question: &'static str,
}

pub const SAMPLE_QUESTIONS: [SampleQuestion; 6] = [
    SampleQuestion {
        title: "Cricket Rules",
        question: "What is the LBW rule in cricket?",
    },
    SampleQuestion {
        title: "Player Stats",
        question: "Tell me about Virat Kohli's career highlights",
    },
    SampleQuestion {
        title: "Game Formats",
        question: "What's the difference between Test and ODI cricket?",
    },
    SampleQuestion {
        title: "Scoring System",
        question: "How is cricket scoring calculated?",
    },
    SampleQuestion {
        title: "Field Positions",
        question: "What are the basic cricket fielding positions?",
    },
    SampleQuestion {
        title: "Records",
        question: "Who holds the record for most runs in Test cricket?",
    },
];

/// What the outstanding request was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Question,
    Quick(Resource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A request is out, or its reply is waiting out the typing delay
    AwaitingReply { turn: Turn, reply_scheduled: bool },
}

#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
    pending_input: String,
    topic: Topic,
    phase: Phase,
    next_seq: u64,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            pending_input: String::new(),
            topic: Topic::default(),
            phase: Phase::Idle,
            next_seq: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.phase, Phase::AwaitingReply { .. })
    }

    pub(super) fn set_pending_input(&mut self, text: String) {
        self.pending_input = text;
    }

    pub(super) fn clear_pending_input(&mut self) {
        self.pending_input.clear();
    }

    pub(super) fn set_topic(&mut self, topic: Topic) {
        self.topic = topic;
    }

    pub(super) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Append a message; ids are time-derived plus a per-session sequence
    pub(super) fn push_message(&mut self, sender: Sender, content: String, now: DateTime<Utc>) {
        let id = format!("{}-{}", now.timestamp_millis(), self.next_seq);
        self.next_seq += 1;
        self.messages.push(ChatMessage {
            id,
            content,
            sender,
            timestamp: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_parsing() {
        assert_eq!("rules".parse::<Topic>().unwrap(), Topic::Rules);
        assert_eq!(" Statistics ".parse::<Topic>().unwrap(), Topic::Statistics);
        assert!("weather".parse::<Topic>().is_err());
        assert_eq!(Topic::default(), Topic::General);
    }

    #[test]
    fn test_topic_serializes_lowercase() {
        let json = serde_json::to_string(&Topic::Techniques).unwrap();
        assert_eq!(json, r#""techniques""#);
    }

    #[test]
    fn test_message_ids_unique_within_same_millisecond() {
        let mut state = ConversationState::new();
        let now = Utc::now();
        state.push_message(Sender::User, "a".to_string(), now);
        state.push_message(Sender::Assistant, "b".to_string(), now);

        let ids: Vec<_> = state.messages().iter().map(|m| m.id.as_str()).collect();
        assert_ne!(ids[0], ids[1]);
    }
}
