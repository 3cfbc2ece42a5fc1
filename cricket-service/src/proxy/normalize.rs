//! Coalescing of the upstream's inconsistent JSON into stable fields.
//!
//! A field counts as present only when it is truthy in the JavaScript sense:
//! `null`, `false`, `0` and `""` are treated the same as a missing key.

use serde_json::Value;
use tracing::debug;

use super::Quiz;

pub const FALLBACK_ANSWER: &str = "I couldn't find an answer to that cricket question.";
pub const FALLBACK_FACT: &str = "Cricket is played in over 100 countries worldwide!";
pub const FALLBACK_JOKE: &str =
    "Why did the cricket team hire a baker? They needed someone who could handle a good roll!";

/// First truthy value among `fields`, in order
pub fn first_present<'a>(data: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| data.get(*field))
        .find(|value| is_truthy(value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings verbatim, anything else as its JSON text
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn coalesce_text(data: &Value, fields: &[&str], fallback: &str) -> String {
    first_present(data, fields)
        .map(text_of)
        .unwrap_or_else(|| fallback.to_string())
}

pub fn answer_text(data: &Value) -> String {
    coalesce_text(data, &["response", "answer"], FALLBACK_ANSWER)
}

pub fn fact_text(data: &Value) -> String {
    coalesce_text(data, &["fact", "response"], FALLBACK_FACT)
}

pub fn joke_text(data: &Value) -> String {
    coalesce_text(data, &["joke", "response"], FALLBACK_JOKE)
}

/// Quiz from `quiz` or `response` as sent; the built-in quiz when neither is present
pub fn quiz(data: &Value) -> Quiz {
    let Some(value) = first_present(data, &["quiz", "response"]) else {
        return Quiz::fallback();
    };

    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        debug!(error = %e, "Quiz payload kept as raw JSON");
        Quiz::Other(value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::QuizQuestion;
    use serde_json::json;

    #[test]
    fn test_response_preferred_over_answer() {
        let data = json!({"response": "first", "answer": "second"});
        assert_eq!(answer_text(&data), "first");
    }

    #[test]
    fn test_falsy_response_falls_through() {
        assert_eq!(answer_text(&json!({"response": "", "answer": "X"})), "X");
        assert_eq!(answer_text(&json!({"response": null, "answer": "X"})), "X");
        assert_eq!(answer_text(&json!({"response": 0})), FALLBACK_ANSWER);
    }

    #[test]
    fn test_non_object_body_uses_fallback() {
        assert_eq!(fact_text(&json!(["not", "an", "object"])), FALLBACK_FACT);
        assert_eq!(joke_text(&json!("plain")), FALLBACK_JOKE);
    }

    #[test]
    fn test_non_string_value_rendered_as_json() {
        assert_eq!(fact_text(&json!({"fact": 22})), "22");
    }

    #[test]
    fn test_quiz_text_and_structured() {
        assert_eq!(
            quiz(&json!({"quiz": "Who bowled the ball of the century?"})),
            Quiz::Text("Who bowled the ball of the century?".to_string())
        );

        let structured = quiz(&json!({
            "response": {
                "question": "How many balls in an over?",
                "options": ["4", "6", "8", "10"],
                "answer": "6"
            }
        }));
        assert_eq!(
            structured,
            Quiz::Structured(QuizQuestion {
                question: "How many balls in an over?".to_string(),
                options: vec!["4", "6", "8", "10"]
                    .into_iter()
                    .map(Value::from)
                    .collect(),
                answer: Some(Value::from("6")),
                extra: Default::default(),
            })
        );
    }

    #[test]
    fn test_missing_quiz_yields_first_world_cup_question() {
        let Quiz::Structured(fallback) = quiz(&json!({})) else {
            panic!("Expected structured fallback quiz");
        };
        assert_eq!(
            fallback.question,
            "Which country won the first Cricket World Cup?"
        );
        assert_eq!(
            fallback.options,
            vec![json!("England"), json!("Australia"), json!("West Indies"), json!("India")]
        );
        assert_eq!(fallback.answer, Some(json!("West Indies")));
    }

    #[test]
    fn test_upstream_quiz_with_numeric_answer_passes_through() {
        let sent = json!({
            "question": "How many stumps?",
            "options": ["2", "3"],
            "answer": 1,
            "explanation": "three"
        });
        let served = quiz(&json!({"quiz": sent.clone()}));

        assert_ne!(served, Quiz::fallback());
        assert_eq!(serde_json::to_value(&served).unwrap(), sent);
    }

    #[test]
    fn test_unusual_quiz_shapes_are_not_replaced() {
        assert_eq!(quiz(&json!({"quiz": 42})), Quiz::Other(json!(42)));
        assert_eq!(
            quiz(&json!({"quiz": {"title": "no question"}})),
            Quiz::Other(json!({"title": "no question"}))
        );
        assert_eq!(quiz(&json!({"quiz": false, "response": null})), Quiz::fallback());
    }
}
