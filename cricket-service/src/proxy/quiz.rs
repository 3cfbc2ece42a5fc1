use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Quiz payload as served by `/api/cricket-quiz`
///
/// Whatever the upstream sent is kept as-is; the variants only decide how
/// the chat renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quiz {
    Text(String),
    Structured(QuizQuestion),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    /// Upstream fields with no meaning here, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quiz {
    /// Built-in quiz served when the upstream gives nothing usable
    pub fn fallback() -> Self {
        Quiz::Structured(QuizQuestion {
            question: "Which country won the first Cricket World Cup?".to_string(),
            options: ["England", "Australia", "West Indies", "India"]
                .into_iter()
                .map(Value::from)
                .collect(),
            answer: Some(Value::from("West Indies")),
            extra: Map::new(),
        })
    }

    /// Chat text for the quiz; the answer is never revealed
    pub fn render(&self) -> String {
        match self {
            Quiz::Text(text) => text.clone(),
            Quiz::Structured(q) => {
                let options = q
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, opt)| format!("{}. {}", i + 1, plain_text(opt)))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}\n\nOptions:\n{}", q.question, options)
            }
            Quiz::Other(value) => plain_text(value),
        }
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_numbers_options() {
        let rendered = Quiz::fallback().render();
        assert_eq!(
            rendered,
            "Which country won the first Cricket World Cup?\n\nOptions:\n1. England\n2. Australia\n3. West Indies\n4. India"
        );
        assert!(!rendered.contains("Answer"));
    }

    #[test]
    fn test_structured_quiz_round_trips_through_api_shape() {
        let json = serde_json::to_value(Quiz::fallback()).unwrap();
        assert_eq!(json["question"], "Which country won the first Cricket World Cup?");
        assert_eq!(json["options"][2], "West Indies");
        assert_eq!(json["answer"], "West Indies");

        let text: Quiz = serde_json::from_str(r#""Name a left-arm spinner""#).unwrap();
        assert_eq!(text.render(), "Name a left-arm spinner");
    }

    #[test]
    fn test_numeric_options_and_extra_fields_survive() {
        let raw = serde_json::json!({
            "question": "How many stumps?",
            "options": [2, "3"],
            "answer": 1,
            "explanation": "three"
        });
        let quiz: Quiz = serde_json::from_value(raw.clone()).unwrap();

        assert!(matches!(quiz, Quiz::Structured(_)));
        assert_eq!(serde_json::to_value(&quiz).unwrap(), raw);
        assert_eq!(quiz.render(), "How many stumps?\n\nOptions:\n1. 2\n2. 3");
    }

    #[test]
    fn test_question_less_object_kept_verbatim() {
        let raw = serde_json::json!({"title": "no question"});
        let quiz: Quiz = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(quiz, Quiz::Other(raw));
    }
}
