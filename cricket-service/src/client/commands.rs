//! Line-oriented input for the terminal chat.

use crate::proxy::Resource;

use super::state::{SAMPLE_QUESTIONS, Topic};
use super::transition::UserAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(UserAction),
    ShowSamples,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type a question and press enter to ask it.
  /fact            quick cricket fact
  /joke            cricket joke
  /quiz            cricket quiz
  /topic <name>    general, rules, players, history, statistics, techniques
  /samples         list sample questions
  /sample <n>      put sample question n in the input; press enter to send
  /help            this text
  /quit            leave";

/// Parse one line typed by the user
///
/// An empty line sends whatever is waiting in the input box.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Action(if line.is_empty() {
            UserAction::SubmitPending
        } else {
            UserAction::SubmitQuestion(line.to_string())
        }));
    };

    let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    let arg = arg.trim();

    match name {
        "fact" => Ok(Command::Action(UserAction::QuickAction(Resource::Fact))),
        "joke" => Ok(Command::Action(UserAction::QuickAction(Resource::Joke))),
        "quiz" => Ok(Command::Action(UserAction::QuickAction(Resource::Quiz))),
        "topic" => arg
            .parse::<Topic>()
            .map(|topic| Command::Action(UserAction::SelectTopic(topic))),
        "samples" => Ok(Command::ShowSamples),
        "sample" => {
            let index = arg
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=SAMPLE_QUESTIONS.len()).contains(n))
                .ok_or_else(|| format!("Pick a sample between 1 and {}", SAMPLE_QUESTIONS.len()))?;
            Ok(Command::Action(UserAction::PickSample(index - 1)))
        }
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command: /{}", other)),
    }
}
