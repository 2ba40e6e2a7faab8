use advisor_agent::{AdvisorRuntime, Conversation};
use advisor_core::Topic;

use super::CommandResult;
use crate::render;

/// One question, one answer. The conversation lives only for this call.
pub fn run(question: &str, topic: Option<Topic>, json_output: bool) -> CommandResult {
    let runtime = AdvisorRuntime::default();
    let mut conversation = Conversation::new();

    let payload = match topic {
        Some(topic) => runtime.handle_topic_turn(&mut conversation, topic, question),
        None => runtime.handle_turn(&mut conversation, question),
    };

    if !json_output {
        return CommandResult::output(render::payload(&payload));
    }

    match serde_json::to_string_pretty(&payload) {
        Ok(output) => CommandResult::output(output),
        Err(error) => CommandResult::failure("ask", "serialization", error.to_string(), 1),
    }
}
