use advisor_core::{CaseAnalysis, QuickFacts};

use super::CommandResult;
use crate::render;

pub fn run(json_output: bool) -> CommandResult {
    let facts = QuickFacts::from_analysis(&CaseAnalysis::default());

    if !json_output {
        return CommandResult::output(render::quick_facts(&facts));
    }

    match serde_json::to_string_pretty(&facts) {
        Ok(output) => CommandResult::output(output),
        Err(error) => CommandResult::failure("facts", "serialization", error.to_string(), 1),
    }
}
