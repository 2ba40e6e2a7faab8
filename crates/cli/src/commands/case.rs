use advisor_core::CaseAnalysis;

use super::CommandResult;

pub fn run() -> CommandResult {
    let analysis = CaseAnalysis::default();
    if let Err(error) = analysis.case.validate() {
        return CommandResult::failure("case", "case_validation", error.to_string(), 2);
    }

    match serde_json::to_string_pretty(&analysis) {
        Ok(output) => CommandResult::output(output),
        Err(error) => CommandResult::failure("case", "serialization", error.to_string(), 1),
    }
}
