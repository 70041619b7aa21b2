//! Rendering of exploration results for people and for other programs.

use crate::types::{ExplorationResult, Machine};
use serde::Serialize;

/// Renders `result` as the plain-text trace report.
pub fn render_text(machine: &Machine, input: &str, result: &ExplorationResult) -> String {
    let depth = result.depth();
    let header = format!(
        "Machine: {}\nInput: {}\nDepth: {}\nTotal transitions: {}\n\n",
        machine.name,
        input,
        depth,
        result.total_transitions()
    );

    let body = match result {
        ExplorationResult::Accepted { path, .. } => {
            let lines: String = path.iter().map(|config| format!("  {config}\n")).collect();
            format!("String accepted in {depth} steps\nAccepting path:\n{lines}")
        }
        ExplorationResult::Rejected { .. } => format!("String rejected in {depth} steps\n"),
        ExplorationResult::TimedOut { .. } => format!("String timed out after {depth} steps\n"),
        ExplorationResult::Exhausted { .. } => {
            format!("Search exhausted the configuration budget at depth {depth}\n")
        }
    };

    header + &body
}

#[derive(Serialize)]
struct JsonReport<'a> {
    machine: &'a str,
    input: &'a str,
    #[serde(flatten)]
    result: &'a ExplorationResult,
}

/// Renders `result` as a single JSON document.
pub fn render_json(
    machine: &Machine,
    input: &str,
    result: &ExplorationResult,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        machine: &machine.name,
        input,
        result,
    })
}
