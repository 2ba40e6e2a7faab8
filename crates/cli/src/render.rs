//! Plain-terminal rendering of answers.
//!
//! Text is printed as written (it is already light markdown). Tables become two
//! aligned columns; charts become a per-year listing of both series followed by
//! the break-even marker.

use advisor_agent::{ConversationEntry, Role};
use advisor_core::format::{one_decimal, usd};
use advisor_core::{Attachment, ChartData, QuickFacts, ResponsePayload, TableData};

pub fn payload(payload: &ResponsePayload) -> String {
    match &payload.attachment {
        None => payload.text.clone(),
        Some(Attachment::Table(data)) => format!("{}\n\n{}", payload.text, table(data)),
        Some(Attachment::Chart(data)) => format!("{}\n\n{}", payload.text, chart(data)),
    }
}

pub fn table(table: &TableData) -> String {
    let mut rows = vec![table.columns.clone()];
    rows.extend(table.rows.iter().map(|row| vec![row.metric.clone(), row.value.clone()]));
    align(&rows, true)
}

pub fn chart(chart: &ChartData) -> String {
    let mut header = vec![chart.x_label.clone()];
    header.extend(chart.series.iter().map(|series| series.label.clone()));

    let points = chart.series.iter().map(|series| series.points.len()).max().unwrap_or(0);
    let mut rows = vec![header];
    for index in 0..points {
        let x = chart
            .series
            .iter()
            .find_map(|series| series.points.get(index))
            .map(|point| point.x.to_string())
            .unwrap_or_default();
        let mut row = vec![x];
        for series in &chart.series {
            row.push(series.points.get(index).map(|point| usd(point.y)).unwrap_or_default());
        }
        rows.push(row);
    }

    let mut lines = vec![format!("{} ({})", chart.title, chart.y_label), align(&rows, true)];
    match &chart.marker {
        Some(marker) => lines.push(format!(
            "* {} at {} = {}",
            marker.label,
            chart.x_label.to_lowercase(),
            one_decimal(marker.x)
        )),
        None => lines.push("* No break-even point within reach".to_string()),
    }
    lines.join("\n")
}

pub fn quick_facts(facts: &QuickFacts) -> String {
    let rows = facts
        .facts
        .iter()
        .map(|fact| vec![format!("{}:", fact.label), fact.value.clone()])
        .collect::<Vec<_>>();

    let mut lines = vec![facts.title.clone(), align(&rows, false), String::new()];
    lines.push("Try asking:".to_string());
    lines.extend(facts.sample_questions.iter().map(|question| format!("- {question}")));
    lines.join("\n")
}

pub fn history(entries: &[ConversationEntry]) -> String {
    if entries.is_empty() {
        return "(no messages yet)".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let speaker = match entry.role {
                Role::User => "you",
                Role::Assistant => "advisor",
            };
            format!("[{speaker}] {}", entry.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Left-aligns every column to its widest cell. With `header`, the first row is
/// underlined.
fn align(rows: &[Vec<String>], header: bool) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths = (0..columns)
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let render_row = |row: &Vec<String>| {
        row.iter()
            .enumerate()
            .map(|(column, cell)| format!("{cell:<width$}", width = widths[column]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (index, row) in rows.iter().enumerate() {
        lines.push(render_row(row));
        if header && index == 0 {
            let rule = widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>();
            lines.push(rule.join("  "));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use advisor_agent::{AdvisorRuntime, Conversation};
    use advisor_core::{CaseAnalysis, QuickFacts};

    use super::{history, payload, quick_facts};

    #[test]
    fn text_answers_render_verbatim() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();
        let answer = runtime.handle_turn(&mut conversation, "hello");

        assert_eq!(payload(&answer), answer.text);
    }

    #[test]
    fn tables_render_as_aligned_columns() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();
        let answer = runtime.handle_turn(&mut conversation, "show me the numbers");

        let rendered = payload(&answer);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Here are the key numbers from the case study:");
        assert_eq!(lines[2], "Metric                    Value");
        assert_eq!(lines[3], "------------------------  -----------");
        assert_eq!(lines[4], "Current Labor Cost        $12,272,000");
        assert_eq!(lines[10], "Break-even Period         3.9 years");
    }

    #[test]
    fn charts_list_each_year_and_the_marker() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();
        let answer = runtime.handle_turn(&mut conversation, "when do we break even?");

        let rendered = payload(&answer);
        assert!(rendered.contains("Break-even Analysis (Dollars ($))"));
        assert!(rendered.contains("Years  Total Automation Costs  Total Labor Savings"));
        assert!(rendered.contains("0      $4,000,000              $0"));
        assert!(rendered.contains("5      $9,000,000              $10,075,000"));
        assert!(rendered.ends_with("* Break-even (3.9 years) at years = 3.9"));
    }

    #[test]
    fn quick_facts_list_sample_questions() {
        let rendered = quick_facts(&QuickFacts::from_analysis(&CaseAnalysis::default()));

        assert!(rendered.contains("Try asking:"));
        assert!(rendered.contains("3.9 years"));
    }

    #[test]
    fn history_labels_speakers() {
        let runtime = AdvisorRuntime::default();
        let mut conversation = Conversation::new();
        runtime.handle_turn(&mut conversation, "hello");

        let rendered = history(conversation.entries());
        assert!(rendered.starts_with("[you] hello\n[advisor] Hello!"));
        assert_eq!(history(&[]), "(no messages yet)");
    }
}
