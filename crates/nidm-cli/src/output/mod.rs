use serde_json::Value;

use crate::cli::OutputFormat;
use crate::summary::RunSummary;
use crate::ui;

pub mod table;

/// Render the run summary in the requested format.
pub fn render(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Table => render_table(summary),
        OutputFormat::Raw => Ok(serde_json::to_string(summary)?),
    }
}

/// Print the run summary to stdout.
pub fn output(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(summary, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(summary: &RunSummary) -> anyhow::Result<String> {
    let options = table_options();

    let mut rows = match serde_json::to_value(&summary.totals)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| vec![key, value_to_cell(&value)])
            .collect::<Vec<_>>(),
        other => vec![vec![String::from("totals"), value_to_cell(&other)]],
    };
    rows.push(vec![String::from("report"), optional_cell(summary.report.as_deref())]);
    rows.push(vec![
        String::from("aggregate"),
        optional_cell(summary.aggregate.as_deref()),
    ]);
    let totals = table::render_entity_table(&["key", "value"], &rows, options);

    if summary.subjects.is_empty() {
        return Ok(format!("{totals}\n\n(no subjects)"));
    }

    let headers = ["subject", "status", "resolved", "unresolved", "output"];
    let subject_rows = summary
        .subjects
        .iter()
        .map(|row| {
            vec![
                row.subject.clone(),
                row.status.to_string(),
                row.resolved.map_or_else(|| String::from("-"), |n| n.to_string()),
                row.unresolved.map_or_else(|| String::from("-"), |n| n.to_string()),
                optional_cell(row.output.as_deref()),
            ]
        })
        .collect::<Vec<_>>();
    let subjects = table::render_entity_table(&headers, &subject_rows, options);

    Ok(format!("{totals}\n\n{subjects}"))
}

fn optional_cell(value: Option<&str>) -> String {
    value.map_or_else(|| String::from("-"), ToString::to_string)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
