//! Run summary display
//!
//! Renders the extraction log and the aggregation totals as terminal tables.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::report::{ExtractLog, GroupEntry, LogMessage};
use crate::services::Aggregation;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Bill Group")]
    group: String,
    #[tabled(rename = "Bill File")]
    file: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Messages")]
    message: String,
}

#[derive(Tabled)]
struct TotalsRow {
    #[tabled(rename = "Aggregation")]
    name: String,
    #[tabled(rename = "Records")]
    count: usize,
    #[tabled(rename = "Inbound")]
    inbound: String,
    #[tabled(rename = "Outbound")]
    outbound: String,
}

fn message_text(message: &LogMessage) -> String {
    format!("[{}] {}", message.level, message.text)
}

/// Lay out one group as table rows
///
/// The group name is only written on its first row, a file name only on
/// the first row of that file.
fn group_rows(group: &GroupEntry) -> Vec<LogRow> {
    let mut rows = Vec::new();

    for file in &group.files {
        let items = file.records.map(|n| n.to_string()).unwrap_or_default();
        if file.messages.is_empty() {
            rows.push(LogRow {
                group: String::new(),
                file: file.file.clone(),
                items,
                message: String::new(),
            });
            continue;
        }
        for (i, message) in file.messages.iter().enumerate() {
            rows.push(LogRow {
                group: String::new(),
                file: if i == 0 { file.file.clone() } else { String::new() },
                items: if i == 0 { items.clone() } else { String::new() },
                message: message_text(message),
            });
        }
    }

    for (i, message) in group.messages.iter().enumerate() {
        rows.push(LogRow {
            group: String::new(),
            file: if i == 0 { "N/A".into() } else { String::new() },
            items: String::new(),
            message: message_text(message),
        });
    }

    if rows.is_empty() {
        rows.push(LogRow {
            group: String::new(),
            file: String::new(),
            items: String::new(),
            message: String::new(),
        });
    }
    rows[0].group = group.account.clone();
    rows
}

/// Format the extraction log as a table, followed by the completion line
pub fn format_extract_summary(log: &ExtractLog) -> String {
    let rows: Vec<LogRow> = log.groups().iter().flat_map(group_rows).collect();

    let mut output = String::new();
    if !rows.is_empty() {
        output.push_str(&Table::new(rows).with(Style::psql()).to_string());
        output.push('\n');
    }
    output.push_str(&log.counts().completion_message());
    output.push('\n');
    output
}

/// Format the totals of each aggregation as a table
pub fn format_aggregation_totals(aggregations: &[Aggregation]) -> String {
    let rows: Vec<TotalsRow> = aggregations
        .iter()
        .map(|a| {
            let totals = a.totals();
            TotalsRow {
                name: a.name.clone(),
                count: totals.count,
                inbound: totals.inbound.to_string(),
                outbound: totals.outbound.to_string(),
            }
        })
        .collect();

    if rows.is_empty() {
        return "No aggregations.\n".to_string();
    }
    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}
