//! Record display formatting
//!
//! Register view of extracted records for the terminal.

use crate::models::CanonicalRecord;

/// Format a single record as a register row
pub fn format_record_row(record: &CanonicalRecord) -> String {
    format!(
        "{} {} {} {:>12} {:7} {}",
        record.date.format("%Y-%m-%d"),
        record.time.format("%H:%M"),
        truncate(&record.name, 24),
        record.amount.to_string(),
        record.amount_type.to_string(),
        record.memo
    )
}

/// Format records as a register, showing at most `limit` of them
pub fn format_record_register(records: &[CanonicalRecord], limit: Option<usize>) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:5} {:24} {:>12} {:7} {}\n",
        "Date", "Time", "Name", "Amount", "Type", "Memo"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    let shown = limit.unwrap_or(records.len()).min(records.len());
    for record in &records[..shown] {
        output.push_str(&format_record_row(record));
        output.push('\n');
    }
    if shown < records.len() {
        output.push_str(&format!("... {} more\n", records.len() - shown));
    }

    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_aggregation;

    fn records() -> Vec<CanonicalRecord> {
        sample_aggregation()
            .records
            .into_iter()
            .map(|r| r.record)
            .collect()
    }

    #[test]
    fn test_format_record_row() {
        let row = format_record_row(&records()[1]);
        assert!(row.starts_with("2020-01-02 00:00 Shop, Inc."));
        assert!(row.contains("-10.00"));
        assert!(row.contains("out"));
    }

    #[test]
    fn test_register_limit() {
        let output = format_record_register(&records(), Some(1));
        assert!(output.contains("Refund"));
        assert!(!output.contains("Shop"));
        assert!(output.ends_with("... 1 more\n"));

        assert_eq!(format_record_register(&[], None), "No records found.\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc  ");
        assert_eq!(truncate("超市购物消费记录", 6), "超市购...");
    }
}
