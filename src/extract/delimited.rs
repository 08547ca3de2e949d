//! Delimited text (CSV) loading

use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::debug;

use crate::config::TabularFileConfig;
use crate::error::{BillAggError, BillAggResult};

use super::tabular::LoadedRows;
use super::ExtractNotice;

/// Files narrower than this are not bills
pub const MIN_BILL_COLUMNS: usize = 3;

/// Read a delimited text file into raw rows
pub fn load_rows(path: &Path, config: &TabularFileConfig) -> BillAggResult<LoadedRows> {
    let bytes = fs::read(path)?;
    let mut notices = Vec::new();

    let encoding = match config.encoding.as_deref() {
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| BillAggError::Config(format!("unknown encoding: {}", label)))?,
        None => {
            let encoding = detect_encoding(&bytes);
            notices.push(ExtractNotice::EncodingDetected {
                encoding: encoding.name().to_string(),
            });
            encoding
        }
    };
    let text = decode(&bytes, encoding)?;

    let mut loaded = parse_rows(&text, config.delimiter_byte()?)?;
    notices.append(&mut loaded.notices);
    loaded.notices = notices;
    Ok(loaded)
}

/// Guess the encoding of raw file content
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode file content, failing on malformed input
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> BillAggResult<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(BillAggError::Csv(format!(
            "file is not valid {} text",
            used.name()
        )));
    }
    debug!("decoded {} bytes as {}", bytes.len(), used.name());
    Ok(text.into_owned())
}

/// Split decoded text into rows and drop rows of inconsistent width
///
/// The widest row sets the file's width. Rows of any other width are
/// dropped and counted in a notice, blank lines included.
pub fn parse_rows(text: &str, delimiter: u8) -> BillAggResult<LoadedRows> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let rows = reader
        .records()
        .map(|record| Ok(record?.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<BillAggResult<Vec<_>>>()?;

    Ok(trim_to_width(rows, count_blank_lines(text)))
}

/// Count empty lines outside quoted fields
///
/// The csv reader skips them without yielding a record.
fn count_blank_lines(text: &str) -> usize {
    let mut in_quotes = false;
    let mut blank = 0;
    for line in text.lines() {
        if line.is_empty() && !in_quotes {
            blank += 1;
        }
        if line.matches('"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
    }
    blank
}

fn trim_to_width(rows: Vec<Vec<String>>, blank_lines: usize) -> LoadedRows {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if column_count < MIN_BILL_COLUMNS {
        debug!("widest row has {} columns, not a bill", column_count);
        return LoadedRows::default();
    }

    let total = rows.len() + blank_lines;
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter(|row| row.len() == column_count)
        .collect();

    let mut loaded = LoadedRows::new(rows, column_count);
    let dropped = total - loaded.rows.len();
    if dropped > 0 {
        loaded.notices.push(ExtractNotice::RowsDropped { count: dropped });
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    use crate::config::{AmountFieldConfig, ColumnField, DateField, FieldsConfig};

    fn config() -> TabularFileConfig {
        TabularFileConfig::new(
            true,
            FieldsConfig {
                date: DateField::new("date"),
                time: None,
                name: ColumnField::new("name"),
                memo: None,
                amount: AmountFieldConfig::SignedColumn {
                    column: "amount".into(),
                    is_outbound_positive: false,
                },
            },
        )
    }

    #[test]
    fn test_parse_rows_drops_inconsistent_rows() {
        let text = "Statement for account 1234\n\
                    date,name,amount\n\
                    2020-01-01,A,1.00\n\
                    2020-01-02,B,\"1,000.00\"\n\
                    Total,1001.00\n";
        let loaded = parse_rows(text, b',').unwrap();
        assert_eq!(loaded.column_count, 3);
        assert_eq!(loaded.rows.len(), 3);
        assert_eq!(loaded.rows[2][2], "1,000.00");
        assert_eq!(
            loaded.notices,
            vec![ExtractNotice::RowsDropped { count: 2 }]
        );
    }

    #[test]
    fn test_blank_lines_count_as_dropped_rows() {
        let text = "date,name,amount\n\n2020-01-01,A,1.00\r\n\r\n\n2020-01-02,\"B\n\nC\",2.00\n";
        let loaded = parse_rows(text, b',').unwrap();
        assert_eq!(loaded.rows.len(), 3);
        assert_eq!(loaded.rows[2][1], "B\n\nC");
        assert_eq!(
            loaded.notices,
            vec![ExtractNotice::RowsDropped { count: 3 }]
        );
    }

    #[test]
    fn test_count_blank_lines() {
        assert_eq!(count_blank_lines("a,b,c\n1,2,3\n"), 0);
        assert_eq!(count_blank_lines("\na,b,c\n\n"), 2);
        assert_eq!(count_blank_lines("a,\"x\n\ny\",c\n"), 0);
    }

    #[test]
    fn test_narrow_file_has_no_rows() {
        let loaded = parse_rows("a,b\nc,d\n", b',').unwrap();
        assert!(loaded.rows.is_empty());
        assert_eq!(loaded.column_count, 0);
    }

    #[test]
    fn test_custom_delimiter() {
        let loaded = parse_rows("a;b;c\n1;2,5;3\n", b';').unwrap();
        assert_eq!(loaded.rows[1], vec!["1", "2,5", "3"]);
        assert!(loaded.notices.is_empty());
    }

    #[test]
    fn test_detect_encoding() {
        let utf8 = "date,name,amount\n2020-01-01,Café Müller,1.00\n".as_bytes();
        assert_eq!(detect_encoding(utf8), encoding_rs::UTF_8);

        let (gbk, _, _) = encoding_rs::GBK.encode("日期,名称,金额\n2020-01-01,超市购物消费,1.00\n");
        assert_eq!(decode(&gbk, encoding_rs::GBK).unwrap().lines().next().unwrap(), "日期,名称,金额");
    }

    #[test]
    fn test_load_rows_with_configured_encoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Visa-2020.csv");
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode("date,name,amount\n2020-01-01,Caf\u{e9},1.00\n");
        fs::File::create(&path).unwrap().write_all(&bytes).unwrap();

        let mut config = config();
        config.encoding = Some("latin1".into());
        let loaded = load_rows(&path, &config).unwrap();
        assert_eq!(loaded.rows[1][1], "Caf\u{e9}");
        assert!(loaded.notices.is_empty());

        config.encoding = Some("no-such-encoding".into());
        assert!(load_rows(&path, &config).unwrap_err().is_config());
    }

    #[test]
    fn test_load_rows_detects_encoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Visa-2020.csv");
        fs::write(&path, "date,name,amount\n2020-01-01,A,1.00\n").unwrap();

        let loaded = load_rows(&path, &config()).unwrap();
        assert_eq!(loaded.rows.len(), 2);
        assert!(matches!(
            loaded.notices.first(),
            Some(ExtractNotice::EncodingDetected { .. })
        ));
    }
}
