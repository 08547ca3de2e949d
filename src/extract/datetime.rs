//! Row date/time annotation

use chrono::NaiveDateTime;

use crate::error::{BillAggError, BillAggResult};

use super::columns::ResolvedColumn;
use super::dateparse::{parse_datetime, DateHints};

/// Date and time columns of a file, resolved to indices
#[derive(Debug, Clone)]
pub struct DateTimeColumns<'a> {
    pub date: &'a ResolvedColumn,
    pub time: Option<usize>,
    pub hints: DateHints,
}

impl<'a> DateTimeColumns<'a> {
    /// Text to parse for a row: the date cell, followed by the time cell
    /// when a time column is configured
    pub fn text(&self, row: &[String]) -> BillAggResult<String> {
        let date = match self.date {
            ResolvedColumn::Index(idx) => row[*idx].as_str(),
            ResolvedColumn::List(columns) => columns
                .iter()
                .map(|idx| row[*idx].as_str())
                .find(|cell| !cell.is_empty())
                .ok_or_else(|| BillAggError::NoValidDate(format!("{:?}", row)))?,
        };

        Ok(match self.time {
            Some(idx) => format!("{} {}", date, row[idx]),
            None => date.to_string(),
        })
    }

    /// Parse the timestamp of a row
    pub fn timestamp(&self, row: &[String]) -> BillAggResult<NaiveDateTime> {
        parse_datetime(&self.text(row)?, self.hints)
    }

    /// Parse the timestamps of all rows, in row order
    pub fn annotate(&self, rows: &[Vec<String>]) -> BillAggResult<Vec<NaiveDateTime>> {
        rows.iter().map(|row| self.timestamp(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_date_only_defaults_to_midnight() {
        let date = ResolvedColumn::Index(0);
        let columns = DateTimeColumns {
            date: &date,
            time: None,
            hints: DateHints::default(),
        };
        assert_eq!(
            columns.timestamp(&row(&["2020-01-02", "x"])).unwrap(),
            at(2020, 1, 2, 0, 0)
        );
    }

    #[test]
    fn test_date_and_time_columns() {
        let date = ResolvedColumn::Index(1);
        let columns = DateTimeColumns {
            date: &date,
            time: Some(0),
            hints: DateHints::default(),
        };
        let r = row(&["13:45", "2020-01-02"]);
        assert_eq!(columns.text(&r).unwrap(), "2020-01-02 13:45");
        assert_eq!(columns.timestamp(&r).unwrap(), at(2020, 1, 2, 13, 45));
    }

    #[test]
    fn test_first_non_empty_date_column() {
        let date = ResolvedColumn::List(vec![0, 1]);
        let columns = DateTimeColumns {
            date: &date,
            time: None,
            hints: DateHints::default(),
        };
        assert_eq!(
            columns.timestamp(&row(&["", "2021-03-04"])).unwrap(),
            at(2021, 3, 4, 0, 0)
        );

        let err = columns.timestamp(&row(&["", ""])).unwrap_err();
        assert!(matches!(err, BillAggError::NoValidDate(_)));
    }

    #[test]
    fn test_dayfirst_hint_is_passed_through() {
        let date = ResolvedColumn::Index(0);
        let columns = DateTimeColumns {
            date: &date,
            time: None,
            hints: DateHints::new(Some(true), None),
        };
        assert_eq!(
            columns.annotate(&[row(&["03/04/2020"])]).unwrap(),
            vec![at(2020, 4, 3, 0, 0)]
        );
    }

    #[test]
    fn test_unparseable_date_fails() {
        let date = ResolvedColumn::Index(0);
        let columns = DateTimeColumns {
            date: &date,
            time: None,
            hints: DateHints::default(),
        };
        assert!(columns.annotate(&[row(&["not a date"])]).is_err());
    }
}
