//! Canonical transaction records
//!
//! A [`CanonicalRecord`] is the normalized, direction-resolved form of one
//! statement row. An [`AggregatedRecord`] attaches the bill group it came
//! from once records of several files are merged.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amount::AmountType;

/// Field names of a canonical record
pub const CORE_FIELDS: [&str; 6] = ["date", "time", "name", "memo", "amount", "amount_type"];

/// Field names added when records are aggregated
pub const GROUP_FIELDS: [&str; 3] = ["account", "currency", "final_memo"];

/// Separator between the parts of a final memo
pub const FINAL_MEMO_SEPARATOR: &str = "; ";

/// The normalized transaction extracted from one statement row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Transaction date
    pub date: NaiveDate,
    /// Transaction time (midnight when the file has no time column)
    pub time: NaiveTime,
    /// Counterparty name
    pub name: String,
    /// Memo, possibly empty
    pub memo: String,
    /// Amount, its sign matches `amount_type` unless unknown
    pub amount: Decimal,
    /// Direction of the transaction
    pub amount_type: AmountType,
    /// Extra fields carried through verbatim
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

impl CanonicalRecord {
    /// Sort key of the record
    pub fn timestamp(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }

    /// Look up a field by name, as text
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "date" => Some(self.date.format("%Y-%m-%d").to_string()),
            "time" => Some(self.time.format("%H:%M:%S").to_string()),
            "name" => Some(self.name.clone()),
            "memo" => Some(self.memo.clone()),
            "amount" => Some(self.amount.to_string()),
            "amount_type" => Some(self.amount_type.to_string()),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// A canonical record together with its bill group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    /// Account of the bill group
    pub account: String,
    /// Currency of the bill group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Memo assembled from the group's `final_memo` fields
    pub final_memo: String,
    #[serde(flatten)]
    pub record: CanonicalRecord,
}

impl AggregatedRecord {
    /// Wrap a record, building its final memo from the given fields
    ///
    /// Without memo fields the final memo is the record's memo.
    pub fn new(
        account: &str,
        currency: Option<&str>,
        memo_fields: Option<&[String]>,
        record: CanonicalRecord,
    ) -> Self {
        let final_memo = match memo_fields {
            Some(fields) => fields
                .iter()
                .filter_map(|f| record.field(f))
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(FINAL_MEMO_SEPARATOR),
            None => record.memo.clone(),
        };

        Self {
            account: account.to_string(),
            currency: currency.map(str::to_string),
            final_memo,
            record,
        }
    }

    /// Look up a field by name, as text
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "account" => Some(self.account.clone()),
            "currency" => Some(self.currency.clone().unwrap_or_default()),
            "final_memo" => Some(self.final_memo.clone()),
            other => self.record.field(other),
        }
    }
}
