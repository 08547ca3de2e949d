//! Record assembly

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::BillAggResult;
use crate::models::record::CanonicalRecord;

use super::columns::ResolvedFields;

/// Build the canonical record of one row
pub fn assemble_record(
    row: &[String],
    timestamp: NaiveDateTime,
    fields: &ResolvedFields,
) -> BillAggResult<CanonicalRecord> {
    let (amount, amount_type) = fields.amount.resolve(row)?;

    let extra: BTreeMap<String, String> = fields
        .extra
        .iter()
        .map(|(name, idx)| (name.clone(), row[*idx].clone()))
        .collect();

    Ok(CanonicalRecord {
        date: timestamp.date(),
        time: timestamp.time(),
        name: row[fields.name].clone(),
        memo: fields.memo.map(|idx| row[idx].clone()).unwrap_or_default(),
        amount,
        amount_type,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::amounts::AmountColumns;
    use crate::extract::columns::ResolvedColumn;
    use crate::models::AmountType;
    use chrono::NaiveDate;

    fn fields(memo: Option<usize>) -> ResolvedFields {
        ResolvedFields {
            date: ResolvedColumn::Index(0),
            time: None,
            name: 1,
            memo,
            amount: AmountColumns::SignedColumn {
                column: 2,
                is_outbound_positive: false,
            },
            extra: vec![("reference".into(), 3)],
        }
    }

    #[test]
    fn test_assemble_record() {
        let row: Vec<String> = ["2020-01-02", "Shop", "-1.50", "R-1"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let timestamp = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let record = assemble_record(&row, timestamp, &fields(None)).unwrap();
        assert_eq!(record.name, "Shop");
        assert_eq!(record.memo, "");
        assert_eq!(record.amount.to_string(), "-1.50");
        assert_eq!(record.amount_type, AmountType::Out);
        assert_eq!(record.extra.get("reference").unwrap(), "R-1");

        let record = assemble_record(&row, timestamp, &fields(Some(3))).unwrap();
        assert_eq!(record.memo, "R-1");
    }
}
