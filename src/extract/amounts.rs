//! Amount direction strategies
//!
//! The configured amount format is resolved once per file into an
//! [`AmountColumns`] value; [`AmountColumns::resolve`] then turns each row
//! into a signed amount and its direction.

use rust_decimal::Decimal;

use crate::error::BillAggResult;
use crate::models::amount::{parse_amount, AmountType};

/// An indicator column with its resolved index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorColumn {
    pub column: usize,
    pub inbound_value: String,
    pub outbound_value: String,
}

impl IndicatorColumn {
    fn direction(&self, row: &[String]) -> Option<AmountType> {
        let cell = row[self.column].as_str();
        if cell == self.inbound_value {
            Some(AmountType::In)
        } else if cell == self.outbound_value {
            Some(AmountType::Out)
        } else {
            None
        }
    }
}

/// Amount columns of a file, resolved to indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountColumns {
    /// One amount column, direction given by indicator columns
    IndicatorColumns {
        column: usize,
        indicators: Vec<IndicatorColumn>,
    },
    /// One amount column whose sign gives the direction
    SignedColumn {
        column: usize,
        is_outbound_positive: bool,
    },
    /// Separate inbound and outbound columns
    TwoColumns { inbound: usize, outbound: usize },
}

impl AmountColumns {
    /// Compute the amount and direction of one row
    ///
    /// The returned amount's sign always matches the direction unless the
    /// direction is unknown.
    pub fn resolve(&self, row: &[String]) -> BillAggResult<(Decimal, AmountType)> {
        match self {
            Self::IndicatorColumns { column, indicators } => {
                let amount = parse_amount(&row[*column])?;
                let amount_type = indicators
                    .iter()
                    .find_map(|i| i.direction(row))
                    .unwrap_or(AmountType::Unknown);
                Ok((amount_type.apply_sign(amount), amount_type))
            }
            Self::SignedColumn {
                column,
                is_outbound_positive,
            } => {
                let amount = parse_amount(&row[*column])?;
                let amount_type = if amount.is_sign_negative() ^ is_outbound_positive {
                    AmountType::Out
                } else {
                    AmountType::In
                };
                Ok((amount_type.apply_sign(amount), amount_type))
            }
            Self::TwoColumns { inbound, outbound } => {
                let inbound_cell = row[*inbound].as_str();
                let outbound_cell = row[*outbound].as_str();

                let amount_in = match inbound_cell {
                    "" => Decimal::ZERO,
                    text => parse_amount(text)?.abs(),
                };
                let amount_out = match outbound_cell {
                    "" => Decimal::ZERO,
                    text => parse_amount(text)?.abs(),
                };

                let amount = amount_in - amount_out;
                // A zero amount in a filled outbound cell is still outbound
                let amount_type = if amount < Decimal::ZERO
                    || (amount.is_zero() && !outbound_cell.is_empty())
                {
                    AmountType::Out
                } else {
                    AmountType::In
                };
                Ok((amount_type.apply_sign(amount), amount_type))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn indicators() -> AmountColumns {
        AmountColumns::IndicatorColumns {
            column: 0,
            indicators: vec![
                IndicatorColumn {
                    column: 1,
                    inbound_value: "C".into(),
                    outbound_value: "D".into(),
                },
                IndicatorColumn {
                    column: 2,
                    inbound_value: "Credit".into(),
                    outbound_value: "Debit".into(),
                },
            ],
        }
    }

    #[test]
    fn test_inbound_indicator_forces_positive() {
        let (amount, amount_type) = indicators().resolve(&row(&["-12.50", "C", ""])).unwrap();
        assert_eq!(amount, dec("12.50"));
        assert_eq!(amount_type, AmountType::In);
    }

    #[test]
    fn test_first_matching_indicator_wins() {
        let (amount, amount_type) = indicators()
            .resolve(&row(&["12.50", "D", "Credit"]))
            .unwrap();
        assert_eq!(amount, dec("-12.50"));
        assert_eq!(amount_type, AmountType::Out);

        let (_, amount_type) = indicators()
            .resolve(&row(&["12.50", "", "Credit"]))
            .unwrap();
        assert_eq!(amount_type, AmountType::In);
    }

    #[test]
    fn test_unmatched_indicator_keeps_parsed_sign() {
        let (amount, amount_type) = indicators().resolve(&row(&["-3.00", "X", "Y"])).unwrap();
        assert_eq!(amount, dec("-3.00"));
        assert_eq!(amount_type, AmountType::Unknown);
    }

    #[test]
    fn test_signed_column() {
        let columns = AmountColumns::SignedColumn {
            column: 0,
            is_outbound_positive: false,
        };
        assert_eq!(
            columns.resolve(&row(&["-10.00"])).unwrap(),
            (dec("-10.00"), AmountType::Out)
        );
        assert_eq!(
            columns.resolve(&row(&["5.00"])).unwrap(),
            (dec("5.00"), AmountType::In)
        );
    }

    #[test]
    fn test_signed_column_outbound_positive() {
        let columns = AmountColumns::SignedColumn {
            column: 0,
            is_outbound_positive: true,
        };
        assert_eq!(
            columns.resolve(&row(&["10.00"])).unwrap(),
            (dec("-10.00"), AmountType::Out)
        );
        assert_eq!(
            columns.resolve(&row(&["(5.00)"])).unwrap(),
            (dec("5.00"), AmountType::In)
        );
    }

    #[test]
    fn test_two_columns() {
        let columns = AmountColumns::TwoColumns {
            inbound: 0,
            outbound: 1,
        };
        assert_eq!(
            columns.resolve(&row(&["100.00", ""])).unwrap(),
            (dec("100.00"), AmountType::In)
        );
        assert_eq!(
            columns.resolve(&row(&["", "-40.00"])).unwrap(),
            (dec("-40.00"), AmountType::Out)
        );
        assert_eq!(
            columns.resolve(&row(&["10.00", "4.00"])).unwrap(),
            (dec("6.00"), AmountType::In)
        );
    }

    #[test]
    fn test_two_columns_zero_outbound_is_out() {
        let columns = AmountColumns::TwoColumns {
            inbound: 0,
            outbound: 1,
        };
        let (amount, amount_type) = columns.resolve(&row(&["", "0.00"])).unwrap();
        assert!(amount.is_zero());
        assert_eq!(amount_type, AmountType::Out);

        let (amount, amount_type) = columns.resolve(&row(&["", ""])).unwrap();
        assert!(amount.is_zero());
        assert_eq!(amount_type, AmountType::In);
    }

    #[test]
    fn test_unparseable_amount() {
        let columns = AmountColumns::SignedColumn {
            column: 0,
            is_outbound_positive: false,
        };
        assert!(columns.resolve(&row(&["1.2.3"])).unwrap_err().is_parse());
    }
}
