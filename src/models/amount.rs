//! Currency amount parsing
//!
//! Statement files write amounts in whatever notation the issuing bank's
//! locale uses: `-$6,150,593.22`, `(HK$6,150,593.22)`, `-6.150.593,22 R$`,
//! `Sk 6 150 593,22-` all mean the same value. Amounts are parsed into an
//! exact [`Decimal`], never through floating point.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BillAggError, BillAggResult};

/// Characters that may act as a decimal separator
pub const DECIMAL_SEPARATORS: [char; 2] = ['.', ','];

/// Decimal separator assumed when none is found near the end of an amount
pub const DEFAULT_DECIMAL_SEPARATOR: char = '.';

/// A real financial amount has at most 2 fraction digits, so the separator
/// is never farther than this from the end
const SEPARATOR_WINDOW: usize = 3;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    /// Money coming into the account
    In,
    /// Money leaving the account
    Out,
    /// Direction could not be determined
    #[default]
    Unknown,
}

impl AmountType {
    /// Force the sign of an amount to match this direction
    ///
    /// `Unknown` leaves the amount untouched.
    pub fn apply_sign(&self, amount: Decimal) -> Decimal {
        let mut amount = amount;
        match self {
            Self::In => amount.set_sign_positive(true),
            Self::Out => amount.set_sign_negative(true),
            Self::Unknown => {}
        }
        amount
    }
}

impl fmt::Display for AmountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountType::In => write!(f, "in"),
            AmountType::Out => write!(f, "out"),
            AmountType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Parse a currency amount, detecting its decimal separator
///
/// # Examples
/// ```
/// use bill_aggregator::models::amount::parse_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let expected = Decimal::from_str("-6150593.22").unwrap();
/// assert_eq!(parse_amount("-$6,150,593.22").unwrap(), expected);
/// assert_eq!(parse_amount("-6.150.593,22 R$").unwrap(), expected);
/// ```
pub fn parse_amount(text: &str) -> BillAggResult<Decimal> {
    parse_amount_with_separator(text, None)
}

/// Parse a currency amount using a known decimal separator
///
/// With `None` the separator is detected from the amount itself.
pub fn parse_amount_with_separator(
    text: &str,
    decimal_separator: Option<char>,
) -> BillAggResult<Decimal> {
    // A minus sign anywhere, or accounting parentheses, means negative
    let negative = text.contains('-') || text.contains('(');
    let unsigned: String = text
        .chars()
        .filter(|c| !matches!(c, '-' | '(' | ')'))
        .collect();

    let core = strip_non_digit_ends(&unsigned);
    if core.is_empty() {
        return Err(BillAggError::amount_parse(text, "no digits found"));
    }

    let separator = match decimal_separator {
        Some(separator) => separator,
        None => detect_decimal_separator(core)
            .ok_or_else(|| BillAggError::amount_parse(text, "ambiguous decimal separator"))?,
    };

    let numeric: String = core
        .chars()
        .filter_map(|c| {
            if c.is_ascii_digit() {
                Some(c)
            } else if c == separator {
                Some('.')
            } else {
                None
            }
        })
        .collect();

    let mut amount =
        Decimal::from_str(&numeric).map_err(|e| BillAggError::amount_parse(text, e.to_string()))?;
    // Keep the sign even when the amount is zero
    amount.set_sign_negative(negative);
    Ok(amount)
}

/// Detect the decimal separator of an amount stripped of currency symbols
///
/// Looks at the last 3 characters only. Returns `None` when the separator
/// occurs more than once, as the amount is then ambiguous or malformed.
pub fn detect_decimal_separator(amount: &str) -> Option<char> {
    let separator = amount
        .chars()
        .rev()
        .take(SEPARATOR_WINDOW)
        .find(|c| DECIMAL_SEPARATORS.contains(c))
        .unwrap_or(DEFAULT_DECIMAL_SEPARATOR);

    if amount.matches(separator).count() >= 2 {
        None
    } else {
        Some(separator)
    }
}

/// Drop leading and trailing characters that are not ASCII digits
fn strip_non_digit_ends(text: &str) -> &str {
    text.trim_matches(|c: char| !c.is_ascii_digit())
}
