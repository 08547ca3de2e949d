//! Free-form date/time text parsing
//!
//! Statement files write dates in every conceivable notation: `2020-01-02`,
//! `03/04/2020`, `Jan 5, 2021 3:04 PM`, `20200102`, `2020年1月2日`. The text is
//! split into number, word and separator tokens; numbers that are not part
//! of a time become year/month/day candidates, which are then assigned using
//! their magnitude, month names, four-digit years and the configured
//! day-first/year-first hints.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{BillAggError, BillAggResult};

/// How to read ambiguous numeric dates such as `03/04/05`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateHints {
    /// Day before month (`03/04` is 3 April)
    pub dayfirst: bool,
    /// Year before month and day (`10/11/12` is 2010-11-12)
    pub yearfirst: bool,
}

impl DateHints {
    pub fn new(dayfirst: Option<bool>, yearfirst: Option<bool>) -> Self {
        Self {
            dayfirst: dayfirst.unwrap_or(false),
            yearfirst: yearfirst.unwrap_or(false),
        }
    }
}

const MONTHS: [&[&str]; 12] = [
    &["jan", "january"],
    &["feb", "february"],
    &["mar", "march"],
    &["apr", "april"],
    &["may"],
    &["jun", "june"],
    &["jul", "july"],
    &["aug", "august"],
    &["sep", "sept", "september"],
    &["oct", "october"],
    &["nov", "november"],
    &["dec", "december"],
];

const WEEKDAYS: [&str; 14] = [
    "mon", "monday", "tue", "tuesday", "wed", "wednesday", "thu", "thursday", "fri", "friday",
    "sat", "saturday", "sun", "sunday",
];

/// Words carrying no date information
const JUMP_WORDS: [&str; 11] = ["t", "at", "on", "and", "of", "年", "月", "日", "号", "时", "分"];

const TIMEZONES: [&str; 3] = ["z", "utc", "gmt"];

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Num(String),
    Word(String),
    Sep(char),
}

fn lex(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                digits.push(d);
                chars.next();
            }
            tokens.push(Token::Num(digits));
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&w) = chars.peek().filter(|w| is_word_char(**w)) {
                word.push(w);
                chars.next();
            }
            tokens.push(Token::Word(word.to_lowercase()));
        } else {
            if !c.is_whitespace() {
                tokens.push(Token::Sep(c));
            }
            chars.next();
        }
    }

    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() && !c.is_ascii_digit()
}

fn month_number(word: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|names| names.contains(&word))
        .map(|idx| idx as u32 + 1)
}

/// Year/month/day candidates in the order they appeared
#[derive(Debug, Default)]
struct YmdCandidates {
    values: Vec<u32>,
    year_idx: Option<usize>,
    month_idx: Option<usize>,
    century_specified: bool,
}

impl YmdCandidates {
    fn push_number(&mut self, digits: &str, text: &str) -> BillAggResult<()> {
        let value: u32 = digits
            .parse()
            .map_err(|_| BillAggError::date_parse(text, format!("number out of range: {}", digits)))?;
        if digits.len() > 2 {
            self.century_specified = true;
            self.year_idx = Some(self.values.len());
        }
        self.push(value, text)
    }

    fn push_month(&mut self, month: u32, text: &str) -> BillAggResult<()> {
        if self.month_idx.is_some() {
            return Err(BillAggError::date_parse(text, "more than one month"));
        }
        self.month_idx = Some(self.values.len());
        self.push(month, text)
    }

    fn push(&mut self, value: u32, text: &str) -> BillAggResult<()> {
        if self.values.len() >= 3 {
            return Err(BillAggError::date_parse(text, "more than three date values"));
        }
        self.values.push(value);
        Ok(())
    }

    /// Assign the candidates to (year, month, day)
    fn resolve(&self, hints: DateHints) -> (Option<u32>, Option<u32>, Option<u32>) {
        let v = &self.values;
        let labelled = [(0usize, self.year_idx), (1, self.month_idx)];
        let known: Vec<(usize, usize)> = labelled
            .iter()
            .filter_map(|(slot, idx)| idx.map(|i| (*slot, i)))
            .collect();

        // Positions fully (or all but one) determined by labels
        if (!known.is_empty() && known.len() == v.len()) || (v.len() == 3 && known.len() == 2) {
            let mut slots = [None, None, None];
            for (slot, idx) in &known {
                slots[*slot] = Some(v[*idx]);
            }
            if v.len() == 3 && known.len() == 2 {
                let used: Vec<usize> = known.iter().map(|(_, i)| *i).collect();
                let missing_idx = (0..3).find(|i| !used.contains(i));
                let missing_slot = (0..3).find(|s| slots[*s].is_none());
                if let (Some(idx), Some(slot)) = (missing_idx, missing_slot) {
                    slots[slot] = Some(v[idx]);
                }
            }
            return (slots[0], slots[1], slots[2]);
        }

        let (dayfirst, yearfirst) = (hints.dayfirst, hints.yearfirst);
        match (v.len(), self.month_idx) {
            (0, _) => (None, None, None),
            (1, None) => {
                if v[0] > 31 {
                    (Some(v[0]), None, None)
                } else {
                    (None, None, Some(v[0]))
                }
            }
            (1, Some(_)) => (None, Some(v[0]), None),
            (2, Some(m)) => {
                let other = if m == 0 { v[1] } else { v[m - 1] };
                if other > 31 {
                    (Some(other), Some(v[m]), None)
                } else {
                    (None, Some(v[m]), Some(other))
                }
            }
            (2, None) => {
                if v[0] > 31 {
                    (Some(v[0]), Some(v[1]), None)
                } else if v[1] > 31 {
                    (Some(v[1]), Some(v[0]), None)
                } else if dayfirst && v[1] <= 12 {
                    (None, Some(v[1]), Some(v[0]))
                } else {
                    (None, Some(v[0]), Some(v[1]))
                }
            }
            (_, Some(0)) => {
                if v[1] > 31 {
                    (Some(v[1]), Some(v[0]), Some(v[2]))
                } else {
                    (Some(v[2]), Some(v[0]), Some(v[1]))
                }
            }
            (_, Some(1)) => {
                if v[0] > 31 || (yearfirst && v[2] <= 31) {
                    (Some(v[0]), Some(v[1]), Some(v[2]))
                } else {
                    (Some(v[2]), Some(v[1]), Some(v[0]))
                }
            }
            (_, Some(_)) => {
                if v[1] > 31 {
                    (Some(v[1]), Some(v[2]), Some(v[0]))
                } else {
                    (Some(v[0]), Some(v[2]), Some(v[1]))
                }
            }
            (_, None) => {
                if v[0] > 31 || self.year_idx == Some(0) || (yearfirst && v[1] <= 12 && v[2] <= 31)
                {
                    // 2020-13-01: a middle value above 12 can only be the day
                    if (dayfirst || v[1] > 12) && v[2] <= 12 {
                        (Some(v[0]), Some(v[2]), Some(v[1]))
                    } else {
                        (Some(v[0]), Some(v[1]), Some(v[2]))
                    }
                } else if v[0] > 12 || (dayfirst && v[1] <= 12) {
                    (Some(v[2]), Some(v[1]), Some(v[0]))
                } else {
                    (Some(v[2]), Some(v[0]), Some(v[1]))
                }
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct TimeParts {
    hour: u32,
    minute: u32,
    second: u32,
    micro: u32,
}

fn apply_meridiem(time: &mut TimeParts, word: &str, text: &str) -> BillAggResult<()> {
    if time.hour == 0 || time.hour > 12 {
        return Err(BillAggError::date_parse(text, "hour out of range for AM/PM"));
    }
    match word {
        "am" | "a" if time.hour == 12 => time.hour = 0,
        "pm" | "p" if time.hour < 12 => time.hour += 12,
        _ => {}
    }
    Ok(())
}

fn is_meridiem(word: &str) -> bool {
    matches!(word, "am" | "pm" | "a" | "p")
}

fn is_zone_name(word: &str) -> bool {
    (3..=5).contains(&word.len()) && word.chars().all(|c| c.is_ascii_alphabetic())
}

fn number_at(tokens: &[Token], idx: usize) -> Option<&str> {
    match tokens.get(idx) {
        Some(Token::Num(digits)) => Some(digits),
        _ => None,
    }
}

fn parse_u32(digits: &str, text: &str) -> BillAggResult<u32> {
    digits
        .parse()
        .map_err(|_| BillAggError::date_parse(text, format!("number out of range: {}", digits)))
}

/// Microseconds from the digits after a decimal point
fn fraction_micros(digits: &str, text: &str) -> BillAggResult<u32> {
    let mut padded: String = digits.chars().take(6).collect();
    while padded.len() < 6 {
        padded.push('0');
    }
    parse_u32(&padded, text)
}

/// Expand a two-digit year to the one within 50 years of the current year
fn expand_year(year: u32) -> u32 {
    let this_year = Local::now().year() as u32;
    let century = this_year / 100 * 100;
    let mut year = year + century;
    if year >= this_year + 50 {
        year -= 100;
    } else if year + 50 < this_year {
        year += 100;
    }
    year
}

/// Parse free-form date/time text
///
/// Missing time parts default to midnight, a missing year to the current
/// year, a missing day to the first of the month.
pub fn parse_datetime(text: &str, hints: DateHints) -> BillAggResult<NaiveDateTime> {
    let tokens = lex(text);
    let mut ymd = YmdCandidates::default();
    let mut time: Option<TimeParts> = None;
    // Token index right after the time, where a zone offset may follow
    let mut time_end: Option<usize> = None;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Num(digits) => {
                // hh:mm[:ss[.ffffff]]
                if matches!(tokens.get(i + 1), Some(Token::Sep(':'))) && time.is_none() {
                    let minute = number_at(&tokens, i + 2)
                        .ok_or_else(|| BillAggError::date_parse(text, "incomplete time"))?;
                    let mut parts = TimeParts {
                        hour: parse_u32(digits, text)?,
                        minute: parse_u32(minute, text)?,
                        ..TimeParts::default()
                    };
                    i += 3;
                    if matches!(tokens.get(i), Some(Token::Sep(':'))) {
                        if let Some(second) = number_at(&tokens, i + 1) {
                            parts.second = parse_u32(second, text)?;
                            i += 2;
                            if matches!(tokens.get(i), Some(Token::Sep('.') | Token::Sep(','))) {
                                if let Some(fraction) = number_at(&tokens, i + 1) {
                                    parts.micro = fraction_micros(fraction, text)?;
                                    i += 2;
                                }
                            }
                        }
                    }
                    time = Some(parts);
                    time_end = Some(i);
                    continue;
                }

                // Compact forms: YYYYMMDD, YYYYMMDDhhmmss, YYMMDD
                if ymd.values.is_empty() && time.is_none() && matches!(digits.len(), 6 | 8 | 14) {
                    let (year, rest) = if digits.len() == 6 {
                        (&digits[..2], &digits[2..])
                    } else {
                        (&digits[..4], &digits[4..])
                    };
                    ymd.push_number(year, text)?;
                    ymd.year_idx = Some(0);
                    ymd.month_idx = Some(1);
                    ymd.push(parse_u32(&rest[..2], text)?, text)?;
                    ymd.push(parse_u32(&rest[2..4], text)?, text)?;
                    if digits.len() == 6 {
                        ymd.century_specified = false;
                    }
                    if digits.len() == 14 {
                        time = Some(TimeParts {
                            hour: parse_u32(&rest[4..6], text)?,
                            minute: parse_u32(&rest[6..8], text)?,
                            second: parse_u32(&rest[8..10], text)?,
                            micro: 0,
                        });
                    }
                    i += 1;
                    continue;
                }

                // "3pm", "3 PM"
                if let Some(Token::Word(word)) = tokens.get(i + 1) {
                    if is_meridiem(word) && time.is_none() {
                        let mut parts = TimeParts {
                            hour: parse_u32(digits, text)?,
                            ..TimeParts::default()
                        };
                        apply_meridiem(&mut parts, word, text)?;
                        time = Some(parts);
                        i += 2;
                        time_end = Some(i);
                        continue;
                    }
                }

                ymd.push_number(digits, text)?;
                i += 1;
                if let Some(Token::Word(word)) = tokens.get(i) {
                    if ORDINAL_SUFFIXES.contains(&word.as_str()) {
                        i += 1;
                    }
                }
            }
            Token::Word(word) => {
                if let Some(month) = month_number(word) {
                    ymd.push_month(month, text)?;
                } else if is_meridiem(word) {
                    let parts = time
                        .as_mut()
                        .ok_or_else(|| BillAggError::date_parse(text, "AM/PM without a time"))?;
                    apply_meridiem(parts, word, text)?;
                    if time_end == Some(i) {
                        time_end = Some(i + 1);
                    }
                } else if time_end == Some(i) && is_zone_name(word) {
                    // CST, EST, CEST right after the time
                } else if !(WEEKDAYS.contains(&word.as_str())
                    || JUMP_WORDS.contains(&word.as_str())
                    || TIMEZONES.contains(&word.as_str()))
                {
                    return Err(BillAggError::date_parse(
                        text,
                        format!("unknown token \"{}\"", word),
                    ));
                }
                i += 1;
            }
            Token::Sep(c) => {
                // Timezone offset after the time: +08:00, -0500
                if matches!(c, '+' | '-') && time_end == Some(i) && number_at(&tokens, i + 1).is_some()
                {
                    i += 2;
                    if matches!(tokens.get(i), Some(Token::Sep(':')))
                        && number_at(&tokens, i + 1).is_some()
                    {
                        i += 2;
                    }
                    continue;
                }
                i += 1;
            }
        }
    }

    let (year, month, day) = ymd.resolve(hints);
    let month = month.ok_or_else(|| BillAggError::date_parse(text, "no date found"))?;
    let year = match year {
        Some(year) if year < 100 && !ymd.century_specified => expand_year(year),
        Some(year) => year,
        None => Local::now().year() as u32,
    };
    let day = day.unwrap_or(1);

    let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
        BillAggError::date_parse(text, format!("invalid date {}-{}-{}", year, month, day))
    })?;
    let parts = time.unwrap_or_default();
    let time = NaiveTime::from_hms_micro_opt(parts.hour, parts.minute, parts.second, parts.micro)
        .ok_or_else(|| BillAggError::date_parse(text, "invalid time"))?;

    Ok(NaiveDateTime::new(date, time))
}
