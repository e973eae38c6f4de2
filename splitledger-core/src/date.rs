use std::borrow::Cow;
use std::fmt;

use chrono::{Datelike, NaiveDate};

/// The date of a transaction, or the raw cell text when it could not be read as a date.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum TxnDate {
    Known(NaiveDate),
    Unparsed { raw: String },
}

impl TxnDate {
    pub fn unparsed<T: Into<String>>(raw: T) -> Self {
        TxnDate::Unparsed { raw: raw.into() }
    }

    pub fn known(&self) -> Option<NaiveDate> {
        match self {
            TxnDate::Known(date) => Some(*date),
            TxnDate::Unparsed { .. } => None,
        }
    }

    /// The month this date falls in; `None` for an unparsed date.
    pub fn month(&self) -> Option<YearMonth> {
        self.known().map(YearMonth::from)
    }

    /// The storage form of the date (`YYYY-MM-DD`).
    pub fn as_cell(&self) -> Cow<'_, str> {
        match self {
            TxnDate::Known(date) => Cow::Owned(date.format("%Y-%m-%d").to_string()),
            TxnDate::Unparsed { raw } => Cow::Borrowed(raw),
        }
    }
}

impl From<NaiveDate> for TxnDate {
    fn from(d: NaiveDate) -> Self {
        TxnDate::Known(d)
    }
}

impl fmt::Display for TxnDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cell())
    }
}

/// A calendar month, ordered chronologically.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(YearMonth { year, month })
        } else {
            None
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(d: NaiveDate) -> Self {
        YearMonth {
            year: d.year(),
            month: d.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[test]
fn test_month_label() {
    let date = TxnDate::from(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    assert_eq!(date.to_string(), "2024-03-09");
    assert_eq!(date.month().unwrap().to_string(), "2024-03");
    assert_eq!(TxnDate::unparsed("next tuesday").month(), None);
}

#[test]
fn test_months_order_chronologically() {
    let dec = YearMonth::new(2023, 12).unwrap();
    let jan = YearMonth::new(2024, 1).unwrap();
    assert!(dec < jan);
    assert_eq!(YearMonth::new(2024, 13), None);
}
