use std::borrow::Cow;
use std::fmt;

use rust_decimal::Decimal;

/// The bill amount of a transaction.
///
/// A cell that could not be read as a non-negative number is kept as `Missing` together with its
/// raw text. It contributes nothing to sums, but stays distinguishable from a real zero so it can
/// be audited and written back untouched.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Amount {
    Value(Decimal),
    Missing { raw: String },
}

impl Amount {
    pub fn missing<T: Into<String>>(raw: T) -> Self {
        Amount::Missing { raw: raw.into() }
    }

    /// The numeric value, if the amount is present.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Amount::Value(num) => Some(*num),
            Amount::Missing { .. } => None,
        }
    }

    /// What this amount adds to a sum: its value, or zero when missing.
    pub fn contribution(&self) -> Decimal {
        self.value().unwrap_or(Decimal::ZERO)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Amount::Missing { .. })
    }

    /// The storage form of the amount.
    pub fn as_cell(&self) -> Cow<'_, str> {
        match self {
            Amount::Value(num) => Cow::Owned(num.to_string()),
            Amount::Missing { raw } => Cow::Borrowed(raw),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(num: Decimal) -> Self {
        Amount::Value(num)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_cell())
    }
}
