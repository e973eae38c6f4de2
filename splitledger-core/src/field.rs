use std::fmt;

/// A column of the transaction table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Field {
    Date,
    Payer,
    Merchant,
    Amount,
}

impl Field {
    /// All fields in storage column order.
    pub const ALL: [Field; 4] = [Field::Date, Field::Payer, Field::Merchant, Field::Amount];

    /// Zero-based storage column.
    pub fn column(self) -> usize {
        match self {
            Field::Date => 0,
            Field::Payer => 1,
            Field::Merchant => 2,
            Field::Amount => 3,
        }
    }

    pub fn from_column(column: usize) -> Option<Field> {
        Field::ALL.get(column).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Payer => "payer",
            Field::Merchant => "merchant",
            Field::Amount => "amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
