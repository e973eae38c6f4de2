use typed_builder::TypedBuilder;

pub use amount::Amount;
pub use date::{TxnDate, YearMonth};
pub use field::Field;
pub use participants::{Participants, Slot};
pub use row_id::RowId;
pub use transaction::Transaction;

pub mod amount;
mod date;
pub mod field;
pub mod participants;
mod row_id;
pub mod transaction;

/// Column names of the header row, in storage order.
pub const HEADER: [&str; 4] = ["Date", "Name", "Restaurant", "Amount"];

/// Distance between a zero-based ledger position and its 1-based storage row: one for the header
/// row and one for 1-based addressing.
pub const HEADER_OFFSET: usize = 2;

/// A transaction as stored: `[date, payer, merchant, amount]`, all strings.
pub type Row = [String; 4];

/// Represents the complete ledger: every transaction read from the store, in original row order.
#[derive(Clone, Debug, Default, PartialEq, TypedBuilder)]
pub struct Ledger {
    #[builder(default)]
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Ledger { transactions }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Looks up the transaction that was read from the given zero-based position.
    pub fn at_position(&self, position: usize) -> Option<&Transaction> {
        match self.transactions.get(position) {
            Some(txn) if txn.id.position == position => Some(txn),
            _ => self.transactions.iter().find(|t| t.id.position == position),
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
