use typed_builder::TypedBuilder;

use super::amount::Amount;
use super::date::TxnDate;
use super::field::Field;
use super::row_id::RowId;
use super::Row;

/// A single restaurant bill: who paid, where, when and how much.
///
/// A transaction read from the store looks like this:
///
/// ```text
/// 2024-01-01,Katy,Ramen,20.00
/// ```
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Transaction {
    /// Where the transaction was read from.
    pub id: RowId,

    pub date: TxnDate,

    /// Name of the person who paid the bill.
    pub payer: String,

    /// Restaurant or shop the bill is from.
    pub merchant: String,

    pub amount: Amount,
}

impl Transaction {
    pub fn position(&self) -> usize {
        self.id.position
    }

    /// The storage form of one field.
    pub fn cell(&self, field: Field) -> String {
        match field {
            Field::Date => self.date.as_cell().into_owned(),
            Field::Payer => self.payer.clone(),
            Field::Merchant => self.merchant.clone(),
            Field::Amount => self.amount.as_cell().into_owned(),
        }
    }

    pub fn to_row(&self) -> Row {
        Field::ALL.map(|field| self.cell(field))
    }

    /// Whether `(date, payer, merchant)` match this transaction.
    pub fn has_key(&self, date: &TxnDate, payer: &str, merchant: &str) -> bool {
        self.date == *date && self.payer == payer && self.merchant == merchant
    }
}
