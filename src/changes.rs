use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use thiserror::Error;

use splitledger_core::{Amount, Field, Ledger, RowId, Transaction, TxnDate, HEADER_OFFSET};
use splitledger_parser::max_amount;

/// One row of the editable grid.
///
/// `origin` is the identity of the transaction the row was copied from. Rows without it are
/// matched to the ledger by their `(date, payer, merchant)` key.
#[derive(Clone, Debug, PartialEq)]
pub struct EditedRow {
    pub origin: Option<RowId>,
    pub date: TxnDate,
    pub payer: String,
    pub merchant: String,
    pub amount: Amount,
    /// Marked for deletion.
    pub selected: bool,
}

impl EditedRow {
    pub fn from_transaction(txn: &Transaction) -> Self {
        EditedRow {
            origin: Some(txn.id),
            date: txn.date.clone(),
            payer: txn.payer.clone(),
            merchant: txn.merchant.clone(),
            amount: txn.amount.clone(),
            selected: false,
        }
    }

    pub fn cell(&self, field: Field) -> String {
        match field {
            Field::Date => self.date.as_cell().into_owned(),
            Field::Payer => self.payer.clone(),
            Field::Merchant => self.merchant.clone(),
            Field::Amount => self.amount.as_cell().into_owned(),
        }
    }

    fn differs(&self, txn: &Transaction, field: Field) -> bool {
        match field {
            Field::Date => self.date != txn.date,
            Field::Payer => self.payer != txn.payer,
            Field::Merchant => self.merchant != txn.merchant,
            Field::Amount => self.amount != txn.amount,
        }
    }
}

/// A single changed cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CellUpdate {
    /// Zero-based position of the transaction in the original ledger.
    pub row_index: usize,
    pub field: Field,
    pub old_value: String,
    pub new_value: String,
}

impl CellUpdate {
    /// The 1-based store row, header included.
    pub fn storage_row(&self) -> usize {
        self.row_index + HEADER_OFFSET
    }

    pub fn column(&self) -> usize {
        self.field.column()
    }
}

/// Everything an edit session wants written back.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChangeSet {
    /// Ordered by row, then column.
    pub updates: Vec<CellUpdate>,
    /// Zero-based positions in the original ledger.
    pub deletions: BTreeSet<usize>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.deletions.is_empty()
    }

    /// Deletions worst-index-first, the order they must be issued in so that each deletion leaves
    /// the positions of the remaining ones untouched.
    pub fn deletion_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.deletions.iter().rev().copied()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ChangeError {
    #[error("edited row {edited} matches {} transactions (rows {candidates:?}); cannot tell which one was edited", candidates.len())]
    Ambiguous {
        edited: usize,
        candidates: Vec<usize>,
    },
    #[error("edited row {edited} does not match any transaction")]
    Unmatched { edited: usize },
    #[error("edited row {edited} was copied from row {position}, which has changed since")]
    Stale { edited: usize, position: usize },
    #[error("edited row {edited} has amount {amount}, which is not between 0 and {}", max_amount())]
    InvalidAmount { edited: usize, amount: Decimal },
    #[error("edited rows {first} and {second} both claim row {position}")]
    DuplicateEdit {
        position: usize,
        first: usize,
        second: usize,
    },
}

/// Computes the minimal set of cell updates and row deletions that turn `original` into `edited`.
///
/// `edited` may hold any subset of the ledger, for example a filtered view; transactions it does
/// not mention are left alone. Nothing is guessed: an edited row that cannot be tied to exactly one
/// original transaction fails the whole diff, and so does a kept row whose amount is below zero or
/// above [`max_amount`].
pub fn detect_changes(original: &Ledger, edited: &[EditedRow]) -> Result<ChangeSet, ChangeError> {
    let mut claimed: HashMap<usize, usize> = HashMap::new();
    let mut changes = ChangeSet::default();

    for (index, row) in edited.iter().enumerate() {
        let txn = resolve(original, index, row)?;
        let position = txn.position();
        if let Some(first) = claimed.insert(position, index) {
            return Err(ChangeError::DuplicateEdit {
                position,
                first,
                second: index,
            });
        }

        if row.selected {
            changes.deletions.insert(position);
            continue;
        }
        if let Some(amount) = row.amount.value() {
            if (amount.is_sign_negative() && !amount.is_zero()) || amount > max_amount() {
                return Err(ChangeError::InvalidAmount {
                    edited: index,
                    amount,
                });
            }
        }
        for field in Field::ALL.iter().copied() {
            if row.differs(txn, field) {
                changes.updates.push(CellUpdate {
                    row_index: position,
                    field,
                    old_value: txn.cell(field),
                    new_value: row.cell(field),
                });
            }
        }
    }

    changes
        .updates
        .sort_by_key(|update| (update.row_index, update.column()));
    Ok(changes)
}

fn resolve<'l>(
    original: &'l Ledger,
    index: usize,
    row: &EditedRow,
) -> Result<&'l Transaction, ChangeError> {
    if let Some(id) = row.origin {
        return original
            .at_position(id.position)
            .filter(|txn| txn.id == id)
            .ok_or(ChangeError::Stale {
                edited: index,
                position: id.position,
            });
    }

    let mut candidates = original
        .iter()
        .filter(|txn| txn.has_key(&row.date, &row.payer, &row.merchant));
    match (candidates.next(), candidates.next()) {
        (Some(txn), None) => Ok(txn),
        (None, _) => Err(ChangeError::Unmatched { edited: index }),
        (Some(first), Some(second)) => {
            let candidates = [first, second]
                .iter()
                .copied()
                .chain(candidates)
                .map(Transaction::position)
                .collect();
            Err(ChangeError::Ambiguous {
                edited: index,
                candidates,
            })
        }
    }
}
