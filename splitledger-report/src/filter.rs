use std::collections::BTreeSet;
use std::fmt;

use typed_builder::TypedBuilder;

use splitledger_core::{Ledger, Transaction, YearMonth};

/// Restricts the transaction history to one month, or to transactions without a readable date.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MonthFilter {
    All,
    Month(YearMonth),
    Undated,
}

impl Default for MonthFilter {
    fn default() -> Self {
        MonthFilter::All
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("All"),
            MonthFilter::Month(month) => write!(f, "{}", month),
            MonthFilter::Undated => f.write_str("Undated"),
        }
    }
}

/// Criteria for browsing the transaction history. Unset criteria match everything.
#[derive(Clone, Debug, Default, Eq, PartialEq, TypedBuilder)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the merchant name.
    #[builder(default)]
    pub search: Option<String>,

    /// Exact payer name.
    #[builder(default)]
    pub payer: Option<String>,

    #[builder(default)]
    pub month: MonthFilter,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => txn
                .merchant
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        };
        let payer_ok = self.payer.as_deref().map_or(true, |payer| txn.payer == payer);
        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Month(month) => txn.date.month() == Some(month),
            MonthFilter::Undated => txn.date.month().is_none(),
        };
        search_ok && payer_ok && month_ok
    }

    /// Matching transactions in ledger order.
    pub fn apply<'l>(&self, ledger: &'l Ledger) -> Vec<&'l Transaction> {
        ledger.iter().filter(|txn| self.matches(txn)).collect()
    }
}

/// Month choices for the history view: newest month first, `Undated` last when any transaction
/// lacks a readable date.
pub fn available_months(ledger: &Ledger) -> Vec<MonthFilter> {
    let mut undated = false;
    let mut months = BTreeSet::new();
    for txn in ledger {
        match txn.date.month() {
            Some(month) => {
                months.insert(month);
            }
            None => undated = true,
        }
    }
    let mut choices: Vec<MonthFilter> = months.into_iter().rev().map(MonthFilter::Month).collect();
    if undated {
        choices.push(MonthFilter::Undated);
    }
    choices
}
