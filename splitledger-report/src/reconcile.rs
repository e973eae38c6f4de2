use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use splitledger_core::{Participants, Slot};

use crate::aggregate::Summary;

/// Who owes whom, after splitting the combined spending evenly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reconciliation {
    Even,
    Owes {
        debtor: String,
        creditor: String,
        amount: Decimal,
    },
}

impl Reconciliation {
    /// The amount owed; zero when even.
    pub fn amount(&self) -> Decimal {
        match self {
            Reconciliation::Even => Decimal::ZERO,
            Reconciliation::Owes { amount, .. } => *amount,
        }
    }
}

impl fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reconciliation::Even => f.write_str("Even"),
            Reconciliation::Owes {
                debtor,
                creditor,
                amount,
            } => write!(
                f,
                "{} owes {} {:.2}",
                debtor,
                creditor,
                amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            ),
        }
    }
}

/// Settles the balance between the two participants.
///
/// Each participant's fair share is half of the combined total. The participant who paid less
/// than their share owes the other the difference:
///
/// ```text
/// fair_share = (total_first + total_second) / 2
/// delta      = total_first - fair_share
/// ```
///
/// `delta` equals `(total_first - total_second) / 2`; with decimal arithmetic halving is exact, so
/// both forms give the same digits. Differences smaller than `epsilon` count as even.
///
/// Each total is halved before adding, so two totals near `Decimal::MAX` do not overflow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reconciler {
    epsilon: Decimal,
}

impl Default for Reconciler {
    fn default() -> Self {
        Reconciler {
            epsilon: Decimal::new(1, 2),
        }
    }
}

impl Reconciler {
    pub fn new(epsilon: Decimal) -> Self {
        Reconciler {
            epsilon: epsilon.abs(),
        }
    }

    pub fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    pub fn reconcile(
        &self,
        total_first: Decimal,
        total_second: Decimal,
        participants: &Participants,
    ) -> Reconciliation {
        let delta = total_first.saturating_sub(fair_share(total_first, total_second));
        if delta.is_zero() || delta.abs() < self.epsilon {
            return Reconciliation::Even;
        }
        let debtor = if delta.is_sign_positive() {
            Slot::Second
        } else {
            Slot::First
        };
        Reconciliation::Owes {
            debtor: participants.name(debtor).to_string(),
            creditor: participants.name(debtor.other()).to_string(),
            amount: delta.abs(),
        }
    }

    /// Reconciles the total row of a summary. Payers other than the two participants are not part
    /// of the split.
    pub fn reconcile_summary(&self, summary: &Summary, participants: &Participants) -> Reconciliation {
        let total = summary.total();
        self.reconcile(total.first.sum, total.second.sum, participants)
    }
}

/// Each participant's equal portion of the combined total.
pub fn fair_share(total_first: Decimal, total_second: Decimal) -> Decimal {
    (total_first / Decimal::TWO).saturating_add(total_second / Decimal::TWO)
}
