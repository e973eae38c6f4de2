use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;

use splitledger_core::{Ledger, Transaction, YearMonth};

use crate::aggregate::Summary;

/// Source of "today" for anything relative to the current date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local calendar date.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always the same date.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Visits and spending at one merchant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MerchantStat {
    pub merchant: String,
    pub visits: u64,
    pub spend: Decimal,
}

/// One payer's spending in one month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PayerMonth {
    pub month: YearMonth,
    pub payer: String,
    pub spend: Decimal,
}

/// Each participant's share of visits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VisitSplit {
    pub first: u64,
    pub second: u64,
}

impl VisitSplit {
    pub fn from_summary(summary: &Summary) -> Self {
        VisitSplit {
            first: summary.total().first.count,
            second: summary.total().second.count,
        }
    }

    pub fn total(&self) -> u64 {
        self.first + self.second
    }

    /// Fraction of visits paid by the first participant; `None` without any visits.
    pub fn first_share(&self) -> Option<Decimal> {
        match self.total() {
            0 => None,
            total => Some(Decimal::from(self.first) / Decimal::from(total)),
        }
    }
}

/// Per-merchant statistics in the order each merchant first appears in the ledger.
pub fn merchant_stats(ledger: &Ledger) -> Vec<MerchantStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<MerchantStat> = Vec::new();
    for txn in ledger {
        let slot = *index.entry(txn.merchant.as_str()).or_insert_with(|| {
            stats.push(MerchantStat {
                merchant: txn.merchant.clone(),
                visits: 0,
                spend: Decimal::ZERO,
            });
            stats.len() - 1
        });
        stats[slot].visits += 1;
        stats[slot].spend = stats[slot].spend.saturating_add(txn.amount.contribution());
    }
    stats
}

/// The `limit` most visited merchants. Ties keep first-appearance order.
pub fn top_by_visits(ledger: &Ledger, limit: usize) -> Vec<MerchantStat> {
    let mut stats = merchant_stats(ledger);
    stats.sort_by(|a, b| b.visits.cmp(&a.visits));
    stats.truncate(limit);
    stats
}

/// The `limit` merchants with the highest spending. Ties keep first-appearance order.
pub fn top_by_spend(ledger: &Ledger, limit: usize) -> Vec<MerchantStat> {
    let mut stats = merchant_stats(ledger);
    stats.sort_by(|a, b| b.spend.cmp(&a.spend));
    stats.truncate(limit);
    stats
}

/// Spending per month and payer (every payer, registered or not), oldest month first and payers
/// alphabetically within a month. With `last_months`, only the latest that many months are kept.
pub fn monthly_by_payer(ledger: &Ledger, last_months: Option<usize>) -> Vec<PayerMonth> {
    if last_months == Some(0) {
        return Vec::new();
    }
    let mut sums: BTreeMap<(YearMonth, &str), Decimal> = BTreeMap::new();
    for txn in ledger {
        if let Some(month) = txn.date.month() {
            let sum = sums.entry((month, txn.payer.as_str())).or_insert(Decimal::ZERO);
            *sum = sum.saturating_add(txn.amount.contribution());
        }
    }

    let cutoff = last_months.and_then(|n| {
        let mut months: Vec<YearMonth> = sums.keys().map(|(month, _)| *month).collect();
        months.dedup();
        months.len().checked_sub(n).and_then(|skip| months.get(skip).copied())
    });

    sums.into_iter()
        .filter(|((month, _), _)| cutoff.map_or(true, |first| *month >= first))
        .map(|((month, payer), spend)| PayerMonth {
            month,
            payer: payer.to_string(),
            spend,
        })
        .collect()
}

/// Transactions dated strictly after `today - window_days`. Undated transactions are left out.
pub fn recent<'l>(ledger: &'l Ledger, today: NaiveDate, window_days: i64) -> Vec<&'l Transaction> {
    let cutoff = today.checked_sub_signed(Duration::days(window_days));
    ledger
        .iter()
        .filter(|txn| match (txn.date.known(), cutoff) {
            (Some(date), Some(cutoff)) => date > cutoff,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .collect()
}
