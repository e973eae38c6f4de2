use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

use rust_decimal::Decimal;
use tracing::debug;

use splitledger_core::{Amount, Ledger, Participants, Slot, YearMonth};

/// Row label of the summary table.
///
/// Periods order as `Undated < Month(..) < Total`: transactions whose date could not be read are
/// treated as older than any real month.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Period {
    Undated,
    Month(YearMonth),
    Total,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Undated => f.write_str("Undated"),
            Period::Month(month) => write!(f, "{}", month),
            Period::Total => f.write_str("Total"),
        }
    }
}

/// Sum and count of one payer's transactions within a period.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tally {
    pub sum: Decimal,
    /// Every transaction counts as a visit, including those with a missing amount.
    pub count: u64,
    /// How many of the counted transactions had a missing amount.
    pub missing: u64,
}

impl Tally {
    pub fn record(&mut self, amount: &Amount) {
        self.sum = self.sum.saturating_add(amount.contribution());
        self.count += 1;
        if amount.is_missing() {
            self.missing += 1;
        }
    }
}

impl AddAssign<&Tally> for Tally {
    fn add_assign(&mut self, other: &Tally) {
        self.sum = self.sum.saturating_add(other.sum);
        self.count += other.count;
        self.missing += other.missing;
    }
}

/// Per-period aggregate of both participants' spending.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthlyBucket {
    pub period: Period,
    pub first: Tally,
    pub second: Tally,
    /// Everyone who is neither participant, combined.
    pub others: Tally,
    /// Cumulative `difference` of this and every earlier period. For the total row, the final
    /// cumulative value.
    pub running_balance: Decimal,
}

impl MonthlyBucket {
    fn empty(period: Period) -> Self {
        MonthlyBucket {
            period,
            first: Tally::default(),
            second: Tally::default(),
            others: Tally::default(),
            running_balance: Decimal::ZERO,
        }
    }

    pub fn tally(&self, slot: Slot) -> &Tally {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    /// `first.sum - second.sum`.
    pub fn difference(&self) -> Decimal {
        self.first.sum.saturating_sub(self.second.sum)
    }

    pub fn count_difference(&self) -> i64 {
        self.first.count as i64 - self.second.count as i64
    }
}

/// The monthly summary table: one bucket per period with transactions, newest first, and a
/// synthetic total row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Summary {
    buckets: Vec<MonthlyBucket>,
    total: MonthlyBucket,
}

impl Summary {
    /// Buckets in display order (newest month first, `Undated` last). Does not include the total.
    pub fn buckets(&self) -> &[MonthlyBucket] {
        &self.buckets
    }

    pub fn total(&self) -> &MonthlyBucket {
        &self.total
    }

    /// Every table row in display order, ending with the total.
    pub fn rows(&self) -> impl Iterator<Item = &MonthlyBucket> {
        self.buckets.iter().chain(std::iter::once(&self.total))
    }

    /// Buckets oldest first, for time series.
    pub fn chronological(&self) -> impl Iterator<Item = &MonthlyBucket> {
        self.buckets.iter().rev()
    }

    /// Running balance after each period, oldest first.
    pub fn running_balance(&self) -> Vec<(Period, Decimal)> {
        self.chronological()
            .map(|bucket| (bucket.period, bucket.running_balance))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Builds the monthly summary of a ledger.
///
/// Both participants always get a tally in every bucket, zero when they paid nothing that month.
/// The result depends only on the ledger contents, never on row order.
pub fn summarize(ledger: &Ledger, participants: &Participants) -> Summary {
    let mut by_period: BTreeMap<Period, MonthlyBucket> = BTreeMap::new();

    for txn in ledger {
        let period = txn.date.month().map_or(Period::Undated, Period::Month);
        let bucket = by_period
            .entry(period)
            .or_insert_with(|| MonthlyBucket::empty(period));
        let tally = match participants.slot(&txn.payer) {
            Some(Slot::First) => &mut bucket.first,
            Some(Slot::Second) => &mut bucket.second,
            None => &mut bucket.others,
        };
        tally.record(&txn.amount);
    }

    let mut total = MonthlyBucket::empty(Period::Total);
    let mut running = Decimal::ZERO;
    let mut buckets = Vec::with_capacity(by_period.len());
    for (_, mut bucket) in by_period {
        running = running.saturating_add(bucket.difference());
        bucket.running_balance = running;
        total.first += &bucket.first;
        total.second += &bucket.second;
        total.others += &bucket.others;
        buckets.push(bucket);
    }
    total.running_balance = running;
    buckets.reverse();

    debug!(buckets = buckets.len(), "summarized ledger");
    Summary { buckets, total }
}
