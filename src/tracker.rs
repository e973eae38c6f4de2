use thiserror::Error;
use tracing::{info, warn};

use splitledger_core::{Ledger, Row, RowId, Transaction, HEADER_OFFSET};
use splitledger_parser::error::ParseError;
use splitledger_parser::{ingest, Submission, ValidationError};
use splitledger_report::{
    format_currency, monthly_by_payer, recent, summarize, top_by_spend, top_by_visits, Clock,
    MerchantStat, PayerMonth, Reconciler, Reconciliation, Summary, SystemClock, VisitSplit,
};

use crate::changes::{detect_changes, CellUpdate, ChangeError, EditedRow};
use crate::config::TrackerConfig;
use crate::session::{Notice, Session};
use crate::store::{RecordStore, StoreError};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Changes(#[from] ChangeError),
    #[error("{source} ({completed} write(s) were applied before the failure)")]
    Store { completed: usize, source: StoreError },
}

impl From<StoreError> for TrackerError {
    fn from(source: StoreError) -> Self {
        TrackerError::Store {
            completed: 0,
            source,
        }
    }
}

/// The ledger as read from the store, with whatever had to be recovered on the way.
#[derive(Debug)]
pub struct Snapshot {
    pub ledger: Ledger,
    pub warnings: Vec<ParseError>,
}

/// Everything the overview screen shows.
#[derive(Debug)]
pub struct Dashboard {
    pub summary: Summary,
    pub reconciliation: Reconciliation,
    pub merchant_visits: Vec<MerchantStat>,
    pub merchant_spend: Vec<MerchantStat>,
    pub monthly_trend: Vec<PayerMonth>,
    /// Transactions inside the recent window, in ledger order.
    pub recent: Vec<Transaction>,
    pub visit_split: VisitSplit,
    pub ledger: Ledger,
    pub warnings: Vec<ParseError>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SaveReport {
    /// Cells written and verified.
    pub updated: usize,
    /// Rows now waiting for deletion to be confirmed.
    pub pending_deletion: usize,
}

/// Connects a record store to the ledger pipeline.
///
/// Nothing is cached between calls: every operation starts from a fresh read of the store.
///
/// ```no_run
/// use splitledger::{CsvStore, Tracker, TrackerConfig};
///
/// # fn main() -> Result<(), splitledger::TrackerError> {
/// let tracker = Tracker::new(CsvStore::new("expenses.csv"), TrackerConfig::default());
/// let dashboard = tracker.dashboard()?;
/// println!("{}", dashboard.reconciliation);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Tracker<S, C = SystemClock> {
    store: S,
    clock: C,
    config: TrackerConfig,
    reconciler: Reconciler,
}

impl<S: RecordStore> Tracker<S, SystemClock> {
    pub fn new(store: S, config: TrackerConfig) -> Self {
        Tracker::with_clock(store, SystemClock, config)
    }
}

impl<S: RecordStore, C: Clock> Tracker<S, C> {
    pub fn with_clock(store: S, clock: C, config: TrackerConfig) -> Self {
        let reconciler = Reconciler::new(config.even_epsilon());
        Tracker {
            store,
            clock,
            config,
            reconciler,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn load(&self) -> Result<Snapshot, TrackerError> {
        let rows = self.store.read_all()?;
        let ingested = ingest(&rows, &self.config.participants);
        Ok(Snapshot {
            ledger: ingested.ledger,
            warnings: ingested.warnings,
        })
    }

    pub fn dashboard(&self) -> Result<Dashboard, TrackerError> {
        let Snapshot { ledger, warnings } = self.load()?;
        let participants = &self.config.participants;

        let summary = summarize(&ledger, participants);
        let reconciliation = self.reconciler.reconcile_summary(&summary, participants);
        let recent = recent(
            &ledger,
            self.clock.today(),
            i64::from(self.config.recent_window_days),
        )
        .into_iter()
        .cloned()
        .collect();

        Ok(Dashboard {
            reconciliation,
            merchant_visits: top_by_visits(&ledger, self.config.top_merchants),
            merchant_spend: top_by_spend(&ledger, self.config.top_merchants),
            monthly_trend: monthly_by_payer(&ledger, Some(self.config.trend_months)),
            recent,
            visit_split: VisitSplit::from_summary(&summary),
            summary,
            ledger,
            warnings,
        })
    }

    /// Validates a new expense and appends it to the store.
    ///
    /// The payer and merchant are remembered in the session for the next entry.
    pub fn add_expense(
        &mut self,
        session: &mut Session,
        submission: &Submission,
    ) -> Result<Row, TrackerError> {
        let result = self.append(submission);
        match &result {
            Ok(row) => {
                session.remember(&row[1], &row[2]);
                let amount = submission.amount.map(format_currency).unwrap_or_default();
                session.notify(Notice::Success(format!(
                    "Added {} expense at {}",
                    amount, row[2]
                )));
            }
            Err(err) => session.notify(Notice::Error(err.to_string())),
        }
        result
    }

    fn append(&mut self, submission: &Submission) -> Result<Row, TrackerError> {
        let row = submission.validate()?;
        self.store.append(&row)?;
        info!(payer = %row[1], merchant = %row[2], amount = %row[3], "appended expense");
        Ok(row)
    }

    /// Writes the edits of an editable grid back to the store.
    ///
    /// Cell updates are applied one at a time and verified by reading them back. Rows marked for
    /// deletion are not deleted yet; they become the session's pending deletion, to be confirmed
    /// with [`Tracker::confirm_deletion`].
    pub fn save_changes(
        &mut self,
        session: &mut Session,
        original: &Ledger,
        edited: &[EditedRow],
    ) -> Result<SaveReport, TrackerError> {
        let result = detect_changes(original, edited)
            .map_err(TrackerError::from)
            .and_then(|changes| {
                let updated = self.apply_updates(&changes.updates)?;
                let ids: Vec<RowId> = changes
                    .deletions
                    .iter()
                    .filter_map(|position| original.at_position(*position))
                    .map(|txn| txn.id)
                    .collect();
                let pending_deletion = ids.len();
                if pending_deletion > 0 {
                    session.request_deletion(ids);
                }
                Ok(SaveReport {
                    updated,
                    pending_deletion,
                })
            });

        match &result {
            Ok(report) if report.updated > 0 => session.notify(Notice::Success(format!(
                "Updated {} field(s)",
                report.updated
            ))),
            Ok(_) => {}
            Err(err) => session.notify(Notice::Error(err.to_string())),
        }
        result
    }

    /// Writes each update and reads it back. Stops at the first failure; updates written before
    /// it stay written, and the error reports how many there were.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> Result<usize, TrackerError> {
        for (completed, update) in updates.iter().enumerate() {
            self.write_verified(update)
                .map_err(|source| TrackerError::Store { completed, source })?;
            info!(
                row = update.storage_row(),
                field = %update.field,
                old = %update.old_value,
                new = %update.new_value,
                "updated cell"
            );
        }
        Ok(updates.len())
    }

    fn write_verified(&mut self, update: &CellUpdate) -> Result<(), StoreError> {
        let (row, column) = (update.storage_row(), update.column());
        self.store.update_cell(row, column, &update.new_value)?;
        let found = self.store.read_cell(row, column)?;
        if found.as_deref() != Some(update.new_value.as_str()) {
            warn!(row, column, ?found, "cell update did not stick");
            return Err(StoreError::Verification {
                row,
                column,
                expected: update.new_value.clone(),
                found,
            });
        }
        Ok(())
    }

    /// Marks transactions of `ledger` for deletion, pending confirmation. Returns how many.
    pub fn request_deletion<I>(&self, session: &mut Session, ledger: &Ledger, positions: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let ids: Vec<RowId> = positions
            .into_iter()
            .filter_map(|position| ledger.at_position(position))
            .map(|txn| txn.id)
            .collect();
        session.request_deletion(ids);
        session.pending_deletion().len()
    }

    pub fn cancel_deletion(&self, session: &mut Session) {
        session.cancel_deletion();
    }

    /// Deletes the rows the session is waiting on, worst-index-first so each deletion leaves the
    /// remaining positions valid.
    ///
    /// The store is read again first; if any pending row no longer holds the transaction it held
    /// when the deletion was requested, nothing is deleted.
    pub fn confirm_deletion(&mut self, session: &mut Session) -> Result<usize, TrackerError> {
        let pending = session.take_pending_deletion();
        let result = self.delete(&pending);
        match &result {
            Ok(deleted) => session.notify(Notice::Success(format!(
                "Deleted {} transaction(s)",
                deleted
            ))),
            Err(err) => session.notify(Notice::Error(err.to_string())),
        }
        result
    }

    fn delete(&mut self, pending: &[RowId]) -> Result<usize, TrackerError> {
        if pending.is_empty() {
            return Ok(0);
        }
        let Snapshot { ledger, .. } = self.load()?;
        for (index, id) in pending.iter().enumerate() {
            if ledger.at_position(id.position).map(|txn| txn.id) != Some(*id) {
                return Err(ChangeError::Stale {
                    edited: index,
                    position: id.position,
                }
                .into());
            }
        }

        let mut positions: Vec<usize> = pending.iter().map(|id| id.position).collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        for (completed, position) in positions.iter().enumerate() {
            self.store
                .delete_row(position + HEADER_OFFSET)
                .map_err(|source| TrackerError::Store { completed, source })?;
            info!(row = position + HEADER_OFFSET, "deleted row");
        }
        Ok(positions.len())
    }
}
