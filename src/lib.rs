pub use splitledger_core;
pub use splitledger_parser;
pub use splitledger_report;

pub use changes::{detect_changes, CellUpdate, ChangeError, ChangeSet, EditedRow};
pub use config::{ConfigError, StoreConfig, TrackerConfig};
pub use session::{Notice, Session};
pub use store::{CsvStore, MemoryStore, RecordStore, StoreError};
pub use tracker::{Dashboard, SaveReport, Snapshot, Tracker, TrackerError};

pub mod changes;
pub mod config;
mod session;
pub mod store;
pub mod tracker;
