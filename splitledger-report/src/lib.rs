pub use aggregate::{summarize, MonthlyBucket, Period, Summary, Tally};
pub use filter::{available_months, MonthFilter, TransactionFilter};
pub use projection::{
    merchant_stats, monthly_by_payer, recent, top_by_spend, top_by_visits, Clock, FixedClock,
    MerchantStat, PayerMonth, SystemClock, VisitSplit,
};
pub use reconcile::{fair_share, Reconciler, Reconciliation};
pub use render::{format_currency, render, RenderError, Renderer, TableRenderer};

pub mod aggregate;
pub mod filter;
pub mod projection;
pub mod reconcile;
pub mod render;

#[cfg(test)]
mod tests;
