use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use typed_builder::TypedBuilder;

use splitledger_core::Row;

/// A new expense as entered by a user, before it is written to the store.
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
pub struct Submission {
    pub payer: String,
    pub merchant: String,
    pub date: NaiveDate,
    /// Left empty until the user types a bill amount.
    #[builder(default)]
    pub amount: Option<Decimal>,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("please enter who paid the bill")]
    MissingPayer,
    #[error("please enter the restaurant")]
    MissingMerchant,
    #[error("please enter the bill amount")]
    MissingAmount,
    #[error("bill amount must be greater than 0, got {0}")]
    NonPositiveAmount(Decimal),
}

impl Submission {
    /// Checks the submission and renders it as a storage row.
    ///
    /// Names are trimmed; the amount must be strictly positive.
    pub fn validate(&self) -> Result<Row, ValidationError> {
        let payer = self.payer.trim();
        if payer.is_empty() {
            return Err(ValidationError::MissingPayer);
        }
        let merchant = self.merchant.trim();
        if merchant.is_empty() {
            return Err(ValidationError::MissingMerchant);
        }
        let amount = self.amount.ok_or(ValidationError::MissingAmount)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        Ok([
            self.date.format("%Y-%m-%d").to_string(),
            payer.to_string(),
            merchant.to_string(),
            amount.to_string(),
        ])
    }
}
