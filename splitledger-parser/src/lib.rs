use std::str::FromStr;

use chrono::NaiveDate;
use pest::iterators::Pairs;
use pest::Parser;
use pest_derive::Parser as PestParser;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use splitledger_core as sl;
use sl::Field;

use error::{ParseError, ParseResult};

pub use submission::{Submission, ValidationError};

pub mod error;
mod submission;

#[derive(PestParser)]
#[grammar = "cells.pest"]
pub struct CellParser;

/// Result of reading the raw rows of the store.
///
/// The ledger always holds one transaction per data row. Every cell that had to be replaced by a
/// missing value, along with any other irregularity, is listed in `warnings`.
#[derive(Debug, Default)]
pub struct Ingested {
    pub ledger: sl::Ledger,
    pub warnings: Vec<ParseError>,
}

/// Parses a date cell, `YYYY-MM-DD` or `YYYY/MM/DD`.
pub fn parse_date(cell: &str) -> ParseResult<NaiveDate> {
    let date = CellParser::parse(Rule::date_cell, cell)?
        .next()
        .and_then(|cell| cell.into_inner().next())
        .ok_or_else(|| ParseError::invalid_state("date"))?;
    let text = date.as_str();
    let mut parts = date.into_inner();
    let year = next_number(&mut parts, "year")?;
    let month = next_number(&mut parts, "month")?;
    let day = next_number(&mut parts, "day")?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseError::invalid_date(format!("{} is not a calendar date", text)))
}

/// Parses an amount cell such as `20`, `20.5`, `$1,234.50` or `-3`.
///
/// The sign is kept; rejecting negative amounts is up to the caller.
pub fn parse_amount(cell: &str) -> ParseResult<Decimal> {
    let num = CellParser::parse(Rule::amount_cell, cell)?
        .next()
        .and_then(|cell| cell.into_inner().next())
        .ok_or_else(|| ParseError::invalid_state("number"))?;
    let span = num.as_span();

    let mut text = String::with_capacity(span.as_str().len());
    for part in num.into_inner() {
        match part.as_rule() {
            Rule::sign => text.push('-'),
            Rule::int | Rule::separated_int => {
                text.extend(part.as_str().chars().filter(|c| *c != ','))
            }
            Rule::fraction => {
                if text.is_empty() || text == "-" {
                    text.push('0');
                }
                text.push_str(part.as_str());
            }
            _ => return Err(ParseError::invalid_state("integer or fractional part")),
        }
    }
    Decimal::from_str(&text).map_err(|err| ParseError::decimal_parse_error(err, span))
}

fn next_number<T: FromStr>(pairs: &mut Pairs<'_, Rule>, what: &str) -> ParseResult<T> {
    pairs
        .next()
        .ok_or_else(|| ParseError::invalid_state(what))?
        .as_str()
        .parse()
        .map_err(|_| ParseError::invalid_state(what))
}

/// Reads the rows delivered by the record store into a ledger.
///
/// The first row is the header and is skipped. Each remaining row becomes a transaction whose
/// `RowId` records its zero-based position. Malformed cells never fail the read: unparseable
/// dates and amounts become missing values and are reported in [`Ingested::warnings`].
pub fn ingest<R, S>(rows: &[R], participants: &sl::Participants) -> Ingested
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut transactions = Vec::with_capacity(rows.len().saturating_sub(1));
    let mut warnings = Vec::new();

    for (position, row) in rows.iter().skip(1).enumerate() {
        let found: Vec<&str> = row.as_ref().iter().map(AsRef::as_ref).collect();
        if found.len() < Field::ALL.len() {
            warnings.push(ParseError::short_row(found.len()).at(position, found.len()));
        }
        let cells = Field::ALL.map(|field| found.get(field.column()).copied().unwrap_or(""));
        let (txn, mut row_warnings) = transaction(position, &cells, participants);
        warnings.append(&mut row_warnings);
        transactions.push(txn);
    }

    for warning in &warnings {
        warn!(%warning, "recovered from malformed row");
    }
    debug!(
        transactions = transactions.len(),
        warnings = warnings.len(),
        "ingested ledger"
    );

    Ingested {
        ledger: sl::Ledger::new(transactions),
        warnings,
    }
}

/// Largest amount a single bill may have. Anything bigger is taken for a typo and kept as missing,
/// which also keeps sums over any realistic ledger far from `Decimal::MAX`.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000, 0)
}

fn transaction(
    position: usize,
    cells: &[&str; 4],
    participants: &sl::Participants,
) -> (sl::Transaction, Vec<ParseError>) {
    let mut warnings = Vec::new();
    let cell = |field: Field| cells[field.column()];

    let date = match parse_date(cell(Field::Date)) {
        Ok(date) => sl::TxnDate::Known(date),
        Err(err) => {
            warnings.push(err.at(position, Field::Date.column()));
            sl::TxnDate::unparsed(cell(Field::Date))
        }
    };

    let amount = match parse_amount(cell(Field::Amount)) {
        Ok(num) if num.is_sign_negative() && !num.is_zero() => {
            warnings.push(
                ParseError::negative_amount(format!("{} is below zero", num))
                    .at(position, Field::Amount.column()),
            );
            sl::Amount::missing(cell(Field::Amount))
        }
        Ok(num) if num > max_amount() => {
            warnings.push(
                ParseError::amount_too_large(format!("{} is above {}", num, max_amount()))
                    .at(position, Field::Amount.column()),
            );
            sl::Amount::missing(cell(Field::Amount))
        }
        Ok(num) if num.is_zero() => sl::Amount::Value(num.abs()),
        Ok(num) => sl::Amount::Value(num),
        Err(err) => {
            warnings.push(err.at(position, Field::Amount.column()));
            sl::Amount::missing(cell(Field::Amount))
        }
    };

    let payer = cell(Field::Payer);
    if !participants.is_registered(payer) {
        warnings.push(ParseError::unregistered_payer(payer).at(position, Field::Payer.column()));
    }

    let txn = sl::Transaction::builder()
        .id(sl::RowId::new(position, cells))
        .date(date)
        .payer(payer.to_string())
        .merchant(cell(Field::Merchant).to_string())
        .amount(amount)
        .build();
    (txn, warnings)
}
