use std::error::Error;
use std::fmt;

use pest::Span;
use splitledger_core::Field;

use super::Rule;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// An error was encountered while converting string to a numeric representation.
    DecimalError { message: String },
    /// Cell does not have the expected shape.
    InvalidInput { message: String },
    /// Cell has the shape of a date but names a day that does not exist.
    InvalidDate { message: String },
    /// Amount parsed fine but is below zero.
    NegativeAmount { message: String },
    /// Amount parsed fine but is too large to be a bill.
    AmountTooLarge { message: String },
    /// Row has fewer cells than there are columns.
    ShortRow { message: String },
    /// Payer is neither of the two participants.
    UnregisteredPayer { message: String },
    /// Parser has reached an invalid state (most likely a bug in the parser).
    InvalidParserState { message: String },
}

/// A problem with a stored row.
///
/// Ingestion recovers from every one of these by substituting a missing value, so they are
/// reported as warnings alongside the ledger rather than failing the read.
#[derive(Debug)]
pub struct ParseError {
    /// The type of error.
    pub kind: ParseErrorKind,
    /// The (zero-based data row, column) the error was found at, when known.
    pub location: Option<(usize, usize)>,
    source: Option<Box<dyn Error + 'static + Send + Sync>>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::DecimalError { message } => {
                write!(f, "{}", message)?;
            }
            ParseErrorKind::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)?;
            }
            ParseErrorKind::InvalidDate { message } => {
                write!(f, "Invalid date: {}", message)?;
            }
            ParseErrorKind::NegativeAmount { message } => {
                write!(f, "Negative amount: {}", message)?;
            }
            ParseErrorKind::AmountTooLarge { message } => {
                write!(f, "Amount too large: {}", message)?;
            }
            ParseErrorKind::ShortRow { message } => {
                write!(f, "Short row: {}", message)?;
            }
            ParseErrorKind::UnregisteredPayer { message } => {
                write!(f, "Unregistered payer: {}", message)?;
            }
            ParseErrorKind::InvalidParserState { message } => {
                write!(f, "Parser has reached an invalid state (please report this as a bug): expected {}", message)?;
            }
        }
        if let Some((row, column)) = self.location {
            match Field::from_column(column) {
                Some(field) => write!(f, " at row {} ({})", row, field)?,
                None => write!(f, " at row {} column {}", row, column)?,
            }
        }
        Ok(())
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl ParseError {
    fn new(kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            location: None,
            source: None,
        }
    }

    /// Attaches the cell coordinates the error belongs to.
    pub fn at(mut self, row: usize, column: usize) -> ParseError {
        self.location = Some((row, column));
        self
    }

    pub(crate) fn invalid_state<T: ToString>(msg: T) -> ParseError {
        ParseError::new(ParseErrorKind::InvalidParserState {
            message: msg.to_string(),
        })
    }

    pub(crate) fn invalid_date<T: ToString>(msg: T) -> ParseError {
        ParseError::new(ParseErrorKind::InvalidDate {
            message: msg.to_string(),
        })
    }

    pub(crate) fn negative_amount<T: ToString>(msg: T) -> ParseError {
        ParseError::new(ParseErrorKind::NegativeAmount {
            message: msg.to_string(),
        })
    }

    pub(crate) fn amount_too_large<T: ToString>(msg: T) -> ParseError {
        ParseError::new(ParseErrorKind::AmountTooLarge {
            message: msg.to_string(),
        })
    }

    pub(crate) fn short_row(found: usize) -> ParseError {
        ParseError::new(ParseErrorKind::ShortRow {
            message: format!("expected 4 cells, found {}", found),
        })
    }

    pub(crate) fn unregistered_payer(payer: &str) -> ParseError {
        ParseError::new(ParseErrorKind::UnregisteredPayer {
            message: format!("'{}' is not one of the two participants", payer),
        })
    }

    pub(crate) fn decimal_parse_error(err: rust_decimal::Error, span: Span<'_>) -> ParseError {
        let message = format!("error while parsing number: {}", err);
        let pest_error = pest::error::Error::new_from_span(
            pest::error::ErrorVariant::<Rule>::CustomError { message },
            span,
        );
        ParseError {
            kind: ParseErrorKind::DecimalError {
                message: format!("{}", pest_error),
            },
            location: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let err = err.renamed_rules(|rule| {
            match *rule {
                Rule::EOI => "end of cell",
                Rule::year => "4-digit year",
                Rule::month => "1- or 2-digit month",
                Rule::day => "1- or 2-digit day",
                Rule::date => "date (YYYY-MM-DD)",
                Rule::sign => "'-'",
                Rule::int => "integer",
                Rule::separated_int => "integer with thousands separators",
                Rule::fraction => "fractional part",
                Rule::num => "number",
                other => return format!("{:?}", other),
            }
            .to_string()
        });
        ParseError {
            kind: ParseErrorKind::InvalidInput {
                message: format!("{}", err),
            },
            location: None,
            source: Some(Box::new(err)),
        }
    }
}
