use std::{io, io::Write};

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use splitledger_core::Participants;

use crate::aggregate::{MonthlyBucket, Summary};
use crate::projection::MerchantStat;
use crate::reconcile::Reconciliation;

/// Writes the summary table, tab separated, one period per line.
pub fn render<W: Write>(
    w: &mut W,
    summary: &Summary,
    participants: &Participants,
) -> Result<(), RenderError> {
    TableRenderer::new(participants).render(summary, w)
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("an io error occurred")]
    Io(#[from] io::Error),
}

pub trait Renderer<T, W: Write> {
    type Error;
    fn render(&self, renderable: T, write: &mut W) -> Result<(), Self::Error>;
}

/// Plain-text renderer for summary tables and their companions.
#[derive(Copy, Clone, Debug)]
pub struct TableRenderer<'p> {
    participants: &'p Participants,
}

impl<'p> TableRenderer<'p> {
    pub fn new(participants: &'p Participants) -> Self {
        TableRenderer { participants }
    }
}

impl<'a, W: Write> Renderer<&'a Summary, W> for TableRenderer<'_> {
    type Error = RenderError;
    fn render(&self, summary: &'a Summary, w: &mut W) -> Result<(), Self::Error> {
        let with_others = summary.total().others.count > 0;
        let (first, second) = (&self.participants.first, &self.participants.second);
        write!(
            w,
            "Month\t{first}\t{second}\tMonthly Difference\tRunning Balance\t{first} (Count)\t{second} (Count)\tCount Difference",
            first = first,
            second = second
        )?;
        if with_others {
            write!(w, "\tOthers\tOthers (Count)")?;
        }
        writeln!(w)?;
        for bucket in summary.rows() {
            self.render(bucket, w)?;
            if with_others {
                write!(
                    w,
                    "\t{}\t{}",
                    format_currency(bucket.others.sum),
                    bucket.others.count
                )?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a MonthlyBucket, W> for TableRenderer<'_> {
    type Error = RenderError;
    fn render(&self, bucket: &'a MonthlyBucket, w: &mut W) -> Result<(), Self::Error> {
        write!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            bucket.period,
            format_currency(bucket.first.sum),
            format_currency(bucket.second.sum),
            format_currency(bucket.difference()),
            format_currency(bucket.running_balance),
            bucket.first.count,
            bucket.second.count,
            bucket.count_difference()
        )?;
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a Reconciliation, W> for TableRenderer<'_> {
    type Error = RenderError;
    fn render(&self, reconciliation: &'a Reconciliation, w: &mut W) -> Result<(), Self::Error> {
        match reconciliation {
            Reconciliation::Even => writeln!(w, "Even")?,
            Reconciliation::Owes {
                debtor,
                creditor,
                amount,
            } => writeln!(w, "{} owes {} {}", debtor, creditor, format_currency(*amount))?,
        }
        Ok(())
    }
}

impl<'a, W: Write> Renderer<&'a [MerchantStat], W> for TableRenderer<'_> {
    type Error = RenderError;
    fn render(&self, stats: &'a [MerchantStat], w: &mut W) -> Result<(), Self::Error> {
        writeln!(w, "Restaurant\tVisits\tSpent")?;
        for stat in stats {
            writeln!(
                w,
                "{}\t{}\t{}",
                stat.merchant,
                stat.visits,
                format_currency(stat.spend)
            )?;
        }
        Ok(())
    }
}

/// Formats an amount as dollars with thousands separators and two decimals: `-$1,234.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.2}", rounded.abs());
    let (int, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, frac)
}
