use chrono::NaiveDate;
use indoc::indoc;
use rust_decimal::Decimal;
use splitledger_core::{Ledger, Participants, YearMonth};
use splitledger_parser::ingest;

use crate::*;

fn ledger(sheet: &str) -> Ledger {
    let rows: Vec<Vec<&str>> = sheet.lines().map(|l| l.split(',').collect()).collect();
    ingest(&rows, &Participants::default()).ledger
}

fn month(year: i32, month: u32) -> Period {
    Period::Month(YearMonth::new(year, month).unwrap())
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

const SHEET: &str = indoc!(
    "
    Date,Name,Restaurant,Amount
    2024-01-01,Katy,Ramen,30
    2024-01-02,Sebastien,Ramen,10
    2024-02-10,Sebastien,Pho,25.50
    "
);

#[test]
fn test_summary_table() -> anyhow::Result<()> {
    let participants = Participants::default();
    let summary = summarize(&ledger(SHEET), &participants);

    let mut rendered = Vec::new();
    render(&mut rendered, &summary, &participants)?;
    let rendered = String::from_utf8(rendered)?;

    assert_eq!(
        rendered,
        indoc!(
            "
            Month\tKaty\tSebastien\tMonthly Difference\tRunning Balance\tKaty (Count)\tSebastien (Count)\tCount Difference
            2024-02\t$0.00\t$25.50\t-$25.50\t-$5.50\t0\t1\t-1
            2024-01\t$30.00\t$10.00\t$20.00\t$20.00\t1\t1\t0
            Total\t$30.00\t$35.50\t-$5.50\t-$5.50\t1\t2\t-1
            "
        )
    );
    Ok(())
}

#[test]
fn test_others_column_only_when_present() -> anyhow::Result<()> {
    let participants = Participants::default();
    let summary = summarize(
        &ledger(indoc!(
            "
            Date,Name,Restaurant,Amount
            2024-03-01,Alex,Ramen,8
            "
        )),
        &participants,
    );

    let mut rendered = Vec::new();
    render(&mut rendered, &summary, &participants)?;
    let rendered = String::from_utf8(rendered)?;

    let mut lines = rendered.lines();
    assert!(lines.next().unwrap_or_default().ends_with("\tOthers\tOthers (Count)"));
    assert_eq!(
        lines.next(),
        Some("2024-03\t$0.00\t$0.00\t$0.00\t$0.00\t0\t0\t0\t$8.00\t1")
    );
    Ok(())
}

#[test]
fn test_two_bills_in_one_month() {
    let participants = Participants::default();
    let ledger = ledger(indoc!(
        "
        Date,Name,Restaurant,Amount
        2024-01-01,Katy,Ramen,30
        2024-01-02,Sebastien,Ramen,10
        "
    ));
    let summary = summarize(&ledger, &participants);
    let total = summary.total();

    assert_eq!((total.first.sum, total.first.count), (dec("30"), 1));
    assert_eq!((total.second.sum, total.second.count), (dec("10"), 1));
    assert_eq!(fair_share(total.first.sum, total.second.sum), dec("20"));

    let reconciliation = Reconciler::default().reconcile_summary(&summary, &participants);
    assert_eq!(reconciliation.to_string(), "Sebastien owes Katy 10.00");
}

#[test]
fn test_buckets_add_up_to_total() {
    let participants = Participants::default();
    let summary = summarize(
        &ledger(indoc!(
            "
            Date,Name,Restaurant,Amount
            2023-12-31,Katy,Imperial,12.25
            2024-01-01,Katy,Ramen,30
            not a date,Sebastien,Ramen,7
            2024-01-02,Sebastien,Ramen,oops
            2024-03-15,Sebastien,Pho,25.50
            2024-03-16,Alex,Pho,9
            2024-03-17,Katy,Pho,1.10
            "
        )),
        &participants,
    );

    let buckets = summary.buckets();
    let total = summary.total();
    let sum = |f: fn(&MonthlyBucket) -> Decimal| buckets.iter().map(f).sum::<Decimal>();
    let count = |f: fn(&MonthlyBucket) -> u64| buckets.iter().map(f).sum::<u64>();

    assert_eq!(sum(|b| b.first.sum), total.first.sum);
    assert_eq!(sum(|b| b.second.sum), total.second.sum);
    assert_eq!(sum(|b| b.others.sum), total.others.sum);
    assert_eq!(count(|b| b.first.count), total.first.count);
    assert_eq!(count(|b| b.second.count), total.second.count);
    assert_eq!(sum(|b| b.difference()), total.difference());
    assert_eq!(total.running_balance, total.difference());

    assert_eq!(total.second.missing, 1);
    assert_eq!(total.second.count, 3);
    assert_eq!(total.second.sum, dec("32.50"));
}

#[test]
fn test_bucket_order_and_running_balance() {
    let participants = Participants::default();
    let summary = summarize(
        &ledger(indoc!(
            "
            Date,Name,Restaurant,Amount
            2024-03-15,Sebastien,Pho,5
            2023-12-31,Katy,Imperial,10
            not a date,Katy,Ramen,1
            2024-01-01,Katy,Ramen,2
            "
        )),
        &participants,
    );

    let periods: Vec<Period> = summary.rows().map(|b| b.period).collect();
    assert_eq!(
        periods,
        vec![
            month(2024, 3),
            month(2024, 1),
            month(2023, 12),
            Period::Undated,
            Period::Total
        ]
    );

    assert_eq!(
        summary.running_balance(),
        vec![
            (Period::Undated, dec("1")),
            (month(2023, 12), dec("11")),
            (month(2024, 1), dec("13")),
            (month(2024, 3), dec("8")),
        ]
    );
    assert_eq!(summary.total().running_balance, dec("8"));
}

#[test]
fn test_summary_is_idempotent() {
    let participants = Participants::default();
    let ledger = ledger(SHEET);
    assert_eq!(
        summarize(&ledger, &participants),
        summarize(&ledger, &participants)
    );
}

#[test]
fn test_empty_ledger() {
    let participants = Participants::default();
    let summary = summarize(&Ledger::default(), &participants);

    assert!(summary.is_empty());
    assert_eq!(summary.rows().count(), 1);
    assert_eq!(summary.total().period, Period::Total);
    assert_eq!(summary.total().first, Tally::default());
    assert_eq!(summary.total().second, Tally::default());
    assert_eq!(summary.total().running_balance, Decimal::ZERO);

    let reconciliation = Reconciler::default().reconcile_summary(&summary, &participants);
    assert_eq!(reconciliation, Reconciliation::Even);
    assert_eq!(reconciliation.amount(), Decimal::ZERO);
}

#[test]
fn test_unregistered_payers_stay_out_of_the_split() {
    let participants = Participants::default();
    let summary = summarize(
        &ledger(indoc!(
            "
            Date,Name,Restaurant,Amount
            2024-01-01,Katy,Ramen,20
            2024-01-01,Alex,Ramen,500
            2024-01-02,Sebastien,Ramen,20
            "
        )),
        &participants,
    );
    assert_eq!(summary.total().others.sum, dec("500"));
    assert_eq!(
        Reconciler::default().reconcile_summary(&summary, &participants),
        Reconciliation::Even
    );
}

#[test]
fn test_oversized_amounts_are_left_out() {
    let participants = Participants::default();
    let sheet = indoc!(
        "
        Date,Name,Restaurant,Amount
        2024-01-01,Katy,Ramen,79228162514264337593543950335
        2024-01-02,Katy,Ramen,79228162514264337593543950335
        2024-01-03,Sebastien,Pho,20
        "
    );
    let rows: Vec<Vec<&str>> = sheet.lines().map(|l| l.split(',').collect()).collect();
    let ingested = ingest(&rows, &participants);
    assert_eq!(ingested.warnings.len(), 2);

    let summary = summarize(&ingested.ledger, &participants);
    assert_eq!(summary.total().first.sum, Decimal::ZERO);
    assert_eq!(summary.total().first.missing, 2);
    assert_eq!(
        Reconciler::default()
            .reconcile_summary(&summary, &participants)
            .to_string(),
        "Katy owes Sebastien 10.00"
    );
}

#[test]
fn test_sums_saturate_instead_of_overflowing() {
    use splitledger_core::{Amount, RowId, Transaction, TxnDate};

    let participants = Participants::default();
    let date = TxnDate::Known(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    let huge = |position: usize, payer: &str| {
        Transaction::builder()
            .id(RowId::new(position, &["2024-01-01", payer, "Ramen", "huge"]))
            .date(date.clone())
            .payer(payer.to_string())
            .merchant("Ramen".to_string())
            .amount(Amount::Value(Decimal::MAX))
            .build()
    };
    let ledger = Ledger::new(vec![huge(0, "Katy"), huge(1, "Katy"), huge(2, "Sebastien")]);

    let summary = summarize(&ledger, &participants);
    assert_eq!(summary.total().first.sum, Decimal::MAX);
    assert_eq!(summary.total().first.count, 2);
    assert_eq!(summary.total().running_balance, Decimal::ZERO);
    assert_eq!(
        Reconciler::default().reconcile_summary(&summary, &participants),
        Reconciliation::Even
    );

    assert_eq!(top_by_spend(&ledger, 1)[0].spend, Decimal::MAX);
    assert_eq!(monthly_by_payer(&ledger, None)[0].spend, Decimal::MAX);
}

#[test]
fn test_top_merchants_break_ties_by_first_appearance() {
    let ledger = ledger(indoc!(
        "
        Date,Name,Restaurant,Amount
        2024-01-01,Katy,Pho,10
        2024-01-02,Katy,Ramen,30
        2024-01-03,Katy,Imperial,10
        2024-01-04,Katy,Ramen,5
        2024-01-05,Katy,Indian,20
        "
    ));

    let visits: Vec<(String, u64)> = top_by_visits(&ledger, 3)
        .into_iter()
        .map(|s| (s.merchant, s.visits))
        .collect();
    assert_eq!(
        visits,
        vec![
            ("Ramen".to_string(), 2),
            ("Pho".to_string(), 1),
            ("Imperial".to_string(), 1)
        ]
    );

    let spend: Vec<String> = top_by_spend(&ledger, 5)
        .into_iter()
        .map(|s| s.merchant)
        .collect();
    assert_eq!(spend, vec!["Ramen", "Indian", "Pho", "Imperial"]);
}

#[test]
fn test_merchant_table() -> anyhow::Result<()> {
    let participants = Participants::default();
    let stats = top_by_visits(&ledger(SHEET), 5);

    let mut rendered = Vec::new();
    TableRenderer::new(&participants).render(stats.as_slice(), &mut rendered)?;

    assert_eq!(
        String::from_utf8(rendered)?,
        indoc!(
            "
            Restaurant\tVisits\tSpent
            Ramen\t2\t$40.00
            Pho\t1\t$25.50
            "
        )
    );
    Ok(())
}

#[test]
fn test_recent_window_is_exclusive() {
    let ledger = ledger(indoc!(
        "
        Date,Name,Restaurant,Amount
        2024-01-01,Katy,Pho,10
        2024-01-02,Katy,Ramen,30
        someday,Katy,Ramen,30
        2024-04-01,Sebastien,Imperial,10
        "
    ));
    let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());

    // 2024-04-01 minus 90 days is 2024-01-02
    let merchants: Vec<&str> = recent(&ledger, clock.today(), 90)
        .into_iter()
        .map(|t| t.merchant.as_str())
        .collect();
    assert_eq!(merchants, vec!["Imperial"]);

    assert_eq!(recent(&ledger, clock.today(), 91).len(), 2);
}

#[test]
fn test_monthly_by_payer() {
    let ledger = ledger(indoc!(
        "
        Date,Name,Restaurant,Amount
        2024-02-01,Sebastien,Pho,10
        2024-01-02,Katy,Ramen,30
        2024-01-09,Katy,Ramen,5
        2024-03-01,Alex,Ramen,1
        2024-02-03,Katy,Ramen,2
        "
    ));

    let all: Vec<(String, String, Decimal)> = monthly_by_payer(&ledger, None)
        .into_iter()
        .map(|p| (p.month.to_string(), p.payer, p.spend))
        .collect();
    assert_eq!(
        all,
        vec![
            ("2024-01".to_string(), "Katy".to_string(), dec("35")),
            ("2024-02".to_string(), "Katy".to_string(), dec("2")),
            ("2024-02".to_string(), "Sebastien".to_string(), dec("10")),
            ("2024-03".to_string(), "Alex".to_string(), dec("1")),
        ]
    );

    let latest = monthly_by_payer(&ledger, Some(2));
    assert_eq!(latest.len(), 3);
    assert_eq!(latest[0].month, YearMonth::new(2024, 2).unwrap());
    assert_eq!(monthly_by_payer(&ledger, Some(10)).len(), 4);
    assert!(monthly_by_payer(&ledger, Some(0)).is_empty());
}

#[test]
fn test_visit_split() {
    let summary = summarize(&ledger(SHEET), &Participants::default());
    let split = VisitSplit::from_summary(&summary);
    assert_eq!((split.first, split.second), (1, 2));
    assert_eq!(split.first_share().map(|s| s.round_dp(4)), Some(dec("0.3333")));
    assert_eq!(VisitSplit::default().first_share(), None);
}

#[test]
fn test_filters() {
    let ledger = ledger(indoc!(
        "
        Date,Name,Restaurant,Amount
        2024-01-01,Katy,Miss Pho,10
        2024-01-02,Sebastien,Ramen,30
        someday,Katy,Pho King,30
        2024-02-01,Katy,Ramen,4
        "
    ));

    let search = TransactionFilter::builder()
        .search(Some("pho".to_string()))
        .build();
    assert_eq!(search.apply(&ledger).len(), 2);

    let katy_in_january = TransactionFilter::builder()
        .payer(Some("Katy".to_string()))
        .month(MonthFilter::Month(YearMonth::new(2024, 1).unwrap()))
        .build();
    let found = katy_in_january.apply(&ledger);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].merchant, "Miss Pho");

    let undated = TransactionFilter::builder().month(MonthFilter::Undated).build();
    assert_eq!(undated.apply(&ledger)[0].merchant, "Pho King");

    assert_eq!(TransactionFilter::default().apply(&ledger).len(), 4);

    let months: Vec<String> = available_months(&ledger)
        .iter()
        .map(|m| m.to_string())
        .collect();
    assert_eq!(months, vec!["2024-02", "2024-01", "Undated"]);
}

#[test]
fn test_format_currency() {
    assert_eq!(format_currency(dec("0")), "$0.00");
    assert_eq!(format_currency(dec("5")), "$5.00");
    assert_eq!(format_currency(dec("999.999")), "$1,000.00");
    assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
    assert_eq!(format_currency(dec("-25.5")), "-$25.50");
    assert_eq!(format_currency(dec("-0.001")), "$0.00");
    assert_eq!(format_currency(dec("0.125")), "$0.13");
}
