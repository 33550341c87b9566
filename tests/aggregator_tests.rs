// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rupeelens::analyze::{analyze, analyze_income_heads};
use rupeelens::classify::Classifier;
use rupeelens::error::EngineError;
use rupeelens::models::{IncomeHead, Transaction, TxnType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn txn(id: &str, date: &str, desc: &str, amount: &str, kind: TxnType, cat: Option<&str>) -> Transaction {
    Transaction {
        id: id.into(),
        created_at: date.into(),
        description: desc.into(),
        amount: amount.parse().unwrap(),
        kind,
        category: cat.map(|c| c.into()),
    }
}

fn sample_batch() -> Vec<Transaction> {
    vec![
        txn("1", "2025-07-01T09:00:00Z", "Salary - July 2025", "50000", TxnType::Received, Some("salary")),
        txn("2", "2025-07-03T12:00:00Z", "Zomato order", "450", TxnType::Expense, None),
        txn("3", "2025-07-05T18:30:00Z", "Paid to Ramesh for dinner", "1200", TxnType::Sent, None),
        txn("4", "2025-07-10T10:00:00Z", "LIC premium payment", "15000", TxnType::Sent, None),
        txn("5", "2025-07-15T08:00:00Z", "EMI debit", "24910", TxnType::LoanPayment, Some("loan")),
        txn("6", "2025-07-20T11:00:00Z", "Concert tickets", "2500", TxnType::Expense, Some("entertainment")),
    ]
}

#[test]
fn totals_partition_by_type() {
    let c = Classifier::with_defaults();
    let a = analyze(&sample_batch(), &c).unwrap();
    assert_eq!(a.total_income, dec!(50000));
    // Sent + expense rows only; the loan_payment row is excluded.
    assert_eq!(a.total_expense, dec!(450) + dec!(1200) + dec!(15000) + dec!(2500));
    assert_eq!(a.net_savings, a.total_income - a.total_expense);
}

#[test]
fn category_totals_partition_the_batch() {
    let c = Classifier::with_defaults();
    let batch = vec![
        txn("1", "2025-07-01T09:00:00Z", "Salary - July 2025", "50000", TxnType::Received, Some("salary")),
        txn("2", "2025-07-03T12:00:00Z", "Zomato order", "450", TxnType::Expense, None),
        txn("3", "2025-07-10T10:00:00Z", "LIC premium payment", "15000", TxnType::Sent, None),
        txn("4", "2025-07-12T19:00:00Z", "Concert tickets", "2500", TxnType::Expense, Some("entertainment")),
        txn("5", "2025-07-14T11:00:00Z", "Cash withdrawal", "2000", TxnType::Sent, None),
        txn("6", "2025-07-15T08:00:00Z", "EMI debit", "24910", TxnType::LoanPayment, Some("loan")),
    ];
    let a = analyze(&batch, &c).unwrap();
    // Every row lands in exactly one category, so the category totals
    // partition the batch amount-for-amount.
    let category_sum: Decimal = a.category_totals.values().copied().sum();
    let batch_sum: Decimal = batch.iter().map(|t| t.amount).sum();
    assert_eq!(category_sum, batch_sum);
    // salary, food, investment, entertainment, Other, loan.
    assert_eq!(a.category_totals.len(), 6);
    assert_eq!(a.category_totals.get("Other"), Some(&dec!(2000)));
}

#[test]
fn loan_payment_becomes_reminder_not_expense() {
    let c = Classifier::with_defaults();
    let a = analyze(&sample_batch(), &c).unwrap();
    assert_eq!(a.reminders.len(), 1);
    assert_eq!(a.reminders[0], "Loan payment was due on 2025-07-15 for ₹24910");
}

#[test]
fn person_totals_capture_recipient() {
    let c = Classifier::with_defaults();
    let a = analyze(&sample_batch(), &c).unwrap();
    assert_eq!(a.person_totals.get("Ramesh"), Some(&dec!(1200)));
}

#[test]
fn analysis_is_order_independent() {
    let c = Classifier::with_defaults();
    let batch = sample_batch();
    let mut reversed = batch.clone();
    reversed.reverse();

    let a = analyze(&batch, &c).unwrap();
    let b = analyze(&reversed, &c).unwrap();
    assert_eq!(a.total_income, b.total_income);
    assert_eq!(a.total_expense, b.total_expense);
    assert_eq!(a.category_totals, b.category_totals);
    assert_eq!(a.monthly_totals, b.monthly_totals);
    assert_eq!(a.person_totals, b.person_totals);
}

#[test]
fn empty_batch_is_an_error() {
    let c = Classifier::with_defaults();
    assert!(matches!(analyze(&[], &c), Err(EngineError::EmptyBatch)));
    assert!(matches!(
        analyze_income_heads(&[], &c),
        Err(EngineError::EmptyBatch)
    ));
}

#[test]
fn gst_buckets_track_tagged_categories() {
    let c = Classifier::with_defaults();
    let batch = vec![
        txn("1", "2025-07-01", "Invoice 42 GST", "1800", TxnType::Received, Some("gst_collected")),
        txn("2", "2025-07-02", "Input credit", "600", TxnType::Expense, Some("GST_PAID")),
        txn("3", "2025-07-03", "Salary - July 2025", "50000", TxnType::Received, None),
    ];
    let a = analyze(&batch, &c).unwrap();
    assert_eq!(a.gst.collected, dec!(1800));
    assert_eq!(a.gst.paid, dec!(600));
    assert_eq!(a.gst.net_liability(), dec!(1200));
}

#[test]
fn tds_rows_accumulate_into_tds_paid() {
    let c = Classifier::with_defaults();
    let batch = vec![
        txn("1", "2025-07-01", "TDS deducted by employer", "2000", TxnType::Expense, None),
        txn("2", "2025-07-02", "Salary - July 2025", "50000", TxnType::Received, None),
    ];
    let a = analyze(&batch, &c).unwrap();
    assert_eq!(a.tds_paid, dec!(2000));
    // TDS rows still count toward the expense total.
    assert_eq!(a.total_expense, dec!(2000));
}

#[test]
fn bad_dates_skip_period_totals_only() {
    let c = Classifier::with_defaults();
    let batch = vec![
        txn("1", "not-a-date", "Zomato order", "450", TxnType::Expense, None),
        txn("2", "2025-07-02T10:00:00Z", "Salary - July 2025", "50000", TxnType::Received, None),
    ];
    let a = analyze(&batch, &c).unwrap();
    assert_eq!(a.skipped, 1);
    // The undated row still lands in the category and expense totals.
    assert_eq!(a.total_expense, dec!(450));
    assert_eq!(a.category_totals.get("food"), Some(&dec!(450)));
    assert_eq!(a.monthly_totals.len(), 1);
    assert_eq!(a.monthly_totals.get("July 2025"), Some(&dec!(50000)));
}

#[test]
fn salary_and_investment_ledgers_fill() {
    let c = Classifier::with_defaults();
    let a = analyze(&sample_batch(), &c).unwrap();
    assert_eq!(a.salary_entries.len(), 1);
    assert_eq!(a.salary_entries[0].amount, dec!(50000));
    assert_eq!(a.investment_entries.len(), 1);
    assert_eq!(a.investment_entries[0].description, "LIC premium payment");
}

#[test]
fn avoidable_expenses_collected() {
    let c = Classifier::with_defaults();
    let a = analyze(&sample_batch(), &c).unwrap();
    assert_eq!(a.avoidable_expenses.len(), 1);
    assert_eq!(a.avoidable_expenses[0].description, "Concert tickets");
}

#[test]
fn head_analysis_initializes_all_heads() {
    let c = Classifier::with_defaults();
    let batch = vec![txn(
        "1", "2025-07-01", "Salary - July 2025", "50000", TxnType::Received, None,
    )];
    let h = analyze_income_heads(&batch, &c).unwrap();
    assert_eq!(h.head_totals.len(), 5);
    assert_eq!(h.head_totals.get(&IncomeHead::Salary), Some(&dec!(50000)));
    assert_eq!(h.head_totals.get(&IncomeHead::CapitalGains), Some(&dec!(0)));
    assert_eq!(h.total_income, dec!(50000));
}

#[test]
fn head_analysis_routes_income_and_expense() {
    let c = Classifier::with_defaults();
    let batch = vec![
        txn("1", "2025-07-01", "Salary - July 2025", "100000", TxnType::Received, None),
        txn("2", "2025-07-02", "Rent received for flat", "20000", TxnType::Received, None),
        txn("3", "2025-07-03", "Interest earned on savings", "1500", TxnType::Received, None),
        txn("4", "2025-07-04", "Groceries", "6000", TxnType::Expense, None),
        txn("5", "2025-07-05", "Tax deducted at source", "3000", TxnType::Expense, None),
    ];
    let h = analyze_income_heads(&batch, &c).unwrap();
    assert_eq!(h.head_totals.get(&IncomeHead::Salary), Some(&dec!(100000)));
    assert_eq!(h.head_totals.get(&IncomeHead::HouseProperty), Some(&dec!(20000)));
    assert_eq!(h.head_totals.get(&IncomeHead::OtherSources), Some(&dec!(1500)));
    assert_eq!(h.total_expenses, dec!(6000) + dec!(3000));
    assert_eq!(h.tds_deducted, dec!(3000));
    assert_eq!(h.net_savings, h.total_income - h.total_expenses);
}
