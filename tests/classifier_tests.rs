// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rupeelens::classify::{salary_period, Classifier};
use rupeelens::models::{IncomeHead, Transaction, TxnType};
use rupeelens::rules::ClassifierRules;
use rust_decimal_macros::dec;
use std::io::Write;

fn txn(desc: &str, amount: &str, kind: TxnType, category: Option<&str>) -> Transaction {
    Transaction {
        id: "t1".into(),
        created_at: "2025-07-01T10:00:00Z".into(),
        description: desc.into(),
        amount: amount.parse().unwrap(),
        kind,
        category: category.map(|c| c.into()),
    }
}

#[test]
fn food_keyword_overrides_record_category() {
    let c = Classifier::with_defaults();
    let t = txn("Zomato order 1234", "450", TxnType::Expense, Some("shopping"));
    assert_eq!(c.resolve_category(&t), "food");
}

#[test]
fn investment_keyword_sets_category_and_flag() {
    let c = Classifier::with_defaults();
    let t = txn("LIC premium payment", "25000", TxnType::Sent, None);
    assert_eq!(c.resolve_category(&t), "investment");
    assert!(c.matches_investment(&t.description));
}

#[test]
fn record_category_kept_else_other() {
    let c = Classifier::with_defaults();
    let kept = txn("Electricity bill", "1200", TxnType::Expense, Some("utilities"));
    assert_eq!(c.resolve_category(&kept), "utilities");
    let blank = txn("Misc transfer", "100", TxnType::Sent, Some("  "));
    assert_eq!(c.resolve_category(&blank), "Other");
    let none = txn("Misc transfer", "100", TxnType::Sent, None);
    assert_eq!(c.resolve_category(&none), "Other");
}

#[test]
fn avoidable_is_strictly_above_floor() {
    let c = Classifier::with_defaults();
    let big = txn("Movie night", "1500", TxnType::Expense, Some("entertainment"));
    assert!(c.is_avoidable("entertainment", &big));
    let small = txn("Movie night", "900", TxnType::Expense, Some("entertainment"));
    assert!(!c.is_avoidable("entertainment", &small));
    let at_floor = txn("Movie night", "1000", TxnType::Expense, Some("entertainment"));
    assert!(!c.is_avoidable("entertainment", &at_floor));
    // Non-avoidable category never flags, regardless of size.
    let groceries = txn("Monthly groceries", "8000", TxnType::Expense, Some("groceries"));
    assert!(!c.is_avoidable("groceries", &groceries));
}

#[test]
fn salary_head_by_keyword() {
    let c = Classifier::with_defaults();
    let t = txn("Salary - March 2025", "50000", TxnType::Received, None);
    assert_eq!(c.income_head(&t), Some(IncomeHead::Salary));
}

#[test]
fn house_property_head_by_pattern() {
    let c = Classifier::with_defaults();
    let t = txn("Rent received for flat 4B", "18000", TxnType::Received, None);
    assert_eq!(c.income_head(&t), Some(IncomeHead::HouseProperty));
}

#[test]
fn unmatched_received_falls_to_other_sources() {
    let c = Classifier::with_defaults();
    let t = txn("Refund from vendor", "900", TxnType::Received, None);
    assert_eq!(c.income_head(&t), Some(IncomeHead::OtherSources));
}

#[test]
fn non_received_never_gets_a_head() {
    let c = Classifier::with_defaults();
    let t = txn("Salary - March 2025", "50000", TxnType::Sent, None);
    assert_eq!(c.income_head(&t), None);
}

#[test]
fn salary_period_parses_month_marker() {
    let d = salary_period("Salary - March 2025").unwrap();
    assert_eq!(d, chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    let en_dash = salary_period("Salary – July 2024").unwrap();
    assert_eq!(en_dash, chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
}

#[test]
fn salary_period_rejects_bogus_month() {
    assert!(salary_period("Salary - Marchh 2025").is_none());
    assert!(salary_period("Grocery run").is_none());
}

#[test]
fn custom_rules_file_replaces_tables() {
    let mut rules = ClassifierRules::default();
    rules.food_keywords = vec!["canteen".to_string()];
    rules.avoidable_floor = dec!(500);

    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "{}", serde_json::to_string(&rules).unwrap()).unwrap();

    let loaded = ClassifierRules::from_json_file(f.path().to_str().unwrap()).unwrap();
    let c = Classifier::new(loaded).unwrap();

    let t = txn("Office canteen lunch", "120", TxnType::Expense, None);
    assert_eq!(c.resolve_category(&t), "food");
    // Zomato is no longer a food keyword under the custom tables.
    let z = txn("Zomato order", "450", TxnType::Expense, None);
    assert_eq!(c.resolve_category(&z), "Other");
    let small = txn("Gaming pass", "600", TxnType::Expense, Some("gaming"));
    assert!(c.is_avoidable("gaming", &small));
}
