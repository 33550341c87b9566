// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rupeelens::error::EngineError;
use rupeelens::loan;
use rupeelens::models::{Lifestyle, LoanTerms, Necessity, Transaction, TxnType};
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

#[test]
fn default_terms_emi() {
    let emi = loan::monthly_emi(&LoanTerms::default()).unwrap();
    assert_eq!(emi.round_dp(2), dec!(24910.03));
}

#[test]
fn zero_rate_emi_is_straight_line() {
    let terms = LoanTerms {
        principal: dec!(120000),
        annual_rate: Decimal::ZERO,
        term_months: 12,
    };
    assert_eq!(loan::monthly_emi(&terms).unwrap(), dec!(10000));
}

#[test]
fn invalid_terms_are_rejected() {
    let zero_principal = LoanTerms {
        principal: Decimal::ZERO,
        ..LoanTerms::default()
    };
    assert!(matches!(
        loan::monthly_emi(&zero_principal),
        Err(EngineError::InvalidLoanTerms(_))
    ));
    let zero_term = LoanTerms {
        term_months: 0,
        ..LoanTerms::default()
    };
    assert!(matches!(
        loan::monthly_emi(&zero_term),
        Err(EngineError::InvalidLoanTerms(_))
    ));
    let negative_rate = LoanTerms {
        annual_rate: dec!(-0.01),
        ..LoanTerms::default()
    };
    assert!(matches!(
        loan::monthly_emi(&negative_rate),
        Err(EngineError::InvalidLoanTerms(_))
    ));
}

#[test]
fn baseline_schedule_runs_full_term_and_closes() {
    let s = loan::schedule(&LoanTerms::default(), Decimal::ZERO).unwrap();
    assert_eq!(s.months(), 60);
    assert_eq!(s.monthly_emi, dec!(24910.03));
    assert_eq!(s.rows.last().unwrap().closing_balance, Decimal::ZERO);
    // Calendar origin is July 2025.
    assert_eq!(s.rows[0].month, "Jul");
    assert_eq!(s.rows[0].year, 2025);
    assert_eq!(s.rows[6].year, 2026);
}

#[test]
fn schedule_rows_conserve_balance() {
    let s = loan::schedule(&LoanTerms::default(), Decimal::ZERO).unwrap();
    for pair in s.rows.windows(2) {
        assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
    }
    let principal_repaid: Decimal = s.rows.iter().map(|r| r.principal_component).sum();
    assert!((principal_repaid - dec!(1200000)).abs() < dec!(1));
    for r in &s.rows {
        assert!((r.payment - r.principal_component - r.interest_component).abs() < dec!(0.02));
    }
}

#[test]
fn annual_prepayment_shortens_the_loan() {
    let baseline = loan::schedule(&LoanTerms::default(), Decimal::ZERO).unwrap();
    let optimized = loan::schedule(&LoanTerms::default(), dec!(50000)).unwrap();
    assert_eq!(optimized.months(), 50);
    assert!(optimized.total_interest < baseline.total_interest);
    let saved = baseline.total_interest - optimized.total_interest;
    assert!(saved > dec!(50000) && saved < dec!(58000));
}

#[test]
fn lifestyle_inference() {
    assert_eq!(
        loan::infer_lifestyle(["school_fees", "food"]),
        Lifestyle::MarriedWithChildren
    );
    assert_eq!(
        loan::infer_lifestyle(["rent", "food", "travel"]),
        Lifestyle::BachelorAlone
    );
    assert_eq!(
        loan::infer_lifestyle(["food", "travel"]),
        Lifestyle::UnmarriedWithFamily
    );
    assert_eq!(
        loan::infer_lifestyle(std::iter::empty::<&str>()),
        Lifestyle::UnmarriedWithFamily
    );
}

#[test]
fn thresholds_shift_with_lifestyle() {
    let bachelor = loan::category_thresholds(dec!(10000), Lifestyle::BachelorAlone);
    assert_eq!(bachelor.get("food"), Some(&dec!(1200)));
    assert_eq!(bachelor.get("entertainment"), Some(&dec!(600)));
    assert_eq!(bachelor.get("festival"), Some(&dec!(500)));
    assert!(bachelor.get("salary").is_none());

    let family = loan::category_thresholds(dec!(10000), Lifestyle::UnmarriedWithFamily);
    assert_eq!(family.get("food"), Some(&dec!(900)));
    assert_eq!(family.get("festival"), Some(&dec!(300)));

    let married = loan::category_thresholds(dec!(10000), Lifestyle::MarriedWithChildren);
    assert_eq!(married.get("food"), Some(&dec!(1200)));
    assert_eq!(married.get("festival"), Some(&dec!(700)));
    assert_eq!(married.get("health"), Some(&dec!(1300)));
}

#[test]
fn thresholds_never_negative() {
    let t = loan::category_thresholds(Decimal::ZERO, Lifestyle::BachelorAlone);
    assert!(t.values().all(|v| *v >= Decimal::ZERO));
}

fn optimize_batch() -> Vec<Transaction> {
    vec![
        txn("1", "2025-07-01T09:00:00Z", "Monthly salary credited", "50000", TxnType::Received, Some("salary")),
        txn("2", "2025-07-02T10:00:00Z", "House rent", "15000", TxnType::Expense, Some("rent")),
        txn("3", "2025-07-05T12:00:00Z", "Groceries", "3000", TxnType::Expense, Some("food")),
        txn("4", "2025-07-12T19:00:00Z", "Restaurant dinner", "2500", TxnType::Expense, Some("food")),
        txn("5", "2025-07-20T13:00:00Z", "Food delivery", "1000", TxnType::Expense, Some("food")),
    ]
}

fn flat_terms() -> LoanTerms {
    LoanTerms {
        principal: dec!(120000),
        annual_rate: Decimal::ZERO,
        term_months: 12,
    }
}

#[test]
fn first_exceedance_caps_category_budget() {
    // Bachelor profile: food budget is 12% of (50,000 - 10,000) = 4,800.
    let result = loan::optimize(&optimize_batch(), &flat_terms()).unwrap();
    assert_eq!(result.lifestyle, Lifestyle::BachelorAlone);
    assert_eq!(result.monthly_emi, dec!(10000));

    let by_desc = |d: &str| {
        result
            .flagged
            .iter()
            .find(|f| f.description == d)
            .unwrap()
            .clone()
    };
    let salary = by_desc("Monthly salary credited");
    assert_eq!(salary.necessity, Necessity::Income);

    let rent = by_desc("House rent");
    assert_eq!(rent.necessity, Necessity::Necessary);
    assert_eq!(rent.non_essential_amount, Decimal::ZERO);

    // 3,000 fits; 2,500 crosses 4,800 so 700 spills; the last 1,000 is all excess.
    assert_eq!(by_desc("Groceries").non_essential_amount, Decimal::ZERO);
    let crossing = by_desc("Restaurant dinner");
    assert_eq!(crossing.necessity, Necessity::ThresholdExceeded);
    assert_eq!(crossing.non_essential_amount, dec!(700));
    assert_eq!(by_desc("Food delivery").non_essential_amount, dec!(1000));

    assert_eq!(result.total_non_essential, dec!(1700));
}

#[test]
fn monthly_summary_and_advice() {
    let result = loan::optimize(&optimize_batch(), &flat_terms()).unwrap();
    assert_eq!(result.monthly.len(), 1);
    let m = &result.monthly[0];
    assert_eq!(m.month, "2025-07");
    assert_eq!(m.salary, dec!(50000));
    assert_eq!(m.remaining, dec!(40000));
    assert_eq!(m.non_essential, dec!(1700));
    // 1,700 is well under 15% of salary.
    assert_eq!(m.advice, "Good control on spending.");
}

#[test]
fn heavy_spending_draws_a_warning() {
    let mut batch = optimize_batch();
    batch.push(txn(
        "6", "2025-07-25T16:00:00Z", "Jewellery", "30000", TxnType::Expense, Some("shopping"),
    ));
    let result = loan::optimize(&batch, &flat_terms()).unwrap();
    // Shopping budget is 6% of 40,000 = 2,400; the 30,000 spend spills 27,600.
    assert_eq!(result.total_non_essential, dec!(1700) + dec!(27600));
    assert_eq!(
        result.monthly[0].advice,
        "High unnecessary expenses. Consider reviewing your budget."
    );
}

#[test]
fn undated_rows_are_dropped_and_all_undated_errors() {
    let mut batch = optimize_batch();
    batch.push(txn("7", "garbage", "Mystery", "500", TxnType::Expense, Some("food")));
    let result = loan::optimize(&batch, &flat_terms()).unwrap();
    assert!(!result.flagged.iter().any(|f| f.description == "Mystery"));

    let undated = vec![txn("1", "garbage", "Mystery", "500", TxnType::Expense, None)];
    assert!(matches!(
        loan::optimize(&undated, &flat_terms()),
        Err(EngineError::EmptyBatch)
    ));
}

#[test]
fn optimize_compares_schedules() {
    let result = loan::optimize(&optimize_batch(), &LoanTerms::default()).unwrap();
    assert_eq!(result.baseline.months(), 60);
    assert!(result.optimized.months() <= result.baseline.months());
    assert_eq!(
        result.months_saved,
        result.baseline.months() - result.optimized.months()
    );
    assert_eq!(
        result.interest_saved,
        result.baseline.total_interest - result.optimized.total_interest
    );
}

#[test]
fn quick_impact_prices_in_whole_months() {
    let avoidable = vec![
        txn("1", "2025-07-01", "Concert tickets", "25000", TxnType::Expense, Some("entertainment")),
        txn("2", "2025-07-02", "Gaming pass", "5000", TxnType::Expense, Some("gaming")),
    ];
    let lines = loan::quick_impact(&avoidable, dec!(9000));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("₹25000.00"));
    assert!(lines[0].contains("2 month(s)"));

    assert!(loan::quick_impact(&avoidable, Decimal::ZERO).is_empty());
}
