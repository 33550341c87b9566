// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::Classifier;
use crate::error::EngineError;
use crate::models::{
    Analysis, GstBuckets, HeadAnalysis, IncomeHead, LedgerEntry, Transaction, TxnType,
};
use crate::utils::{parse_timestamp, title_case};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

static PERSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:to|sent to|paid to|transfer to|payment to)\s+([a-z]+)").unwrap());

/// Fold a transaction batch into one `Analysis` snapshot in a single pass.
/// Totals are order-independent; per-record problems are logged and the
/// record degrades gracefully rather than aborting the batch.
pub fn analyze(txns: &[Transaction], classifier: &Classifier) -> Result<Analysis, EngineError> {
    if txns.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    let mut category_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut monthly_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut yearly_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut person_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut reminders = Vec::new();
    let mut salary_entries = Vec::new();
    let mut investment_entries = Vec::new();
    let mut avoidable_expenses = Vec::new();
    let mut gst = GstBuckets::default();
    let mut tds_paid = Decimal::ZERO;
    let mut skipped = 0usize;

    for txn in txns {
        let tags = classifier.classify(txn);
        let desc_lower = txn.description.to_lowercase();

        *category_totals.entry(tags.category.clone()).or_default() += txn.amount;

        match parse_timestamp(&txn.created_at) {
            Ok(dt) => {
                *monthly_totals
                    .entry(dt.format("%B %Y").to_string())
                    .or_default() += txn.amount;
                *yearly_totals.entry(dt.format("%Y").to_string()).or_default() += txn.amount;
            }
            Err(_) => {
                warn!(id = %txn.id, created_at = %txn.created_at,
                    "unparseable date, excluded from monthly/yearly totals");
                skipped += 1;
            }
        }

        if let Some(caps) = PERSON_RE.captures(&desc_lower) {
            let person = title_case(&caps[1]);
            *person_totals.entry(person).or_default() += txn.amount;
        }

        match txn.kind {
            TxnType::Received => total_income += txn.amount,
            TxnType::Sent | TxnType::Expense => total_expense += txn.amount,
            // loan_payment rows are surfaced as reminders only; they are
            // intentionally not summed into total_expense.
            TxnType::LoanPayment => {
                let date = txn.created_at.get(..10).unwrap_or(&txn.created_at);
                reminders.push(format!(
                    "Loan payment was due on {} for ₹{}",
                    date, txn.amount
                ));
            }
            TxnType::Income | TxnType::Unknown => {}
        }

        if tags.salary_period.is_some() {
            salary_entries.push(LedgerEntry {
                date: txn.created_at.clone(),
                amount: txn.amount,
                description: txn.description.clone(),
            });
        }
        if tags.investment {
            investment_entries.push(LedgerEntry {
                date: txn.created_at.clone(),
                amount: txn.amount,
                description: txn.description.clone(),
            });
        }
        if tags.avoidable {
            avoidable_expenses.push(txn.clone());
        }

        if let Some(cat) = txn.category.as_deref() {
            if cat.eq_ignore_ascii_case("gst_collected") {
                gst.collected += txn.amount;
            } else if cat.eq_ignore_ascii_case("gst_paid") {
                gst.paid += txn.amount;
            }
        }
        // TDS rows also feed the income/expense totals above; both views are
        // kept, matching the documented accumulation rules.
        if desc_lower.contains("tds") {
            tds_paid += txn.amount;
        }
    }

    Ok(Analysis {
        category_totals,
        monthly_totals,
        yearly_totals,
        person_totals,
        net_savings: total_income - total_expense,
        total_income,
        total_expense,
        reminders,
        salary_entries,
        investment_entries,
        avoidable_expenses,
        gst,
        tds_paid,
        skipped,
    })
}

/// Head-wise income view for the Mode B tax calculation. Only `received`
/// rows are assigned a head; `sent`/`expense` rows feed the expense total.
pub fn analyze_income_heads(
    txns: &[Transaction],
    classifier: &Classifier,
) -> Result<HeadAnalysis, EngineError> {
    if txns.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    let mut head_totals: BTreeMap<IncomeHead, Decimal> = IncomeHead::ALL
        .iter()
        .map(|h| (*h, Decimal::ZERO))
        .collect();
    let mut head_entries: BTreeMap<IncomeHead, Vec<LedgerEntry>> = BTreeMap::new();
    let mut total_expenses = Decimal::ZERO;
    let mut tds_deducted = Decimal::ZERO;

    for txn in txns {
        let desc_lower = txn.description.to_lowercase();

        if let Some(head) = classifier.income_head(txn) {
            *head_totals.entry(head).or_default() += txn.amount;
            head_entries.entry(head).or_default().push(LedgerEntry {
                date: txn.created_at.clone(),
                amount: txn.amount,
                description: txn.description.clone(),
            });
        } else if matches!(txn.kind, TxnType::Sent | TxnType::Expense) {
            total_expenses += txn.amount;
        }

        if desc_lower.contains("tds") || desc_lower.contains("tax deducted") {
            tds_deducted += txn.amount;
        }
    }

    let total_income: Decimal = head_totals.values().copied().sum();
    Ok(HeadAnalysis {
        head_totals,
        head_entries,
        total_income,
        total_expenses,
        tds_deducted,
        net_savings: total_income - total_expenses,
    })
}
