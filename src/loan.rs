// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::EngineError;
use crate::models::{
    AmortizationRow, FlaggedTransaction, Lifestyle, LoanOptimization, LoanTerms, MonthSummary,
    Necessity, Schedule, Transaction, TxnType,
};
use crate::utils::parse_timestamp;
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::warn;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar origin of generated schedules: July 2025.
const SCHEDULE_START_YEAR: i32 = 2025;
const SCHEDULE_START_MONTH: u32 = 6;

/// Baseline allocation of post-EMI salary across spending categories.
/// Salary carries 0% on purpose: it is income, never a spend bucket.
const BASE_ALLOCATION: [(&str, Decimal); 11] = [
    ("food", dec!(0.10)),
    ("entertainment", dec!(0.05)),
    ("shopping", dec!(0.06)),
    ("travel", dec!(0.05)),
    ("health", dec!(0.10)),
    ("festival", dec!(0.05)),
    ("emergency", dec!(0.10)),
    ("investment", dec!(0.10)),
    ("gifts", dec!(0.05)),
    ("utilities", dec!(0.10)),
    ("salary", dec!(0)),
];

/// Share of salary above which a month's non-essential spend draws a warning.
const ADVICE_RATIO: Decimal = dec!(0.15);

impl LoanTerms {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.principal <= Decimal::ZERO {
            return Err(EngineError::InvalidLoanTerms(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.term_months == 0 {
            return Err(EngineError::InvalidLoanTerms(
                "term must be at least one month".to_string(),
            ));
        }
        if self.annual_rate < Decimal::ZERO {
            return Err(EngineError::InvalidLoanTerms(format!(
                "annual rate must be non-negative, got {}",
                self.annual_rate
            )));
        }
        Ok(())
    }
}

/// Standard EMI: P·r·(1+r)^n / ((1+r)^n − 1), falling back to straight-line
/// division for a zero rate.
pub fn monthly_emi(terms: &LoanTerms) -> Result<Decimal, EngineError> {
    terms.validate()?;
    let r = terms.annual_rate / dec!(12);
    let n = terms.term_months;
    if r.is_zero() {
        return Ok(terms.principal / Decimal::from(n));
    }
    let growth = (Decimal::ONE + r).powu(n as u64);
    Ok(terms.principal * r * growth / (growth - Decimal::ONE))
}

/// Row-by-row amortization. Emitted row values are rounded to 2dp while the
/// running balance keeps full precision; the final row clips the payment to
/// the remaining balance. `extra_annual` is applied as a lump principal
/// payment whenever the calendar rolls past December.
pub fn schedule(terms: &LoanTerms, extra_annual: Decimal) -> Result<Schedule, EngineError> {
    let emi = monthly_emi(terms)?;
    let r = terms.annual_rate / dec!(12);

    let mut balance = terms.principal;
    let mut payment = emi;
    let mut rows = Vec::new();
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut year = SCHEDULE_START_YEAR;
    let mut month = SCHEDULE_START_MONTH;
    let mut period = 0u32;

    while balance > Decimal::ZERO && period < terms.term_months {
        let interest = if r.is_zero() {
            Decimal::ZERO
        } else {
            balance * r
        };
        let mut principal = payment - interest;
        if balance < payment {
            principal = balance;
            payment = balance + interest;
        }
        let closing = balance - principal;
        rows.push(AmortizationRow {
            period: period + 1,
            year,
            month: MONTH_NAMES[(month % 12) as usize].to_string(),
            opening_balance: balance.round_dp(2),
            payment: payment.round_dp(2),
            principal_component: principal.round_dp(2),
            interest_component: interest.round_dp(2),
            closing_balance: closing.round_dp(2),
        });
        total_interest += interest;
        total_paid += payment;
        balance = closing;
        period += 1;
        month += 1;
        if month % 12 == 0 {
            if extra_annual > Decimal::ZERO && balance > Decimal::ZERO {
                let lump = balance.min(extra_annual);
                balance -= lump;
                total_paid += lump;
            }
            year += 1;
        }
    }

    Ok(Schedule {
        monthly_emi: emi.round_dp(2),
        rows,
        total_interest: total_interest.round_dp(2),
        total_paid: total_paid.round_dp(2),
    })
}

/// Deterministic, order-independent heuristic over the observed category set.
pub fn infer_lifestyle<'a, I: IntoIterator<Item = &'a str>>(categories: I) -> Lifestyle {
    let mut has_rent = false;
    let mut has_food = false;
    for cat in categories {
        let cat = cat.to_lowercase();
        if cat.contains("school") || cat.contains("education") {
            return Lifestyle::MarriedWithChildren;
        }
        has_rent |= cat.contains("rent");
        has_food |= cat.contains("food");
    }
    if has_rent && has_food {
        Lifestyle::BachelorAlone
    } else {
        Lifestyle::UnmarriedWithFamily
    }
}

/// Allocate the post-EMI remainder across the fixed category percentages,
/// shifted by the per-lifestyle deltas. The salary bucket is dropped.
pub fn category_thresholds(remaining: Decimal, lifestyle: Lifestyle) -> BTreeMap<String, Decimal> {
    let mut allocation: BTreeMap<&str, Decimal> = BASE_ALLOCATION.iter().copied().collect();
    let deltas: &[(&str, Decimal)] = match lifestyle {
        Lifestyle::UnmarriedWithFamily => &[
            ("food", dec!(-0.01)),
            ("festival", dec!(-0.02)),
            ("entertainment", dec!(0.01)),
        ],
        Lifestyle::BachelorAlone => &[("food", dec!(0.02)), ("entertainment", dec!(0.01))],
        Lifestyle::MarriedWithChildren => &[
            ("food", dec!(0.02)),
            ("festival", dec!(0.02)),
            ("health", dec!(0.03)),
        ],
    };
    for (cat, delta) in deltas {
        if let Some(pct) = allocation.get_mut(cat) {
            *pct += delta;
        }
    }
    allocation
        .into_iter()
        .filter(|(cat, _)| *cat != "salary")
        .map(|(cat, pct)| {
            (
                cat.to_string(),
                (remaining * pct).round_dp(2).max(Decimal::ZERO),
            )
        })
        .collect()
}

struct DatedTxn<'a> {
    when: NaiveDateTime,
    txn: &'a Transaction,
    category: String,
}

fn month_salary(group: &[DatedTxn<'_>]) -> Decimal {
    group
        .iter()
        .filter(|d| d.txn.kind == TxnType::Received)
        .filter(|d| {
            let desc = d.txn.description.to_lowercase();
            desc.contains("salary") || desc.contains("income")
        })
        .map(|d| d.txn.amount)
        .sum()
}

/// First-exceedance policy: a category's cumulative spend runs up to its
/// threshold; the transaction that crosses it absorbs the entire excess and
/// the counter is capped, so later transactions in the same category are
/// flagged in full.
fn flag_non_essential(
    group: &[DatedTxn<'_>],
    thresholds: &BTreeMap<String, Decimal>,
) -> Vec<FlaggedTransaction> {
    let mut cumulative: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut flagged = Vec::with_capacity(group.len());

    for dated in group {
        let txn = dated.txn;
        let desc = txn.description.to_lowercase();
        let mut non_essential = Decimal::ZERO;

        if let Some(threshold) = thresholds.get(&dated.category) {
            let current = cumulative
                .entry(dated.category.as_str())
                .or_insert(Decimal::ZERO);
            if *current + txn.amount <= *threshold {
                *current += txn.amount;
            } else {
                let allowed = (*threshold - *current).max(Decimal::ZERO);
                non_essential = txn.amount - allowed;
                *current = *threshold;
            }
        }

        let necessity = if txn.kind == TxnType::Received
            && (desc.contains("salary") || desc.contains("income"))
        {
            Necessity::Income
        } else if non_essential > Decimal::ZERO {
            Necessity::ThresholdExceeded
        } else {
            Necessity::Necessary
        };

        flagged.push(FlaggedTransaction {
            date: txn.created_at.clone(),
            category: dated.category.clone(),
            description: txn.description.clone(),
            amount: txn.amount,
            necessity,
            non_essential_amount: non_essential,
        });
    }
    flagged
}

/// Full optimization pass: infer lifestyle, derive per-month thresholds from
/// salary minus EMI, flag over-threshold spend, and compare the baseline
/// schedule against one where the flagged total prepays principal annually.
pub fn optimize(txns: &[Transaction], terms: &LoanTerms) -> Result<LoanOptimization, EngineError> {
    terms.validate()?;

    let mut dated: Vec<DatedTxn<'_>> = Vec::with_capacity(txns.len());
    for txn in txns {
        match parse_timestamp(&txn.created_at) {
            Ok(when) => {
                let category = txn
                    .category
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or("Other")
                    .to_lowercase();
                dated.push(DatedTxn {
                    when,
                    txn,
                    category,
                });
            }
            Err(_) => {
                warn!(id = %txn.id, created_at = %txn.created_at,
                    "unparseable date, dropped from loan optimization");
            }
        }
    }
    if dated.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    let lifestyle = infer_lifestyle(dated.iter().map(|d| d.category.as_str()));
    let baseline = schedule(terms, Decimal::ZERO)?;
    let emi = baseline.monthly_emi;

    let mut by_month: BTreeMap<String, Vec<DatedTxn<'_>>> = BTreeMap::new();
    for d in dated {
        by_month
            .entry(d.when.format("%Y-%m").to_string())
            .or_default()
            .push(d);
    }

    let mut flagged = Vec::new();
    let mut monthly = Vec::new();
    let mut total_non_essential = Decimal::ZERO;

    for (month, mut group) in by_month {
        group.sort_by_key(|d| d.when);

        let salary = month_salary(&group);
        let remaining = (salary - emi).max(Decimal::ZERO);
        let thresholds = category_thresholds(remaining, lifestyle);

        let month_flags = flag_non_essential(&group, &thresholds);
        let non_essential: Decimal = month_flags.iter().map(|f| f.non_essential_amount).sum();
        total_non_essential += non_essential;

        let advice = if salary > Decimal::ZERO && non_essential > ADVICE_RATIO * salary {
            "High unnecessary expenses. Consider reviewing your budget.".to_string()
        } else {
            "Good control on spending.".to_string()
        };
        monthly.push(MonthSummary {
            month,
            salary,
            emi,
            remaining,
            non_essential,
            advice,
        });
        flagged.extend(month_flags);
    }

    let optimized = schedule(terms, total_non_essential)?;
    let months_saved = baseline.months() - optimized.months();
    let interest_saved = baseline.total_interest - optimized.total_interest;

    Ok(LoanOptimization {
        lifestyle,
        monthly_emi: emi,
        flagged,
        monthly,
        baseline,
        optimized,
        total_non_essential,
        months_saved,
        interest_saved,
    })
}

/// Quick what-if over already-flagged avoidable expenses: months of tenure
/// each amount would have covered at the loan's monthly interest.
pub fn quick_impact(avoidable: &[Transaction], monthly_interest: Decimal) -> Vec<String> {
    if monthly_interest <= Decimal::ZERO {
        return Vec::new();
    }
    let mut messages = Vec::new();
    for txn in avoidable.iter().take(3) {
        let months_saved = (txn.amount / monthly_interest).trunc();
        if months_saved >= Decimal::ONE {
            messages.push(format!(
                "If you had not spent ₹{:.2} on '{}', you could have reduced your loan tenure by approximately {} month(s).",
                txn.amount, txn.description, months_saved
            ));
        }
    }
    messages
}
