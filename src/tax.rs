// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{
    Analysis, HeadAnalysis, HeadEntry, IncomeHead, ItrSummary, Regime, RegimeComparison, SlabLine,
    TaxResult,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Flat-mode standard deduction applied to combined income.
pub const STANDARD_DEDUCTION_FLAT: Decimal = dec!(50_000);
/// Head-wise standard deduction cap for salary income.
pub const SALARY_STANDARD_DEDUCTION: Decimal = dec!(75_000);
/// Old-regime 87A approximation: liability zeroed at or below this.
pub const OLD_REGIME_REBATE_CEILING: Decimal = dec!(700_000);
pub const REBATE_LIMIT: Decimal = dec!(1_200_000);
pub const REBATE_CAP: Decimal = dec!(60_000);
pub const CESS_RATE: Decimal = dec!(0.04);

/// Slab upper bound (None = open top bracket) and rate.
type Slab = (Option<Decimal>, Decimal);

const OLD_REGIME_SLABS: [Slab; 4] = [
    (Some(dec!(250_000)), dec!(0)),
    (Some(dec!(500_000)), dec!(0.05)),
    (Some(dec!(1_000_000)), dec!(0.20)),
    (None, dec!(0.30)),
];

const NEW_REGIME_FLAT_SLABS: [Slab; 6] = [
    (Some(dec!(300_000)), dec!(0)),
    (Some(dec!(600_000)), dec!(0.05)),
    (Some(dec!(900_000)), dec!(0.10)),
    (Some(dec!(1_200_000)), dec!(0.15)),
    (Some(dec!(1_500_000)), dec!(0.20)),
    (None, dec!(0.30)),
];

const HEAD_WISE_SLABS: [Slab; 7] = [
    (Some(dec!(400_000)), dec!(0)),
    (Some(dec!(800_000)), dec!(0.05)),
    (Some(dec!(1_200_000)), dec!(0.10)),
    (Some(dec!(1_600_000)), dec!(0.15)),
    (Some(dec!(2_000_000)), dec!(0.20)),
    (Some(dec!(2_400_000)), dec!(0.25)),
    (None, dec!(0.30)),
];

/// Cumulative-bracket tax: for each `(prev, limit]` band the taxable share is
/// `min(income - prev, limit - prev)`. Stops once income falls inside a band.
pub fn progressive_tax(income: Decimal, slabs: &[Slab]) -> (Decimal, Vec<SlabLine>) {
    let mut tax = Decimal::ZERO;
    let mut prev = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for (limit, rate) in slabs {
        if income <= prev {
            break;
        }
        let taxable_in_slab = match limit {
            Some(l) => (income - prev).min(*l - prev),
            None => income - prev,
        };
        let tax_in_slab = taxable_in_slab * rate;
        tax += tax_in_slab;
        if taxable_in_slab > Decimal::ZERO {
            breakdown.push(SlabLine {
                from: prev,
                to: limit.map_or(income, |l| l.min(income)),
                rate: *rate,
                taxable_amount: taxable_in_slab,
                tax_amount: tax_in_slab,
            });
        }
        match limit {
            Some(l) => {
                prev = *l;
                if income <= *l {
                    break;
                }
            }
            None => break,
        }
    }
    (tax, breakdown)
}

/// Mode A: the legacy flat comparison. One combined standard deduction, no
/// head-wise treatment; ties go to the Old regime.
pub fn compare_regimes(analysis: &Analysis) -> RegimeComparison {
    let deductions: Decimal = analysis.investment_entries.iter().map(|e| e.amount).sum();
    let taxable = (analysis.total_income - deductions - STANDARD_DEDUCTION_FLAT)
        .max(Decimal::ZERO);

    let (mut tax_old, _) = progressive_tax(taxable, &OLD_REGIME_SLABS);
    if taxable <= OLD_REGIME_REBATE_CEILING {
        tax_old = Decimal::ZERO;
    }
    let (tax_new, _) = progressive_tax(taxable, &NEW_REGIME_FLAT_SLABS);

    let selected_regime = if tax_old <= tax_new {
        Regime::Old
    } else {
        Regime::New
    };
    RegimeComparison {
        gross_income: analysis.total_income,
        deductions,
        standard_deduction: STANDARD_DEDUCTION_FLAT,
        taxable_income: taxable,
        tax_old_regime: tax_old.round_dp(2),
        tax_new_regime: tax_new.round_dp(2),
        selected_regime,
        final_tax: tax_old.min(tax_new).round_dp(2),
    }
}

fn head_deduction(head: IncomeHead, gross: Decimal) -> (Decimal, &'static str) {
    match head {
        IncomeHead::Salary => (
            SALARY_STANDARD_DEDUCTION.min(gross),
            "Standard Deduction (applicable only to salary income)",
        ),
        IncomeHead::HouseProperty => (
            gross * dec!(0.30),
            "30% standard deduction for house property",
        ),
        IncomeHead::BusinessProfession => (
            Decimal::ZERO,
            "No standard deduction (actual business expenses to be claimed)",
        ),
        IncomeHead::CapitalGains => {
            (Decimal::ZERO, "Separate tax treatment for capital gains")
        }
        IncomeHead::OtherSources => (Decimal::ZERO, "No standard deduction for other sources"),
    }
}

/// Mode B: head-wise liability under the new regime. Capital gains are
/// excluded from the taxable total regardless of gross.
pub fn head_wise_liability(head_totals: &BTreeMap<IncomeHead, Decimal>) -> TaxResult {
    let mut head_wise = Vec::new();
    let mut total_taxable_income = Decimal::ZERO;

    for head in IncomeHead::ALL {
        let gross = head_totals.get(&head).copied().unwrap_or_default();
        if gross <= Decimal::ZERO {
            continue;
        }
        let (deduction_amount, deduction_note) = head_deduction(head, gross);
        let taxable_income = if head == IncomeHead::CapitalGains {
            Decimal::ZERO
        } else {
            (gross - deduction_amount).max(Decimal::ZERO)
        };
        if head != IncomeHead::CapitalGains {
            total_taxable_income += taxable_income;
        }
        head_wise.push(HeadEntry {
            head,
            gross_income: gross,
            deduction_amount,
            taxable_income,
            deduction_note: deduction_note.to_string(),
        });
    }

    let (tax_before_rebate, slab_breakdown) =
        progressive_tax(total_taxable_income, &HEAD_WISE_SLABS);

    let tax_rebate = if total_taxable_income <= REBATE_LIMIT {
        REBATE_CAP.min(tax_before_rebate)
    } else {
        Decimal::ZERO
    };
    let tax_after_rebate = tax_before_rebate - tax_rebate;
    let cess = tax_after_rebate * CESS_RATE;
    let total_tax_liability = tax_after_rebate + cess;

    let total_gross_income: Decimal = head_totals.values().copied().sum();
    let effective_tax_rate = if total_gross_income > Decimal::ZERO {
        total_tax_liability / total_gross_income * dec!(100)
    } else {
        Decimal::ZERO
    };

    TaxResult {
        head_wise,
        total_gross_income,
        total_taxable_income,
        tax_before_rebate,
        tax_rebate,
        tax_after_rebate,
        cess,
        total_tax_liability,
        effective_tax_rate: effective_tax_rate.round_dp(2),
        slab_breakdown,
    }
}

/// Direct Mode B entry point for explicitly supplied per-head gross amounts.
pub fn liability_for_heads(
    salary: Decimal,
    house: Decimal,
    business: Decimal,
    other: Decimal,
) -> TaxResult {
    let totals: BTreeMap<IncomeHead, Decimal> = [
        (IncomeHead::Salary, salary),
        (IncomeHead::HouseProperty, house),
        (IncomeHead::BusinessProfession, business),
        (IncomeHead::CapitalGains, Decimal::ZERO),
        (IncomeHead::OtherSources, other),
    ]
    .into_iter()
    .collect();
    head_wise_liability(&totals)
}

/// Combine both modes into the durable per-user artifact.
pub fn build_itr_summary(
    user_id: &str,
    financial_year: &str,
    analysis: &Analysis,
    heads: &HeadAnalysis,
) -> ItrSummary {
    ItrSummary {
        user_id: user_id.to_string(),
        financial_year: financial_year.to_string(),
        regimes: compare_regimes(analysis),
        head_wise: head_wise_liability(&heads.head_totals),
        tds_paid: analysis.tds_paid,
        salary_entries: analysis.salary_entries.clone(),
        investment_entries: analysis.investment_entries.clone(),
    }
}
