// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Deterministic text rendering of engine results. Field order is stable so
//! the output can be passed through verbatim by any chat/presentation layer.

use crate::models::{Analysis, LoanOptimization, RegimeComparison, Schedule, TaxResult};
use crate::utils::{format_inr, pretty_table};
use rust_decimal::Decimal;

fn money(d: Decimal) -> String {
    format!("₹{:.2}", d.round_dp(2))
}

pub fn spending_summary(analysis: &Analysis) -> String {
    let rows: Vec<Vec<String>> = analysis
        .category_totals
        .iter()
        .map(|(cat, amt)| vec![crate::utils::title_case(cat), money(*amt)])
        .collect();
    let mut out = String::from("Spending Summary\n");
    out.push_str(&pretty_table(&["Category", "Amount"], rows).to_string());
    out.push_str(&format!(
        "\nTotal Income: {}\nTotal Expense: {}\nNet Savings: {}\n",
        money(analysis.total_income),
        money(analysis.total_expense),
        money(analysis.net_savings)
    ));
    out
}

pub fn person_summary(analysis: &Analysis) -> String {
    if analysis.person_totals.is_empty() {
        return "No person-wise transactions found.".to_string();
    }
    let mut items: Vec<_> = analysis.person_totals.iter().collect();
    items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let rows: Vec<Vec<String>> = items
        .into_iter()
        .map(|(person, amt)| vec![person.clone(), money(*amt)])
        .collect();
    format!(
        "Person-wise Transactions\n{}",
        pretty_table(&["Person", "Amount"], rows)
    )
}

pub fn yearly_summary(analysis: &Analysis) -> String {
    if analysis.yearly_totals.is_empty() {
        return "No yearly data available.".to_string();
    }
    let rows: Vec<Vec<String>> = analysis
        .yearly_totals
        .iter()
        .rev()
        .map(|(year, amt)| vec![year.clone(), money(*amt)])
        .collect();
    format!("Yearly Summary\n{}", pretty_table(&["Year", "Amount"], rows))
}

pub fn gst_summary(analysis: &Analysis) -> String {
    format!(
        "GST Summary: Collected {}, Paid {}, Net Liability {}",
        money(analysis.gst.collected),
        money(analysis.gst.paid),
        money(analysis.gst.net_liability())
    )
}

pub fn reminders(analysis: &Analysis) -> String {
    if analysis.reminders.is_empty() {
        return "No payment reminders.".to_string();
    }
    format!("Reminders:\n{}", analysis.reminders.join("\n"))
}

/// Mode B report: head-wise breakdown, slab arithmetic, then the liability
/// waterfall in fixed order.
pub fn tax_report(result: &TaxResult) -> String {
    let mut out = String::from("Income Tax Calculation - New Regime\n\n");

    let head_rows: Vec<Vec<String>> = result
        .head_wise
        .iter()
        .map(|h| {
            vec![
                h.head.title().to_string(),
                money(h.gross_income),
                money(h.deduction_amount),
                money(h.taxable_income),
                h.deduction_note.clone(),
            ]
        })
        .collect();
    out.push_str(
        &pretty_table(
            &["Head", "Gross", "Deduction", "Taxable", "Rule"],
            head_rows,
        )
        .to_string(),
    );

    out.push_str("\n\nSlab Breakdown\n");
    let slab_rows: Vec<Vec<String>> = result
        .slab_breakdown
        .iter()
        .map(|s| {
            vec![
                format!("{} - {}", money(s.from), money(s.to)),
                format!("{:.0}%", s.rate * Decimal::from(100)),
                money(s.taxable_amount),
                money(s.tax_amount),
            ]
        })
        .collect();
    out.push_str(&pretty_table(&["Range", "Rate", "Taxable", "Tax"], slab_rows).to_string());

    out.push_str(&format!(
        "\n\nTotal Gross Income:     {}\n\
         Total Taxable Income:   {}\n\
         Tax before Rebate:      {}\n\
         Tax Rebate u/s 87A:     {}\n\
         Tax after Rebate:       {}\n\
         Health & Education Cess (4%): {}\n\
         Total Tax Liability:    {}\n\
         Effective Tax Rate:     {:.2}%\n",
        money(result.total_gross_income),
        money(result.total_taxable_income),
        money(result.tax_before_rebate),
        money(result.tax_rebate),
        money(result.tax_after_rebate),
        money(result.cess),
        money(result.total_tax_liability),
        result.effective_tax_rate
    ));
    out
}

/// Mode A report: the legacy old-vs-new comparison.
pub fn regime_report(cmp: &RegimeComparison, tds_paid: Decimal) -> String {
    format!(
        "Annual Tax Report\n\
         Gross Income: {}\n\
         Deductions (80C): {}\n\
         Standard Deduction: {}\n\
         Taxable Income: {}\n\
         Estimated Tax (Old Regime): {}\n\
         Estimated Tax (New Regime): {}\n\
         Selected Regime: {}\n\
         Final Estimated Tax: {}\n\
         TDS Paid: {}\n",
        money(cmp.gross_income),
        money(cmp.deductions),
        money(cmp.standard_deduction),
        money(cmp.taxable_income),
        money(cmp.tax_old_regime),
        money(cmp.tax_new_regime),
        cmp.selected_regime,
        money(cmp.final_tax),
        money(tds_paid)
    )
}

/// Standalone schedule rendering with summary totals.
pub fn schedule_report(schedule: &Schedule) -> String {
    format!(
        "{}\nMonthly EMI: {}\nTotal Interest: {}\nTotal Paid: {}\n",
        schedule_table(schedule, "Loan Repayment Schedule", schedule.rows.len()),
        format_inr(schedule.monthly_emi),
        format_inr(schedule.total_interest),
        format_inr(schedule.total_paid)
    )
}

fn schedule_table(schedule: &Schedule, title: &str, max_rows: usize) -> String {
    let rows: Vec<Vec<String>> = schedule
        .rows
        .iter()
        .take(max_rows)
        .map(|r| {
            vec![
                format!("{} {}", r.month, r.year),
                format_inr(r.opening_balance),
                format_inr(r.payment),
                format_inr(r.principal_component),
                format_inr(r.interest_component),
                format_inr(r.closing_balance),
            ]
        })
        .collect();
    format!(
        "{}\n{}\nShowing first {} of {} payments\n",
        title,
        pretty_table(
            &[
                "Date",
                "Starting Balance",
                "EMI",
                "Principal",
                "Interest",
                "Ending Balance"
            ],
            rows,
        ),
        max_rows.min(schedule.rows.len()),
        schedule.rows.len()
    )
}

pub fn loan_report(result: &LoanOptimization) -> String {
    let mut out = String::from("Loan Optimization Results\n\n");
    out.push_str(&format!("Lifestyle Detected: {}\n", result.lifestyle));
    out.push_str(&format!(
        "Monthly EMI: {}\n\n",
        format_inr(result.monthly_emi)
    ));

    if !result.flagged.is_empty() {
        let rows: Vec<Vec<String>> = result
            .flagged
            .iter()
            .take(20)
            .map(|f| {
                vec![
                    f.date.get(..10).unwrap_or(&f.date).to_string(),
                    f.category.clone(),
                    f.description.clone(),
                    format_inr(f.amount),
                    f.necessity.to_string(),
                    format_inr(f.non_essential_amount),
                ]
            })
            .collect();
        out.push_str("Categorized Transactions\n");
        out.push_str(
            &pretty_table(
                &[
                    "Date",
                    "Category",
                    "Description",
                    "Amount",
                    "Necessity",
                    "Non-Essential Amount",
                ],
                rows,
            )
            .to_string(),
        );
        out.push_str(&format!(
            "\nShowing first {} of {} transactions\n\n",
            20.min(result.flagged.len()),
            result.flagged.len()
        ));
    }

    if !result.monthly.is_empty() {
        let rows: Vec<Vec<String>> = result
            .monthly
            .iter()
            .map(|m| {
                vec![
                    m.month.clone(),
                    format_inr(m.salary),
                    format_inr(m.emi),
                    format_inr(m.remaining),
                    format_inr(m.non_essential),
                    m.advice.clone(),
                ]
            })
            .collect();
        out.push_str("Monthly Summary\n");
        out.push_str(
            &pretty_table(
                &[
                    "Month",
                    "Salary",
                    "Loan EMI",
                    "Remaining Salary",
                    "Unnecessary Spending",
                    "Advice",
                ],
                rows,
            )
            .to_string(),
        );
        out.push_str("\n\n");
    }

    out.push_str(&schedule_table(
        &result.baseline,
        "Standard Loan Repayment Schedule",
        12,
    ));
    out.push('\n');
    out.push_str(&schedule_table(
        &result.optimized,
        "Optimized Loan Repayment Schedule",
        12,
    ));

    out.push_str(&format!(
        "\nKey Insights\n\
         - Total Unnecessary Spending: {}\n\
         - Months Saved: {}\n\
         - Interest Saved: {}\n\
         - Recommendation: redirecting unnecessary spending to extra loan payments shortens the loan term, as shown in the optimized schedule.\n",
        format_inr(result.total_non_essential),
        result.months_saved,
        format_inr(result.interest_saved)
    ));
    out
}
