// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxnType {
    Received,
    Sent,
    Expense,
    Income,
    LoanPayment,
    #[serde(other)]
    Unknown,
}

impl TxnType {
    pub fn parse(s: &str) -> TxnType {
        match s.trim().to_lowercase().as_str() {
            "received" => TxnType::Received,
            "sent" => TxnType::Sent,
            "expense" => TxnType::Expense,
            "income" => TxnType::Income,
            "loan_payment" => TxnType::LoanPayment,
            _ => TxnType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Received => "received",
            TxnType::Sent => "sent",
            TxnType::Expense => "expense",
            TxnType::Income => "income",
            TxnType::LoanPayment => "loan_payment",
            TxnType::Unknown => "unknown",
        }
    }
}

/// A raw transaction record as handed to the engines. Amounts are always
/// non-negative; direction of flow is carried by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// ISO-8601 timestamp, possibly with a trailing `Z`.
    pub created_at: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub category: Option<String>,
}

/// The five Section 14 income heads, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeHead {
    Salary,
    HouseProperty,
    BusinessProfession,
    CapitalGains,
    OtherSources,
}

impl IncomeHead {
    pub const ALL: [IncomeHead; 5] = [
        IncomeHead::Salary,
        IncomeHead::HouseProperty,
        IncomeHead::BusinessProfession,
        IncomeHead::CapitalGains,
        IncomeHead::OtherSources,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeHead::Salary => "salary",
            IncomeHead::HouseProperty => "house_property",
            IncomeHead::BusinessProfession => "business_profession",
            IncomeHead::CapitalGains => "capital_gains",
            IncomeHead::OtherSources => "other_sources",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            IncomeHead::Salary => "Salary",
            IncomeHead::HouseProperty => "House Property",
            IncomeHead::BusinessProfession => "Business/Profession",
            IncomeHead::CapitalGains => "Capital Gains",
            IncomeHead::OtherSources => "Other Sources",
        }
    }
}

impl fmt::Display for IncomeHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record tags derived by the classifier. Ephemeral: built once per
/// aggregation pass and discarded afterwards.
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub txn: &'a Transaction,
    pub category: String,
    pub head: Option<IncomeHead>,
    pub avoidable: bool,
    pub investment: bool,
    /// Parsed `salary <Month> <Year>` period, when the description carries one.
    pub salary_period: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: String,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GstBuckets {
    pub collected: Decimal,
    pub paid: Decimal,
}

impl GstBuckets {
    pub fn net_liability(&self) -> Decimal {
        self.collected - self.paid
    }
}

/// Aggregate snapshot over one transaction batch. BTreeMaps keep rendering
/// deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub category_totals: BTreeMap<String, Decimal>,
    pub monthly_totals: BTreeMap<String, Decimal>,
    pub yearly_totals: BTreeMap<String, Decimal>,
    pub person_totals: BTreeMap<String, Decimal>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_savings: Decimal,
    pub reminders: Vec<String>,
    pub salary_entries: Vec<LedgerEntry>,
    pub investment_entries: Vec<LedgerEntry>,
    pub avoidable_expenses: Vec<Transaction>,
    pub gst: GstBuckets,
    pub tds_paid: Decimal,
    /// Records excluded from monthly/yearly totals due to unparseable dates.
    pub skipped: usize,
}

/// Head-wise income view used by the Mode B tax calculation.
#[derive(Debug, Clone, Serialize)]
pub struct HeadAnalysis {
    pub head_totals: BTreeMap<IncomeHead, Decimal>,
    pub head_entries: BTreeMap<IncomeHead, Vec<LedgerEntry>>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub tds_deducted: Decimal,
    pub net_savings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadEntry {
    pub head: IncomeHead,
    pub gross_income: Decimal,
    pub deduction_amount: Decimal,
    pub taxable_income: Decimal,
    pub deduction_note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlabLine {
    pub from: Decimal,
    pub to: Decimal,
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
}

/// Mode B (head-wise, new regime) liability. `total_tax_liability` is always
/// `tax_after_rebate + cess`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxResult {
    pub head_wise: Vec<HeadEntry>,
    pub total_gross_income: Decimal,
    pub total_taxable_income: Decimal,
    pub tax_before_rebate: Decimal,
    pub tax_rebate: Decimal,
    pub tax_after_rebate: Decimal,
    pub cess: Decimal,
    pub total_tax_liability: Decimal,
    pub effective_tax_rate: Decimal,
    pub slab_breakdown: Vec<SlabLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    Old,
    New,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Old => f.write_str("Old"),
            Regime::New => f.write_str("New"),
        }
    }
}

/// Mode A (flat old-vs-new regime) comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub gross_income: Decimal,
    pub deductions: Decimal,
    pub standard_deduction: Decimal,
    pub taxable_income: Decimal,
    pub tax_old_regime: Decimal,
    pub tax_new_regime: Decimal,
    pub selected_regime: Regime,
    pub final_tax: Decimal,
}

/// Durable per-user tax artifact, persisted as a JSON document keyed
/// `ITR_summary_<user_id>` per financial year. Schema stability matters:
/// downstream report viewers read this verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItrSummary {
    pub user_id: String,
    pub financial_year: String,
    pub regimes: RegimeComparison,
    pub head_wise: TaxResult,
    pub tds_paid: Decimal,
    pub salary_entries: Vec<LedgerEntry>,
    pub investment_entries: Vec<LedgerEntry>,
}

impl ItrSummary {
    pub fn storage_key(user_id: &str) -> String {
        format!("ITR_summary_{}", user_id)
    }
}

/// Immutable loan terms. Defaults mirror the stock optimization scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Decimal,
    /// Annual rate as a fraction, e.g. 0.09 for 9%.
    pub annual_rate: Decimal,
    pub term_months: u32,
}

impl Default for LoanTerms {
    fn default() -> Self {
        LoanTerms {
            principal: Decimal::from(1_200_000),
            annual_rate: Decimal::new(9, 2),
            term_months: 60,
        }
    }
}

/// A stored loan row. `monthly_interest` feeds the quick what-if helper;
/// the remaining fields override the default terms when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub principal: Decimal,
    pub annual_rate: Decimal,
    pub term_months: u32,
    pub monthly_interest: Decimal,
}

impl LoanRecord {
    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            annual_rate: self.annual_rate,
            term_months: self.term_months,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub year: i32,
    pub month: String,
    pub opening_balance: Decimal,
    pub payment: Decimal,
    pub principal_component: Decimal,
    pub interest_component: Decimal,
    pub closing_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub monthly_emi: Decimal,
    pub rows: Vec<AmortizationRow>,
    pub total_interest: Decimal,
    pub total_paid: Decimal,
}

impl Schedule {
    pub fn months(&self) -> u32 {
        self.rows.len() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifestyle {
    UnmarriedWithFamily,
    BachelorAlone,
    MarriedWithChildren,
}

impl fmt::Display for Lifestyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifestyle::UnmarriedWithFamily => f.write_str("Unmarried, living with family"),
            Lifestyle::BachelorAlone => f.write_str("Bachelor, living alone"),
            Lifestyle::MarriedWithChildren => f.write_str("Married, with children"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Necessity {
    Income,
    Necessary,
    ThresholdExceeded,
}

impl fmt::Display for Necessity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Necessity::Income => f.write_str("Necessary - Income"),
            Necessity::Necessary => f.write_str("Necessary"),
            Necessity::ThresholdExceeded => f.write_str("Not Necessary - Threshold Exceeded"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlaggedTransaction {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub necessity: Necessity,
    pub non_essential_amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    /// Calendar month key, `YYYY-MM`.
    pub month: String,
    pub salary: Decimal,
    pub emi: Decimal,
    pub remaining: Decimal,
    pub non_essential: Decimal,
    pub advice: String,
}

/// Primary deliverable of the loan engine: the baseline schedule against the
/// counterfactual where non-essential spend prepays principal annually.
#[derive(Debug, Clone, Serialize)]
pub struct LoanOptimization {
    pub lifestyle: Lifestyle,
    pub monthly_emi: Decimal,
    pub flagged: Vec<FlaggedTransaction>,
    pub monthly: Vec<MonthSummary>,
    pub baseline: Schedule,
    pub optimized: Schedule,
    pub total_non_essential: Decimal,
    pub months_saved: u32,
    pub interest_saved: Decimal,
}
