// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::IncomeHead;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Keyword and pattern tables driving the classifier. Immutable once loaded;
/// the defaults carry the canonical tables, and a JSON file with the same
/// shape can replace them wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRules {
    pub food_keywords: Vec<String>,
    pub investment_keywords: Vec<String>,
    pub avoidable_categories: Vec<String>,
    /// Amounts at or below this never count as avoidable (strictly-greater test).
    pub avoidable_floor: Decimal,
    /// Head rules are evaluated in order; the first match wins.
    pub head_rules: Vec<HeadRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadRule {
    pub head: IncomeHead,
    pub keywords: Vec<String>,
    pub patterns: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ClassifierRules {
    fn default() -> Self {
        ClassifierRules {
            food_keywords: strings(&[
                "zomato",
                "swiggy",
                "domino",
                "pizza",
                "food",
                "restaurant",
                "cafe",
                "meal",
                "dining",
            ]),
            investment_keywords: strings(&[
                "lic",
                "elss",
                "nps",
                "ppf",
                "insurance",
                "mutual fund",
                "sip",
                "fd",
                "fixed deposit",
            ]),
            avoidable_categories: strings(&[
                "entertainment",
                "shopping",
                "luxury",
                "gaming",
                "subscription",
            ]),
            avoidable_floor: dec!(1000),
            head_rules: vec![
                HeadRule {
                    head: IncomeHead::Salary,
                    keywords: strings(&[
                        "salary",
                        "wages",
                        "allowance",
                        "hra",
                        "da",
                        "bonus",
                        "incentive",
                        "commission",
                        "gratuity",
                        "pension",
                    ]),
                    patterns: strings(&[
                        r"salary\s*[\-–—]?\s*([a-zA-Z]+)\s+(\d{4})",
                        r"pay.*slip",
                        r"monthly.*salary",
                    ]),
                },
                HeadRule {
                    head: IncomeHead::HouseProperty,
                    keywords: strings(&[
                        "rent",
                        "rental",
                        "property",
                        "house",
                        "apartment",
                        "maintenance",
                        "municipal",
                        "property tax",
                    ]),
                    patterns: strings(&[r"rent.*received", r"rental.*income", r"house.*rent"]),
                },
                HeadRule {
                    head: IncomeHead::BusinessProfession,
                    keywords: strings(&[
                        "business",
                        "profession",
                        "consultancy",
                        "freelance",
                        "service",
                        "contract",
                        "invoice",
                        "fees",
                    ]),
                    patterns: strings(&[
                        r"professional.*fees",
                        r"consultancy.*income",
                        r"business.*income",
                    ]),
                },
                HeadRule {
                    head: IncomeHead::CapitalGains,
                    keywords: strings(&[
                        "shares",
                        "stocks",
                        "mutual fund",
                        "sip",
                        "equity",
                        "bond",
                        "securities",
                        "investment",
                        "capital gain",
                    ]),
                    patterns: strings(&[
                        r"share.*sale",
                        r"stock.*profit",
                        r"mutual.*fund.*redemption",
                    ]),
                },
                HeadRule {
                    head: IncomeHead::OtherSources,
                    keywords: strings(&[
                        "interest",
                        "dividend",
                        "fd",
                        "fixed deposit",
                        "savings",
                        "lottery",
                        "gift",
                        "other income",
                    ]),
                    patterns: strings(&[
                        r"interest.*earned",
                        r"dividend.*received",
                        r"fd.*maturity",
                    ]),
                },
            ],
        }
    }
}

impl ClassifierRules {
    pub fn from_json_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Open rules file {}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Parse rules file {}", path))
    }
}
