// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Classified, IncomeHead, Transaction, TxnType};
use crate::rules::ClassifierRules;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Advisory salary-period marker, e.g. "Salary - March 2025".
static SALARY_PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)salary\s*[\-–—]?\s*([a-zA-Z]+)\s+(\d{4})").unwrap());

/// Pure single-record classifier. Holds the compiled rule tables; no state
/// survives between records.
pub struct Classifier {
    rules: ClassifierRules,
    head_patterns: Vec<(IncomeHead, Vec<Regex>)>,
}

impl Classifier {
    pub fn new(rules: ClassifierRules) -> Result<Self> {
        let mut head_patterns = Vec::with_capacity(rules.head_rules.len());
        for rule in &rules.head_rules {
            let mut compiled = Vec::with_capacity(rule.patterns.len());
            for pat in &rule.patterns {
                let re = Regex::new(&format!("(?i){}", pat))
                    .with_context(|| format!("Invalid pattern '{}' for head {}", pat, rule.head))?;
                compiled.push(re);
            }
            head_patterns.push((rule.head, compiled));
        }
        Ok(Classifier {
            rules,
            head_patterns,
        })
    }

    pub fn with_defaults() -> Self {
        // The built-in tables only contain valid patterns.
        Classifier::new(ClassifierRules::default()).unwrap()
    }

    pub fn classify<'a>(&self, txn: &'a Transaction) -> Classified<'a> {
        let category = self.resolve_category(txn);
        Classified {
            head: self.income_head(txn),
            avoidable: self.is_avoidable(&category, txn),
            investment: self.matches_investment(&txn.description),
            salary_period: salary_period(&txn.description),
            category,
            txn,
        }
    }

    /// Resolution order: food keywords, then investment keywords, then the
    /// record's own category, defaulting to "Other".
    pub fn resolve_category(&self, txn: &Transaction) -> String {
        let desc = txn.description.to_lowercase();
        if self.rules.food_keywords.iter().any(|k| desc.contains(k)) {
            return "food".to_string();
        }
        if self.matches_investment(&txn.description) {
            return "investment".to_string();
        }
        match txn.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Section 14 head for `received` transactions, fixed priority order,
    /// keywords checked before patterns within each head. Anything received
    /// that matches nothing lands in other_sources; non-received records are
    /// never assigned a head.
    pub fn income_head(&self, txn: &Transaction) -> Option<IncomeHead> {
        if txn.kind != TxnType::Received {
            return None;
        }
        let desc = txn.description.to_lowercase();
        for (rule, (head, patterns)) in self.rules.head_rules.iter().zip(&self.head_patterns) {
            if rule.keywords.iter().any(|k| desc.contains(k)) {
                return Some(*head);
            }
            if patterns.iter().any(|re| re.is_match(&desc)) {
                return Some(*head);
            }
        }
        Some(IncomeHead::OtherSources)
    }

    /// Discretionary category above the fixed threshold (strictly greater).
    pub fn is_avoidable(&self, category: &str, txn: &Transaction) -> bool {
        let cat = category.to_lowercase();
        self.rules.avoidable_categories.iter().any(|c| *c == cat)
            && txn.amount > self.rules.avoidable_floor
    }

    pub fn matches_investment(&self, description: &str) -> bool {
        let desc = description.to_lowercase();
        self.rules
            .investment_keywords
            .iter()
            .any(|k| desc.contains(k))
    }
}

/// Extract and strictly parse the month/year from a salary marker. A marker
/// that matches the regex but fails month parsing is logged and ignored.
pub fn salary_period(description: &str) -> Option<NaiveDate> {
    let caps = SALARY_PERIOD_RE.captures(description)?;
    let month = crate::utils::title_case(&caps[1]);
    let year = &caps[2];
    match NaiveDate::parse_from_str(&format!("1 {} {}", month, year), "%d %B %Y") {
        Ok(d) => Some(d),
        Err(_) => {
            warn!(description, "salary marker with unparseable period, skipping");
            None
        }
    }
}
