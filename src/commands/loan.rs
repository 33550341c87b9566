// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::Classifier;
use crate::models::{LoanRecord, LoanTerms, Transaction};
use crate::utils::{maybe_print_json, parse_decimal};
use crate::{db, loan, report};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("optimize", sub)) => optimize(conn, sub)?,
        Some(("schedule", sub)) => schedule(sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("impact", sub)) => impact(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Terms resolution order: explicit flags, then the user's stored loan,
/// then the stock defaults.
fn resolve_terms(
    conn: Option<(&Connection, &str)>,
    sub: &clap::ArgMatches,
) -> Result<LoanTerms> {
    let stored = match conn {
        Some((conn, user)) => db::fetch_loans(conn, user)?.into_iter().last(),
        None => None,
    };
    let mut terms = stored.map(|l| l.terms()).unwrap_or_default();
    if let Some(p) = sub.get_one::<String>("principal") {
        terms.principal = parse_decimal(p)?;
    }
    if let Some(r) = sub.get_one::<String>("rate") {
        terms.annual_rate = parse_decimal(r)?;
    }
    if let Some(years) = sub.get_one::<u32>("years") {
        terms.term_months = years * 12;
    }
    Ok(terms)
}

fn optimize(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let terms = resolve_terms(Some((conn, user)), sub)?;
    let txns = db::fetch_transactions(conn, user, None, None)?;
    let result = loan::optimize(&txns, &terms)?;

    if !maybe_print_json(json_flag, jsonl_flag, &result)? {
        println!("{}", report::loan_report(&result));
    }
    Ok(())
}

fn schedule(sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let terms = resolve_terms(None, sub)?;
    let schedule = loan::schedule(&terms, Decimal::ZERO)?;
    if !maybe_print_json(json_flag, jsonl_flag, &schedule)? {
        println!("{}", report::schedule_report(&schedule));
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let principal = parse_decimal(sub.get_one::<String>("principal").unwrap())?;
    let annual_rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
    let years = *sub.get_one::<u32>("years").unwrap();
    let monthly_interest = parse_decimal(sub.get_one::<String>("monthly-interest").unwrap())?;

    let record = LoanRecord {
        principal,
        annual_rate,
        term_months: years * 12,
        monthly_interest,
    };
    record.terms().validate()?;
    db::insert_loan(conn, user, &record)?;
    println!(
        "Stored loan for {}: principal {}, rate {}, {} months",
        user, principal, annual_rate, record.term_months
    );
    Ok(())
}

/// What-if messages for the user's recent avoidable expenses, priced against
/// the stored loan's monthly interest.
fn impact(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();

    let monthly_interest = match db::fetch_loans(conn, user)?.into_iter().last() {
        Some(l) => l.monthly_interest,
        None => {
            println!("No loan stored for {}; run `loan set` first.", user);
            return Ok(());
        }
    };

    let txns = db::fetch_transactions(conn, user, None, None)?;
    let classifier = Classifier::with_defaults();
    let avoidable: Vec<Transaction> = txns
        .iter()
        .filter(|t| {
            let category = classifier.resolve_category(t);
            classifier.is_avoidable(&category, t)
        })
        .cloned()
        .collect();

    let lines = loan::quick_impact(&avoidable, monthly_interest);
    if lines.is_empty() {
        println!("No avoidable expenses large enough to dent the loan.");
    } else {
        for line in lines {
            println!("{}", line);
        }
    }
    Ok(())
}
