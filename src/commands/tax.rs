// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, parse_decimal};
use crate::{analyze, db, report, tax};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => head_wise_report(conn, sub)?,
        Some(("regimes", sub)) => regimes(conn, sub)?,
        Some(("calc", sub)) => calc(sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Head-wise liability over the stored batch. Also runs the flat regime
/// comparison so the persisted ITR summary carries both modes.
fn head_wise_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let fy = sub.get_one::<String>("fy").unwrap();
    let from = sub.get_one::<String>("from").map(String::as_str);
    let to = sub.get_one::<String>("to").map(String::as_str);
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let txns = db::fetch_transactions(conn, user, from, to)?;
    let classifier = super::classifier_for(sub)?;
    let analysis = analyze::analyze(&txns, &classifier)?;
    let heads = analyze::analyze_income_heads(&txns, &classifier)?;

    let summary = tax::build_itr_summary(user, fy, &analysis, &heads);
    let key = db::save_itr_summary(conn, &summary)?;

    if !maybe_print_json(json_flag, jsonl_flag, &summary.head_wise)? {
        println!("{}", report::tax_report(&summary.head_wise));
        println!("TDS Paid: ₹{:.2}", heads.tds_deducted);
        println!("Saved ITR summary as {} for FY {}", key, fy);
    }
    Ok(())
}

fn regimes(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let from = sub.get_one::<String>("from").map(String::as_str);
    let to = sub.get_one::<String>("to").map(String::as_str);
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let txns = db::fetch_transactions(conn, user, from, to)?;
    let classifier = super::classifier_for(sub)?;
    let analysis = analyze::analyze(&txns, &classifier)?;
    let cmp = tax::compare_regimes(&analysis);

    if !maybe_print_json(json_flag, jsonl_flag, &cmp)? {
        println!("{}", report::regime_report(&cmp, analysis.tds_paid));
    }
    Ok(())
}

fn calc(sub: &clap::ArgMatches) -> Result<()> {
    let salary = parse_decimal(sub.get_one::<String>("salary").unwrap())?;
    let house = parse_decimal(sub.get_one::<String>("house").unwrap())?;
    let business = parse_decimal(sub.get_one::<String>("business").unwrap())?;
    let other = parse_decimal(sub.get_one::<String>("other").unwrap())?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let result = tax::liability_for_heads(salary, house, business, other);
    if !maybe_print_json(json_flag, jsonl_flag, &result)? {
        println!("{}", report::tax_report(&result));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let fy = sub.get_one::<String>("fy").unwrap();
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    match db::load_itr_summary(conn, user, fy)? {
        Some(summary) => {
            if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
                println!("{}", report::tax_report(&summary.head_wise));
                println!(
                    "{}",
                    report::regime_report(&summary.regimes, summary.tds_paid)
                );
            }
        }
        None => println!("No ITR summary stored for {} in FY {}", user, fy),
    }
    Ok(())
}
