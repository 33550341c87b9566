// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{Transaction, TxnType};
use crate::utils::{maybe_print_json, parse_decimal, parse_timestamp, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let date_raw = sub.get_one::<String>("date").unwrap();
    let desc = sub.get_one::<String>("desc").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind = TxnType::parse(sub.get_one::<String>("type").unwrap());
    let category = sub.get_one::<String>("category").map(|s| s.to_string());

    // Validate up front so the stored batch stays analyzable.
    let when = parse_timestamp(date_raw)?;

    let txn = Transaction {
        id: format!("{}-{}", user, when.format("%Y%m%d%H%M%S")),
        created_at: date_raw.to_string(),
        description: desc.to_string(),
        amount,
        kind,
        category,
    };
    db::insert_transaction(conn, user, &txn)?;
    println!(
        "Recorded {} '{}' for {} on {}",
        txn.kind.as_str(),
        txn.description,
        txn.amount,
        txn.created_at
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut data = db::fetch_transactions(conn, user, None, None)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.created_at.clone(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.kind.as_str().to_string(),
                    t.category.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Amount", "Type", "Category"], rows)
        );
    }
    Ok(())
}
