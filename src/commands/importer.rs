// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TxnType};
use crate::utils::{parse_decimal, parse_timestamp};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{params, Connection};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Columns: id, created_at, description, amount, type, category. The whole
/// file commits or none of it does.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for result in rdr.records() {
        let rec = result?;
        let id = rec.get(0).context("id missing")?.trim().to_string();
        let created_at = rec.get(1).context("created_at missing")?.trim().to_string();
        let description = rec
            .get(2)
            .context("description missing")?
            .trim()
            .to_string();
        let amount_raw = rec.get(3).context("amount missing")?.trim();
        let kind_raw = rec.get(4).context("type missing")?.trim();
        let category = rec
            .get(5)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        parse_timestamp(&created_at)
            .with_context(|| format!("Invalid created_at '{}' for {}", created_at, id))?;
        let amount = parse_decimal(amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, id))?;

        let txn = Transaction {
            id,
            created_at,
            description,
            amount,
            kind: TxnType::parse(kind_raw),
            category,
        };
        tx.execute(
            "INSERT INTO transactions(user_id, txn_id, created_at, description, amount, type, category) \
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                user,
                txn.id,
                txn.created_at,
                txn.description,
                txn.amount.to_string(),
                txn.kind.as_str(),
                txn.category.as_deref()
            ],
        )?;
        count += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
