// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxnType;
use crate::utils::{parse_timestamp, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    let mut stmt = conn.prepare(
        "SELECT user_id, txn_id, created_at, amount, type FROM transactions ORDER BY user_id, created_at",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let user: String = r.get(0)?;
        let txn_id: String = r.get(1)?;
        let created_at: String = r.get(2)?;
        let amount: String = r.get(3)?;
        let kind: String = r.get(4)?;

        if parse_timestamp(&created_at).is_err() {
            rows.push(vec![
                "unparseable_date".into(),
                format!("{}/{}: '{}'", user, txn_id, created_at),
            ]);
        }
        if amount.parse::<Decimal>().is_err() {
            rows.push(vec![
                "unparseable_amount".into(),
                format!("{}/{}: '{}'", user, txn_id, amount),
            ]);
        }
        if TxnType::parse(&kind) == TxnType::Unknown {
            rows.push(vec![
                "unknown_type".into(),
                format!("{}/{}: '{}'", user, txn_id, kind),
            ]);
        }
    }

    // Loans with terms the engine would refuse.
    let mut stmt2 = conn.prepare("SELECT user_id, principal, term_months FROM loans")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let user: String = r.get(0)?;
        let principal: String = r.get(1)?;
        let term_months: i64 = r.get(2)?;
        let bad_principal = principal
            .parse::<Decimal>()
            .map(|p| p <= Decimal::ZERO)
            .unwrap_or(true);
        if bad_principal || term_months <= 0 {
            rows.push(vec![
                "invalid_loan".into(),
                format!("{}: principal '{}', {} months", user, principal, term_months),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
