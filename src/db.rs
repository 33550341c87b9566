// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ItrSummary, LoanRecord, Transaction, TxnType};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Rupeelens", "rupeelens"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("rupeelens.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        txn_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        type TEXT NOT NULL,
        category TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date
        ON transactions(user_id, created_at);

    CREATE TABLE IF NOT EXISTS loans(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        principal TEXT NOT NULL,
        annual_rate TEXT NOT NULL,
        term_months INTEGER NOT NULL,
        monthly_interest TEXT NOT NULL
    );

    -- One durable report per (key, financial year); writes fully replace.
    CREATE TABLE IF NOT EXISTS reports(
        key TEXT NOT NULL,
        financial_year TEXT NOT NULL,
        json TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        PRIMARY KEY(key, financial_year)
    );
    "#,
    )?;
    Ok(())
}

pub fn insert_transaction(conn: &Connection, user_id: &str, txn: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(user_id, txn_id, created_at, description, amount, type, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            txn.id,
            txn.created_at,
            txn.description,
            txn.amount.to_string(),
            txn.kind.as_str(),
            txn.category.as_deref()
        ],
    )?;
    Ok(())
}

/// Materialize one user's batch, most recent first, optionally bounded by an
/// inclusive created_at range. Rows with unparseable amounts are logged and
/// skipped rather than failing the fetch.
pub fn fetch_transactions(
    conn: &Connection,
    user_id: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT txn_id, created_at, description, amount, type, category
         FROM transactions WHERE user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(from) = from {
        sql.push_str(" AND created_at>=?");
        params_vec.push(from.to_string());
    }
    if let Some(to) = to {
        sql.push_str(" AND created_at<=?");
        params_vec.push(to.to_string());
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let txn_id: String = r.get(0)?;
        let created_at: String = r.get(1)?;
        let description: String = r.get(2)?;
        let amount_raw: String = r.get(3)?;
        let kind_raw: String = r.get(4)?;
        let category: Option<String> = r.get(5)?;
        let amount = match amount_raw.parse::<Decimal>() {
            Ok(a) => a,
            Err(_) => {
                warn!(id = %txn_id, amount = %amount_raw, "unparseable amount, skipping row");
                continue;
            }
        };
        out.push(Transaction {
            id: txn_id,
            created_at,
            description,
            amount,
            kind: TxnType::parse(&kind_raw),
            category,
        });
    }
    Ok(out)
}

pub fn insert_loan(conn: &Connection, user_id: &str, loan: &LoanRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO loans(user_id, principal, annual_rate, term_months, monthly_interest)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            loan.principal.to_string(),
            loan.annual_rate.to_string(),
            loan.term_months,
            loan.monthly_interest.to_string()
        ],
    )?;
    Ok(())
}

pub fn fetch_loans(conn: &Connection, user_id: &str) -> Result<Vec<LoanRecord>> {
    let mut stmt = conn.prepare(
        "SELECT principal, annual_rate, term_months, monthly_interest
         FROM loans WHERE user_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, u32>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (principal, rate, term_months, monthly_interest) = row?;
        out.push(LoanRecord {
            principal: principal
                .parse::<Decimal>()
                .with_context(|| format!("Invalid principal '{}'", principal))?,
            annual_rate: rate
                .parse::<Decimal>()
                .with_context(|| format!("Invalid rate '{}'", rate))?,
            term_months,
            monthly_interest: monthly_interest
                .parse::<Decimal>()
                .with_context(|| format!("Invalid monthly interest '{}'", monthly_interest))?,
        });
    }
    Ok(out)
}

/// Last-write-wins persistence of the ITR summary document.
pub fn save_itr_summary(conn: &Connection, summary: &ItrSummary) -> Result<String> {
    let key = ItrSummary::storage_key(&summary.user_id);
    let json = serde_json::to_string_pretty(summary)?;
    conn.execute(
        "INSERT INTO reports(key, financial_year, json, updated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(key, financial_year) DO UPDATE SET
             json=excluded.json, updated_at=excluded.updated_at",
        params![key, summary.financial_year, json],
    )?;
    Ok(key)
}

pub fn load_itr_summary(
    conn: &Connection,
    user_id: &str,
    financial_year: &str,
) -> Result<Option<ItrSummary>> {
    let key = ItrSummary::storage_key(user_id);
    let raw: Option<String> = conn
        .query_row(
            "SELECT json FROM reports WHERE key=?1 AND financial_year=?2",
            params![key, financial_year],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(json) => {
            let summary = serde_json::from_str(&json)
                .with_context(|| format!("Corrupt report document for {}", key))?;
            Ok(Some(summary))
        }
        None => Ok(None),
    }
}
