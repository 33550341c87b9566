// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::maybe_print_json;
use crate::{analyze, db, report};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let from = sub.get_one::<String>("from").map(String::as_str);
    let to = sub.get_one::<String>("to").map(String::as_str);
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let txns = db::fetch_transactions(conn, user, from, to)?;
    let classifier = super::classifier_for(sub)?;
    let analysis = analyze::analyze(&txns, &classifier)?;

    if !maybe_print_json(json_flag, jsonl_flag, &analysis)? {
        println!("{}", report::spending_summary(&analysis));
        println!("{}", report::person_summary(&analysis));
        println!("{}", report::yearly_summary(&analysis));
        println!("{}", report::gst_summary(&analysis));
        println!("{}", report::reminders(&analysis));
        if analysis.skipped > 0 {
            println!(
                "Note: {} transactions had unparseable dates and were left out of period totals.",
                analysis.skipped
            );
        }
    }
    Ok(())
}
