// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .required(true)
        .help("User identifier")
}

pub fn build_cli() -> Command {
    Command::new("rupeelens")
        .about("Transaction analytics, tax estimation, and loan optimization")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record one transaction")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").required(true).help(
                            "Timestamp, ISO-8601 (YYYY-MM-DD or full datetime with offset)",
                        ))
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("received|sent|expense|income|loan_payment"),
                        )
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List stored transactions")
                        .arg(user_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("import").about("Import records").subcommand(
                Command::new("transactions")
                    .about("Import transactions from CSV (id,created_at,description,amount,type,category)")
                    .arg(user_arg())
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(json_flags(
            Command::new("analyze")
                .about("Aggregate a user's batch into a spending snapshot")
                .arg(user_arg())
                .arg(Arg::new("from").long("from").help("Inclusive lower created_at bound"))
                .arg(Arg::new("to").long("to").help("Inclusive upper created_at bound"))
                .arg(Arg::new("rules").long("rules").help("Path to a classifier rules JSON file")),
        ))
        .subcommand(
            Command::new("tax")
                .about("Income tax estimation")
                .subcommand(json_flags(
                    Command::new("report")
                        .about("Head-wise liability; persists the ITR summary")
                        .arg(user_arg())
                        .arg(Arg::new("fy").long("fy").default_value("2025-26"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("rules").long("rules")),
                ))
                .subcommand(json_flags(
                    Command::new("regimes")
                        .about("Flat old-vs-new regime comparison")
                        .arg(user_arg())
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("rules").long("rules")),
                ))
                .subcommand(json_flags(
                    Command::new("calc")
                        .about("Head-wise liability for explicit gross amounts")
                        .arg(Arg::new("salary").long("salary").default_value("0"))
                        .arg(Arg::new("house").long("house").default_value("0"))
                        .arg(Arg::new("business").long("business").default_value("0"))
                        .arg(Arg::new("other").long("other").default_value("0")),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Read back the persisted ITR summary")
                        .arg(user_arg())
                        .arg(Arg::new("fy").long("fy").default_value("2025-26")),
                )),
        )
        .subcommand(
            Command::new("loan")
                .about("Loan repayment analysis")
                .subcommand(json_flags(
                    Command::new("optimize")
                        .about("Baseline vs non-essential-spend-optimized schedule")
                        .arg(user_arg())
                        .arg(Arg::new("principal").long("principal"))
                        .arg(Arg::new("rate").long("rate").help("Annual rate as a fraction, e.g. 0.09"))
                        .arg(
                            Arg::new("years")
                                .long("years")
                                .value_parser(clap::value_parser!(u32)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("schedule")
                        .about("Standard amortization schedule")
                        .arg(Arg::new("principal").long("principal"))
                        .arg(Arg::new("rate").long("rate"))
                        .arg(
                            Arg::new("years")
                                .long("years")
                                .value_parser(clap::value_parser!(u32)),
                        ),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Store loan terms for a user")
                        .arg(user_arg())
                        .arg(Arg::new("principal").long("principal").required(true))
                        .arg(Arg::new("rate").long("rate").required(true))
                        .arg(
                            Arg::new("years")
                                .long("years")
                                .required(true)
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("monthly-interest")
                                .long("monthly-interest")
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("impact")
                        .about("What avoidable expenses would have saved in tenure")
                        .arg(user_arg()),
                ),
        )
        .subcommand(Command::new("doctor").about("Integrity checks over stored batches"))
}
