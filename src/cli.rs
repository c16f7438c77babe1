// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::analytics::MAX_RUNS;

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .value_parser(value_parser!(u32).range(1..=12))
            .help("Calendar month 1-12 (default: current)"),
    )
    .arg(
        Arg::new("year")
            .long("year")
            .value_parser(value_parser!(i32))
            .help("Calendar year (default: current)"),
    )
}

fn report_cmd(name: &'static str, about: &'static str) -> Command {
    json_args(period_args(Command::new(name).about(about))).arg(
        Arg::new("include_income")
            .long("include-income")
            .action(ArgAction::SetTrue)
            .help("Count income toward category totals"),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendwise")
        .about("Category budgets, abnormal-spending detection, and savings projections")
        .version(clap::crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("date").long("date").required(true).help("DD/MM/YYYY"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Negative for expenses"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("Success")
                                .help("Success, Planned or Completed"),
                        )
                        .arg(Arg::new("type").long("type").help("e.g. Transfer, Payment"))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .allow_hyphen_values(true)
                                .help("Wallet balance after the transaction"),
                        ),
                )
                .subcommand(json_args(period_args(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("abnormal")
                                .long("abnormal")
                                .action(ArgAction::SetTrue)
                                .help("Only show abnormal expenses"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Set a category limit")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("global")
                                .help("'global' or YYYY_M"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List stored limits")
                        .arg(Arg::new("period").long("period")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly analytics")
                .subcommand(report_cmd("dashboard", "Spending by category against budget"))
                .subcommand(report_cmd("anomalies", "Expenses far above their category's norm"))
                .subcommand(report_cmd("tips", "Cost-cutting suggestions")),
        )
        .subcommand(
            Command::new("project")
                .about("Project future savings")
                .arg(Arg::new("saving").long("saving").required(true).help("Monthly saving"))
                .arg(
                    Arg::new("expenses")
                        .long("expenses")
                        .required(true)
                        .help("Fixed monthly expenses"),
                )
                .arg(Arg::new("years").long("years").default_value("10"))
                .arg(Arg::new("roi_min").long("roi-min").default_value("4"))
                .arg(Arg::new("roi_max").long("roi-max").default_value("8"))
                .arg(
                    Arg::new("no_roi")
                        .long("no-roi")
                        .action(ArgAction::SetTrue)
                        .help("Ignore investment returns"),
                )
                .arg(
                    Arg::new("increment_min")
                        .long("increment-min")
                        .default_value("10"),
                )
                .arg(
                    Arg::new("increment_max")
                        .long("increment-max")
                        .default_value("30"),
                )
                .arg(
                    Arg::new("increment_every")
                        .long("increment-every")
                        .default_value("2")
                        .help("Years between salary increments"),
                )
                .arg(
                    Arg::new("no_increment")
                        .long("no-increment")
                        .action(ArgAction::SetTrue)
                        .help("Ignore salary increments"),
                )
                .arg(
                    Arg::new("runs")
                        .long("runs")
                        .value_parser(value_parser!(u64).range(1..=MAX_RUNS as u64))
                        .help("Repeat the projection and summarize percentiles"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for reproducible draws"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print pretty JSON"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions")
                        .about("Import transactions from CSV or JSON")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(json_args(period_args(
            Command::new("badges").about("Show level, streak and earned badges"),
        )))
        .subcommand(Command::new("checkin").about("Record a daily check-in for XP and streaks"))
        .subcommand(
            Command::new("config")
                .about("Read or change settings")
                .subcommand(
                    Command::new("get")
                        .about("Show a setting")
                        .arg(Arg::new("key").required(true)),
                )
                .subcommand(
                    Command::new("set")
                        .about("Change a setting")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
