// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("holdfast")
        .version(clap::crate_version!())
        .about("Track holdings in four categories and rebalance them against a fixed policy")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite database file (default: $HOLDFAST_DB or the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database if it does not exist"))
        .subcommand(
            Command::new("holding")
                .about("Record and list holdings")
                .subcommand(
                    Command::new("add")
                        .about("Record a new holding")
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("NASDAQ, SP, CONSERVATIVE or CASH"),
                        )
                        .arg(Arg::new("label").long("label").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Decimal amount, stored at two places"),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .about("List holdings in insertion order")
                        .arg(Arg::new("category").long("category")),
                )),
        )
        .subcommand(
            Command::new("recommend")
                .about("Show current totals against the policy targets")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as pretty JSON"),
                ),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Record and review history snapshots")
                .subcommand(
                    Command::new("save")
                        .about("Capture the current totals as a snapshot")
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue)
                                .help("Print as pretty JSON"),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list").about("List snapshots, newest first").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export ledger data to a file")
                .subcommand(
                    Command::new("holdings")
                        .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("history")
                        .arg(Arg::new("format").long("format").required(true).help("csv|json"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the stored ledger for problems"))
}
