// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::process::ExitCode;

use anyhow::Result;

use holdfast::{cli, commands, config::Settings, db, errors::ledger_error, logging};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Domain rejections are the caller's problem, not a crash
            if let Some(rejected) = ledger_error(&err) {
                eprintln!("error: {}", rejected);
                ExitCode::from(2)
            } else {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        }
    }
}

fn run() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let settings = Settings::resolve(&matches)?;
    logging::init(&settings.log_filter)?;

    let conn = db::open_or_init(&settings.db_path)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", settings.db_path.display());
        }
        Some(("holding", sub)) => commands::holdings::handle(&conn, sub)?,
        Some(("recommend", sub)) => commands::recommend::handle(&conn, sub)?,
        Some(("snapshot", sub)) => commands::snapshots::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
