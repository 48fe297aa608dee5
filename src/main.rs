// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use verotrade::{api, cli, commands, config, db, telemetry};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut cfg = config::Config::from_env()?;
    if let Some(path) = matches.get_one::<String>("db") {
        cfg.database_path = Some(PathBuf::from(path));
    }
    telemetry::init(&cfg.log_filter);

    let conn = db::open_or_init(&cfg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&cfg)?.display());
        }
        Some(("serve", sub)) => {
            if let Some(bind) = sub.get_one::<String>("bind") {
                cfg.bind_addr = config::parse_bind(bind)?;
            }
            let addr = cfg.bind_addr;
            let state = api::AppState::new(conn, cfg);
            tokio::runtime::Runtime::new()?.block_on(api::serve(state, addr))?;
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("trade", sub)) => commands::trades::handle(&conn, sub)?,
        Some(("strategy", sub)) => commands::strategies::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
