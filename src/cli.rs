// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .short('u')
        .required(true)
        .help("Owner email")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

/// Filters shared by `trade list`, `report` and `export`; same names as the
/// API query string.
fn filter_args() -> Vec<Arg> {
    vec![
        Arg::new("symbol").long("symbol").help("Symbol substring"),
        Arg::new("market").long("market").help("Exact market, e.g. stock"),
        Arg::new("from").long("from").help("First trade date, YYYY-MM-DD"),
        Arg::new("to").long("to").help("Last trade date, YYYY-MM-DD"),
        Arg::new("pnl")
            .long("pnl")
            .value_parser(["all", "profitable", "lossable"])
            .help("P&L sign filter"),
        Arg::new("side").long("side").help("Buy or Sell"),
        Arg::new("emotions")
            .long("emotions")
            .help("Comma-separated emotional states; matches any"),
        Arg::new("strategy").long("strategy").help("Strategy name"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("verotrade")
        .about("VeroTrade: trading journal with emotion analytics and a JSON API")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite file (overrides VEROTRADE_DB)"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("serve").about("Run the HTTP API").arg(
                Arg::new("bind")
                    .long("bind")
                    .help("HOST:PORT (overrides VEROTRADE_BIND)"),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
        .subcommand(
            Command::new("user")
                .about("Users and API tokens")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(
                    Command::new("token")
                        .about("Issue a new bearer token")
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(
                    Command::new("revoke")
                        .about("Revoke every token of a user")
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("trade")
                .about("Journal trades")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("symbol").long("symbol").required(true))
                        .arg(Arg::new("side").long("side").required(true))
                        .arg(Arg::new("quantity").long("quantity").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("market").long("market"))
                        .arg(Arg::new("entry").long("entry").help("Entry price"))
                        .arg(Arg::new("exit").long("exit").help("Exit price"))
                        .arg(Arg::new("pnl").long("pnl").allow_hyphen_values(true))
                        .arg(Arg::new("entry_time").long("entry-time"))
                        .arg(Arg::new("exit_time").long("exit-time"))
                        .arg(
                            Arg::new("emotions")
                                .long("emotions")
                                .help("Comma-separated emotional states"),
                        )
                        .arg(Arg::new("strategy").long("strategy"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(user_arg())
                        .args(filter_args())
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("show")
                        .arg(user_arg())
                        .arg(Arg::new("id").long("id").required(true))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(user_arg())
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("strategy")
                .about("Strategies and their rule checklists")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("rule")
                                .long("rule")
                                .action(ArgAction::Append)
                                .help("Checklist rule; repeatable"),
                        ),
                )
                .subcommand(Command::new("list").arg(user_arg()))
                .subcommand(
                    Command::new("rm")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("rule-add")
                        .arg(user_arg())
                        .arg(Arg::new("strategy").long("strategy").required(true))
                        .arg(Arg::new("text").long("text").required(true)),
                )
                .subcommand(
                    Command::new("rules")
                        .arg(user_arg())
                        .arg(Arg::new("strategy").long("strategy").required(true)),
                )
                .subcommand(
                    Command::new("check")
                        .arg(user_arg())
                        .arg(Arg::new("rule").long("rule").required(true))
                        .arg(
                            Arg::new("uncheck")
                                .long("uncheck")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregates over trades")
                .subcommand(
                    Command::new("emotions")
                        .about("Emotion radar: frequency and buy/sell leaning")
                        .arg(user_arg())
                        .args(filter_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("stats")
                        .arg(user_arg())
                        .args(filter_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("pnl")
                        .about("Daily and cumulative P&L")
                        .arg(user_arg())
                        .args(filter_args())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("trades")
                    .arg(user_arg())
                    .args(filter_args())
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
}
