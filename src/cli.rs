// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

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

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
        .help("Record id")
}

pub fn build_cli() -> Command {
    Command::new("outgo")
        .version(crate_version!())
        .about("Offline-first personal expense, subscription, installment, and savings tracker")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the local store"))
        .subcommand(
            Command::new("user")
                .about("Manage the local profile")
                .subcommand(
                    Command::new("set")
                        .about("Create or update the profile")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("pin").long("pin").required(true)),
                )
                .subcommand(Command::new("show").about("Show the profile")),
        )
        .subcommand(
            Command::new("expense")
                .about("One-off expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense")
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expenses")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Update an expense")
                        .arg(id_arg())
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(Command::new("rm").about("Delete an expense").arg(id_arg())),
        )
        .subcommand(
            Command::new("category")
                .about("Categories per entity family")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("family")
                                .long("family")
                                .default_value("expense")
                                .help("expense|subscription|installment"),
                        )
                        .arg(Arg::new("icon").long("icon").default_value(""))
                        .arg(Arg::new("color").long("color").default_value("")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List categories")
                        .arg(
                            Arg::new("family")
                                .long("family")
                                .default_value("expense")
                                .help("expense|subscription|installment"),
                        )
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include deactivated categories"),
                        ),
                ))
                .subcommand(
                    Command::new("toggle")
                        .about("Activate or deactivate a category")
                        .arg(id_arg()),
                )
                .subcommand(Command::new("rm").about("Delete a category").arg(id_arg())),
        )
        .subcommand(
            Command::new("subscription")
                .about("Recurring subscriptions")
                .subcommand(
                    Command::new("add")
                        .about("Add a subscription")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("periodicity")
                                .long("periodicity")
                                .default_value("monthly")
                                .help("monthly|annual"),
                        )
                        .arg(Arg::new("start").long("start").help("YYYY-MM-DD"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List subscriptions").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive subscriptions"),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Update a subscription")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("periodicity").long("periodicity"))
                        .arg(Arg::new("start").long("start"))
                        .arg(
                            Arg::new("clear-start")
                                .long("clear-start")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("start")
                                .help("Remove the start date (item counts in every period)"),
                        )
                        .arg(Arg::new("notes").long("notes"))
                        .arg(
                            Arg::new("clear-notes")
                                .long("clear-notes")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("notes")
                                .help("Remove the notes"),
                        ),
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Activate or deactivate a subscription")
                        .arg(id_arg()),
                )
                .subcommand(Command::new("rm").about("Delete a subscription").arg(id_arg()))
                .subcommand(json_flags(
                    Command::new("history")
                        .about("Show a subscription's price history")
                        .arg(id_arg()),
                )),
        )
        .subcommand(
            Command::new("installment")
                .about("Installment purchases and their payment schedules")
                .subcommand(
                    Command::new("add")
                        .about("Add a purchase and generate its schedule")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("total").long("total").required(true))
                        .arg(
                            Arg::new("count")
                                .long("count")
                                .required(true)
                                .value_parser(clap::value_parser!(u32))
                                .help("Number of installments"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Per-installment amount (default: total / count)"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("periodicity")
                                .long("periodicity")
                                .default_value("monthly")
                                .help("monthly|biweekly"),
                        )
                        .arg(Arg::new("start").long("start").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List purchases").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive purchases"),
                    ),
                ))
                .subcommand(json_flags(
                    Command::new("schedule")
                        .about("Show a purchase's payment schedule")
                        .arg(id_arg()),
                ))
                .subcommand(Command::new("pay").about("Mark a payment paid").arg(id_arg()))
                .subcommand(Command::new("unpay").about("Mark a payment unpaid").arg(id_arg()))
                .subcommand(
                    Command::new("toggle")
                        .about("Activate or deactivate a purchase")
                        .arg(id_arg()),
                )
                .subcommand(Command::new("rm").about("Delete a purchase").arg(id_arg())),
        )
        .subcommand(
            Command::new("saving")
                .about("Savings pots and their movement ledgers")
                .subcommand(
                    Command::new("add")
                        .about("Add a savings pot")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("other")
                                .help("cash|bank|investment|other"),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List savings pots").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include inactive pots"),
                    ),
                ))
                .subcommand(
                    Command::new("deposit")
                        .about("Record a deposit")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("withdraw")
                        .about("Record a withdrawal")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(
                    Command::new("movements")
                        .about("Show a pot's movement ledger")
                        .arg(id_arg()),
                ))
                .subcommand(
                    Command::new("toggle")
                        .about("Activate or deactivate a pot")
                        .arg(id_arg()),
                )
                .subcommand(Command::new("rm").about("Delete a pot").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Period summaries")
                .subcommand(json_flags(
                    Command::new("week")
                        .about("One-off expenses in an inclusive date window")
                        .arg(Arg::new("start").long("start").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("end").long("end").required(true).help("YYYY-MM-DD")),
                ))
                .subcommand(json_flags(
                    Command::new("month")
                        .about("Expenses plus recurring costs for a month")
                        .arg(Arg::new("month").long("month").help("YYYY-MM (default: current)")),
                ))
                .subcommand(json_flags(
                    Command::new("year")
                        .about("Expenses plus recurring costs for a year")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(clap::value_parser!(i32))
                                .help("Default: current year"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("subscriptions").about("Active subscription rollup"),
                ))
                .subcommand(json_flags(
                    Command::new("installments").about("Unpaid installment rollup"),
                ))
                .subcommand(json_flags(
                    Command::new("savings").about("Active savings balances by kind"),
                )),
        )
        .subcommand(
            Command::new("backup")
                .about("Full data set export/import")
                .subcommand(
                    Command::new("export")
                        .about("Write a backup document")
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("import")
                        .about("Replace all data from a backup document")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Flat exports")
                .subcommand(
                    Command::new("expenses")
                        .about("Export expenses to a file")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Run store integrity checks"))
}
