// Command-line definition, shared with build.rs for shell completions.

use clap::{Arg, ArgAction, Command, ValueHint};

pub fn build_cli() -> Command {
    Command::new("fqlp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive playground for the FQL filter query language")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Configuration file layered over the defaults and ~/.config/fqlp/config.toml")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("placeholder")
                .long("placeholder")
                .value_name("TEXT")
                .help("Placeholder shown in the empty input field (empty for none)"),
        )
        .arg(
            Arg::new("no-range-selection")
                .long("no-range-selection")
                .help("Do not select a diagnostic's range when it is activated")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("loading")
                .long("loading")
                .value_name("STRATEGY")
                .help("How the UI waits for the parse engine")
                .value_parser(["immediate", "suspense"]),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write logs to this file (the interactive UI logs nowhere otherwise)")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log filter, e.g. info or fql_playground=debug")
                .global(true),
        )
        .subcommand(
            Command::new("parse")
                .about("Print the diagnostics and debug tree for FILTER")
                .arg(filter_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print a JSON document instead of text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("facts")
                .about("Print the kind of FILTER's top-level expression")
                .arg(filter_arg()),
        )
        .subcommand(
            Command::new("properties")
                .about("List the properties in FILTER (e.g. \"host.online\")")
                .arg(filter_arg()),
        )
        .subcommand(
            Command::new("operands")
                .about("List the operand values in FILTER (e.g. \"true\" or \"'windows'\")")
                .arg(filter_arg()),
        )
}

fn filter_arg() -> Arg {
    Arg::new("filter")
        .value_name("FILTER")
        .help("An FQL filter, such as \"host.online:true\"")
        .required(true)
        .index(1)
}
