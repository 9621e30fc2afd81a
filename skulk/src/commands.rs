use clap::{arg, command, value_parser};

use crate::CLAP_STYLING;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("skulk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("skulk")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .subcommand(
            command!("report")
                .about("Crawl each profile's site and write a CSV report of the results")
                .arg(
                    arg!(<CSV_PATH> "Where to write the CSV report")
                        .value_parser(value_parser!(std::path::PathBuf)),
                )
                .arg(arg!(<PROFILE>...).help("Profiles to run, chained in order"))
                .arg(
                    arg!(-f --find <GLOB>)
                        .required(false)
                        .num_args(1..)
                        .help("Report links matching any of the globs instead of status codes"),
                )
                .arg(
                    arg!(-q --quiet "Suppress per-URL output")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("assert")
                .about("Crawl a profile's site and check each page for CSS selectors")
                .arg(arg!(<PROFILE> "Profile to run"))
                .arg(arg!(<SELECTOR>...).help("CSS selectors that every page should contain"))
                .arg(
                    arg!(-q --quiet "Suppress per-URL output")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(command!("where").about("Print the profile store location"))
        .subcommand(
            command!("profile")
                .about("Manage stored profiles")
                .subcommand_required(true)
                .subcommand(
                    command!("create")
                        .about("Create a profile")
                        .arg(arg!(<NAME> "Profile name"))
                        .arg(arg!(<EMAIL> "Contact email for the crawler user agent"))
                        .arg(arg!(<ROOT>...).help("Root URLs to start spidering from"))
                        .arg(
                            arg!(--blacklist <PATTERN>)
                                .required(false)
                                .num_args(1..)
                                .help("Glob patterns for URLs to ignore"),
                        )
                        .arg(
                            arg!(--whitelist <PATTERN>)
                                .required(false)
                                .num_args(1..)
                                .help("Glob pattern exceptions to the blacklist"),
                        )
                        .arg(
                            arg!(--"internal-only" "Only check internal URLs")
                                .action(clap::ArgAction::SetTrue),
                        )
                        .arg(
                            arg!(--"scheme-squash" "Treat http and https URLs as equals")
                                .action(clap::ArgAction::SetTrue),
                        )
                        .arg(
                            arg!(--redirect "Follow redirects and report the landed status code")
                                .action(clap::ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    command!("edit")
                        .about("Edit a profile in place")
                        .arg(arg!(<NAME> "Profile name"))
                        .arg(
                            arg!(--roots <ROOT>)
                                .required(false)
                                .num_args(1..)
                                .help("Replace the roots"),
                        )
                        .arg(
                            arg!(--email <EMAIL>)
                                .required(false)
                                .help("Replace the contact email"),
                        )
                        .arg(
                            arg!(--blacklist <PATTERN>)
                                .required(false)
                                .num_args(1..)
                                .help("Replace the blacklist"),
                        )
                        .arg(
                            arg!(--whitelist <PATTERN>)
                                .required(false)
                                .num_args(1..)
                                .help("Replace the whitelist"),
                        )
                        .arg(
                            arg!(--"internal-only" <BOOL>)
                                .required(false)
                                .value_parser(value_parser!(bool))
                                .help("Only check internal URLs"),
                        )
                        .arg(
                            arg!(--"scheme-squash" <BOOL>)
                                .required(false)
                                .value_parser(value_parser!(bool))
                                .help("Treat http and https URLs as equals"),
                        )
                        .arg(
                            arg!(--redirect <BOOL>)
                                .required(false)
                                .value_parser(value_parser!(bool))
                                .help("Follow redirects and report the landed status code"),
                        ),
                )
                .subcommand(
                    command!("remove")
                        .about("Remove a profile")
                        .arg(arg!(<NAME> "Profile name")),
                )
                .subcommand(
                    command!("rename")
                        .about("Rename a profile")
                        .arg(arg!(<OLD_NAME> "Current profile name"))
                        .arg(arg!(<NEW_NAME> "New profile name")),
                )
                .subcommand(command!("list").about("List stored profiles"))
                .subcommand(
                    command!("info")
                        .about("Show a stored profile")
                        .arg(arg!(<NAME> "Profile name")),
                )
                .subcommand(pattern_commands("blacklist", "Edit a profile's blacklist"))
                .subcommand(pattern_commands("whitelist", "Edit a profile's whitelist"))
                .subcommand(
                    command!("roots")
                        .about("Edit a profile's roots")
                        .subcommand_required(true)
                        .subcommand(
                            command!("add")
                                .about("Add roots")
                                .arg(arg!(<NAME> "Profile name"))
                                .arg(arg!(<ROOT>...).help("Roots to add")),
                        )
                        .subcommand(
                            command!("remove")
                                .about("Remove roots")
                                .arg(arg!(<NAME> "Profile name"))
                                .arg(arg!(<ROOT>...).help("Roots to remove")),
                        )
                        .subcommand(
                            command!("list")
                                .about("List roots")
                                .arg(arg!(<NAME> "Profile name")),
                        ),
                ),
        )
}

fn pattern_commands(name: &'static str, about: &'static str) -> clap::Command {
    clap::Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(
            command!("add")
                .about("Add glob patterns")
                .arg(arg!(<NAME> "Profile name"))
                .arg(arg!(<PATTERN>...).help("Patterns to add")),
        )
        .subcommand(
            command!("remove")
                .about("Remove glob patterns")
                .arg(arg!(<NAME> "Profile name"))
                .arg(arg!(<PATTERN>...).help("Patterns to remove")),
        )
        .subcommand(
            command!("clear")
                .about("Remove every pattern")
                .arg(arg!(<NAME> "Profile name")),
        )
        .subcommand(
            command!("list")
                .about("List patterns")
                .arg(arg!(<NAME> "Profile name")),
        )
}
