use colored::Colorize;
use commands::command_argument_builder;
use skulk::handlers::{self, PatternList};

mod commands;

pub(crate) const CLAP_STYLING: clap::builder::styling::Styles = clap_cargo::style::CLAP_STYLING;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    let result = match matches.subcommand() {
        Some(("report", primary_command)) => handlers::handle_report(primary_command).await,
        Some(("assert", primary_command)) => handlers::handle_assert(primary_command).await,
        Some(("where", _)) => handlers::handle_where(),
        Some(("profile", primary_command)) => match primary_command.subcommand() {
            Some(("create", secondary_command)) => handlers::handle_profile_create(secondary_command),
            Some(("edit", secondary_command)) => handlers::handle_profile_edit(secondary_command),
            Some(("remove", secondary_command)) => handlers::handle_profile_remove(secondary_command),
            Some(("rename", secondary_command)) => handlers::handle_profile_rename(secondary_command),
            Some(("list", _)) => handlers::handle_profile_list(),
            Some(("info", secondary_command)) => handlers::handle_profile_info(secondary_command),
            Some(("blacklist", secondary_command)) => {
                handlers::handle_patterns(PatternList::Blacklist, secondary_command)
            }
            Some(("whitelist", secondary_command)) => {
                handlers::handle_patterns(PatternList::Whitelist, secondary_command)
            }
            Some(("roots", secondary_command)) => handlers::handle_roots(secondary_command),
            _ => unreachable!("clap should ensure we don't get here"),
        },
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(err) = result {
        eprintln!("{} {err}", "✗".red().bold());
        std::process::exit(1);
    }
}
