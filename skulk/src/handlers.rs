use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use clap::ArgMatches;
use colored::{Color, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use skulk_core::report::{write_find_report, write_status_report};
use skulk_core::{
    CancelToken, Link, PageStatus, Profile, ProfileError, ProfileStore, ReferrerGraph, StatusCode,
};
use skulk_fetch::{CssProbe, HttpFetcher};
use tracing::debug;

/// Percentage with two decimals, as shown in report summaries.
pub fn perc(num: usize, den: usize) -> f64 {
    if den == 0 {
        return 0.0;
    }
    (num as f64 * 10000.0 / den as f64).round() / 100.0
}

/// Console color for a status code class.
pub fn code_color(code: &StatusCode) -> Color {
    match code {
        StatusCode::Exact(code) => match code {
            100..=199 => Color::White,
            200..=299 => Color::Green,
            300..=399 => Color::Cyan,
            400..=499 => Color::Yellow,
            _ => Color::Red,
        },
        _ => Color::Red,
    }
}

/// Drop globs that are only whitespace.
pub fn nonblank_globs(globs: Vec<String>) -> Vec<String> {
    globs
        .into_iter()
        .filter(|glob| !glob.trim().is_empty())
        .collect()
}

fn cancel_on_ctrl_c() -> CancelToken {
    let token = CancelToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping after the current page...");
            handle.cancel();
        }
    });
    token
}

fn print_status_line(name: &str, link: &Link, status: &PageStatus, internal: bool) {
    let code = status.code.to_string();
    let scope = if internal { "internal" } else { "external" };
    println!(
        "[{}][{}][{}] {}",
        name.bold(),
        code.as_str().color(code_color(&status.code)).bold(),
        scope.bold(),
        link.absolute()
    );
    if let Some(error) = &status.error {
        println!("^ {}: {}", "Error".red().bold(), error);
    }
}

pub async fn handle_report(args: &ArgMatches) -> Result<()> {
    let csv_path = args.get_one::<PathBuf>("CSV_PATH").unwrap().clone();
    let names: Vec<String> = args
        .get_many::<String>("PROFILE")
        .unwrap()
        .cloned()
        .collect();
    let quiet = args.get_flag("quiet");
    let find_globs: Option<Vec<String>> = args
        .get_many::<String>("find")
        .map(|globs| globs.cloned().collect());

    let store = ProfileStore::default_location();
    let mut profiles = Vec::with_capacity(names.len());
    for name in &names {
        profiles.push(store.load(name)?);
    }
    debug!(profiles = profiles.len(), "starting report run");

    let cancel = cancel_on_ctrl_c();
    match find_globs {
        Some(globs) => {
            let globs = nonblank_globs(globs);
            if globs.is_empty() {
                bail!("no glob patterns provided for --find");
            }
            run_find_report(&profiles, &globs, &csv_path, quiet, &cancel).await
        }
        None => run_status_report(&profiles, &csv_path, quiet, &cancel).await,
    }
}

async fn run_status_report(
    profiles: &[Profile],
    csv_path: &Path,
    quiet: bool,
    cancel: &CancelToken,
) -> Result<()> {
    let mut graph: Option<ReferrerGraph<PageStatus>> = None;
    for profile in profiles {
        let fetcher = HttpFetcher::new(&profile.user_agent(), profile.redirect)?;
        let mut task = profile.status_task()?;
        if let Some(previous) = graph.take() {
            task = task.with_graph(previous);
        }
        if !quiet {
            let name = profile.name.clone();
            task = task.with_result_callback(Arc::new(move |link, status, internal| {
                print_status_line(&name, link, status, internal);
            }));
        }
        profile.run(fetcher, &mut task, cancel).await?;
        graph = Some(task.into_graph());
        if cancel.is_cancelled() {
            break;
        }
    }

    let graph = graph.unwrap_or_else(ReferrerGraph::slash_insensitive);
    println!("Saving report...");
    let summary = write_status_report(&graph, csv_path)?;
    println!("Total:\t{}", summary.total);
    for (code, count) in &summary.counts {
        println!("{}:\t{}\t{}%", code, count, perc(*count, summary.total));
    }
    Ok(())
}

async fn run_find_report(
    profiles: &[Profile],
    globs: &[String],
    csv_path: &Path,
    quiet: bool,
    cancel: &CancelToken,
) -> Result<()> {
    let mut graph: Option<ReferrerGraph<()>> = None;
    for profile in profiles {
        let fetcher = HttpFetcher::new(&profile.user_agent(), profile.redirect)?;
        let mut task = profile.find_task(globs)?;
        if let Some(previous) = graph.take() {
            task = task.with_graph(previous);
        }
        let progress = if quiet {
            None
        } else {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap(),
            );
            let name = profile.name.clone();
            let match_spinner = spinner.clone();
            task = task.with_match_callback(Arc::new(move |referrer, url| {
                match_spinner.println(format!(
                    "[{}][{}] {} => {}",
                    name.bold(),
                    "found".green().bold(),
                    referrer,
                    url
                ));
            }));
            let name = profile.name.clone();
            let fetch_spinner = spinner.clone();
            let checked = Arc::new(AtomicUsize::new(0));
            task = task.with_fetch_callback(Arc::new(move |link, status| {
                let count = checked.fetch_add(1, Ordering::Relaxed) + 1;
                fetch_spinner.set_message(format!("{count} pages checked"));
                fetch_spinner.tick();
                if let Some(error) = &status.error {
                    fetch_spinner.println(format!(
                        "[{}][{}] {}",
                        name.bold(),
                        status
                            .code
                            .to_string()
                            .as_str()
                            .color(code_color(&status.code))
                            .bold(),
                        link.absolute()
                    ));
                    fetch_spinner.println(format!("^ {}: {}", "Error".red().bold(), error));
                }
            }));
            Some(spinner)
        };
        profile.run(fetcher, &mut task, cancel).await?;
        if let Some(spinner) = progress {
            spinner.finish_and_clear();
        }
        graph = Some(task.into_graph());
        if cancel.is_cancelled() {
            break;
        }
    }

    let graph = graph.unwrap_or_else(ReferrerGraph::slash_insensitive);
    println!("Saving report...");
    let summary = write_find_report(&graph, csv_path)?;
    println!("Total pages:\t{}", summary.pages);
    println!("Matched URLs:\t{}", summary.matched);
    println!(
        "Pages with matches:\t{}\t{}%",
        summary.pages_with_matches,
        perc(summary.pages_with_matches, summary.pages)
    );
    Ok(())
}

pub async fn handle_assert(args: &ArgMatches) -> Result<()> {
    let name = args.get_one::<String>("PROFILE").unwrap();
    let selectors: Vec<String> = args
        .get_many::<String>("SELECTOR")
        .unwrap()
        .cloned()
        .collect();
    let quiet = args.get_flag("quiet");

    let store = ProfileStore::default_location();
    let profile = store.load(name)?;
    let fetcher = HttpFetcher::new(&profile.user_agent(), profile.redirect)?;
    let mut task = profile.assert_task(selectors, CssProbe)?;
    if !quiet {
        let name = profile.name.clone();
        task = task.with_result_callback(Arc::new(move |link, status, existence| {
            if let Some(error) = &status.error {
                println!(
                    "[{}][{}] {}",
                    name.bold(),
                    status
                        .code
                        .to_string()
                        .as_str()
                        .color(code_color(&status.code))
                        .bold(),
                    link.absolute()
                );
                println!("^ {}: {}", "Error".red().bold(), error);
            } else if let Some(existence) = existence {
                for (selector, exists) in existence {
                    let verdict = if *exists {
                        "true".green()
                    } else {
                        "false".red()
                    };
                    println!(
                        "[{}][{}][{}] {}",
                        name.bold(),
                        selector.bold(),
                        verdict.bold(),
                        link.absolute()
                    );
                }
            }
        }));
    }
    let cancel = cancel_on_ctrl_c();
    profile.run(fetcher, &mut task, &cancel).await?;
    Ok(())
}

pub fn handle_where() -> Result<()> {
    println!("{}", ProfileStore::default_location().dir().display());
    Ok(())
}

pub fn handle_profile_create(args: &ArgMatches) -> Result<()> {
    let name = args.get_one::<String>("NAME").unwrap();
    let email = args.get_one::<String>("EMAIL").unwrap();
    let roots: Vec<String> = args.get_many::<String>("ROOT").unwrap().cloned().collect();

    let store = ProfileStore::default_location();
    if store.exists(name) {
        bail!(ProfileError::AlreadyExists(name.clone()));
    }
    let mut profile = Profile::new(name.clone(), roots, email.clone())?;
    profile.blacklist = args
        .get_many::<String>("blacklist")
        .map(|patterns| patterns.cloned().collect())
        .unwrap_or_default();
    profile.whitelist = args
        .get_many::<String>("whitelist")
        .map(|patterns| patterns.cloned().collect())
        .unwrap_or_default();
    profile.internal_only = args.get_flag("internal-only");
    profile.scheme_squash = args.get_flag("scheme-squash");
    profile.redirect = args.get_flag("redirect");
    // Surface bad roots and globs at creation rather than first run.
    profile.rules()?;
    store.save(&profile)?;
    Ok(())
}

pub fn handle_profile_edit(args: &ArgMatches) -> Result<()> {
    let name = args.get_one::<String>("NAME").unwrap();
    let store = ProfileStore::default_location();
    let mut profile = store.load(name)?;
    if let Some(roots) = args.get_many::<String>("roots") {
        profile.roots = roots.cloned().collect();
    }
    if let Some(email) = args.get_one::<String>("email") {
        profile.email = email.clone();
    }
    if let Some(patterns) = args.get_many::<String>("blacklist") {
        profile.blacklist = patterns.cloned().collect();
    }
    if let Some(patterns) = args.get_many::<String>("whitelist") {
        profile.whitelist = patterns.cloned().collect();
    }
    if let Some(flag) = args.get_one::<bool>("internal-only") {
        profile.internal_only = *flag;
    }
    if let Some(flag) = args.get_one::<bool>("scheme-squash") {
        profile.scheme_squash = *flag;
    }
    if let Some(flag) = args.get_one::<bool>("redirect") {
        profile.redirect = *flag;
    }
    store.save(&profile)?;
    Ok(())
}

pub fn handle_profile_remove(args: &ArgMatches) -> Result<()> {
    let name = args.get_one::<String>("NAME").unwrap();
    ProfileStore::default_location().remove(name)?;
    Ok(())
}

pub fn handle_profile_rename(args: &ArgMatches) -> Result<()> {
    let old_name = args.get_one::<String>("OLD_NAME").unwrap();
    let new_name = args.get_one::<String>("NEW_NAME").unwrap();
    ProfileStore::default_location().rename(old_name, new_name)?;
    Ok(())
}

pub fn handle_profile_list() -> Result<()> {
    for name in ProfileStore::default_location().list()? {
        println!("{name}");
    }
    Ok(())
}

pub fn handle_profile_info(args: &ArgMatches) -> Result<()> {
    let name = args.get_one::<String>("NAME").unwrap();
    let profile = ProfileStore::default_location().load(name)?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

/// Which glob list a `profile blacklist`/`profile whitelist` command edits.
#[derive(Debug, Clone, Copy)]
pub enum PatternList {
    Blacklist,
    Whitelist,
}

impl PatternList {
    fn of(self, profile: &mut Profile) -> &mut Vec<String> {
        match self {
            PatternList::Blacklist => &mut profile.blacklist,
            PatternList::Whitelist => &mut profile.whitelist,
        }
    }
}

pub fn handle_patterns(list: PatternList, args: &ArgMatches) -> Result<()> {
    let store = ProfileStore::default_location();
    match args.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("NAME").unwrap();
            let patterns: Vec<String> = sub
                .get_many::<String>("PATTERN")
                .unwrap()
                .cloned()
                .collect();
            let mut profile = store.load(name)?;
            list.of(&mut profile).extend(patterns);
            store.save(&profile)?;
        }
        Some(("remove", sub)) => {
            let name = sub.get_one::<String>("NAME").unwrap();
            let patterns: Vec<String> = sub
                .get_many::<String>("PATTERN")
                .unwrap()
                .cloned()
                .collect();
            let mut profile = store.load(name)?;
            list.of(&mut profile)
                .retain(|pattern| !patterns.contains(pattern));
            store.save(&profile)?;
        }
        Some(("clear", sub)) => {
            let name = sub.get_one::<String>("NAME").unwrap();
            let mut profile = store.load(name)?;
            list.of(&mut profile).clear();
            store.save(&profile)?;
        }
        Some(("list", sub)) => {
            let name = sub.get_one::<String>("NAME").unwrap();
            let mut profile = store.load(name)?;
            for pattern in list.of(&mut profile) {
                println!("{pattern}");
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
    Ok(())
}

pub fn handle_roots(args: &ArgMatches) -> Result<()> {
    let store = ProfileStore::default_location();
    match args.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("NAME").unwrap();
            let roots: Vec<String> = sub.get_many::<String>("ROOT").unwrap().cloned().collect();
            let mut profile = store.load(name)?;
            profile.roots.extend(roots);
            store.save(&profile)?;
        }
        Some(("remove", sub)) => {
            let name = sub.get_one::<String>("NAME").unwrap();
            let roots: Vec<String> = sub.get_many::<String>("ROOT").unwrap().cloned().collect();
            let mut profile = store.load(name)?;
            profile.roots.retain(|root| !roots.contains(root));
            store.save(&profile)?;
        }
        Some(("list", sub)) => {
            let name = sub.get_one::<String>("NAME").unwrap();
            let profile = store.load(name)?;
            for root in &profile.roots {
                println!("{root}");
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
    Ok(())
}
