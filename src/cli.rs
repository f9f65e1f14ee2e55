use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, CommandReport};

/// Fetch a daily AI/tech news summary and keep the news archive, its
/// manifest, and the HTML fragment consistent.
#[derive(Debug, Parser)]
#[command(name = "news-digest", version, about)]
struct Cli {
    /// Print the command report as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Call the summary API, archive the result, then sweep and rebuild.
    Fetch,
    /// Rebuild index.json from the archive directory.
    Index,
    /// Rebuild the HTML fragment from the archive directory.
    Render,
    /// Delete entries past the retention window and rebuild index.json.
    Sweep,
    /// Show resolved paths, config, and archive size.
    Status,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let mark = if report.ok { "ok" } else { "issues" };
    println!("{} [{}]", report.command, mark);
    for line in &report.details {
        println!("  {line}");
    }
    for line in &report.issues {
        println!("  ! {line}");
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = match cli.command {
        Command::Fetch => commands::fetch::run()?,
        Command::Index => commands::index::run()?,
        Command::Render => commands::render::run()?,
        Command::Sweep => commands::sweep::run()?,
        Command::Status => commands::status::run()?,
    };
    print_report(&report, cli.json)
}
