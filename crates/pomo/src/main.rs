//! pomo - Terminal Pomodoro timer with persistent session history
//!
//! Usage:
//!   pomo start [-n NAME] [-s DUR]   Run the interactive timer
//!   pomo history [filters]          List completed intervals
//!   pomo summary [filters]          Aggregated statistics

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pomo::config::TimerConfig;
use pomo::phase::Phase;
use pomo::session::RunSummary;
use pomo::store::{SessionFilter, SessionStore};

/// pomo - a terminal Pomodoro timer
#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "Terminal Pomodoro timer with persistent session history")]
#[command(version)]
#[command(after_help = r#"DURATIONS:
    Accept h/m/s compounds ("25m", "90s", "1h30m") or a bare
    number of minutes ("25").

KEY BINDINGS (start):
    space, p    Pause / resume
    r           Rename the session
    ?           Toggle help
    q, Esc      Quit (prints the session summary)

EXAMPLES:
    pomo start                          # 25m focus / 5m breaks
    pomo start -n "thesis" -s 50m       # named 50-minute sessions
    pomo start --nbreak 2               # long break every 2nd focus
    pomo history --phase focus --limit 10
    pomo summary --from 2025-06-01 --json
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive timer
    Start {
        /// Optional session label
        #[arg(short, long)]
        name: Option<String>,

        /// Focus duration
        #[arg(short, long, default_value = "25m")]
        session: String,

        /// Short break duration
        #[arg(long, default_value = "5m")]
        sbreak: String,

        /// Long break duration
        #[arg(long, default_value = "15m")]
        lbreak: String,

        /// Focus intervals before a long break
        #[arg(long, default_value_t = 4)]
        nbreak: u32,

        /// Print the exit summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List completed intervals
    History {
        /// Filter by session label
        #[arg(long)]
        name: Option<String>,

        /// Start date lower bound (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date upper bound (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by type: focus, short-break, long-break
        #[arg(long)]
        phase: Option<String>,

        /// Max number of intervals to show
        #[arg(long)]
        limit: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregated session statistics
    Summary {
        /// Filter by session label
        #[arg(long)]
        name: Option<String>,

        /// Start date lower bound (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date upper bound (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Filter by type: focus, short-break, long-break
        #[arg(long)]
        phase: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            name,
            session,
            sbreak,
            lbreak,
            nbreak,
            json,
        } => cmd_start(name, &session, &sbreak, &lbreak, nbreak, json),
        Commands::History {
            name,
            from,
            to,
            phase,
            limit,
            json,
        } => cmd_history(build_filter(name, from, to, phase, limit)?, json),
        Commands::Summary {
            name,
            from,
            to,
            phase,
            json,
        } => cmd_summary(build_filter(name, from, to, phase, None)?, json),
    }
}

fn cmd_start(
    name: Option<String>,
    session: &str,
    sbreak: &str,
    lbreak: &str,
    nbreak: u32,
    json: bool,
) -> Result<()> {
    let cfg = TimerConfig::from_args(name, session, sbreak, lbreak, nbreak)?;
    let store = SessionStore::open_default()?;

    let summary = pomo::tui::run(cfg, store).context("run timer")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_run_summary(&summary);
    }
    Ok(())
}

fn print_run_summary(summary: &RunSummary) {
    println!("{} Session complete", color(GREEN, "[ok]"));
    println!();
    if let Some(name) = &summary.name {
        println!("  {}      {}", color(CYAN, "Name:"), name);
    }
    println!(
        "  {} {}",
        color(CYAN, "Completed:"),
        summary.completed_sessions
    );
    println!(
        "  {}   {}",
        color(CYAN, "Started:"),
        local(summary.start_time).format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  {}     {}",
        color(CYAN, "Ended:"),
        local(summary.end_time).format("%Y-%m-%d %H:%M:%S")
    );
}

fn cmd_history(filter: SessionFilter, json: bool) -> Result<()> {
    let store = SessionStore::open_default()?;
    let records = store.list(&filter).context("query sessions")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No sessions found matching the given filters.");
        return Ok(());
    }

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "Session History"));
    println!();
    println!(
        "{}",
        color(
            BOLD,
            &format!("  {:<17}{:<22}{:<15}{}", "Date", "Name", "Type", "Duration")
        )
    );
    println!("  {}", color(DIM, &"-".repeat(62)));

    for record in &records {
        println!(
            "  {:<17}{:<22}{:<15}{}",
            local(record.started_at).format("%Y-%m-%d %H:%M"),
            pomo_core::format::truncate(record.label.as_deref().unwrap_or("-"), 20),
            record.phase.as_str(),
            pomo_core::format::duration(record.duration_secs),
        );
    }

    Ok(())
}

fn cmd_summary(filter: SessionFilter, json: bool) -> Result<()> {
    let store = SessionStore::open_default()?;
    let summary = store.aggregate(&filter).context("query statistics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.total_sessions == 0 {
        println!("No sessions found matching the given filters.");
        return Ok(());
    }

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "Session Summary"));
    println!();
    println!(
        "  {}     {}",
        color(CYAN, "Total Sessions:"),
        summary.total_sessions
    );
    println!(
        "  {}         {}",
        color(CYAN, "Total Time:"),
        pomo_core::format::duration(summary.total_seconds)
    );
    println!(
        "  {}   {}",
        color(CYAN, "Average Duration:"),
        pomo_core::format::duration(summary.average_seconds)
    );

    let mut by_phase: Vec<_> = summary.by_phase.iter().collect();
    by_phase.sort();
    if !by_phase.is_empty() {
        println!();
        for (phase, count) in by_phase {
            println!("  {:<20}{}", format!("{}:", phase), count);
        }
    }

    Ok(())
}

fn build_filter(
    name: Option<String>,
    from: Option<String>,
    to: Option<String>,
    phase: Option<String>,
    limit: Option<u32>,
) -> Result<SessionFilter> {
    let mut filter = SessionFilter {
        label: name,
        limit,
        ..Default::default()
    };

    if let Some(from) = from {
        let date = NaiveDate::parse_from_str(&from, "%Y-%m-%d")
            .with_context(|| format!("invalid --from date {:?}", from))?;
        filter.from = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    if let Some(to) = to {
        let date = NaiveDate::parse_from_str(&to, "%Y-%m-%d")
            .with_context(|| format!("invalid --to date {:?}", to))?;
        // Include the full day.
        filter.to = date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc());
    }

    if let Some(phase) = phase {
        match Phase::from_cli(&phase) {
            Some(p) => filter.phase = Some(p),
            None => eprintln!("Warning: unknown phase {:?}, ignoring filter", phase),
        }
    }

    Ok(filter)
}

fn local(dt: DateTime<Utc>) -> DateTime<Local> {
    dt.with_timezone(&Local)
}
