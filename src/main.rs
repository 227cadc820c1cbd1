//! replyscore CLI
//!
//! Usage:
//!   replyscore --text "your reply here"       # Score a single lead reply
//!   replyscore --thread thread.json           # Score a full thread
//!   replyscore --interactive                  # Build a thread line by line (L: / A:)
//!   replyscore --serve                        # HTTP API server
//!   replyscore --leads --store-dir leads/     # Ranked view of stored leads
//!   replyscore --text "text" --json           # JSON output

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use replyscore::config::{EngineConfig, TierScheme};
use replyscore::core::{
    now_secs, run_server, AppState, InMemoryLeadStore, IntentEngine, JsonFileLeadStore, LeadDesk,
    LeadStore,
};
use replyscore::types::{AnalysisResult, LeadRow, Message, RankedLeads, Sender};
use replyscore::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "replyscore",
    version = VERSION,
    about = "Score buying intent in sales-lead email replies",
    long_about = "replyscore reads the replies in a sales email thread and estimates how\n\
                  ready the lead is to buy: a 0-100 score, a tier, a recommended action,\n\
                  momentum and a short explanation.\n\n\
                  Modes:\n  \
                  --text         Single lead reply\n  \
                  --thread       JSON array of {sender, body, timestamp}\n  \
                  --interactive  Build a thread from stdin (L: lead, A: agent)\n  \
                  --serve        HTTP API server\n  \
                  --leads        Ranked view of the leads under --store-dir\n\n\
                  Intent tiers:\n  \
                  Noise           0-30\n  \
                  Light Interest  31-50\n  \
                  Evaluating      51-70\n  \
                  High Intent     71-84\n  \
                  Ready Now       85+"
)]
struct Args {
    /// Lead reply to score (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// JSON file holding the thread
    #[arg(long)]
    thread: Option<PathBuf>,

    /// Interactive mode - read L: / A: lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// YAML or JSON engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tier scheme: intent or triage (triage also enables terminal patterns)
    #[arg(long)]
    scheme: Option<TierScheme>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Show score breakdown and every contributing signal
    #[arg(long)]
    verbose: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Keep lead records as JSON files here (server mode); in memory when unset
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Print stored leads grouped by tier and ranked (needs --store-dir)
    #[arg(long)]
    leads: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let engine = match build_engine(&args) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{} {}", "Configuration error:".red().bold(), e);
            std::process::exit(2);
        }
    };

    if args.serve {
        run_serve(engine, &args).await;
    } else if args.leads {
        run_leads(engine, &args);
    } else if let Some(ref path) = args.thread {
        run_thread(&engine, path, &args);
    } else if let Some(ref text) = args.text {
        run_single(&engine, text, &args);
    } else {
        // Default to interactive if no mode specified
        run_interactive(&engine, &args);
    }
}

/// Logs go to stderr so JSON on stdout stays clean
fn init_tracing(verbose: bool) {
    let default = if verbose { "replyscore=debug" } else { "replyscore=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_engine(args: &Args) -> Result<IntentEngine, replyscore::types::ConfigError> {
    let mut config = match args.config {
        Some(ref path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(scheme) = args.scheme {
        config.scheme = scheme;
        if scheme == TierScheme::Triage {
            config.terminal_prefilter = true;
        }
    }
    IntentEngine::new(config)
}

/// Score one lead reply
fn run_single(engine: &IntentEngine, text: &str, args: &Args) {
    let result = engine.analyze_text(text);
    print_result(&result, args);
}

/// Score a thread loaded from a JSON file
fn run_thread(engine: &IntentEngine, path: &Path, args: &Args) {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{} {}: {}", "Cannot read thread:".red().bold(), path.display(), e);
            std::process::exit(1);
        }
    };
    let thread: Vec<Message> = match serde_json::from_str(&json) {
        Ok(thread) => thread,
        Err(e) => {
            eprintln!("{} {}", "Invalid thread JSON:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let result = engine.analyze_thread(&thread);
    print_result(&result, args);
}

/// Build a thread from stdin, re-scoring after every line
fn run_interactive(engine: &IntentEngine, args: &Args) {
    print_header(engine);
    println!("Prefix each line with L: (lead) or A: (agent). Type 'quit' to exit.");
    println!("Example: L: How does the API integration work?");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut thread: Vec<Message> = Vec::new();

    loop {
        print!("[{} msgs] > ", thread.len());
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nThread ended. Messages: {}", thread.len());
            break;
        }
        if line.is_empty() {
            continue;
        }

        let Some((sender, body)) = parse_sender_prefix(line) else {
            println!("{}", "⚠ Please prefix with L: or A: (e.g., 'L: Hello')".yellow());
            continue;
        };

        thread.push(Message::new(sender, body, now_secs()));
        let result = engine.analyze_thread(&thread);
        print_result(&result, args);
    }
}

/// Split "L: text" / "A: text" (case insensitive, optional space before the colon)
fn parse_sender_prefix(line: &str) -> Option<(Sender, &str)> {
    let (prefix, rest) = line.split_once(':')?;
    let sender = match prefix.trim().to_ascii_uppercase().as_str() {
        "L" => Sender::Lead,
        "A" => Sender::Agent,
        _ => return None,
    };
    let body = rest.trim();
    (!body.is_empty()).then_some((sender, body))
}

fn print_result(result: &AnalysisResult, args: &Args) {
    if args.json {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{} {}", "Serialization failed:".red(), e),
        }
    } else if args.verbose {
        print_verbose(result, args.no_color);
    } else if args.no_color {
        println!("{}", result.to_parseable_string());
    } else {
        println!("{}", result.to_terminal_string());
    }
}

/// Header for interactive mode
fn print_header(engine: &IntentEngine) {
    let scheme = match engine.config().scheme {
        TierScheme::Intent => "intent tiers",
        TierScheme::Triage => "triage tiers",
    };
    println!("{}", "========================================".bold());
    println!("{}", format!("  replyscore v{} - {}", VERSION, scheme).bold());
    println!("{}", "========================================".bold());
    println!();
}

/// Breakdown plus the full signal list
fn print_verbose(result: &AnalysisResult, no_color: bool) {
    if no_color {
        println!("{}", result.to_parseable_string());
    } else {
        println!("{}", result.to_terminal_string());
    }

    println!("{}", "┌─ Breakdown".dimmed());
    for (component, points) in result.score_breakdown.nonzero() {
        println!("│   {:<24} {:>+4}", component.key(), points);
    }
    println!("│   {:<24} {:>4}", "total (before caps)", result.score_breakdown.total());

    println!("{}", "├─ Signals".dimmed());
    for item in &result.full_explanation {
        let points = format!("{:>+4}", item.contribution);
        let points = if item.contribution < 0 { points.red() } else { points.green() };
        println!("│   {} {}", points, item.detail);
    }

    let t = &result.tiebreaker;
    println!("{}", "├─ Tiebreaker".dimmed());
    println!(
        "│   eval={} constraints={} urgency={} velocity={:.1}h",
        t.eval_signals, t.constraint_count, t.timeline_urgency, t.velocity_hours
    );
    if let Some(ref terminal) = result.terminal {
        println!(
            "│   terminal {:?} on '{}' (applied: {})",
            terminal.kind, terminal.pattern, terminal.applied
        );
    }
    println!("{}", "└─".dimmed());
}

/// Run HTTP API server
async fn run_serve(engine: IntentEngine, args: &Args) {
    let store: Box<dyn LeadStore> = match args.store_dir {
        Some(ref dir) => {
            tracing::info!(dir = %dir.display(), "Using JSON file lead store");
            Box::new(JsonFileLeadStore::new(dir))
        }
        None => Box::new(InMemoryLeadStore::new()),
    };
    let state = Arc::new(AppState::new(LeadDesk::new(engine, store)));

    if let Err(e) = run_server(&args.addr, state).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Ranked view over a lead directory
fn run_leads(engine: IntentEngine, args: &Args) {
    let Some(ref dir) = args.store_dir else {
        eprintln!("{} --leads needs --store-dir", "Missing store:".red().bold());
        std::process::exit(2);
    };
    let desk = LeadDesk::new(engine, Box::new(JsonFileLeadStore::new(dir)));
    let board = match desk.ranked(now_secs()) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("{} {}", "Cannot read leads:".red().bold(), e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&board) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{} {}", "Serialization failed:".red(), e),
        }
    } else {
        print_board(&board);
    }
}

fn print_board(board: &RankedLeads) {
    let sections = [
        ("READY NOW", &board.ready_now),
        ("EVALUATING", &board.evaluating),
        ("CURIOUS", &board.curious),
        ("NOISE", &board.noise),
    ];
    for (title, rows) in sections {
        println!("{}", format!("{} ({})", title, rows.len()).bold());
        for row in rows.iter() {
            print_row(row);
        }
        println!();
    }

    if !board.comparative.is_empty() {
        println!("{}", "WHY THIS ORDER".bold());
        for c in &board.comparative {
            println!("  {}", c.summary());
        }
        println!();
    }

    let s = &board.stats;
    println!(
        "{} replies analyzed, {} min saved | SLA: {} under 30m, {} over, {} waiting",
        s.total_replies,
        s.time_saved_minutes,
        board.sla.responded_under_30m,
        board.sla.responded_over_30m,
        board.sla.no_response_yet
    );
}

fn print_row(row: &LeadRow) {
    let mut line = format!("  {:>3}  {:<32} {:<16} {}", row.score, row.id, row.state.to_string(), row.momentum);
    if row.intent_jump_alert.is_some() {
        line.push_str("  ▲ jump");
    }
    if let Some(flag) = row.cliff_flag {
        line.push_str(&format!("  [{}]", flag));
    }
    println!("{}", line);
}
