use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};

use gambit_cli::{Session, SessionConfig};

/// Two-player chess in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Name of the White player.
    #[arg(long, default_value = "White")]
    white: String,

    /// Name of the Black player.
    #[arg(long, default_value = "Black")]
    black: String,

    /// Directory where games are saved and loaded.
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Resume the game saved under this name instead of starting a new one.
    #[arg(long)]
    load: Option<String>,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig {
        save_dir: args.save_dir,
        white: args.white,
        black: args.black,
    };
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut session = match &args.load {
        Some(name) => Session::resume(&config, name, stdin, stdout)
            .with_context(|| format!("could not load save {name:?}"))?,
        None => Session::new(&config, stdin, stdout),
    };

    let end = session.run()?;
    info!(?end, "session ended");
    Ok(())
}
