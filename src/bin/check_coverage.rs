use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io;
use std::path::PathBuf;

use covgate::commands::{error_message, run_check, CHECK_PASSED_MESSAGE};
use covgate::{logging, Config};

#[derive(Parser)]
#[command(name = "check-coverage")]
#[command(about = "Check Clover coverage against the last accepted baseline")]
#[command(version)]
struct Cli {
    /// Path to config file (default: covgate.toml, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        println!("{}", error_message(&e).red());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let base_dir = std::env::current_dir()?;
    let config = Config::discover(cli.config.as_deref(), &base_dir)?;

    let mut stdout = io::stdout();
    run_check(&config.check, &mut stdout)?;

    println!("{}", CHECK_PASSED_MESSAGE.green());
    Ok(())
}
