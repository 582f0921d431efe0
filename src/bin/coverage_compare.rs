use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io;
use std::path::PathBuf;

use covgate::commands::{error_message, run_compare, split_arguments};
use covgate::logging;

#[derive(Parser)]
#[command(name = "coverage-compare")]
#[command(about = "Fail when total Clover coverage drops below a previous report")]
#[command(version)]
struct Cli {
    /// Current coverage XML followed by the previous coverage XML
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
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
    let (current, previous) = split_arguments(cli.files)?;

    let mut stdout = io::stdout();
    let comparison = run_compare(&current, &previous, &mut stdout)?;

    println!("{}", comparison.success_message().green());
    Ok(())
}
