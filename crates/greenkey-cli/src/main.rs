mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "greenkey", about = "Green-screen background replacement")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every image under a directory tree
    Run(commands::run::RunArgs),
    /// Process a single image
    Image(commands::image::ImageArgs),
    /// Print the capture and HSV values of one pixel
    Probe(commands::probe::ProbeArgs),
    /// Print or save the default pipeline config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Image(args) => commands::image::run(args),
        Commands::Probe(args) => commands::probe::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
