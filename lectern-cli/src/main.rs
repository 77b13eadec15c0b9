use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::{ConfigLoader, LecternConfig};

#[derive(Parser)]
#[command(name = "lectern", about = "Inspect, validate and grade lectern content")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered content types
    Types(commands::types::TypesArgs),
    /// Show the content of a lesson
    Lesson(commands::lesson::LessonArgs),
    /// Validate every record in a records file
    Validate(commands::validate::ValidateArgs),
    /// Take an assessment with answers from a file
    Grade(commands::grade::GradeArgs),
}

fn init_tracing(verbose: bool, config: &LecternConfig) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::load()?;
    init_tracing(cli.verbose, &config);

    match cli.command {
        Commands::Types(args) => commands::types::run(args),
        Commands::Lesson(args) => commands::lesson::run(args, &config),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Grade(args) => commands::grade::run(args, &config),
    }
}
