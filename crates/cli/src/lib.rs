pub mod commands;
pub mod logging;
pub mod shell;

use clap::{Parser, Subcommand};
use quotation_core::config::{AppConfig, LoadOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "quotation",
    about = "Quotation builder CLI",
    long_about = "Build priced quotations from the inventory catalog, export them as CSV, and operate the catalog database.",
    after_help = "Examples:\n  quotation migrate\n  quotation seed\n  quotation session --script lighting.qs\n  quotation customers Ac\n  quotation doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Open a quotation session reading commands from stdin or a script")]
    Session {
        #[arg(long, help = "Read shell commands from this file instead of stdin")]
        script: Option<PathBuf>,
    },
    #[command(about = "List the inventory catalog")]
    Inventory {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Suggest customer names starting with a prefix")]
    Customers { prefix: String },
    #[command(about = "Show saved contact details for a customer")]
    Customer { name: String },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo catalog; running it again inserts nothing new")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, export directory, and catalog schema readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Commands report config failures themselves; logging just falls back.
    let config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    logging::init(&config);

    let result = match cli.command {
        Command::Session { script } => commands::session::run(script.as_deref()),
        Command::Inventory { json } => commands::inventory::run(json),
        Command::Customers { prefix } => commands::customers::search(&prefix),
        Command::Customer { name } => commands::customers::details(&name),
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
