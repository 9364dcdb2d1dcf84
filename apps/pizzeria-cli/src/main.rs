//! # Pizzeria CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (file, then environment)
//! 3. Seed the house menu
//! 4. Run the requested command
//!
//! ## Commands
//! ```text
//! pizzeria menu            active menu by category
//! pizzeria sizes           pizza size table
//! pizzeria shift [--json]  scripted shift, then today's sales report
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pizzeria_core::catalog::Catalog;
use pizzeria_core::pricing::house_sizes;
use pizzeria_service::{MenuState, OrderService, PizzeriaConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;
mod shift;

/// Order counter, kitchen queue and sales reports for a pizzeria
#[derive(Parser)]
#[command(name = "pizzeria")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active menu grouped by category
    Menu,

    /// Print the pizza size table
    Sizes,

    /// Run a scripted shift through the order service and print the sales report
    Shift {
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Skip the submission and auto-confirm delays
        #[arg(long)]
        fast: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = PizzeriaConfig::load(cli.config)?;
    info!(restaurant = %config.restaurant.name, "Pizzeria starting");

    let menu = MenuState::new(Catalog::house_menu());

    match cli.command {
        Commands::Menu => {
            print!("{}", report::render_menu(&menu.snapshot().await, &config)?);
        }
        Commands::Sizes => {
            print!("{}", report::render_sizes(&house_sizes(), &config)?);
        }
        Commands::Shift { json, fast } => {
            if fast {
                config.kitchen.submission_delay_ms = 0;
                config.kitchen.auto_confirm_delay_ms = 0;
            }

            let service = OrderService::new(&config);
            let report = shift::run(&service, &menu, config.auto_confirm_delay()).await?;
            service.shutdown();

            if json {
                println!("{}", report.to_json_pretty()?);
            } else {
                println!("{}", report::render_report(&report, &config)?);
            }
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,pizzeria=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pizzeria=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
