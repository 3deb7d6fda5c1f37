//! Skirmish - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skirmish_core::location::Location;
use skirmish_tools::error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skirmish-tools")]
#[command(about = "Development tools for Skirmish")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a unit registry and, optionally, a level
    Validate {
        /// Unit registry RON file
        #[arg(long)]
        units: PathBuf,
        /// Level template RON file
        #[arg(long)]
        level: Option<PathBuf>,
        /// Rules RON file
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Print a level as an ASCII board with its unit list
    Board {
        /// Unit registry RON file
        #[arg(long)]
        units: PathBuf,
        /// Level template RON file
        #[arg(long)]
        level: PathBuf,
        /// Rules RON file
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Print the move and action targets of one unit
    Ranges {
        /// Unit registry RON file
        #[arg(long)]
        units: PathBuf,
        /// Level template RON file
        #[arg(long)]
        level: PathBuf,
        /// Rules RON file
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Row of the unit
        #[arg(long)]
        row: i32,
        /// Column of the unit
        #[arg(long)]
        col: i32,
    },
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Validate {
            units,
            level,
            rules,
        } => {
            tracing::info!("Validating {}", units.display());
            let report = skirmish_tools::validate::validate_files(
                &units,
                level.as_deref(),
                rules.as_deref(),
            )?;
            tracing::info!(
                templates = report.templates,
                level_units = ?report.level_units,
                deploy_tiles = ?report.deploy_tiles,
                "Validation passed"
            );
        }
        Commands::Board {
            units,
            level,
            rules,
        } => {
            let rules_config = skirmish_tools::load::load_rules(rules.as_deref())?;
            let grid = skirmish_tools::load::load_grid(&units, &level, rules.as_deref())?;
            print!(
                "{}",
                skirmish_tools::board::render_board(&grid, rules_config.player)
            );
            println!();
            print!("{}", skirmish_tools::board::render_unit_list(&grid));
        }
        Commands::Ranges {
            units,
            level,
            rules,
            row,
            col,
        } => {
            let rules_config = skirmish_tools::load::load_rules(rules.as_deref())?;
            let grid = skirmish_tools::load::load_grid(&units, &level, rules.as_deref())?;
            let ranges = skirmish_tools::board::render_ranges(
                &grid,
                Location::new(row, col),
                rules_config.player,
            )?;
            print!("{ranges}");
        }
    }
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
