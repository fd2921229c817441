use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

mod config;
mod error;
mod export;
mod gallery;
mod state;
mod ui;

use config::Config;
use state::catalog::scan_directory;
use state::data::Catalog;
use state::session::{Binding, QueryInput, Session};
use ui::listing::Listing;

#[derive(Parser)]
#[command(name = "plot-gallery")]
#[command(about = "Browse, filter and export galleries of plots", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Log progress (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the gallery window
    View {
        /// Directory holding the plots
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        /// Catalog file to show instead of scanning the directory
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },

    /// Write the catalog of a directory as JSON
    Scan {
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Print the cells a query selects
    List {
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,

        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        catalog: Option<PathBuf>,

        /// Case-insensitive pattern matched against file names
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Write an index.html page into every directory of a tree
    Export {
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,

        /// Only include plots matching this pattern
        #[arg(short, long)]
        query: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger with default level (overridden by RUST_LOG)
    let env = if cli.verbose {
        Env::default().default_filter_or("info")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::View { dir, catalog } => {
            let (dir, catalog) = open_catalog(dir, catalog)?;
            ui::app::run(dir, catalog, &config)
        }
        Commands::Scan { dir, output } => {
            let catalog = scan_directory(&dir)?;
            let json = catalog.to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {} entries to {}", catalog.len(), path.display());
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::List {
            dir,
            catalog,
            query,
        } => {
            let (_, catalog) = open_catalog(dir, catalog)?;
            let mut session = Session::start(
                catalog,
                Binding::found("stdout", Listing::default()),
                Binding::found("--query", QueryInput::new(None)),
            )?;
            session.on_query(&query);

            let view = session.last_view();
            if view.is_full_view_of(session.catalog()) {
                info!("Listing all {} entries", view.len());
            } else {
                info!("{} of {} entries match {:?}", view.len(), session.catalog().len(), query);
            }
            for line in session.surface().lines() {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Export { dir, query } => {
            let summary = export::export_site(&dir, &config, query.as_deref())?;
            println!(
                "✓ Exported {} pages with {} plots to {}",
                summary.pages,
                summary.images,
                dir.display()
            );
            Ok(())
        }
    }
}

/// Resolve the gallery directory and its catalog.
///
/// A catalog file lists names relative to its own directory unless a
/// directory is given; without a catalog file the directory is scanned.
fn open_catalog(dir: Option<PathBuf>, catalog: Option<PathBuf>) -> anyhow::Result<(PathBuf, Catalog)> {
    let dir = match (&dir, &catalog) {
        (Some(dir), _) => dir.clone(),
        (None, Some(file)) => file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        (None, None) => PathBuf::from("."),
    };
    let dir = std::fs::canonicalize(&dir).with_context(|| format!("Cannot open {}", dir.display()))?;

    let catalog = match catalog {
        Some(file) => Catalog::load(&file)?,
        None => scan_directory(&dir)?,
    };
    Ok((dir, catalog))
}
