#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI entry point for the earthquake map.

mod dataset;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use quake_map_filter::{FilterError, FilterRequest};
use quake_map_marker::shade::LIFE_EXPECTANCY_RANGE;
use quake_map_marker::{Equirectangular, MapView, ScreenPoint, ViewError};
use quake_map_quake_models::{InvalidYearError, QuakeEntry};
use quake_map_source::SourceError;
use quake_map_source::registry::{FeedWindow, all_feeds};
use quake_map_spatial::SpatialError;

#[derive(Parser)]
#[command(name = "quake_map", about = "Earthquake map toolkit")]
struct Cli {
    #[command(flatten)]
    inputs: Inputs,

    #[command(subcommand)]
    command: Commands,
}

/// Data files shared by every sub-command.
#[derive(Args, Debug, Clone, Default)]
pub struct Inputs {
    /// Atom feed document saved on disk
    #[arg(long, global = true, conflicts_with = "window")]
    feed: Option<PathBuf>,
    /// Live feed window to download (`past_hour`, `past_day`, `past_week`, `past_month`)
    #[arg(long, global = true)]
    window: Option<FeedWindow>,
    /// Country polygons (`GeoJSON` feature collection). Without it every
    /// event is treated as an ocean event.
    #[arg(long, global = true)]
    countries: Option<PathBuf>,
    /// City points (`GeoJSON` feature collection)
    #[arg(long, global = true)]
    cities: Option<PathBuf>,
    /// Continue with an empty dataset when the feed cannot be read
    #[arg(long, global = true)]
    allow_empty: bool,
}

/// Drawing surface the pointer coordinates refer to.
#[derive(Args, Debug, Clone, Copy)]
struct Screen {
    /// Pointer x, in pixels
    #[arg(long)]
    x: f64,
    /// Pointer y, in pixels
    #[arg(long)]
    y: f64,
    /// Surface width, in pixels
    #[arg(long, default_value = "1000")]
    width: f64,
    /// Surface height, in pixels
    #[arg(long, default_value = "500")]
    height: f64,
}

impl Screen {
    const fn projection(self) -> Equirectangular {
        Equirectangular {
            width: self.width,
            height: self.height,
        }
    }

    const fn cursor(self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured live feeds
    Feeds,
    /// Summarize the dataset: counts per magnitude class and depth band,
    /// and the strongest events
    Summary {
        /// Number of events to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// List events matching magnitude and/or depth filters
    Filter {
        /// Magnitude filter, e.g. `4.6`, `>=5`, `[2.5,4)`
        #[arg(long, allow_hyphen_values = true)]
        magnitude: Option<String>,
        /// Depth filter in kilometers, e.g. `<70`, `(70,300]`
        #[arg(long, allow_hyphen_values = true)]
        depth: Option<String>,
        /// Print the matching entries as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Report which marker is under the pointer
    Hover {
        #[command(flatten)]
        screen: Screen,
    },
    /// Release the pointer and report the isolated marker and its links
    Click {
        #[command(flatten)]
        screen: Screen,
    },
    /// Shade countries by a world-bank indicator for one year
    World {
        /// World-bank indicator table (CSV)
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        csv: Option<PathBuf>,
        /// World-bank URL serving the indicator table as CSV
        #[arg(long)]
        url: Option<String>,
        /// Year to shade, 1960-2017
        #[arg(long)]
        year: i32,
        /// Lower end of the shading range
        #[arg(long, default_value_t = LIFE_EXPECTANCY_RANGE.0)]
        min: f64,
        /// Upper end of the shading range
        #[arg(long, default_value_t = LIFE_EXPECTANCY_RANGE.1)]
        max: f64,
        /// Shade from the lowest to the highest value of the year instead
        #[arg(long, conflicts_with_all = ["min", "max"])]
        auto_range: bool,
    },
    /// Link airports into flight routes and list the longest ones
    Routes {
        /// Airport table in the openflights `airports.dat` layout
        #[arg(long)]
        airports: PathBuf,
        /// Route table in the openflights `routes.dat` layout
        #[arg(long)]
        routes: PathBuf,
        /// Number of routes to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

/// Errors that end a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    InvalidYear(#[from] InvalidYearError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Neither `--feed` nor `--window` was given.
    #[error("no earthquake data: pass --feed <FILE> or --window <WINDOW>")]
    NoFeed,

    /// Neither `--csv` nor `--url` was given to `world`.
    #[error("no world table: pass --csv <FILE> or --url <URL>")]
    NoWorldTable,

    /// No feed is configured for the requested window.
    #[error("no live feed configured for {0}")]
    UnknownWindow(FeedWindow),
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Feeds => {
            println!("{:<12} {:<12} URL", "ID", "WINDOW");
            println!("{}", "-".repeat(90));
            for feed in all_feeds() {
                println!("{:<12} {:<12} {}", feed.id, feed.window, feed.url);
            }
        }
        Commands::Summary { top } => {
            let dataset = dataset::load(&cli.inputs).await?;
            let mut view = MapView::new();
            dataset.install(&mut view);
            for line in report::summary(&dataset, view.layers()?, top) {
                println!("{line}");
            }
        }
        Commands::Filter {
            magnitude,
            depth,
            json,
        } => {
            let request = FilterRequest::from_expressions(magnitude.as_deref(), depth.as_deref())?;
            let dataset = dataset::load(&cli.inputs).await?;
            let mut matching = request.apply(&dataset.entries);
            matching.sort();

            if json {
                let entries: Vec<&QuakeEntry> = matching.iter().map(Arc::as_ref).collect();
                println!("{}", report::entries_json(&entries)?);
                return Ok(());
            }

            println!(
                "{} of {} events match",
                matching.len(),
                dataset.entries.len()
            );
            for entry in &matching {
                println!("{}", report::entry_line(entry));
            }
        }
        Commands::Hover { screen } => {
            let dataset = dataset::load(&cli.inputs).await?;
            let mut view = MapView::new();
            dataset.install(&mut view);

            let hit = view.pointer_moved(screen.cursor(), &screen.projection())?;
            println!("{}", report::hover(view.layers()?, hit));
        }
        Commands::Click { screen } => {
            let dataset = dataset::load(&cli.inputs).await?;
            let mut view = MapView::new();
            dataset.install(&mut view);

            let hit = view.pointer_released(screen.cursor(), &screen.projection())?;
            for line in report::isolation(view.layers()?, hit) {
                println!("{line}");
            }
        }
        Commands::World {
            csv,
            url,
            year,
            min,
            max,
            auto_range,
        } => {
            let table = dataset::load_world_table(csv.as_deref(), url.as_deref()).await?;
            let land = dataset::load_land(cli.inputs.countries.as_deref())?;
            let range = (!auto_range).then_some((min, max));
            for line in dataset::world_shading(&table, year, range, &land)? {
                println!("{line}");
            }
        }
        Commands::Routes {
            airports,
            routes,
            top,
        } => {
            let (airports, lines) = dataset::load_routes(&airports, &routes)?;
            for line in report::routes(&airports, &lines, top) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
