use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nearstars_cli::output::OutputFormat;
use nearstars_lib::catalog::DEFAULT_MAX_DISTANCE;
use nearstars_lib::config::DEFAULT_PORT;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explore the stellar neighbourhood of the Sun")]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Star catalog CSV; falls back to NEARSTARS_CATALOG, then the platform data directory.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Ignore stars farther than this many light-years from the Sun.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DISTANCE)]
    pub max_distance: f64,

    /// Port a viewer host should listen on.
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Do not draw the planets of the solar system.
    #[arg(long, global = true)]
    pub no_solar_system: bool,

    /// Start the viewer fullscreen.
    #[arg(long, global = true)]
    pub fullscreen: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stars ordered by distance from a reference star.
    Stars {
        /// Reference star; defaults to the Sun.
        #[arg(long)]
        near: Option<String>,
        /// Only list stars within this many light-years of the reference.
        #[arg(long)]
        radius: Option<f64>,
        /// Maximum number of stars to list.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Measure the distance between two stars.
    Distance {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
    /// Total up a route through the given stars, in order.
    Route {
        #[arg(required = true, num_args = 1..)]
        stars: Vec<String>,
    },
    /// Plan a star-hopping route between two stars.
    Hop {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Maximum number of intermediate stars.
        #[arg(long)]
        max_hops: Option<usize>,
    },
    /// Run viewer commands line by line from a script or stdin.
    Session {
        /// Read commands from this file instead of stdin.
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Print the resolved viewer launch options.
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let global = &cli.global;

    match cli.command {
        Command::Stars {
            near,
            radius,
            limit,
        } => commands::stars::handle_stars(global, near.as_deref(), radius, limit),
        Command::Distance { from, to } => commands::distance::handle_distance(global, &from, &to),
        Command::Route { stars } => commands::route::handle_route(global, &stars),
        Command::Hop { from, to, max_hops } => {
            commands::route::handle_hop(global, &from, &to, max_hops)
        }
        Command::Session { script } => commands::session::handle_session(global, script.as_deref()),
        Command::Config => commands::config::handle_config(global),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
