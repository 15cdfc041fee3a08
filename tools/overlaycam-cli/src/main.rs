//! OverlayCam CLI: device checks, overlay geometry, and still captures.
//!
//! Usage:
//!   overlaycam check --user-agent <UA>   Classify a client and report capabilities
//!   overlaycam geometry [OPTIONS]        Print overlay placement for a frame size
//!   overlaycam capture [OPTIONS]         Composite a frame with the overlay and save it
//!   overlaycam config [--write]          Show (or write) the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use overlaycam_common::config::{AppConfig, ExportFormat};

mod commands;

#[derive(Parser)]
#[command(
    name = "overlaycam",
    about = "Camera capture with a zoomable overlay",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a user agent and report camera capabilities
    Check {
        /// User-agent string of the client
        #[arg(short, long)]
        user_agent: String,
    },

    /// Print the overlay placement for a frame size
    Geometry {
        /// Native frame width in pixels
        #[arg(long, default_value = "1920")]
        frame_width: u32,

        /// Native frame height in pixels
        #[arg(long, default_value = "1080")]
        frame_height: u32,

        /// Overlay aspect ratio (width / height)
        #[arg(long, default_value = "1.0")]
        aspect: f64,

        /// Zoom-in presses applied to the initial scale
        #[arg(long, default_value = "0")]
        zoom_in: u32,

        /// Zoom-out presses applied to the initial scale
        #[arg(long, default_value = "0")]
        zoom_out: u32,

        /// Viewport size for the live preview, e.g. 390x844
        #[arg(long)]
        viewport: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Composite a frame with the overlay and save the photo
    Capture {
        /// Still image used as the camera frame (synthetic pattern if omitted)
        #[arg(long)]
        frame: Option<PathBuf>,

        /// Overlay image (defaults to the configured asset)
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Zoom-in presses before capturing
        #[arg(long, default_value = "0")]
        zoom_in: u32,

        /// Zoom-out presses before capturing
        #[arg(long, default_value = "0")]
        zoom_out: u32,

        /// User agent of the simulated client
        #[arg(long, default_value = commands::capture::DEFAULT_USER_AGENT)]
        user_agent: String,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Jpeg => ExportFormat::Jpeg,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = overlaycam_common::logging::level_for_verbosity(true).to_string();
    }
    overlaycam_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Check { user_agent } => commands::check::run(&config, &user_agent),
        Commands::Geometry {
            frame_width,
            frame_height,
            aspect,
            zoom_in,
            zoom_out,
            viewport,
            json,
        } => commands::geometry::run(
            &config,
            commands::geometry::GeometryArgs {
                frame_width,
                frame_height,
                aspect,
                zoom_in,
                zoom_out,
                viewport,
                json,
            },
        ),
        Commands::Capture {
            frame,
            overlay,
            output,
            format,
            zoom_in,
            zoom_out,
            user_agent,
        } => {
            let mut config = config;
            if let Some(overlay) = overlay {
                config.overlay.asset_path = overlay;
            }
            if let Some(output) = output {
                config.export.output_dir = output;
            }
            if let Some(format) = format {
                config.export.format = format.into();
            }
            commands::capture::run(&config, frame, zoom_in, zoom_out, &user_agent).await
        }
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
