// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use shutter::app::AppModel;
use shutter::i18n;
use std::path::PathBuf;

mod cli;

/// Shutter - take a photo with your camera
#[derive(Parser)]
#[command(name = "shutter")]
#[command(about = "Camera application for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Take a photo without opening a window
    Photo {
        /// Camera index (from `shutter list`)
        #[arg(short, long, default_value = "0")]
        camera: usize,

        /// Output file or directory (default: the picture library)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with RUST_LOG environment variable support
    // Default: warn level for all modules
    // Examples:
    //   RUST_LOG=shutter=debug shutter
    //   RUST_LOG=shutter::backends::camera=trace shutter
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Photo { camera, output }) => cli::take_photo(camera, output),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(300.0),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
