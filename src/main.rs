// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Draftpad - Main Entry Point
//!
//! A tabbed Markdown editor with live preview, periodic recovery drafts and
//! session restore. Built with Rust and egui.

mod app;
mod config;
mod document;
mod drafts;
mod error;
mod files;
mod paths;
mod preview;
mod session;

use app::DraftpadApp;
use clap::Parser;
use config::load_config;
use log::info;
use std::path::PathBuf;

/// Application name constant.
const APP_NAME: &str = "Draftpad";

/// Directory name used under the platform config and data directories.
const APP_DIR_NAME: &str = "draftpad";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "draftpad", version, about)]
struct Cli {
    /// Markdown file to open instead of restoring the previous session
    file: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let mut viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 300.0]);

    if let (Some(x), Some(y)) = (window_size.x, window_size.y) {
        viewport = viewport.with_position([x, y]);
    }
    if window_size.maximized {
        viewport = viewport.with_maximized(true);
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(DraftpadApp::new(cc, settings, cli.file)))),
    )
}
