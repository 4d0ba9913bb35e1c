// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sceneboard - scene layout and collision polygon editor
//!
//! A cross-platform desktop application for placing images on a canvas,
//! outlining their collision polygons, and tagging them with properties.

mod app;
mod loader;
mod ui;

use anyhow::Result;
use app::SceneboardApp;
use clap::Parser;
use std::path::PathBuf;

/// Place images on a canvas and edit their collision polygons.
#[derive(Parser, Debug)]
#[command(name = "sceneboard", version, about)]
struct Cli {
    /// Scene files (.json, .yaml, .yml) or images to open at startup.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Sceneboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Sceneboard",
        options,
        Box::new(move |_cc| {
            let mut app = SceneboardApp::new();
            app.open_paths(cli.files);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
