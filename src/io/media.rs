// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! Decodes image files into shared RGBA handles and works out the path
//! stored with each object so scenes can find their images again.

use crate::models::scene_object::{ImageHandle, SceneObject};
use anyhow::{Context, Result};
use std::path::Path;

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<ImageHandle> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?;
    let pixels = decoded.to_rgba8();
    log::info!("Loaded image: {} ({}x{})", path.display(), pixels.width(), pixels.height());
    Ok(ImageHandle::new(pixels))
}

/// Path to store for an image: relative to the working directory when it lies below it.
pub fn source_path_for(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

/// Load an image file as a new object at the canvas origin.
pub fn load_object(path: &Path) -> Result<SceneObject> {
    let image = load_image(path)?;
    Ok(SceneObject::new(image, source_path_for(path)))
}
