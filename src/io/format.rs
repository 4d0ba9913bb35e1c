// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene file formats, chosen by file extension.

use std::path::Path;

/// Extensions accepted for scene files, for file dialogs.
pub const SCENE_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Extensions offered when picking images.
pub const IMAGE_EXTENSIONS: &[&str] = &["bmp", "gif", "jpeg", "jpg", "png", "tif", "tiff"];

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("unsupported scene file extension: {0:?}")]
    Unsupported(String),
    #[error("scene file has no extension: {0}")]
    Missing(String),
}

/// Text encoding of a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| FormatError::Missing(path.display().to_string()))?;

        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(FileFormat::Json),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            other => Err(FormatError::Unsupported(other.to_string())),
        }
    }
}

/// Whether `path` names a scene file rather than an image.
pub fn is_scene_path(path: &Path) -> bool {
    FileFormat::from_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("level.json")).unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("level.YAML")).unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("a/b.yml")).unwrap(), FileFormat::Yaml);
    }

    #[test]
    fn test_unknown_extensions_rejected() {
        assert!(matches!(
            FileFormat::from_path(Path::new("level.xml")),
            Err(FormatError::Unsupported(ext)) if ext == "xml"
        ));
        assert!(matches!(
            FileFormat::from_path(Path::new("level")),
            Err(FormatError::Missing(_))
        ));
        assert!(!is_scene_path(Path::new("sprite.png")));
        assert!(is_scene_path(Path::new("world.json")));
    }
}
