// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene file serialization and deserialization.
//!
//! This module writes and reads scene documents in JSON and YAML, and
//! refuses to save collision boundaries that are not convex unless the
//! caller explicitly allows it.

use super::format::FileFormat;
use crate::models::document::{ObjectEntry, SceneDocument, SceneFile};
use crate::models::object_manager::ObjectManager;
use crate::models::scene_object::{ImageHandle, SceneObject};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How a save request ended, when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing was written: this object's boundary has more than three points and is not convex.
    RejectedNonConvex { object: usize },
    /// The document has no file yet; ask where to save it.
    NeedsPath,
}

/// A scene file that was read and had all its images loaded.
#[derive(Debug)]
pub struct OpenedFile {
    pub path: PathBuf,
    pub is_world: bool,
    pub objects: Vec<SceneObject>,
}

/// Index of the first object whose boundary would be rejected at save time.
pub fn first_non_convex(manager: &ObjectManager) -> Option<usize> {
    manager
        .objects()
        .iter()
        .position(|o| o.boundary().len() > 3 && !o.is_boundary_convex())
}

fn encode<T: Serialize>(value: &T, format: FileFormat) -> Result<String> {
    let text = match format {
        FileFormat::Json => serde_json::to_string_pretty(value)?,
        FileFormat::Yaml => serde_yaml::to_string(value)?,
    };
    Ok(text)
}

fn write_document<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    let text = encode(value, format)?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Save every object to `path`.
///
/// Unless `allow_non_convex` is set, a non-convex boundary stops the save
/// before anything touches the file.
pub fn save_scene(manager: &ObjectManager, path: &Path, allow_non_convex: bool) -> Result<SaveOutcome> {
    if !allow_non_convex {
        if let Some(object) = first_non_convex(manager) {
            log::warn!("Refusing to save {}: object {} is not convex", path.display(), object);
            return Ok(SaveOutcome::RejectedNonConvex { object });
        }
    }

    write_document(&SceneDocument::from_manager(manager), path)?;
    log::info!("Saved {} objects to {}", manager.len(), path.display());
    Ok(SaveOutcome::Saved)
}

/// Save a single object without the world wrapper.
pub fn export_object(object: &SceneObject, path: &Path) -> Result<()> {
    write_document(&ObjectEntry::from_object(object), path)?;
    log::info!("Exported object {} to {}", object.source_path(), path.display());
    Ok(())
}

/// Read a world or single-object file.
pub fn read_scene_file(path: &Path) -> Result<SceneFile> {
    let format = FileFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let file: SceneFile = match format {
        FileFormat::Json => serde_json::from_str(&text)?,
        FileFormat::Yaml => serde_yaml::from_str(&text)?,
    };
    if let SceneFile::World(doc) = &file {
        doc.validate()?;
    }
    Ok(file)
}

/// Read a scene file and load every image it references.
///
/// Any image that fails to load fails the whole file; no partial object list is returned.
pub fn open_scene_file<F>(path: &Path, mut load_image: F) -> Result<OpenedFile>
where
    F: FnMut(&Path) -> Result<ImageHandle>,
{
    let file = read_scene_file(path)?;
    let is_world = file.is_world();

    let objects = file
        .into_entries()
        .into_iter()
        .map(|entry| -> Result<SceneObject> {
            let image = load_image(Path::new(&entry.image_path))?;
            Ok(entry.into_object(image))
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to open {}", path.display()))?;

    log::info!("Read {} objects from {}", objects.len(), path.display());
    Ok(OpenedFile {
        path: path.to_path_buf(),
        is_world,
        objects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene_object::Point;
    use image::RgbaImage;

    fn blank(_: &Path) -> Result<ImageHandle> {
        Ok(ImageHandle::new(RgbaImage::new(32, 32)))
    }

    fn object(path: &str, x: i32, y: i32, boundary: &[(i32, i32)]) -> SceneObject {
        let mut obj = SceneObject::new(ImageHandle::new(RgbaImage::new(32, 32)), path);
        obj.set_position(Point::new(x, y));
        obj.set_boundary(boundary.iter().map(|&(x, y)| Point::new(x, y)).collect());
        obj
    }

    fn scene() -> ObjectManager {
        let mut manager = ObjectManager::new();
        let mut first = object("a.png", 0, 0, &[(0, 0), (30, 0), (30, 30), (0, 30)]);
        first.add_property("solid", "true");
        first.add_property("friction", "0.4");
        manager.add_object(first);
        manager.add_object(object("b.png", 100, 40, &[(100, 40), (120, 70)]));
        manager
    }

    const DART: &[(i32, i32)] = &[(0, 0), (4, 0), (1, 1), (0, 4)];

    #[test]
    fn test_round_trip_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let manager = scene();

        for name in ["scene.json", "scene.yaml"] {
            let path = dir.path().join(name);
            assert_eq!(save_scene(&manager, &path, false).unwrap(), SaveOutcome::Saved);

            let opened = open_scene_file(&path, blank).unwrap();
            assert!(opened.is_world);
            assert_eq!(opened.objects.len(), 2);
            for (loaded, original) in opened.objects.iter().zip(manager.objects()) {
                assert_eq!(loaded.source_path(), original.source_path());
                assert_eq!(loaded.position(), original.position());
                assert_eq!(loaded.boundary(), original.boundary());
                assert_eq!(loaded.properties(), original.properties());
            }
        }
    }

    #[test]
    fn test_non_convex_rejected_without_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let mut manager = scene();
        manager.add_object(object("dart.png", 0, 0, DART));

        let outcome = save_scene(&manager, &path, false).unwrap();

        assert_eq!(outcome, SaveOutcome::RejectedNonConvex { object: 2 });
        assert!(!path.exists());
    }

    #[test]
    fn test_non_convex_saved_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yml");
        let mut manager = scene();
        manager.add_object(object("dart.png", 0, 0, DART));

        assert_eq!(save_scene(&manager, &path, true).unwrap(), SaveOutcome::Saved);

        let opened = open_scene_file(&path, blank).unwrap();
        assert_eq!(opened.objects[2].boundary().len(), 4);
    }

    #[test]
    fn test_triangle_never_blocks_save() {
        let manager = {
            let mut m = ObjectManager::new();
            m.add_object(object("t.png", 0, 0, &[(0, 0), (10, 0), (5, 5)]));
            m
        };
        assert_eq!(first_non_convex(&manager), None);
    }

    #[test]
    fn test_export_single_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        let manager = scene();

        export_object(&manager.objects()[0], &path).unwrap();

        let file = read_scene_file(&path).unwrap();
        assert!(!file.is_world());
        assert_eq!(file.entries()[0].image_path, "a.png");

        let opened = open_scene_file(&path, blank).unwrap();
        assert!(!opened.is_world);
        assert_eq!(opened.objects[0].property("friction"), Some("0.4"));
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.xml");
        assert!(save_scene(&scene(), &path, false).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_count_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"number_of_objects":3,"objects":[]}"#).unwrap();
        assert!(read_scene_file(&path).is_err());
    }

    #[test]
    fn test_image_failure_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        save_scene(&scene(), &path, false).unwrap();

        let result = open_scene_file(&path, |p: &Path| {
            if p == Path::new("b.png") {
                anyhow::bail!("corrupt image")
            }
            blank(p)
        });
        assert!(result.is_err());
    }
}
