// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session context.
//!
//! Everything the editor mutates in response to input lives here: the
//! objects and selection, the mirrored viewport, the boundary overlay
//! toggle, the cached convexity flag, and the document's save state.
//! The engine receives it by reference on every call.

use crate::io::serialization::{self, OpenedFile, SaveOutcome};
use crate::models::object_manager::ObjectManager;
use crate::models::scene_object::{Point, SceneObject, Size};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Whether the document on screen matches what was last written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    NeverSaved,
    Unsaved,
    Saved,
}

/// The visible part of the canvas, as last reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Canvas position of the visible top-left corner.
    pub scroll: Point,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(scroll: Point, width: i32, height: i32) -> Self {
        Self {
            scroll,
            width,
            height,
        }
    }

    /// Convert a view-relative position to canvas coordinates.
    pub fn to_canvas(&self, pos: Point) -> Point {
        pos + self.scroll
    }

    /// Clamp a scroll position to what a canvas of `extent` allows.
    pub fn clamp_scroll(&self, scroll: Point, extent: Size) -> Point {
        let max_x = (extent.width - self.width).max(0);
        let max_y = (extent.height - self.height).max(0);
        Point::new(scroll.x.clamp(0, max_x), scroll.y.clamp(0, max_y))
    }
}

/// Mutable state of one open document.
#[derive(Debug, Default)]
pub struct Session {
    pub objects: ObjectManager,
    pub viewport: Viewport,
    /// Show the collision boundary overlay and allow inserting points.
    pub show_boundary: bool,
    save_state: SaveState,
    file_path: Option<PathBuf>,
    canvas_extent: Size,
    boundary_convex: Option<bool>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_state(&self) -> SaveState {
        self.save_state
    }

    /// Record that the document changed since it was last saved.
    pub fn mark_dirty(&mut self) {
        self.save_state = SaveState::Unsaved;
    }

    /// Whether discarding the document would lose work.
    pub fn has_unsaved_changes(&self) -> bool {
        match self.save_state {
            SaveState::Unsaved => true,
            SaveState::NeverSaved => !self.objects.is_empty(),
            SaveState::Saved => false,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Canvas size as of the last geometry change.
    pub fn canvas_extent(&self) -> Size {
        self.canvas_extent
    }

    /// Rescan every object for the canvas size, returning it.
    pub fn refresh_canvas_extent(&mut self) -> Size {
        self.canvas_extent = self.objects.canvas_extent();
        self.canvas_extent
    }

    /// Convexity of the selected object's boundary.
    ///
    /// Uses the value cached by the last interactive edit, computing it
    /// fresh when the cache was invalidated. True when nothing is selected.
    pub fn boundary_convex(&self) -> bool {
        self.boundary_convex.unwrap_or_else(|| {
            self.objects
                .selected_object()
                .map_or(true, SceneObject::is_boundary_convex)
        })
    }

    pub(crate) fn cache_boundary_convex(&mut self, convex: Option<bool>) {
        self.boundary_convex = convex;
    }

    /// Start over with an empty, never-saved document.
    pub fn new_document(&mut self) {
        self.objects.clear();
        self.file_path = None;
        self.save_state = SaveState::NeverSaved;
        self.boundary_convex = None;
        self.refresh_canvas_extent();
        log::info!("Started new document");
    }

    /// Add freshly loaded images as new objects and select the last one.
    pub fn import_images(&mut self, images: Vec<SceneObject>) {
        if images.is_empty() {
            return;
        }
        for object in images {
            self.objects.add_object(object);
        }
        self.save_state = SaveState::Unsaved;
        self.select_last();
        self.refresh_canvas_extent();
    }

    /// Add the contents of opened scene files.
    ///
    /// A world file becomes the document's file. The save state afterwards is
    /// `Saved` for exactly one world on its own, `Unsaved` for one world plus
    /// object files, and `NeverSaved` for anything else.
    pub fn open_files(&mut self, files: Vec<OpenedFile>) {
        let mut worlds = 0;
        let mut singles = 0;

        for file in files {
            if file.is_world {
                worlds += 1;
                self.file_path = Some(file.path);
            } else {
                singles += 1;
            }
            for object in file.objects {
                self.objects.add_object(object);
            }
        }

        self.save_state = match (worlds, singles) {
            (1, 0) => SaveState::Saved,
            (1, _) => SaveState::Unsaved,
            _ => SaveState::NeverSaved,
        };
        self.select_last();
        self.refresh_canvas_extent();
        log::info!(
            "Opened {} world and {} object files, {} objects in scene",
            worlds,
            singles,
            self.objects.len()
        );
    }

    fn select_last(&mut self) {
        let last = self.objects.len().checked_sub(1);
        self.objects.select(last);
        self.boundary_convex = None;
    }

    /// Save to the document's current file.
    ///
    /// Returns `SaveOutcome::NeedsPath` when the document has never been
    /// written, so the host can ask for a location. A document with no
    /// changes since its last save is left alone.
    pub fn save(&mut self, allow_non_convex: bool) -> Result<SaveOutcome> {
        match (self.save_state, self.file_path.clone()) {
            (SaveState::Saved, _) => Ok(SaveOutcome::Saved),
            (SaveState::Unsaved, Some(path)) => self.save_as(&path, allow_non_convex),
            _ => Ok(SaveOutcome::NeedsPath),
        }
    }

    /// Save to `path` and make it the document's file.
    pub fn save_as(&mut self, path: &Path, allow_non_convex: bool) -> Result<SaveOutcome> {
        let outcome = serialization::save_scene(&self.objects, path, allow_non_convex)?;
        if outcome == SaveOutcome::Saved {
            self.file_path = Some(path.to_path_buf());
            self.save_state = SaveState::Saved;
        }
        Ok(outcome)
    }

    /// Write the selected object on its own. Panics if nothing is selected.
    pub fn export_selected(&self, path: &Path) -> Result<()> {
        let object = self
            .objects
            .selected_object()
            .expect("export requires a selected object");
        serialization::export_object(object, path)
    }

    /// Add a property to the selected object. Panics if nothing is selected.
    pub fn add_property(&mut self, name: &str, value: &str) {
        self.selected_for_edit().add_property(name, value);
        self.mark_dirty();
    }

    /// Change a property of the selected object. Panics if nothing is selected.
    pub fn set_property(&mut self, name: &str, value: &str) {
        self.selected_for_edit().set_property(name, value);
        self.mark_dirty();
    }

    /// Remove a property from the selected object. Panics if nothing is selected.
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let removed = self.selected_for_edit().remove_property(name);
        if removed.is_some() {
            self.mark_dirty();
        }
        removed
    }

    fn selected_for_edit(&mut self) -> &mut SceneObject {
        self.objects
            .selected_object_mut()
            .expect("property edit requires a selected object")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene_object::{ImageHandle, Property};
    use image::RgbaImage;

    fn object(x: i32, y: i32) -> SceneObject {
        let mut obj = SceneObject::new(ImageHandle::new(RgbaImage::new(20, 10)), "tile.png");
        obj.set_position(Point::new(x, y));
        obj
    }

    fn opened(is_world: bool, count: usize) -> OpenedFile {
        OpenedFile {
            path: PathBuf::from(if is_world { "world.json" } else { "object.json" }),
            is_world,
            objects: (0..count).map(|i| object(i as i32 * 30, 0)).collect(),
        }
    }

    #[test]
    fn test_unsaved_changes_rules() {
        let mut session = Session::new();
        assert!(!session.has_unsaved_changes());

        session.objects.add_object(object(0, 0));
        assert!(session.has_unsaved_changes());

        session.new_document();
        assert!(!session.has_unsaved_changes());
        session.mark_dirty();
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn test_import_selects_last_and_sizes_canvas() {
        let mut session = Session::new();
        session.import_images(vec![object(0, 0), object(100, 50)]);

        assert_eq!(session.objects.selected(), Some(1));
        assert_eq!(session.canvas_extent(), Size::new(120, 60));
        assert_eq!(session.save_state(), SaveState::Unsaved);
    }

    #[test]
    fn test_open_single_world_is_saved() {
        let mut session = Session::new();
        session.open_files(vec![opened(true, 2)]);

        assert_eq!(session.save_state(), SaveState::Saved);
        assert_eq!(session.file_path(), Some(Path::new("world.json")));
        assert_eq!(session.objects.selected(), Some(1));
    }

    #[test]
    fn test_open_world_with_objects_is_unsaved() {
        let mut session = Session::new();
        session.open_files(vec![opened(true, 1), opened(false, 1)]);
        assert_eq!(session.save_state(), SaveState::Unsaved);
        assert_eq!(session.objects.len(), 2);
    }

    #[test]
    fn test_open_objects_only_is_never_saved() {
        let mut session = Session::new();
        session.open_files(vec![opened(false, 1), opened(false, 1)]);
        assert_eq!(session.save_state(), SaveState::NeverSaved);
        assert_eq!(session.file_path(), None);
    }

    #[test]
    fn test_save_without_path_needs_path() {
        let mut session = Session::new();
        session.objects.add_object(object(0, 0));
        assert_eq!(session.save(false).unwrap(), SaveOutcome::NeedsPath);
    }

    #[test]
    fn test_save_rewrites_file_after_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.yaml");
        let mut session = Session::new();
        session.import_images(vec![object(0, 0)]);
        assert_eq!(session.save_as(&path, false).unwrap(), SaveOutcome::Saved);

        session.add_property("solid", "true");
        assert_eq!(session.save_state(), SaveState::Unsaved);
        assert_eq!(session.save(false).unwrap(), SaveOutcome::Saved);
        assert_eq!(session.save_state(), SaveState::Saved);

        let file = serialization::read_scene_file(&path).unwrap();
        assert!(file.is_world());
        assert_eq!(
            file.entries()[0].properties,
            vec![Property {
                name: "solid".to_string(),
                value: "true".to_string(),
            }]
        );
    }

    #[test]
    fn test_save_when_already_saved_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.json");
        let mut session = Session::new();
        session.import_images(vec![object(0, 0)]);
        session.save_as(&path, false).unwrap();

        std::fs::remove_file(&path).unwrap();
        assert_eq!(session.save(false).unwrap(), SaveOutcome::Saved);
        assert!(!path.exists());
    }

    #[test]
    fn test_property_edits_mark_dirty() {
        let mut session = Session::new();
        session.open_files(vec![opened(true, 1)]);
        assert!(!session.has_unsaved_changes());

        session.add_property("layer", "2");
        assert!(session.has_unsaved_changes());
        assert_eq!(session.objects.selected_object().unwrap().property("layer"), Some("2"));

        session.set_property("layer", "3");
        assert_eq!(session.remove_property("layer"), Some("3".to_string()));
    }

    #[test]
    fn test_boundary_convex_computed_lazily() {
        let mut session = Session::new();
        let mut obj = object(0, 0);
        obj.set_boundary(vec![
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(1, 1),
            Point::new(0, 4),
        ]);
        session.import_images(vec![obj]);
        assert!(!session.boundary_convex());

        session.cache_boundary_convex(Some(true));
        assert!(session.boundary_convex());
    }

    #[test]
    fn test_clamp_scroll() {
        let viewport = Viewport::new(Point::ZERO, 100, 80);
        let extent = Size::new(300, 50);
        assert_eq!(viewport.clamp_scroll(Point::new(250, 10), extent), Point::new(200, 0));
        assert_eq!(viewport.clamp_scroll(Point::new(-5, -5), extent), Point::ZERO);
    }
}
