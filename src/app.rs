// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the editing session and wires egui input, menus,
//! file dialogs and confirmations to the sceneboard engine.

use crate::loader::Loader;
use crate::ui::{canvas, properties, toolbar};
use sceneboard::engine::{EditState, Effect, Event, Session};
use sceneboard::io::format::{IMAGE_EXTENSIONS, SCENE_EXTENSIONS};
use sceneboard::io::serialization::SaveOutcome;
use sceneboard::models::scene_object::{Point, SceneObject};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// A question waiting for the user's answer.
enum Confirmation {
    SaveNonConvex { path: PathBuf },
    DeleteObject,
    DiscardForNew,
    DiscardForQuit,
}

impl Confirmation {
    fn title(&self) -> &'static str {
        match self {
            Confirmation::SaveNonConvex { .. } => "Not convex",
            Confirmation::DeleteObject => "Delete object",
            Confirmation::DiscardForNew | Confirmation::DiscardForQuit => "Unsaved changes",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Confirmation::SaveNonConvex { .. } => {
                "At least one object is not convex, would you like to save anyway?"
            }
            Confirmation::DeleteObject => "Are you sure you want to delete this object?",
            Confirmation::DiscardForNew | Confirmation::DiscardForQuit => {
                "You have unsaved changes, any unsaved progress will be lost. Continue?"
            }
        }
    }
}

/// Drop cached entries whose source path no object uses.
fn evict_unused<T>(cache: &mut HashMap<String, T>, objects: &[SceneObject]) {
    let in_use: HashSet<&str> = objects.iter().map(|object| object.source_path()).collect();
    cache.retain(|path, _| in_use.contains(path.as_str()));
}

/// Main application state.
pub struct SceneboardApp {
    /// Objects, selection, viewport and save state
    session: Session,

    /// Drag gesture in progress
    edit: EditState,

    /// Textures for object images, keyed by source path
    textures: HashMap<String, egui::TextureHandle>,

    /// Whether the property panel is visible
    show_properties: bool,

    /// Text fields of the property panel
    property_form: properties::PropertyForm,

    /// Scroll position the canvas should jump to next frame
    scroll_to: Option<Point>,

    /// Open confirmation dialog
    confirmation: Option<Confirmation>,

    /// Set once the user agreed to quit with unsaved changes
    allow_close: bool,

    /// Background file loads still running
    loader: Loader,
}

impl Default for SceneboardApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneboardApp {
    /// Create a new application with an empty scene.
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            edit: EditState::new(),
            textures: HashMap::new(),
            show_properties: true,
            property_form: properties::PropertyForm::default(),
            scroll_to: None,
            confirmation: None,
            allow_close: false,
            loader: Loader::default(),
        }
    }

    /// Load images and scene files on a background thread.
    pub fn open_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        log::info!("Loading {} file(s)", paths.len());
        self.loader.spawn(paths);
    }

    fn receive_loaded(&mut self) {
        for loaded in self.loader.poll() {
            for error in &loaded.errors {
                log::error!("{}", error);
            }
            if !loaded.scenes.is_empty() {
                self.session.open_files(loaded.scenes);
            }
            self.session.import_images(loaded.images);
            self.property_form.clear();
        }
    }

    /// Upload any object image that has no texture yet and drop textures
    /// no object uses any more.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        evict_unused(&mut self.textures, self.session.objects.objects());

        for object in self.session.objects.objects() {
            if self.textures.contains_key(object.source_path()) {
                continue;
            }
            let pixels = object.image().pixels();
            let size = [pixels.width() as usize, pixels.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
            let texture = ctx.load_texture(
                object.source_path(),
                color_image,
                egui::TextureOptions::NEAREST,
            );
            self.textures.insert(object.source_path().to_string(), texture);
        }
    }

    fn apply_event(&mut self, event: &Event, ctx: &egui::Context) {
        let (next, effects) = self.edit.handle(&mut self.session, event);
        self.edit = next;

        for effect in effects {
            match effect {
                Effect::Redraw => ctx.request_repaint(),
                Effect::SelectionChanged => self.property_form.clear(),
                Effect::ScrollTo(scroll) => self.scroll_to = Some(scroll),
                Effect::CanvasResized(size) => {
                    log::debug!("Canvas resized to {}x{}", size.width, size.height)
                }
            }
        }
    }

    fn new_document(&mut self) {
        // Files still loading would land in the fresh document
        if self.loader.is_busy() {
            log::warn!("Cannot start a new document while files are loading");
            return;
        }
        self.session.new_document();
        self.textures.clear();
        self.edit = EditState::new();
        self.property_form.clear();
    }

    fn request_new_document(&mut self) {
        if self.session.has_unsaved_changes() {
            self.confirmation = Some(Confirmation::DiscardForNew);
        } else {
            self.new_document();
        }
    }

    fn request_delete(&mut self, ctx: &egui::Context) {
        let Some(object) = self.session.objects.selected_object() else {
            return;
        };
        if object.selected_point().is_some() {
            self.apply_event(&Event::DeleteSelection, ctx);
        } else {
            self.confirmation = Some(Confirmation::DeleteObject);
        }
    }

    fn handle_save_outcome(&mut self, result: anyhow::Result<SaveOutcome>, path: Option<PathBuf>) {
        match result {
            Ok(SaveOutcome::Saved) => log::info!("Scene saved"),
            Ok(SaveOutcome::NeedsPath) => self.save_as_dialog(),
            Ok(SaveOutcome::RejectedNonConvex { object }) => {
                log::warn!("Object {} has a non-convex collision polygon", object);
                let path = path.or_else(|| self.session.file_path().map(PathBuf::from));
                if let Some(path) = path {
                    self.confirmation = Some(Confirmation::SaveNonConvex { path });
                }
            }
            Err(e) => log::error!("Failed to save scene: {:#}", e),
        }
    }

    fn save(&mut self) {
        let result = self.session.save(false);
        self.handle_save_outcome(result, None);
    }

    fn save_to(&mut self, path: PathBuf, allow_non_convex: bool) {
        let result = self.session.save_as(&path, allow_non_convex);
        self.handle_save_outcome(result, Some(path));
    }

    fn save_as_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Scene", SCENE_EXTENSIONS)
            .set_file_name("scene.json")
            .save_file()
        {
            self.save_to(path, false);
        }
    }

    fn export_selected_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Object", SCENE_EXTENSIONS)
            .set_file_name("object.json")
            .save_file()
        {
            match self.session.export_selected(&path) {
                Ok(()) => log::info!("Exported object to {}", path.display()),
                Err(e) => log::error!("Failed to export object: {:#}", e),
            }
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add_enabled(!self.loader.is_busy(), egui::Button::new("New"))
                        .clicked()
                    {
                        self.request_new_document();
                        ui.close_menu();
                    }
                    if ui.button("Open Images...").clicked() {
                        if let Some(paths) = rfd::FileDialog::new()
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_files()
                        {
                            self.open_paths(paths);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Open Scene...").clicked() {
                        if let Some(paths) = rfd::FileDialog::new()
                            .add_filter("Scene", SCENE_EXTENSIONS)
                            .pick_files()
                        {
                            self.open_paths(paths);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    if ui.button("Save As...").clicked() {
                        self.save_as_dialog();
                        ui.close_menu();
                    }
                    let has_selection = self.session.objects.selected().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Export Selected..."))
                        .clicked()
                    {
                        self.export_selected_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close_menu();
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let has_selection = self.session.objects.selected().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete (Del)"))
                        .clicked()
                    {
                        self.request_delete(ctx);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.session.show_boundary, "Collision Polygon");
                    ui.checkbox(&mut self.show_properties, "Properties");
                });
            });
        });
    }

    fn show_properties_panel(&mut self, ctx: &egui::Context) {
        if !self.show_properties {
            return;
        }

        let action = egui::SidePanel::right("properties")
            .default_width(250.0)
            .show(ctx, |ui| {
                properties::show(
                    ui,
                    self.session.objects.selected_object(),
                    &mut self.property_form,
                )
            })
            .inner;

        match action {
            properties::PropertiesAction::Add { name, value } => {
                self.session.add_property(&name, &value);
                self.property_form.clear();
            }
            properties::PropertiesAction::Update { name, value } => {
                self.session.set_property(&name, &value);
            }
            properties::PropertiesAction::Remove(name) => {
                self.session.remove_property(&name);
                self.property_form.clear();
            }
            properties::PropertiesAction::None => {}
        }
    }

    fn show_confirmation(&mut self, ctx: &egui::Context) {
        let Some(confirmation) = &self.confirmation else {
            return;
        };

        let mut answer = None;
        egui::Window::new(confirmation.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(confirmation.message());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("No").clicked() {
                        answer = Some(false);
                    }
                });
            });

        let Some(yes) = answer else {
            return;
        };
        let Some(confirmation) = self.confirmation.take() else {
            return;
        };
        if !yes {
            return;
        }

        match confirmation {
            Confirmation::SaveNonConvex { path } => self.save_to(path, true),
            Confirmation::DeleteObject => self.apply_event(&Event::DeleteSelection, ctx),
            Confirmation::DiscardForNew => self.new_document(),
            Confirmation::DiscardForQuit => {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}

impl eframe::App for SceneboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_loaded();
        self.sync_textures(ctx);

        // Request repaint if still loading (to update spinner)
        if self.loader.is_busy() {
            ctx.request_repaint();
        }

        // Ask before closing with unsaved work
        if ctx.input(|i| i.viewport().close_requested())
            && !self.allow_close
            && self.session.has_unsaved_changes()
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.confirmation = Some(Confirmation::DiscardForQuit);
        }

        self.show_menu_bar(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.session);
        });

        self.show_properties_panel(ctx);

        // Delete key removes the selected point, or asks before removing the object
        if !ctx.wants_keyboard_input()
            && self.confirmation.is_none()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete))
        {
            self.request_delete(ctx);
        }

        let canvas_output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if self.loader.is_busy() {
                    let message = format!("Loading files ({} batch(es) pending)...", self.loader.pending());
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    None
                } else {
                    Some(canvas::show(ui, &self.session, &self.textures, self.scroll_to.take()))
                }
            })
            .inner;

        if let Some(output) = canvas_output {
            self.session.viewport = output.viewport;
            if self.confirmation.is_none() {
                for event in &output.events {
                    self.apply_event(event, ctx);
                }
            }
        }

        self.show_confirmation(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use sceneboard::models::scene_object::ImageHandle;

    fn object(path: &str) -> SceneObject {
        SceneObject::new(ImageHandle::new(RgbaImage::new(2, 2)), path)
    }

    #[test]
    fn test_evict_unused_drops_deleted_object_entries() {
        let mut cache: HashMap<String, u32> = HashMap::new();
        cache.insert("art/crate.png".to_string(), 1);
        cache.insert("art/coin.png".to_string(), 2);

        evict_unused(&mut cache, &[object("art/crate.png")]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("art/crate.png"), Some(&1));
    }

    #[test]
    fn test_evict_unused_keeps_shared_images() {
        let mut cache: HashMap<String, u32> = HashMap::new();
        cache.insert("art/coin.png".to_string(), 1);

        evict_unused(&mut cache, &[object("art/coin.png"), object("art/coin.png")]);
        assert_eq!(cache.len(), 1);

        evict_unused(&mut cache, &[]);
        assert!(cache.is_empty());
    }
}
