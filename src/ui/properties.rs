// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Object properties panel.
//!
//! This module provides the side panel listing the selected object's
//! name/value properties, with fields to add, change and remove them.

use sceneboard::models::scene_object::SceneObject;

/// Text fields and row selection of the panel.
#[derive(Debug, Default)]
pub struct PropertyForm {
    pub name: String,
    pub value: String,
    /// Property row picked in the list
    pub selected: Option<String>,
}

impl PropertyForm {
    pub fn clear(&mut self) {
        self.name.clear();
        self.value.clear();
        self.selected = None;
    }
}

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    Add { name: String, value: String },
    Update { name: String, value: String },
    Remove(String),
}

/// Display the properties of the selected object.
pub fn show(ui: &mut egui::Ui, object: Option<&SceneObject>, form: &mut PropertyForm) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Properties");
    ui.separator();

    let Some(object) = object else {
        ui.label(egui::RichText::new("No object selected").weak());
        return action;
    };

    ui.label(format!("Image: {}", object.source_path()));
    let position = object.position();
    ui.label(format!("Position: {}, {}", position.x, position.y));
    ui.label(format!("Collision points: {}", object.boundary().len()));
    ui.separator();

    egui::ScrollArea::vertical()
        .max_height(ui.available_height() - 120.0)
        .show(ui, |ui| {
            egui::Grid::new("property_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("Name");
                    ui.strong("Value");
                    ui.end_row();

                    for property in object.properties() {
                        let is_selected = form.selected.as_deref() == Some(property.name.as_str());
                        if ui.selectable_label(is_selected, &property.name).clicked() {
                            form.selected = Some(property.name.clone());
                            form.name = property.name.clone();
                            form.value = property.value.clone();
                        }
                        ui.label(&property.value);
                        ui.end_row();
                    }
                });
        });

    ui.separator();

    egui::Grid::new("property_form").num_columns(2).show(ui, |ui| {
        ui.label("Name:");
        ui.text_edit_singleline(&mut form.name);
        ui.end_row();
        ui.label("Value:");
        ui.text_edit_singleline(&mut form.value);
        ui.end_row();
    });

    let name = form.name.trim();
    let exists = object.has_property(name);

    ui.horizontal(|ui| {
        let label = if exists { "Update" } else { "Add" };
        if ui.add_enabled(!name.is_empty(), egui::Button::new(label)).clicked() {
            action = if exists {
                PropertiesAction::Update {
                    name: name.to_string(),
                    value: form.value.clone(),
                }
            } else {
                PropertiesAction::Add {
                    name: name.to_string(),
                    value: form.value.clone(),
                }
            };
        }

        let removable = form.selected.as_deref().filter(|n| object.has_property(n));
        if ui.add_enabled(removable.is_some(), egui::Button::new("Remove")).clicked() {
            if let Some(name) = removable {
                action = PropertiesAction::Remove(name.to_string());
            }
        }
    });

    action
}
