// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the collision polygon toggle and document status.

use sceneboard::engine::{SaveState, Session};

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, session: &mut Session) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.toggle_value(&mut session.show_boundary, "▱ Collision Polygon");

        ui.separator();

        let hint = if session.show_boundary {
            "Drag points to move them, right-click to add a point after the selected one, Del removes it"
        } else {
            "Click to select an object, drag to move it, Del deletes it"
        };
        ui.label(egui::RichText::new(hint).italics().weak());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let state = match session.save_state() {
                SaveState::Saved => "Saved",
                SaveState::Unsaved => "Modified",
                SaveState::NeverSaved => "Not saved",
            };
            ui.label(state);
            ui.separator();
            ui.label(format!("Objects: {}", session.objects.len()));
            if let Some(path) = session.file_path() {
                ui.separator();
                ui.label(path.display().to_string());
            }
        });
    });
}
