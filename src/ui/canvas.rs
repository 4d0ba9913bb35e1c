// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scrollable scene canvas.
//!
//! This module draws every object at its canvas position, highlights the
//! selected one with its collision polygon, and turns pointer input into
//! engine events in view coordinates.

use sceneboard::engine::{Event, PointerButton, Session, Viewport};
use sceneboard::models::scene_object::{Point, SceneObject};
use std::collections::HashMap;

/// Radius of a boundary point handle on screen.
const HANDLE_RADIUS: f32 = 8.0;

/// What the canvas saw this frame.
pub struct CanvasOutput {
    /// Visible part of the canvas
    pub viewport: Viewport,
    /// Pointer events for the engine, in view coordinates
    pub events: Vec<Event>,
}

/// Display the canvas and collect pointer events.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    textures: &HashMap<String, egui::TextureHandle>,
    scroll_to: Option<Point>,
) -> CanvasOutput {
    let extent = session.canvas_extent();

    let mut area = egui::ScrollArea::both()
        .auto_shrink([false, false])
        .drag_to_scroll(false);
    if let Some(scroll) = scroll_to {
        area = area.scroll_offset(egui::vec2(scroll.x as f32, scroll.y as f32));
    }

    area.show_viewport(ui, |ui, visible| {
        ui.set_min_size(egui::vec2(extent.width as f32, extent.height as f32));

        // Screen position of canvas (0, 0)
        let origin = ui.max_rect().min;
        let view_rect = egui::Rect::from_min_size(origin + visible.min.to_vec2(), visible.size());

        let viewport = Viewport::new(
            Point::new(visible.min.x.round() as i32, visible.min.y.round() as i32),
            visible.width() as i32,
            visible.height() as i32,
        );

        let response = ui.interact(view_rect, ui.id().with("scene_canvas"), egui::Sense::click_and_drag());
        let events = collect_events(ui, &response, view_rect);

        let painter = ui.painter_at(view_rect);
        painter.rect_filled(view_rect, 0.0, egui::Color32::from_gray(40));
        draw_scene(&painter, session, textures, origin);

        if session.objects.is_empty() {
            painter.text(
                view_rect.center(),
                egui::Align2::CENTER_CENTER,
                "File → Open Images... to place objects",
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(150),
            );
        }

        CanvasOutput { viewport, events }
    })
    .inner
}

/// Translate this frame's pointer input into engine events.
fn collect_events(ui: &egui::Ui, response: &egui::Response, view_rect: egui::Rect) -> Vec<Event> {
    let mut events = Vec::new();

    let (pos, primary_pressed, secondary_pressed, primary_down, moving, released) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.secondary_pressed(),
            i.pointer.primary_down(),
            i.pointer.is_moving(),
            i.pointer.any_released(),
        )
    });

    let Some(pos) = pos else {
        return events;
    };
    let view_pos = Point::new(
        (pos.x - view_rect.min.x).round() as i32,
        (pos.y - view_rect.min.y).round() as i32,
    );

    if response.hovered() {
        if primary_pressed {
            events.push(Event::PointerDown {
                pos: view_pos,
                button: PointerButton::Primary,
            });
        }
        if secondary_pressed {
            events.push(Event::PointerDown {
                pos: view_pos,
                button: PointerButton::Secondary,
            });
        }
    }
    if moving {
        events.push(Event::PointerMove {
            pos: view_pos,
            primary_held: primary_down,
        });
    }
    if released {
        events.push(Event::PointerUp);
    }

    events
}

fn to_screen(origin: egui::Pos2, point: Point) -> egui::Pos2 {
    origin + egui::vec2(point.x as f32, point.y as f32)
}

fn object_rect(origin: egui::Pos2, object: &SceneObject) -> egui::Rect {
    let size = object.image().size();
    egui::Rect::from_min_size(
        to_screen(origin, object.position()),
        egui::vec2(size.width as f32, size.height as f32),
    )
}

fn draw_image(
    painter: &egui::Painter,
    object: &SceneObject,
    textures: &HashMap<String, egui::TextureHandle>,
    origin: egui::Pos2,
) {
    let rect = object_rect(origin, object);
    match textures.get(object.source_path()) {
        Some(texture) => painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        ),
        None => painter.rect_filled(rect, 0.0, egui::Color32::from_gray(90)),
    };
}

/// Draw objects in list order, then the selected one again on top.
fn draw_scene(
    painter: &egui::Painter,
    session: &Session,
    textures: &HashMap<String, egui::TextureHandle>,
    origin: egui::Pos2,
) {
    let selected = session.objects.selected();

    for (index, object) in session.objects.objects().iter().enumerate() {
        if Some(index) != selected {
            draw_image(painter, object, textures, origin);
        }
    }

    let Some(object) = session.objects.selected_object() else {
        return;
    };
    draw_image(painter, object, textures, origin);
    painter.rect_stroke(
        object_rect(origin, object),
        0.0,
        egui::Stroke::new(3.0, egui::Color32::BLACK),
    );

    if session.show_boundary {
        draw_boundary(painter, object, origin);

        if object.boundary().len() > 3 && !session.boundary_convex() {
            painter.text(
                painter.clip_rect().left_top() + egui::vec2(8.0, 8.0),
                egui::Align2::LEFT_TOP,
                "Not convex",
                egui::FontId::proportional(18.0),
                egui::Color32::RED,
            );
        }
    }
}

/// Draw the collision polygon and its point handles.
fn draw_boundary(painter: &egui::Painter, object: &SceneObject, origin: egui::Pos2) {
    let points: Vec<egui::Pos2> = object.boundary().iter().map(|p| to_screen(origin, *p)).collect();
    let edge = egui::Stroke::new(2.0, egui::Color32::RED);

    for pair in points.windows(2) {
        painter.line_segment([pair[0], pair[1]], edge);
    }
    // Close the polygon
    if points.len() > 2 {
        painter.line_segment([points[points.len() - 1], points[0]], edge);
    }

    for (index, point) in points.iter().enumerate() {
        if object.selected_point() == Some(index) {
            painter.circle_stroke(*point, HANDLE_RADIUS, egui::Stroke::new(4.0, egui::Color32::BLUE));
        } else {
            painter.circle_filled(*point, HANDLE_RADIUS, egui::Color32::BLUE);
        }
    }
}
