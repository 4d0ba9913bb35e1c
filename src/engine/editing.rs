// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive editing: selection, dragging, and boundary point edits.
//!
//! `EditState` is the small per-gesture state machine driven by host
//! events. The free functions below it are the editing operations
//! themselves; they expect a selected object and panic without one.

use super::events::{Effect, Event, PointerButton};
use super::session::Session;
use crate::models::object_manager::Hit;
use crate::models::scene_object::{Point, SceneObject};

/// Visual radius of a boundary point handle, kept inside the view while dragging.
pub const POINT_MARGIN: i32 = 8;

/// What a held primary button is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    DraggingObject,
    DraggingBoundaryPoint,
}

/// Gesture state carried between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditState {
    pub mode: DragMode,
    /// Last pointer position seen, in view coordinates.
    pub last_pointer: Point,
}

/// What `delete_selection` removed.
#[derive(Debug)]
pub enum Deleted {
    BoundaryPoint(Point),
    Object(SceneObject),
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event to the session, returning the next state and the host effects.
    pub fn handle(self, session: &mut Session, event: &Event) -> (EditState, Vec<Effect>) {
        let mut next = self;
        let mut effects = Vec::new();

        match *event {
            Event::PointerDown {
                pos,
                button: PointerButton::Primary,
            } => {
                let before = session.objects.selected();
                let hit = session.objects.select_at(pos, session.viewport.scroll);

                next.mode = match hit {
                    Hit::BoundaryPoint { .. } => DragMode::DraggingBoundaryPoint,
                    Hit::Object(_) => DragMode::DraggingObject,
                    Hit::Nothing => DragMode::Idle,
                };
                if session.objects.selected() != before {
                    session.cache_boundary_convex(None);
                    effects.push(Effect::SelectionChanged);
                }
                effects.push(Effect::Redraw);
                next.last_pointer = pos;
                log::debug!("Pointer down at {:?}: {:?}", pos, hit);
            }
            Event::PointerDown {
                pos,
                button: PointerButton::Secondary,
            } => {
                if session.show_boundary && session.objects.selected().is_some() {
                    let canvas = session.viewport.to_canvas(pos);
                    insert_boundary_point(session, canvas);
                    effects.push(Effect::Redraw);
                }
                next.last_pointer = pos;
            }
            Event::PointerMove { pos, primary_held } => {
                let point_selected = session
                    .objects
                    .selected_object()
                    .map(|o| o.selected_point().is_some());
                let delta = pos - self.last_pointer;

                match (self.mode, point_selected) {
                    (_, _) if !primary_held => next.mode = DragMode::Idle,
                    (DragMode::DraggingObject, Some(_)) => {
                        effects.extend(drag_object(session, delta));
                    }
                    (DragMode::DraggingBoundaryPoint, Some(true)) => {
                        effects.extend(drag_boundary_point(session, delta));
                    }
                    _ => next.mode = DragMode::Idle,
                }
                next.last_pointer = pos;
            }
            Event::PointerUp => {
                next.mode = DragMode::Idle;
            }
            Event::DeleteSelection => {
                if session.objects.selected().is_some() {
                    if let Deleted::Object(_) = delete_selection(session) {
                        effects.push(Effect::SelectionChanged);
                        effects.push(Effect::CanvasResized(session.canvas_extent()));
                    }
                    effects.push(Effect::Redraw);
                }
                next.mode = DragMode::Idle;
            }
        }

        (next, effects)
    }
}

fn selected_mut(session: &mut Session) -> &mut SceneObject {
    session
        .objects
        .selected_object_mut()
        .expect("editing requires a selected object")
}

/// Drag the selected object by `delta` (view pixels).
///
/// The position is clamped at zero and the boundary moves with it by the
/// clamped amount. When the object's edge reaches the view border in the
/// direction of motion, the view scrolls along by the raw delta.
pub fn drag_object(session: &mut Session, delta: Point) -> Vec<Effect> {
    let mut effects = Vec::new();

    let object = selected_mut(session);
    object.translate(delta);
    let rect = object.rect();

    let old_extent = session.canvas_extent();
    let extent = session.refresh_canvas_extent();
    if extent != old_extent {
        effects.push(Effect::CanvasResized(extent));
    }

    let viewport = session.viewport;
    let mut scroll = viewport.scroll;

    if delta.x > 0 && rect.right() >= viewport.width + scroll.x {
        scroll.x += delta.x;
    } else if delta.x < 0 && rect.origin.x <= scroll.x {
        scroll.x += delta.x;
    }
    if delta.y > 0 && rect.bottom() >= viewport.height + scroll.y {
        scroll.y += delta.y;
    } else if delta.y < 0 && rect.origin.y <= scroll.y {
        scroll.y += delta.y;
    }

    let scroll = viewport.clamp_scroll(scroll, extent);
    if scroll != viewport.scroll {
        effects.push(Effect::ScrollTo(scroll));
    }

    session.mark_dirty();
    effects.push(Effect::Redraw);
    effects
}

/// Drag the selected boundary point by `delta`, keeping it inside the visible view.
///
/// Re-checks convexity for boundaries of three or more points; a
/// non-convex result is only cached for display, the drag still happens.
pub fn drag_boundary_point(session: &mut Session, delta: Point) -> Vec<Effect> {
    let viewport = session.viewport;
    let object = selected_mut(session);
    let index = object
        .selected_point()
        .expect("dragging a boundary point requires a selected point");

    let mut target = object.boundary()[index] + delta;
    let left = viewport.scroll.x;
    let top = viewport.scroll.y;
    let right = viewport.scroll.x + viewport.width - POINT_MARGIN;
    let bottom = viewport.scroll.y + viewport.height - POINT_MARGIN;

    if target.x < left {
        target.x = left;
    } else if target.x > right {
        target.x = right;
    }
    if target.y < top {
        target.y = top;
    } else if target.y > bottom {
        target.y = bottom;
    }

    object.set_point(index, target);
    recheck_convexity(session);
    session.mark_dirty();
    vec![Effect::Redraw]
}

/// Insert a boundary point at `canvas_pos` on the selected object.
///
/// The point goes after the selected point, or at the end when no point
/// is selected. Returns its index.
pub fn insert_boundary_point(session: &mut Session, canvas_pos: Point) -> usize {
    let index = selected_mut(session).insert_point(canvas_pos);
    recheck_convexity(session);
    session.mark_dirty();
    log::debug!("Inserted boundary point {} at {:?}", index, canvas_pos);
    index
}

/// Remove the selected boundary point, or the whole selected object if no
/// point is selected.
pub fn delete_selection(session: &mut Session) -> Deleted {
    let selected = session
        .objects
        .selected()
        .expect("delete requires a selected object");

    let deleted = match session.objects.objects()[selected].selected_point() {
        Some(index) => {
            let object = selected_mut(session);
            Deleted::BoundaryPoint(object.remove_point(index))
        }
        None => {
            let object = session.objects.remove_object(selected);
            session.refresh_canvas_extent();
            Deleted::Object(object)
        }
    };

    session.cache_boundary_convex(None);
    session.mark_dirty();
    deleted
}

fn recheck_convexity(session: &mut Session) {
    let convex = session
        .objects
        .selected_object()
        .filter(|o| o.boundary().len() >= 3)
        .map(SceneObject::is_boundary_convex);
    if convex.is_some() {
        session.cache_boundary_convex(convex);
    }
}
