// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Input events consumed by the editing engine and the effects it asks the host to perform.

use crate::models::scene_object::{Point, Size};

/// Which pointer button started an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Selects and drags.
    Primary,
    /// Inserts boundary points while the overlay is shown.
    Secondary,
}

/// An input event in view coordinates (relative to the visible top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PointerDown { pos: Point, button: PointerButton },
    PointerMove { pos: Point, primary_held: bool },
    PointerUp,
    /// Delete the selected boundary point, or the selected object if no point is selected.
    ///
    /// Deleting an object is destructive; the host confirms with the user before sending this.
    DeleteSelection,
}

/// Something the host should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Redraw,
    /// The selected object changed; refresh anything showing its properties.
    SelectionChanged,
    /// The scrollable canvas area must be resized.
    CanvasResized(Size),
    /// Scroll the view so its top-left corner is at this canvas position.
    ScrollTo(Point),
}
