// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered collection of scene objects plus the current selection.
//!
//! List order is both the drawing order (later objects are drawn on top)
//! and the order objects are saved and restored in.

use super::scene_object::{Point, Rect, SceneObject, Size};

/// Half the side of the square around a boundary point that picks it.
pub const PICK_HALF_EXTENT: i32 = 8;

/// Result of a selection hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A boundary point of the already selected object.
    BoundaryPoint { object: usize, index: usize },
    /// The image rectangle of an object, which is now selected.
    Object(usize),
    /// Nothing under the pointer; the selection was cleared.
    Nothing,
}

/// Owns every scene object and tracks which one (if any) is selected.
#[derive(Debug, Default)]
pub struct ObjectManager {
    objects: Vec<SceneObject>,
    selected: Option<usize>,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Append an object on top of the others. The selection is not changed.
    pub fn add_object(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        log::info!("Added object, total: {}", self.objects.len());
        self.objects.len() - 1
    }

    /// Remove the object at `index`, clearing the selection if it pointed there.
    ///
    /// Panics if the index is out of range.
    pub fn remove_object(&mut self, index: usize) -> SceneObject {
        let removed = self.objects.remove(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        log::info!("Removed object, total: {}", self.objects.len());
        removed
    }

    /// Drop every object and the selection.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select the object at `index`, or clear the selection with `None`.
    ///
    /// Panics if the index is out of range.
    pub fn select(&mut self, index: Option<usize>) {
        if let Some(i) = index {
            assert!(
                i < self.objects.len(),
                "object {} out of range ({} objects)",
                i,
                self.objects.len()
            );
        }
        self.selected = index;
    }

    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selected.map(|i| &self.objects[i])
    }

    pub fn selected_object_mut(&mut self) -> Option<&mut SceneObject> {
        match self.selected {
            Some(i) => Some(&mut self.objects[i]),
            None => None,
        }
    }

    /// Hit test a pointer position and update the selection.
    ///
    /// `viewport_offset` is added to `pointer` to get canvas coordinates.
    /// Boundary points of the selected object are tested first, then its
    /// image rectangle, then every object in list order; the first object
    /// whose rectangle contains the point wins.
    pub fn select_at(&mut self, pointer: Point, viewport_offset: Point) -> Hit {
        let canvas = pointer + viewport_offset;

        if let Some(current) = self.selected {
            let object = &mut self.objects[current];

            let picked = object
                .boundary()
                .iter()
                .position(|p| Rect::around(*p, PICK_HALF_EXTENT).contains(canvas));
            object.select_point(picked);

            if let Some(index) = picked {
                return Hit::BoundaryPoint {
                    object: current,
                    index,
                };
            }
            if object.rect().contains(canvas) {
                return Hit::Object(current);
            }
        }

        self.selected = self.objects.iter().position(|o| o.rect().contains(canvas));
        match self.selected {
            Some(index) => {
                self.objects[index].select_point(None);
                Hit::Object(index)
            }
            None => Hit::Nothing,
        }
    }

    /// Smallest size, anchored at the canvas origin, that contains every object.
    pub fn canvas_extent(&self) -> Size {
        self.objects.iter().fold(Size::default(), |extent, object| {
            let corner = object.far_corner();
            Size::new(extent.width.max(corner.x), extent.height.max(corner.y))
        })
    }
}
