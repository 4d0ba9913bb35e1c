// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene object data structures.
//!
//! This module defines the core data structures for representing a placed
//! image, its collision boundary polygon, and its named properties.

use crate::util::geometry;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::sync::Arc;

/// A 2D point in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Integer width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle with pixel-exact, half-open containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// The square of pixels within `half_extent` of `center` on both axes.
    pub const fn around(center: Point, half_extent: i32) -> Self {
        Self {
            origin: Point::new(center.x - half_extent, center.y - half_extent),
            size: Size::new(half_extent * 2 + 1, half_extent * 2 + 1),
        }
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Check if a point lies inside (left/top edges inclusive, right/bottom exclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.right()
            && point.y >= self.origin.y
            && point.y < self.bottom()
    }
}

/// Shared, read-only reference to a decoded raster image.
///
/// Cloning is cheap; all clones refer to the same pixels.
#[derive(Clone)]
pub struct ImageHandle {
    pixels: Arc<RgbaImage>,
}

impl ImageHandle {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as i32, self.height() as i32)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// A named string value attached to a scene object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One image placed on the canvas, with its collision boundary and properties.
#[derive(Debug, Clone)]
pub struct SceneObject {
    image: ImageHandle,
    source_path: String,
    position: Point,
    /// Canvas-space polygon; order defines the edges.
    boundary: Vec<Point>,
    selected_point: Option<usize>,
    /// Kept sorted by name.
    properties: Vec<Property>,
}

impl SceneObject {
    /// Create an object at the canvas origin with no boundary or properties.
    pub fn new(image: ImageHandle, source_path: impl Into<String>) -> Self {
        Self {
            image,
            source_path: source_path.into(),
            position: Point::ZERO,
            boundary: Vec::new(),
            selected_point: None,
            properties: Vec::new(),
        }
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Place the object without touching its boundary (used when restoring saved state).
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// The rectangle covered by the image on the canvas.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.image.size())
    }

    /// Bottom-right corner of the image on the canvas.
    pub fn far_corner(&self) -> Point {
        let size = self.image.size();
        Point::new(self.position.x + size.width, self.position.y + size.height)
    }

    /// Move the object by `delta`, clamping the position at zero on both axes.
    ///
    /// The boundary follows rigidly by the clamped amount, which is returned.
    pub fn translate(&mut self, delta: Point) -> Point {
        let target = self.position + delta;
        let clamped = Point::new(target.x.max(0), target.y.max(0));
        let applied = clamped - self.position;

        for point in &mut self.boundary {
            *point = *point + applied;
        }
        self.position = clamped;
        applied
    }

    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }

    /// Replace the whole boundary, dropping any point selection.
    pub fn set_boundary(&mut self, boundary: Vec<Point>) {
        self.boundary = boundary;
        self.selected_point = None;
    }

    pub fn selected_point(&self) -> Option<usize> {
        self.selected_point
    }

    /// Select a boundary point, or clear the point selection with `None`.
    ///
    /// Panics if the index is out of range.
    pub fn select_point(&mut self, index: Option<usize>) {
        if let Some(i) = index {
            assert!(
                i < self.boundary.len(),
                "boundary point {} out of range ({} points)",
                i,
                self.boundary.len()
            );
        }
        self.selected_point = index;
    }

    /// Add a boundary point after the selected point, or at the end if none is selected.
    ///
    /// Returns the index the point was inserted at. The point selection is unchanged.
    pub fn insert_point(&mut self, point: Point) -> usize {
        let index = match self.selected_point {
            Some(selected) => selected + 1,
            None => self.boundary.len(),
        };
        self.boundary.insert(index, point);
        index
    }

    /// Overwrite the boundary point at `index`.
    pub fn set_point(&mut self, index: usize, point: Point) {
        self.boundary[index] = point;
    }

    /// Remove the boundary point at `index` and clear the point selection.
    pub fn remove_point(&mut self, index: usize) -> Point {
        let removed = self.boundary.remove(index);
        self.selected_point = None;
        removed
    }

    /// Whether the boundary is an acceptable collision shape.
    ///
    /// Boundaries with three or fewer points always pass.
    pub fn is_boundary_convex(&self) -> bool {
        geometry::is_convex(&self.boundary)
    }

    /// Properties in name order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.find_property(name).is_ok()
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.find_property(name)
            .ok()
            .map(|i| self.properties[i].value.as_str())
    }

    /// Add a new property. Panics if the name is already present.
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let property = Property::new(name, value);
        match self.find_property(&property.name) {
            Ok(_) => panic!("duplicate property name {:?}", property.name),
            Err(slot) => self.properties.insert(slot, property),
        }
    }

    /// Change the value of an existing property. Panics if the name is unknown.
    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        let index = self
            .find_property(name)
            .unwrap_or_else(|_| panic!("no property named {:?}", name));
        self.properties[index].value = value.into();
    }

    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let index = self.find_property(name).ok()?;
        Some(self.properties.remove(index).value)
    }

    fn find_property(&self, name: &str) -> Result<usize, usize> {
        self.properties
            .binary_search_by(|p| p.name.as_str().cmp(name))
    }
}
