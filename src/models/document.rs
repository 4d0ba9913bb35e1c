// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted scene format.
//!
//! A world document holds an object count followed by one entry per object.
//! Exporting a single object writes a bare entry with no world wrapper.

use super::object_manager::ObjectManager;
use super::scene_object::{ImageHandle, Point, Property, SceneObject};
use serde::{Deserialize, Serialize};

/// Problems with a structurally valid but inconsistent document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document declares {declared} objects but contains {found}")]
    CountMismatch { declared: usize, found: usize },
}

/// One saved object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub image_path: String,
    pub position: Point,
    #[serde(default)]
    pub collision_geometry: Vec<Point>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ObjectEntry {
    pub fn from_object(object: &SceneObject) -> Self {
        Self {
            image_path: object.source_path().to_string(),
            position: object.position(),
            collision_geometry: object.boundary().to_vec(),
            properties: object.properties().to_vec(),
        }
    }

    /// Build a scene object from this entry and its already-loaded image.
    ///
    /// Properties repeated in the entry keep their last value.
    pub fn into_object(self, image: ImageHandle) -> SceneObject {
        let mut object = SceneObject::new(image, self.image_path);
        object.set_position(self.position);
        object.set_boundary(self.collision_geometry);
        for property in self.properties {
            if object.has_property(&property.name) {
                log::warn!("Duplicate property {:?} in saved object", property.name);
                object.set_property(&property.name, property.value);
            } else {
                object.add_property(property.name, property.value);
            }
        }
        object
    }
}

/// A whole saved scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub number_of_objects: usize,
    pub objects: Vec<ObjectEntry>,
}

impl SceneDocument {
    /// Snapshot every object, in list order.
    pub fn from_manager(manager: &ObjectManager) -> Self {
        let objects: Vec<ObjectEntry> = manager
            .objects()
            .iter()
            .map(ObjectEntry::from_object)
            .collect();
        Self {
            number_of_objects: objects.len(),
            objects,
        }
    }

    /// Check that the declared count matches the entries.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.number_of_objects != self.objects.len() {
            return Err(DocumentError::CountMismatch {
                declared: self.number_of_objects,
                found: self.objects.len(),
            });
        }
        Ok(())
    }
}

/// Either kind of scene file, told apart by shape when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneFile {
    World(SceneDocument),
    Object(ObjectEntry),
}

impl SceneFile {
    pub fn entries(&self) -> &[ObjectEntry] {
        match self {
            SceneFile::World(doc) => &doc.objects,
            SceneFile::Object(entry) => std::slice::from_ref(entry),
        }
    }

    pub fn into_entries(self) -> Vec<ObjectEntry> {
        match self {
            SceneFile::World(doc) => doc.objects,
            SceneFile::Object(entry) => vec![entry],
        }
    }

    pub fn is_world(&self) -> bool {
        matches!(self, SceneFile::World(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn sample_object() -> SceneObject {
        let mut obj = SceneObject::new(ImageHandle::new(RgbaImage::new(16, 16)), "art/rock.png");
        obj.set_position(Point::new(12, 34));
        obj.set_boundary(vec![Point::new(12, 34), Point::new(28, 34), Point::new(20, 50)]);
        obj.add_property("mass", "3.5");
        obj
    }

    #[test]
    fn test_entry_captures_object() {
        let entry = ObjectEntry::from_object(&sample_object());
        assert_eq!(entry.image_path, "art/rock.png");
        assert_eq!(entry.position, Point::new(12, 34));
        assert_eq!(entry.collision_geometry.len(), 3);
        assert_eq!(entry.properties, vec![Property::new("mass", "3.5")]);
    }

    #[test]
    fn test_entry_rebuilds_object() {
        let entry = ObjectEntry::from_object(&sample_object());
        let rebuilt = entry.clone().into_object(ImageHandle::new(RgbaImage::new(16, 16)));

        assert_eq!(rebuilt.position(), Point::new(12, 34));
        assert_eq!(rebuilt.boundary(), entry.collision_geometry.as_slice());
        assert_eq!(rebuilt.property("mass"), Some("3.5"));
        assert_eq!(rebuilt.selected_point(), None);
    }

    #[test]
    fn test_repeated_property_keeps_last_value() {
        let entry = ObjectEntry {
            image_path: "a.png".to_string(),
            position: Point::ZERO,
            collision_geometry: Vec::new(),
            properties: vec![Property::new("hp", "1"), Property::new("hp", "2")],
        };
        let obj = entry.into_object(ImageHandle::new(RgbaImage::new(1, 1)));
        assert_eq!(obj.properties(), &[Property::new("hp", "2")]);
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let mut manager = ObjectManager::new();
        manager.add_object(sample_object());
        let mut doc = SceneDocument::from_manager(&manager);
        assert!(doc.validate().is_ok());

        doc.number_of_objects = 2;
        assert!(matches!(
            doc.validate(),
            Err(DocumentError::CountMismatch { declared: 2, found: 1 })
        ));
    }

    #[test]
    fn test_untagged_file_kinds() {
        let world = r#"{"number_of_objects":0,"objects":[]}"#;
        let file: SceneFile = serde_json::from_str(world).unwrap();
        assert!(file.is_world());

        let single = r#"{"image_path":"a.png","position":{"x":1,"y":2}}"#;
        let file: SceneFile = serde_json::from_str(single).unwrap();
        assert!(!file.is_world());
        assert_eq!(file.entries()[0].position, Point::new(1, 2));
    }
}
