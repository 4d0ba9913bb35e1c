// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene data model: placed objects, the object collection, and the persisted document shape.

pub mod document;
pub mod object_manager;
pub mod scene_object;
