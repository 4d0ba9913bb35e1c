// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sceneboard - scene object model and editing engine
//!
//! Places bitmap-backed objects on a canvas, edits a collision polygon for
//! each one, tags them with properties, and saves the scene to a file.

pub mod engine;
pub mod io;
pub mod models;
pub mod util;
