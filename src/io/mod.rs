// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images and scene files.

pub mod format;
pub mod media;
pub mod serialization;
