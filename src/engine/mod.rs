// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing engine.
//!
//! Host events go in through `EditState::handle`, mutate the `Session`, and
//! come back out as a list of effects for the host to carry out.

pub mod editing;
pub mod events;
pub mod session;

pub use editing::{DragMode, EditState};
pub use events::{Effect, Event, PointerButton};
pub use session::{SaveState, Session, Viewport};
