// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background loading of images and scene files.
//!
//! Every batch runs on its own thread and is delivered exactly once by
//! `poll`, in the order it finished. Starting a new batch never cancels
//! one that is still running.

use sceneboard::io::format;
use sceneboard::io::media;
use sceneboard::io::serialization::{self, OpenedFile};
use sceneboard::models::scene_object::SceneObject;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};

/// Result of one background loading batch.
#[derive(Default)]
pub struct LoadedFiles {
    pub images: Vec<SceneObject>,
    pub scenes: Vec<OpenedFile>,
    pub errors: Vec<String>,
}

/// Pending background loads.
#[derive(Default)]
pub struct Loader {
    pending: Vec<Receiver<LoadedFiles>>,
}

impl Loader {
    /// Whether any batch has not been delivered yet.
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Load `paths` on a background thread.
    ///
    /// Scene files are recognised by extension; everything else is decoded as an image.
    pub fn spawn(&mut self, paths: Vec<PathBuf>) {
        let (sender, receiver) = channel();
        self.pending.push(receiver);

        std::thread::spawn(move || {
            let count = paths.len();
            let loaded = load_files(paths);
            if sender.send(loaded).is_err() {
                log::error!("Loaded {} file(s) but nobody was waiting for them", count);
            }
        });
    }

    /// Take every batch that has finished since the last call.
    pub fn poll(&mut self) -> Vec<LoadedFiles> {
        let mut finished = Vec::new();
        self.pending.retain(|receiver| match receiver.try_recv() {
            Ok(loaded) => {
                finished.push(loaded);
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                log::error!("Background loader stopped without delivering its files");
                false
            }
        });
        finished
    }
}

fn load_files(paths: Vec<PathBuf>) -> LoadedFiles {
    let mut loaded = LoadedFiles::default();
    for path in paths {
        if format::is_scene_path(&path) {
            match serialization::open_scene_file(&path, media::load_image) {
                Ok(file) => loaded.scenes.push(file),
                Err(e) => loaded.errors.push(format!("{:#}", e)),
            }
        } else {
            match media::load_object(&path) {
                Ok(object) => loaded.images.push(object),
                Err(e) => loaded.errors.push(format!("{:#}", e)),
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::time::{Duration, Instant};

    fn wait_for(loader: &mut Loader, batches: usize) -> Vec<LoadedFiles> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut finished = Vec::new();
        while finished.len() < batches && Instant::now() < deadline {
            finished.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        finished
    }

    #[test]
    fn test_overlapping_batches_are_all_delivered() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        RgbaImage::new(4, 4).save(&first).unwrap();
        RgbaImage::new(6, 6).save(&second).unwrap();

        let mut loader = Loader::default();
        loader.spawn(vec![first]);
        loader.spawn(vec![second]);
        assert_eq!(loader.pending(), 2);

        let finished = wait_for(&mut loader, 2);

        assert_eq!(finished.len(), 2);
        assert!(!loader.is_busy());
        let mut widths: Vec<u32> = finished
            .iter()
            .flat_map(|batch| batch.images.iter().map(|o| o.image().width()))
            .collect();
        widths.sort();
        assert_eq!(widths, vec![4, 6]);
    }

    #[test]
    fn test_failed_files_are_reported_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = Loader::default();
        loader.spawn(vec![dir.path().join("missing.png"), dir.path().join("missing.json")]);

        let finished = wait_for(&mut loader, 1);

        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].errors.len(), 2);
        assert!(finished[0].images.is_empty());
        assert!(finished[0].scenes.is_empty());
    }
}
