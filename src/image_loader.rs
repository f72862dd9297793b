use crate::catalog::Photo;
use crate::constants::MIN_RESIDENT_TEXTURES;
use crate::preload::PhotoFetcher;
use eframe::egui::load::{SizeHint, SizedTexture, TexturePoll};
use eframe::egui::{self, ColorImage, TextureHandle};
use image::{DynamicImage, ImageError, ImageFormat};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to determine format for {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// Decodes a still image and downscales it so its longest edge is at most
/// `max_dimension`. Animated formats yield their first frame.
pub fn load_photo_scaled(path: &Path, max_dimension: u32) -> Result<ColorImage, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = image::guess_format(&bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|source| LoadError::Format {
            path: path.to_path_buf(),
            source,
        })?;

    let mut image = image::load_from_memory_with_format(&bytes, format).map_err(|source| {
        LoadError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let (w, h) = (image.width(), image.height());
    if w > max_dimension || h > max_dimension {
        let (new_w, new_h) = scaled_dimensions(w, h, max_dimension);
        image = image.thumbnail(new_w, new_h);
    }

    Ok(color_image_from_dynamic(image))
}

fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let scale = (max_dimension as f32) / (width.max(height) as f32);
    let new_w = ((width as f32 * scale) as u32).max(1);
    let new_h = ((height as f32 * scale) as u32).max(1);
    (new_w, new_h)
}

fn color_image_from_dynamic(image: DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw())
}

/// Load state of one photo's texture.
#[derive(Clone, Copy, Debug)]
pub enum TextureState {
    /// Local file being decoded on the rayon pool.
    Decoding,
    /// Remote source waiting on the egui image loaders.
    Fetching,
    Ready(SizedTexture),
    Failed,
}

impl TextureState {
    fn is_pending(&self) -> bool {
        matches!(self, TextureState::Decoding | TextureState::Fetching)
    }
}

struct Entry {
    state: TextureState,
    /// Owns locally decoded textures. Remote ones live in the egui loader cache.
    handle: Option<TextureHandle>,
}

type DecodeResult = (Photo, Result<ColorImage, LoadError>);

/// Turns photos into egui textures and keeps at most `max_resident` of them
/// alive besides the pinned preview photos.
///
/// Local files are decoded on the rayon pool and uploaded on the UI thread.
/// Remote URLs go through the image loaders installed on the egui context.
/// A photo evicted from the pool is requested again the next time it is drawn.
pub struct TexturePool {
    ctx: egui::Context,
    max_dimension: u32,
    max_resident: usize,
    sender: Sender<DecodeResult>,
    receiver: Receiver<DecodeResult>,
    entries: RefCell<HashMap<Photo, Entry>>,
    /// Ready, unpinned photos, least recently drawn first.
    access_order: RefCell<Vec<Photo>>,
    pinned: RefCell<HashSet<Photo>>,
}

impl TexturePool {
    pub fn new(ctx: egui::Context, max_dimension: u32, max_resident: usize) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            ctx,
            max_dimension,
            max_resident: max_resident.max(MIN_RESIDENT_TEXTURES),
            sender,
            receiver,
            entries: RefCell::new(HashMap::new()),
            access_order: RefCell::new(Vec::new()),
            pinned: RefCell::new(HashSet::new()),
        }
    }

    /// Uploads every decode that finished since the last call and advances
    /// remote fetches. Returns true while some requested photo is still loading.
    pub fn poll(&self) -> bool {
        for (photo, result) in self.receiver.try_iter() {
            // Skip results for photos evicted or re-requested meanwhile.
            let decoding = matches!(
                self.entries.borrow().get(&photo).map(|e| e.state),
                Some(TextureState::Decoding)
            );
            if !decoding {
                continue;
            }
            match result {
                Ok(image) => {
                    let handle = self.ctx.load_texture(
                        format!("photo-{photo}"),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    let texture = SizedTexture::from_handle(&handle);
                    self.set_entry(&photo, TextureState::Ready(texture), Some(handle));
                    self.mark_used(&photo);
                }
                Err(err) => {
                    log::warn!("{err}");
                    self.set_entry(&photo, TextureState::Failed, None);
                }
            }
        }

        let fetching: Vec<Photo> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, entry)| matches!(entry.state, TextureState::Fetching))
            .map(|(photo, _)| photo.clone())
            .collect();
        for photo in fetching {
            self.poll_remote(&photo);
        }

        self.entries
            .borrow()
            .values()
            .any(|entry| entry.state.is_pending())
    }

    fn poll_remote(&self, photo: &Photo) {
        match self.ctx.try_load_texture(
            photo.as_str(),
            egui::TextureOptions::LINEAR,
            SizeHint::default(),
        ) {
            Ok(TexturePoll::Pending { .. }) => {}
            Ok(TexturePoll::Ready { texture }) => {
                self.set_entry(photo, TextureState::Ready(texture), None);
                self.mark_used(photo);
            }
            Err(err) => {
                log::warn!("failed to load {photo}: {err}");
                self.set_entry(photo, TextureState::Failed, None);
            }
        }
    }

    fn set_entry(&self, photo: &Photo, state: TextureState, handle: Option<TextureHandle>) {
        self.entries
            .borrow_mut()
            .insert(photo.clone(), Entry { state, handle });
    }

    /// Texture for `photo` if it is loaded. Photos not in the pool (never
    /// requested, or evicted) are requested so a later frame can draw them.
    pub fn texture(&self, photo: &Photo) -> Option<SizedTexture> {
        let state = self.entries.borrow().get(photo).map(|entry| entry.state);
        match state {
            Some(TextureState::Ready(texture)) => {
                self.mark_used(photo);
                Some(texture)
            }
            Some(_) => None,
            None => {
                self.fetch(photo);
                None
            }
        }
    }

    /// Replaces the set of photos that are never evicted.
    pub fn pin(&self, photos: &[Photo]) {
        let pinned: HashSet<Photo> = photos.iter().cloned().collect();
        let released: Vec<Photo> = self.pinned.borrow().difference(&pinned).cloned().collect();
        self.access_order
            .borrow_mut()
            .retain(|photo| !pinned.contains(photo));
        *self.pinned.borrow_mut() = pinned;

        for photo in released {
            let ready = matches!(
                self.entries.borrow().get(&photo).map(|e| e.state),
                Some(TextureState::Ready(_))
            );
            if ready {
                self.mark_used(&photo);
            }
        }
    }

    /// Moves a ready photo to the back of the access order and evicts from the
    /// front while the pool holds more than `max_resident` unpinned textures.
    fn mark_used(&self, photo: &Photo) {
        if self.pinned.borrow().contains(photo) {
            return;
        }
        let evicted: Vec<Photo> = {
            let mut order = self.access_order.borrow_mut();
            if order.last() != Some(photo) {
                order.retain(|p| p != photo);
                order.push(photo.clone());
            }
            let excess = order.len().saturating_sub(self.max_resident);
            order.drain(..excess).collect()
        };
        for photo in evicted {
            self.evict(&photo);
        }
    }

    fn evict(&self, photo: &Photo) {
        let Some(entry) = self.entries.borrow_mut().remove(photo) else {
            return;
        };
        // Local textures are freed with their handle. Remote ones live in the
        // loader cache and have to be forgotten there.
        if entry.handle.is_none() {
            self.ctx.forget_image(photo.as_str());
        }
        log::debug!("Released texture for {photo}");
    }

    #[cfg(test)]
    fn resident_count(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|entry| matches!(entry.state, TextureState::Ready(_)))
            .count()
    }

    #[cfg(test)]
    fn state(&self, photo: &Photo) -> Option<TextureState> {
        self.entries.borrow().get(photo).map(|entry| entry.state)
    }
}

impl PhotoFetcher for TexturePool {
    fn fetch(&self, photo: &Photo) {
        if self.entries.borrow().contains_key(photo) {
            return;
        }
        if photo.is_remote() {
            self.set_entry(photo, TextureState::Fetching, None);
            // The first call starts the download.
            self.poll_remote(photo);
            return;
        }

        self.set_entry(photo, TextureState::Decoding, None);
        let photo = photo.clone();
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        let max_dimension = self.max_dimension;
        rayon::spawn(move || {
            let result = load_photo_scaled(Path::new(photo.as_str()), max_dimension);
            // The pool may already be gone when the window closed mid-decode.
            if sender.send((photo, result)).is_ok() {
                ctx.request_repaint();
            }
        });
    }
}
