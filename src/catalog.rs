//! The ordered, immutable list of photos every other gallery component reads from.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// File extensions accepted when a catalog is built from a directory.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

const CLOUDINARY_HOST: &str = "res.cloudinary.com";
const CLOUDINARY_UPLOAD: &str = "/upload/";
const CLOUDINARY_FOCUS: &str = "/upload/c_fill,g_auto,f_auto/";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// An opaque reference (local path or URL) to one image resource.
///
/// Cloning is cheap; the source string is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Photo(Arc<str>);

impl Photo {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_remote(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    /// Source used by the preview grid: Cloudinary URLs get an automatic focus
    /// crop, local JPG/PNG files prefer a `.webp` sibling when one exists.
    pub fn focus_source(&self, prefer_webp: bool) -> Photo {
        if self.0.contains(CLOUDINARY_HOST) && self.0.contains(CLOUDINARY_UPLOAD) {
            return Photo::new(self.0.replacen(CLOUDINARY_UPLOAD, CLOUDINARY_FOCUS, 1));
        }
        if prefer_webp && !self.is_remote() {
            if let Some(webp) = webp_sibling(Path::new(self.as_str())) {
                if webp.is_file() {
                    return Photo::new(webp.to_string_lossy().into_owned());
                }
            }
        }
        self.clone()
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Photo({})", self.0)
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn webp_sibling(path: &Path) -> Option<PathBuf> {
    match path.extension()?.to_str()? {
        "jpg" | "JPG" | "png" => Some(path.with_extension("webp")),
        _ => None,
    }
}

/// Accepted manifest shapes: a bare JSON array of sources or `{ "photos": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Manifest {
    List(Vec<String>),
    Object { photos: Vec<String> },
}

impl Manifest {
    fn into_sources(self) -> Vec<String> {
        match self {
            Manifest::List(sources) | Manifest::Object { photos: sources } => sources,
        }
    }
}

/// Ordered sequence of unique photos, fixed at construction.
#[derive(Clone, Debug, Default)]
pub struct PhotoCatalog {
    photos: Arc<[Photo]>,
}

impl PhotoCatalog {
    /// Builds a catalog from sources in order. Later duplicates of a source are
    /// dropped so every photo appears exactly once.
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut seen = HashSet::new();
        let mut photos = Vec::new();
        for source in sources {
            let photo = Photo::new(source);
            if seen.insert(photo.clone()) {
                photos.push(photo);
            } else {
                log::warn!("Dropping duplicate catalog entry {photo}");
            }
        }
        Self {
            photos: photos.into(),
        }
    }

    /// Loads a catalog from a JSON manifest file or from a directory of images.
    ///
    /// Relative manifest entries resolve against the manifest's directory.
    /// Directory entries are sorted by file name so the order is stable.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let catalog = if path.is_dir() {
            Self::from_directory(path)?
        } else {
            Self::from_manifest(path)?
        };
        log::info!(
            "Loaded {} photos from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn from_manifest(path: &Path) -> Result<Self, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::from_sources(
            manifest
                .into_sources()
                .into_iter()
                .map(|source| resolve_source(base, source)),
        ))
    }

    fn from_directory(dir: &Path) -> Result<Self, CatalogError> {
        let entries = fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_image_extension(path))
            .collect();
        files.sort();
        Ok(Self::from_sources(
            files
                .into_iter()
                .map(|path| path.to_string_lossy().into_owned()),
        ))
    }

    /// All photos, in catalog order. The order never changes for a given catalog.
    pub fn all(&self) -> &[Photo] {
        &self.photos
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

fn resolve_source(base: &Path, source: String) -> String {
    let is_remote = source.starts_with("http://") || source.starts_with("https://");
    if is_remote || Path::new(&source).is_absolute() {
        source
    } else {
        base.join(&source).to_string_lossy().into_owned()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}
