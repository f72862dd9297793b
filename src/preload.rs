//! Ahead-of-display image requests for the preview subset and the full catalog.

use crate::catalog::Photo;
use std::collections::HashSet;

/// Issues a fire-and-forget fetch for one photo. Implementations must not
/// report failures back; preloading only warms caches.
pub trait PhotoFetcher {
    fn fetch(&self, photo: &Photo);
}

/// Tracks which photos already had a fetch issued so no photo is requested twice.
#[derive(Debug, Default)]
pub struct PreloadScheduler {
    requested: HashSet<Photo>,
    full_issued: bool,
}

impl PreloadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests every preview photo not requested before. Returns how many
    /// fetches were issued.
    pub fn preload_preview(&mut self, subset: &[Photo], fetcher: &impl PhotoFetcher) -> usize {
        let issued = self.issue(subset, fetcher);
        log::debug!("Preloading {issued} preview photos");
        issued
    }

    /// Requests the rest of the catalog. Only the first call does anything; the
    /// latch is never cleared, so later overlay opens issue nothing.
    pub fn preload_full(&mut self, catalog: &[Photo], fetcher: &impl PhotoFetcher) -> usize {
        if self.full_issued {
            return 0;
        }
        self.full_issued = true;
        let issued = self.issue(catalog, fetcher);
        log::debug!("Preloading {issued} remaining catalog photos");
        issued
    }

    fn issue(&mut self, photos: &[Photo], fetcher: &impl PhotoFetcher) -> usize {
        let mut issued = 0;
        for photo in photos {
            if self.requested.insert(photo.clone()) {
                fetcher.fetch(photo);
                issued += 1;
            }
        }
        issued
    }

    #[cfg(test)]
    pub fn is_requested(&self, photo: &Photo) -> bool {
        self.requested.contains(photo)
    }

    #[cfg(test)]
    pub fn full_issued(&self) -> bool {
        self.full_issued
    }
}
