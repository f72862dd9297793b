//! Random preview subset of the catalog, memoized on the viewport class.

use crate::catalog::Photo;
use crate::layout::ViewportClass;
use rand::seq::SliceRandom;
use rand::Rng;

/// Returns `min(count, photos.len())` distinct photos drawn uniformly without
/// replacement (shuffle, then take). A zero count yields an empty sample.
pub fn select<R: Rng + ?Sized>(photos: &[Photo], count: usize, rng: &mut R) -> Vec<Photo> {
    if count == 0 || photos.is_empty() {
        return Vec::new();
    }
    let mut shuffled = photos.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

/// The preview subset currently on screen.
///
/// It is only redrawn when the viewport class changes, so unrelated repaints
/// keep the same photos. `generation` identifies the subset for memos that
/// depend on it.
#[derive(Debug, Default)]
pub struct PreviewSample {
    key: Option<ViewportClass>,
    photos: Vec<Photo>,
    generation: u64,
}

impl PreviewSample {
    /// Makes the sample current for `class`, reshuffling only if the class
    /// differs from the one the sample was drawn for. Returns true if a new
    /// subset was drawn.
    pub fn refresh<R: Rng + ?Sized>(
        &mut self,
        catalog: &[Photo],
        class: ViewportClass,
        count: usize,
        rng: &mut R,
    ) -> bool {
        if self.key == Some(class) {
            return false;
        }
        self.photos = select(catalog, count, rng);
        self.key = Some(class);
        self.generation += 1;
        log::debug!(
            "Drew {} preview photos for {:?} (generation {})",
            self.photos.len(),
            class,
            self.generation
        );
        true
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::HashSet;

    fn photos(n: usize) -> Vec<Photo> {
        (0..n).map(|i| Photo::new(format!("photo-{i}.jpg"))).collect()
    }

    #[test]
    fn test_select_length_and_uniqueness() {
        let catalog = photos(20);
        let all: HashSet<&Photo> = catalog.iter().collect();
        for seed in 0..50 {
            let mut rng = Pcg64::seed_from_u64(seed);
            for count in [0, 1, 7, 20, 35] {
                let sample = select(&catalog, count, &mut rng);
                assert_eq!(sample.len(), count.min(catalog.len()));
                let unique: HashSet<&Photo> = sample.iter().collect();
                assert_eq!(unique.len(), sample.len());
                assert!(sample.iter().all(|p| all.contains(p)));
            }
        }
    }

    #[test]
    fn test_select_from_empty_catalog() {
        let mut rng = Pcg64::seed_from_u64(1);
        assert!(select(&[], 8, &mut rng).is_empty());
    }

    #[test]
    fn test_select_whole_catalog_is_permutation() {
        let catalog = photos(8);
        let mut rng = Pcg64::seed_from_u64(9);
        let mut sample = select(&catalog, 8, &mut rng);
        sample.sort();
        let mut expected = catalog.clone();
        expected.sort();
        assert_eq!(sample, expected);
    }

    #[test]
    fn test_preview_sample_only_reshuffles_on_class_change() {
        let catalog = photos(30);
        let mut rng = Pcg64::seed_from_u64(3);
        let mut sample = PreviewSample::default();

        assert!(sample.refresh(&catalog, ViewportClass::Desktop, 8, &mut rng));
        let first = sample.photos().to_vec();
        assert_eq!(sample.generation(), 1);

        for _ in 0..10 {
            assert!(!sample.refresh(&catalog, ViewportClass::Desktop, 8, &mut rng));
        }
        assert_eq!(sample.photos(), first.as_slice());
        assert_eq!(sample.generation(), 1);

        assert!(sample.refresh(&catalog, ViewportClass::Mobile, 8, &mut rng));
        assert_eq!(sample.generation(), 2);
        assert_eq!(sample.photos().len(), 8);
    }
}
