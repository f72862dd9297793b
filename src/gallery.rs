//! State of the gallery section: the memoized preview grid, the overlay and
//! the bookkeeping that decides when each piece is recomputed.

use crate::catalog::{Photo, PhotoCatalog};
use crate::config::GalleryConfig;
use crate::i18n::Lang;
use crate::layout::{self, BentoGrid, LayoutCell, Placement, ViewportClass};
use crate::preload::{PhotoFetcher, PreloadScheduler};
use crate::reveal::RevealSequencer;
use crate::sample::PreviewSample;
use crate::virtual_grid::{GridMetrics, Viewport};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// One cell of the preview grid, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewCell {
    pub layout: LayoutCell,
    /// Source actually displayed (focus crop or `.webp` sibling of the photo).
    pub source: Photo,
    pub placement: Placement,
}

#[derive(Debug)]
struct LayoutMemo {
    class: ViewportClass,
    sample_generation: u64,
    cells: Vec<PreviewCell>,
    grid: BentoGrid,
}

pub struct GallerySection {
    catalog: PhotoCatalog,
    config: GalleryConfig,
    rng: Pcg64,
    viewport: Option<Viewport>,
    sample: PreviewSample,
    sources: Vec<Photo>,
    layout: Option<LayoutMemo>,
    layout_generation: u64,
    preloader: PreloadScheduler,
    overlay_open: bool,
    reveal: RevealSequencer,
}

impl GallerySection {
    pub fn new(catalog: PhotoCatalog, config: GalleryConfig, seed: u64) -> Self {
        let reveal = RevealSequencer::new(config.reveal_mode);
        Self {
            catalog,
            config,
            rng: Pcg64::seed_from_u64(seed),
            viewport: None,
            sample: PreviewSample::default(),
            sources: Vec::new(),
            layout: None,
            layout_generation: 0,
            preloader: PreloadScheduler::new(),
            overlay_open: false,
            reveal,
        }
    }

    pub fn catalog(&self) -> &PhotoCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn lang(&self) -> Lang {
        self.config.lang
    }

    pub fn set_lang(&mut self, lang: Lang) {
        if self.config.lang != lang {
            self.config.lang = lang;
            self.invalidate();
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn viewport_class(&self) -> Option<ViewportClass> {
        self.viewport.map(|v| v.class())
    }

    /// Feeds the current viewport. The preview subset is redrawn only when the
    /// viewport class changes; newly drawn preview photos are preloaded.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>, fetcher: &impl PhotoFetcher) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        let Some(class) = self.viewport_class() else {
            return;
        };

        if self.sample.refresh(
            self.catalog.all(),
            class,
            self.config.preview_count,
            &mut self.rng,
        ) {
            self.sources = self
                .sample
                .photos()
                .iter()
                .map(|photo| photo.focus_source(self.config.prefer_webp))
                .collect();
            self.preloader.preload_preview(&self.sources, fetcher);
        }
        self.invalidate();
    }

    /// Called whenever something the preview depends on may have changed. With
    /// a stable layout only a new viewport class or preview subset redraws it;
    /// otherwise every invalidation does.
    fn invalidate(&mut self) {
        let Some(class) = self.viewport_class() else {
            return;
        };
        let generation = self.sample.generation();
        let current = self
            .layout
            .as_ref()
            .is_some_and(|memo| memo.class == class && memo.sample_generation == generation);
        if self.config.stable_layout && current {
            return;
        }
        self.relayout(class);
    }

    fn relayout(&mut self, class: ViewportClass) {
        let mut rng = Pcg64::seed_from_u64(self.rng.random());
        let layout_cells = layout::assign(self.sample.photos(), class, &mut rng);
        let grid = layout::pack(layout_cells.iter().map(|c| c.span), class.bento_columns());
        let cells: Vec<PreviewCell> = layout_cells
            .into_iter()
            .zip(&self.sources)
            .zip(&grid.placements)
            .map(|((layout, source), placement)| PreviewCell {
                layout,
                source: source.clone(),
                placement: *placement,
            })
            .collect();
        self.layout = Some(LayoutMemo {
            class,
            sample_generation: self.sample.generation(),
            cells,
            grid,
        });
        self.layout_generation += 1;
    }

    pub fn preview_cells(&self) -> &[PreviewCell] {
        self.layout
            .as_ref()
            .map(|memo| memo.cells.as_slice())
            .unwrap_or_default()
    }

    /// Column and row count of the preview grid.
    pub fn preview_grid_size(&self) -> (usize, usize) {
        self.layout
            .as_ref()
            .map_or((0, 0), |memo| (memo.grid.columns, memo.grid.row_count))
    }

    /// Increments every time the preview layout is redrawn.
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay_open
    }

    /// Opens the overlay, preloading the whole catalog on the first open.
    pub fn open_overlay(&mut self, fetcher: &impl PhotoFetcher) {
        if self.overlay_open {
            return;
        }
        self.overlay_open = true;
        log::debug!("Opening gallery overlay ({} photos)", self.catalog.len());
        self.preloader.preload_full(self.catalog.all(), fetcher);
        self.reveal.open();
        self.invalidate();
    }

    pub fn close_overlay(&mut self) {
        if !self.overlay_open {
            return;
        }
        self.overlay_open = false;
        log::debug!("Closing gallery overlay");
        self.reveal.close();
        self.invalidate();
    }

    /// Overlay grid sizes for the current viewport, or `None` when the overlay
    /// is closed or the viewport is unavailable.
    pub fn overlay_metrics(&self) -> Option<GridMetrics> {
        if !self.overlay_open {
            return None;
        }
        GridMetrics::compute(self.viewport, self.catalog.len())
    }

    pub fn reveal(&self) -> &RevealSequencer {
        &self.reveal
    }

    pub fn reveal_mut(&mut self) -> &mut RevealSequencer {
        &mut self.reveal
    }

    #[cfg(test)]
    pub fn preloader(&self) -> &PreloadScheduler {
        &self.preloader
    }
}
