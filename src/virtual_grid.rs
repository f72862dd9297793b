//! Windowed grid math for the full-catalog overlay.
//!
//! Only the rows intersecting the scroll window (plus an overscan margin) are
//! turned into [`OverlayCell`]s; everything else is represented by the
//! content height alone.

use crate::catalog::Photo;
use crate::constants::{
    OVERLAY_DESKTOP_COLUMNS, OVERLAY_DESKTOP_ROW_DIVISOR, OVERLAY_MOBILE_COLUMNS,
    OVERLAY_MOBILE_ROW_DIVISOR,
};
use crate::layout::ViewportClass;
use eframe::egui::{pos2, vec2, Rect};
use std::ops::Range;

/// Size of the window the overlay is shown in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Returns `None` when the dimensions are not usable (zero, negative or
    /// non-finite), which is how an unavailable environment shows up.
    pub fn new(width: f32, height: f32) -> Option<Self> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        (usable(width) && usable(height)).then_some(Self { width, height })
    }

    pub fn class(&self) -> ViewportClass {
        ViewportClass::from_width(self.width)
    }
}

/// Derived sizes of the overlay grid for one viewport snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMetrics {
    pub column_count: usize,
    pub column_width: f32,
    pub row_height: f32,
    pub row_count: usize,
    pub item_count: usize,
}

/// One materialized grid position. `photo` is absent past the end of the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayCell {
    pub row: usize,
    pub column: usize,
    pub index: usize,
    pub photo: Option<Photo>,
}

impl GridMetrics {
    pub fn compute(viewport: Option<Viewport>, item_count: usize) -> Option<Self> {
        let viewport = viewport?;
        let (column_count, divisor) = match viewport.class() {
            ViewportClass::Mobile => (OVERLAY_MOBILE_COLUMNS, OVERLAY_MOBILE_ROW_DIVISOR),
            ViewportClass::Desktop => (OVERLAY_DESKTOP_COLUMNS, OVERLAY_DESKTOP_ROW_DIVISOR),
        };
        Some(Self {
            column_count,
            column_width: (viewport.width / column_count as f32).floor().max(1.0),
            row_height: (viewport.height / divisor).floor().max(1.0),
            row_count: item_count.div_ceil(column_count),
            item_count,
        })
    }

    pub fn content_height(&self) -> f32 {
        self.row_count as f32 * self.row_height
    }

    pub fn content_width(&self) -> f32 {
        self.column_count as f32 * self.column_width
    }

    /// Linear catalog index of a grid position, or `None` if the position is
    /// outside the grid or past the last photo.
    pub fn index_at(&self, row: usize, column: usize) -> Option<usize> {
        if column >= self.column_count {
            return None;
        }
        let index = row * self.column_count + column;
        (index < self.item_count).then_some(index)
    }

    /// Grid position of a catalog index; the inverse of [`Self::index_at`].
    #[cfg(test)]
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.item_count).then(|| (index / self.column_count, index % self.column_count))
    }

    /// Rows intersecting `[scroll_top, scroll_top + view_height)`, widened by
    /// `overscan` rows on each side and clamped to the grid.
    pub fn visible_rows(&self, scroll_top: f32, view_height: f32, overscan: usize) -> Range<usize> {
        if self.row_count == 0 || view_height <= 0.0 {
            return 0..0;
        }
        let top = scroll_top.max(0.0);
        let first = ((top / self.row_height).floor() as usize).min(self.row_count);
        let last = (((top + view_height) / self.row_height).ceil() as usize).min(self.row_count);
        first.saturating_sub(overscan)..(last + overscan).min(self.row_count)
    }

    /// Materializes every cell of the visible rows, in row-major order.
    pub fn visible_cells(
        &self,
        photos: &[Photo],
        scroll_top: f32,
        view_height: f32,
        overscan: usize,
    ) -> Vec<OverlayCell> {
        let rows = self.visible_rows(scroll_top, view_height, overscan);
        let mut cells = Vec::with_capacity(rows.len() * self.column_count);
        for row in rows {
            for column in 0..self.column_count {
                let index = row * self.column_count + column;
                let photo = self
                    .index_at(row, column)
                    .and_then(|index| photos.get(index))
                    .cloned();
                cells.push(OverlayCell {
                    row,
                    column,
                    index,
                    photo,
                });
            }
        }
        cells
    }

    /// Bounds of a cell relative to the top-left of the grid content.
    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        Rect::from_min_size(
            pos2(
                column as f32 * self.column_width,
                row as f32 * self.row_height,
            ),
            vec2(self.column_width, self.row_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(n: usize) -> Vec<Photo> {
        (0..n).map(|i| Photo::new(format!("{i}.jpg"))).collect()
    }

    fn metrics(width: f32, height: f32, n: usize) -> GridMetrics {
        GridMetrics::compute(Viewport::new(width, height), n).unwrap()
    }

    #[test]
    fn test_index_position_bijection() {
        for n in 0..40 {
            for (width, columns) in [(500.0, 2), (1200.0, 5)] {
                let m = metrics(width, 900.0, n);
                assert_eq!(m.column_count, columns);
                let mut hits = vec![0; n];
                for row in 0..m.row_count + 1 {
                    for column in 0..m.column_count {
                        match m.index_at(row, column) {
                            Some(index) => {
                                assert_eq!(m.position_of(index), Some((row, column)));
                                hits[index] += 1;
                            }
                            None => assert!(row * columns + column >= n),
                        }
                    }
                }
                assert!(hits.iter().all(|&h| h == 1));
                assert_eq!(m.position_of(n), None);
            }
        }
    }

    #[test]
    fn test_eight_photos_on_desktop() {
        let m = metrics(1200.0, 840.0, 8);
        assert_eq!(m.column_count, 5);
        assert_eq!(m.row_count, 2);
        assert_eq!(m.index_at(1, 3), None);
        assert_eq!(m.index_at(1, 2), Some(7));
        assert_eq!(m.column_width, 240.0);
        assert_eq!(m.row_height, 400.0);
    }

    #[test]
    fn test_resize_recomputes_row_count() {
        let mobile = metrics(500.0, 800.0, 20);
        assert_eq!((mobile.column_count, mobile.row_count), (2, 10));
        assert_eq!(mobile.column_width, 250.0);
        assert_eq!(mobile.row_height, (800.0_f32 / 3.2).floor());

        let desktop = metrics(1200.0, 800.0, 20);
        assert_eq!((desktop.column_count, desktop.row_count), (5, 4));
    }

    #[test]
    fn test_unavailable_viewport_renders_nothing() {
        assert!(Viewport::new(0.0, 800.0).is_none());
        assert!(Viewport::new(f32::NAN, 800.0).is_none());
        assert!(Viewport::new(1024.0, f32::INFINITY).is_none());
        assert!(GridMetrics::compute(None, 12).is_none());
    }

    #[test]
    fn test_visible_rows_window_with_overscan() {
        // 100 photos, 5 columns, row height 400 -> 20 rows.
        let m = metrics(1000.0, 840.0, 100);
        assert_eq!(m.row_count, 20);
        assert_eq!(m.visible_rows(0.0, 840.0, 0), 0..3);
        assert_eq!(m.visible_rows(0.0, 840.0, 1), 0..4);
        assert_eq!(m.visible_rows(1000.0, 840.0, 1), 1..6);
        assert_eq!(m.visible_rows(7600.0, 840.0, 1), 18..20);
        assert_eq!(m.visible_rows(-50.0, 840.0, 0), 0..3);
    }

    #[test]
    fn test_visible_cells_mark_trailing_cells_empty() {
        let catalog = photos(8);
        let m = metrics(1200.0, 840.0, catalog.len());
        let cells = m.visible_cells(&catalog, 0.0, 840.0, 1);
        assert_eq!(cells.len(), 10);
        let filled: Vec<usize> = cells
            .iter()
            .filter(|c| c.photo.is_some())
            .map(|c| c.index)
            .collect();
        assert_eq!(filled, (0..8).collect::<Vec<_>>());
        assert!(cells[8].photo.is_none() && cells[9].photo.is_none());
        assert_eq!(cells[7].photo.as_ref(), Some(&catalog[7]));
    }

    #[test]
    fn test_empty_catalog_has_no_cells() {
        let m = metrics(1200.0, 840.0, 0);
        assert_eq!(m.row_count, 0);
        assert!(m.visible_cells(&[], 0.0, 840.0, 1).is_empty());
        assert_eq!(m.content_height(), 0.0);
    }

    #[test]
    fn test_cell_rect_positions() {
        let m = metrics(1000.0, 840.0, 10);
        let rect = m.cell_rect(1, 2);
        assert_eq!(rect.min, pos2(400.0, 400.0));
        assert_eq!(rect.size(), vec2(200.0, 400.0));
    }
}
