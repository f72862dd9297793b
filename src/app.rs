use crate::catalog::{Photo, PhotoCatalog};
use crate::config::GalleryConfig;
use crate::constants::{
    BENTO_GAP_DESKTOP, BENTO_GAP_MOBILE, BENTO_ROW_HEIGHT, BENTO_ROW_HEIGHT_LARGE,
    ACCENT_FONT_CANDIDATES, CELL_PADDING_DESKTOP, CELL_PADDING_MOBILE, CLOSE_BUTTON_MARGIN,
    CLOSE_BUTTON_SIZE, COLOR_BRONZE, COLOR_OVERLAY_BACKDROP, COLOR_SECTION_BG, LARGE_BREAKPOINT,
    OVERLAY_CELL_INSET, PENDING_REPAINT_MS,
};
use crate::gallery::GallerySection;
use crate::i18n::Lang;
use crate::image_loader::TexturePool;
use crate::layout::{Placement, ViewportClass};
use crate::paint;
use crate::virtual_grid::Viewport;
use eframe::egui::{self, pos2, vec2, Color32, Pos2, Rect, RichText, Sense, Vec2};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LANG_STORAGE_KEY: &str = "gallery_lang";
const HOVER_ZOOM: f32 = 0.04;
const ACCENT_FONT_NAME: &str = "wedding_accents";

pub struct GalleryApp {
    gallery: GallerySection,
    textures: TexturePool,
    /// Layout generation whose preview photos are pinned in the texture pool.
    pinned_generation: Option<u64>,
}

impl GalleryApp {
    /// `lang_forced` keeps a language given on the command line over the one
    /// remembered from the last run.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        catalog: PhotoCatalog,
        config: GalleryConfig,
        lang_forced: bool,
        seed: u64,
    ) -> Self {
        install_accent_font(&cc.egui_ctx, config.accent_font.as_deref());
        let textures = TexturePool::new(
            cc.egui_ctx.clone(),
            config.thumbnail_max_dimension,
            config.max_resident_textures,
        );
        let mut gallery = GallerySection::new(catalog, config, seed);
        if !lang_forced {
            if let Some(lang) = cc
                .storage
                .and_then(|storage| eframe::get_value::<Lang>(storage, LANG_STORAGE_KEY))
            {
                gallery.set_lang(lang);
            }
        }
        log::info!(
            "Gallery ready with {} photos ({})",
            gallery.catalog().len(),
            gallery.lang().tag()
        );
        Self {
            gallery,
            textures,
            pinned_generation: None,
        }
    }

    /// Keeps the current preview photos resident while the overlay cycles
    /// through the rest of the catalog.
    fn pin_preview(&mut self) {
        let generation = self.gallery.layout_generation();
        if self.pinned_generation == Some(generation) {
            return;
        }
        let sources: Vec<Photo> = self
            .gallery
            .preview_cells()
            .iter()
            .map(|cell| cell.source.clone())
            .collect();
        self.textures.pin(&sources);
        self.pinned_generation = Some(generation);
    }

    fn section_ui(&mut self, ui: &mut egui::Ui) {
        let text = self.gallery.lang().text();

        ui.horizontal(|ui| {
            ui.label(RichText::new(text.title).size(34.0).color(COLOR_BRONZE));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let next = self.gallery.lang().toggled();
                if ui
                    .button(RichText::new(next.tag().to_uppercase()).color(COLOR_BRONZE))
                    .clicked()
                {
                    self.gallery.set_lang(next);
                }
            });
        });
        ui.add_space(24.0);

        let Some(class) = self.gallery.viewport_class() else {
            return;
        };
        let viewport_width = self.gallery.viewport().map_or(0.0, |v| v.width);
        let (columns, rows) = self.gallery.preview_grid_size();
        if columns > 0 && rows > 0 {
            let gap = bento_gap(class);
            let row_height = bento_row_height(class, viewport_width);
            let width = ui.available_width();
            let column_width =
                ((width - gap * (columns - 1) as f32) / columns as f32).max(1.0);
            let height = rows as f32 * row_height + (rows - 1) as f32 * gap;
            let (grid_rect, _) = ui.allocate_exact_size(vec2(width, height), Sense::hover());

            let padding = match class {
                ViewportClass::Mobile => CELL_PADDING_MOBILE,
                ViewportClass::Desktop => CELL_PADDING_DESKTOP,
            };
            for (idx, cell) in self.gallery.preview_cells().iter().enumerate() {
                let rect =
                    preview_cell_rect(grid_rect.min, cell.placement, column_width, row_height, gap);
                if !ui.is_rect_visible(rect) {
                    continue;
                }
                let id = ui.id().with(("preview", cell.source.as_str()));
                let response = ui.interact(rect, id, Sense::hover());
                let hover = ui
                    .ctx()
                    .animate_bool_with_time(id.with("hover"), response.hovered(), 0.3);
                let texture = self.textures.texture(&cell.source);
                let loaded =
                    ui.ctx()
                        .animate_bool_with_time(id.with("loaded"), texture.is_some(), 0.7);

                paint::preview_cell(
                    ui,
                    Rect::from_center_size(rect.center(), rect.size() * (1.0 + HOVER_ZOOM * hover)),
                    &cell.layout,
                    class,
                    padding,
                    texture,
                    loaded,
                );
                response.on_hover_text(format!("{} {}", text.photo_alt, idx + 1));
            }
        }

        ui.add_space(32.0);
        ui.vertical_centered(|ui| {
            let link = egui::Label::new(
                RichText::new(text.view_all)
                    .size(18.0)
                    .color(COLOR_BRONZE)
                    .underline(),
            )
            .sense(Sense::click());
            if ui
                .add(link)
                .on_hover_cursor(egui::CursorIcon::PointingHand)
                .clicked()
            {
                self.gallery.open_overlay(&self.textures);
            }
        });
        ui.add_space(32.0);
    }

    fn overlay_ui(&mut self, ctx: &egui::Context) {
        let Some(metrics) = self.gallery.overlay_metrics() else {
            return;
        };
        let text = self.gallery.lang().text();
        let screen = ctx.screen_rect();
        let now = ctx.input(|i| i.time);
        let overscan = self.gallery.config().overscan_rows;
        let gallery = &mut self.gallery;
        let textures = &self.textures;
        let mut close = false;

        egui::Area::new(egui::Id::new("gallery_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.set_min_size(screen.size());
                // Photos register their own click sense on top, so only clicks
                // between and around them reach the backdrop.
                let backdrop = ui.interact(screen, ui.id().with("backdrop"), Sense::click());
                ui.painter().rect_filled(screen, 0.0, COLOR_OVERLAY_BACKDROP);

                egui::ScrollArea::vertical()
                    .id_salt("gallery_overlay_scroll")
                    .max_width(screen.width())
                    .max_height(screen.height())
                    .auto_shrink([false, false])
                    .show_viewport(ui, |ui, viewport| {
                        ui.set_width(metrics.content_width());
                        ui.set_height(metrics.content_height());
                        let origin = ui.max_rect().min.to_vec2();

                        let cells = metrics.visible_cells(
                            gallery.catalog().all(),
                            viewport.min.y,
                            viewport.height(),
                            overscan,
                        );
                        let materialized: Vec<usize> = cells
                            .iter()
                            .filter(|cell| cell.photo.is_some())
                            .map(|cell| cell.index)
                            .collect();
                        if gallery.reveal_mut().update(&materialized, now) {
                            ui.ctx().request_repaint();
                        }

                        for cell in &cells {
                            let Some(photo) = &cell.photo else {
                                continue;
                            };
                            let rect = metrics
                                .cell_rect(cell.row, cell.column)
                                .translate(origin)
                                .shrink(OVERLAY_CELL_INSET);
                            ui.interact(rect, ui.id().with(("overlay", cell.index)), Sense::click())
                                .on_hover_text(format!("{} {}", text.photo_alt, cell.index + 1));
                            paint::overlay_photo(
                                ui,
                                rect,
                                textures.texture(photo),
                                gallery.reveal().cell(cell.index, now),
                            );
                        }
                    });

                let button_rect = Rect::from_min_size(
                    pos2(
                        screen.max.x - CLOSE_BUTTON_MARGIN - CLOSE_BUTTON_SIZE,
                        screen.min.y + CLOSE_BUTTON_MARGIN,
                    ),
                    Vec2::splat(CLOSE_BUTTON_SIZE),
                );
                let button = egui::Button::new(RichText::new("×").size(28.0).color(Color32::WHITE))
                    .fill(COLOR_BRONZE)
                    .rounding(CLOSE_BUTTON_SIZE / 2.0);
                if ui.put(button_rect, button).on_hover_text(text.close).clicked()
                    || backdrop.clicked()
                {
                    close = true;
                }
            });

        if close {
            gallery.close_overlay();
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screen = ctx.screen_rect();
        self.gallery
            .set_viewport(Viewport::new(screen.width(), screen.height()), &self.textures);
        self.pin_preview();

        if self.textures.poll() {
            ctx.request_repaint_after(Duration::from_millis(PENDING_REPAINT_MS));
        }

        if self.gallery.is_overlay_open() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.gallery.close_overlay();
        }

        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(COLOR_SECTION_BG)
                    .inner_margin(egui::Margin::symmetric(24.0, 32.0)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("gallery_section")
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.section_ui(ui));
            });

        if self.gallery.is_overlay_open() {
            self.overlay_ui(ctx);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, LANG_STORAGE_KEY, &self.gallery.lang());
    }
}

/// Adds a font covering the corner glyphs as a fallback after egui's own
/// fonts. Without one the glyphs are skipped.
fn install_accent_font(ctx: &egui::Context, configured: Option<&Path>) {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(ACCENT_FONT_CANDIDATES.iter().map(PathBuf::from));
    for path in candidates {
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) => {
                log::debug!("No accent font at {}: {err}", path.display());
                continue;
            }
        };
        let mut fonts = egui::FontDefinitions::default();
        fonts
            .font_data
            .insert(ACCENT_FONT_NAME.to_owned(), egui::FontData::from_owned(data));
        fonts
            .families
            .entry(egui::FontFamily::Proportional)
            .or_default()
            .push(ACCENT_FONT_NAME.to_owned());
        ctx.set_fonts(fonts);
        log::info!("Loaded accent font from {}", path.display());
        return;
    }
    log::debug!("No font with the corner glyphs found; they will not be drawn");
}

fn bento_gap(class: ViewportClass) -> f32 {
    match class {
        ViewportClass::Mobile => BENTO_GAP_MOBILE,
        ViewportClass::Desktop => BENTO_GAP_DESKTOP,
    }
}

/// Preview rows grow on large desktop windows.
fn bento_row_height(class: ViewportClass, viewport_width: f32) -> f32 {
    match class {
        ViewportClass::Desktop if viewport_width >= LARGE_BREAKPOINT => BENTO_ROW_HEIGHT_LARGE,
        _ => BENTO_ROW_HEIGHT,
    }
}

/// Screen rectangle of a placed preview cell, including the gaps it spans.
fn preview_cell_rect(
    origin: Pos2,
    placement: Placement,
    column_width: f32,
    row_height: f32,
    gap: f32,
) -> Rect {
    let min = origin
        + vec2(
            placement.column as f32 * (column_width + gap),
            placement.row as f32 * (row_height + gap),
        );
    let columns = placement.span.columns.max(1);
    let rows = placement.span.rows.max(1);
    let size = vec2(
        columns as f32 * column_width + (columns - 1) as f32 * gap,
        rows as f32 * row_height + (rows - 1) as f32 * gap,
    );
    Rect::from_min_size(min, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Span;

    #[test]
    fn test_bento_row_height_by_width() {
        assert_eq!(bento_row_height(ViewportClass::Mobile, 500.0), BENTO_ROW_HEIGHT);
        assert_eq!(bento_row_height(ViewportClass::Desktop, 800.0), BENTO_ROW_HEIGHT);
        assert_eq!(
            bento_row_height(ViewportClass::Desktop, 1024.0),
            BENTO_ROW_HEIGHT_LARGE
        );
    }

    #[test]
    fn test_preview_cell_rect_spans_gaps() {
        let placement = Placement {
            row: 1,
            column: 2,
            span: Span::HERO,
        };
        let rect = preview_cell_rect(pos2(10.0, 20.0), placement, 100.0, 180.0, 32.0);
        assert_eq!(rect.min, pos2(10.0 + 2.0 * 132.0, 20.0 + 212.0));
        assert_eq!(rect.size(), vec2(3.0 * 100.0 + 2.0 * 32.0, 2.0 * 180.0 + 32.0));
    }
}
