//! Drawing helpers for preview and overlay cells.

use crate::constants::{
    ACCENT_DOT_OFFSET, ACCENT_DOT_RADIUS, COLOR_CELL_PLACEHOLDER, COLOR_CHAMPAGNE,
    COLOR_DROP_SHADOW, COLOR_GOLD, COLOR_GOLD_GLOW, COLOR_LACQUER_RED, COLOR_RED_SHADOW,
    COLOR_SECTION_BG, GLYPH_OFFSET, GLYPH_SIZE_DESKTOP, GLYPH_SIZE_MOBILE, OVERLAY_PHOTO_RADIUS,
};
use crate::layout::{Accent, CornerGlyph, LayoutCell, StyleVariant, ViewportClass};
use crate::reveal::CellReveal;
use eframe::egui::{
    self, epaint::Shadow, load::SizedTexture, pos2, vec2, Align2, Color32, FontId, Rect,
    Rounding, Shape, Stroke, Ui, Vec2,
};

/// Border, corners and shadow for one style variant.
struct CellFrame {
    stroke: Stroke,
    dashed: bool,
    double: bool,
    rounding: Rounding,
    shadow: Shadow,
}

fn shadow(blur: f32, spread: f32, color: Color32) -> Shadow {
    Shadow {
        offset: vec2(0.0, blur * 0.25),
        blur,
        spread,
        color,
    }
}

fn frame_for(style: StyleVariant, class: ViewportClass) -> CellFrame {
    // Mobile cells use smaller radii and shadows.
    let k = match class {
        ViewportClass::Mobile => 0.6,
        ViewportClass::Desktop => 1.0,
    };
    let base = Rounding::same(16.0 * k);
    let corner = |nw: f32, ne: f32, sw: f32, se: f32| Rounding {
        nw: base.nw.max(nw * k),
        ne: base.ne.max(ne * k),
        sw: base.sw.max(sw * k),
        se: base.se.max(se * k),
    };

    match style {
        StyleVariant::DoubleGlow => CellFrame {
            stroke: Stroke::new(4.0, COLOR_CHAMPAGNE),
            dashed: false,
            double: true,
            rounding: corner(48.0, 0.0, 0.0, 0.0),
            shadow: shadow(32.0 * k, 8.0 * k, COLOR_GOLD_GLOW),
        },
        StyleVariant::DashedRed => CellFrame {
            stroke: Stroke::new(2.0, COLOR_LACQUER_RED),
            dashed: true,
            double: false,
            rounding: corner(0.0, 0.0, 0.0, 40.0),
            shadow: shadow(15.0 * k, 0.0, COLOR_DROP_SHADOW),
        },
        StyleVariant::ChampagneDeep => CellFrame {
            stroke: Stroke::new(2.0, COLOR_CHAMPAGNE),
            dashed: false,
            double: false,
            rounding: corner(0.0, 0.0, 40.0, 0.0),
            shadow: shadow(25.0 * k, 0.0, COLOR_DROP_SHADOW),
        },
        StyleVariant::ThinRounded => CellFrame {
            stroke: Stroke::new(1.0, COLOR_CHAMPAGNE),
            dashed: false,
            double: false,
            rounding: base,
            shadow: shadow(6.0 * k, 0.0, COLOR_DROP_SHADOW),
        },
        StyleVariant::GoldCorner => CellFrame {
            stroke: Stroke::new(2.0, COLOR_GOLD),
            dashed: false,
            double: false,
            rounding: corner(0.0, 32.0, 0.0, 0.0),
            shadow: shadow(16.0 * k, 0.0, COLOR_GOLD_GLOW),
        },
        StyleVariant::RedCorner => CellFrame {
            stroke: Stroke::new(2.0, COLOR_LACQUER_RED),
            dashed: false,
            double: false,
            rounding: corner(0.0, 0.0, 32.0, 0.0),
            shadow: shadow(12.0 * k, 0.0, COLOR_RED_SHADOW),
        },
    }
}

/// UV rectangle that crops an image to fill `target` ("cover"), keeping the
/// horizontal center and the top edge.
pub fn cover_uv(image: Vec2, target: Vec2) -> Rect {
    if image.x <= 0.0 || image.y <= 0.0 || target.x <= 0.0 || target.y <= 0.0 {
        return Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    }
    let image_aspect = image.x / image.y;
    let target_aspect = target.x / target.y;
    if image_aspect > target_aspect {
        let visible = target_aspect / image_aspect;
        let left = (1.0 - visible) * 0.5;
        Rect::from_min_max(pos2(left, 0.0), pos2(left + visible, 1.0))
    } else {
        let visible = image_aspect / target_aspect;
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, visible))
    }
}

fn paint_photo(ui: &Ui, rect: Rect, texture: SizedTexture, rounding: Rounding, tint: Color32) {
    egui::Image::from_texture(texture)
        .uv(cover_uv(texture.size, rect.size()))
        .rounding(rounding)
        .tint(tint)
        .paint_at(ui, rect);
}

fn dashed_outline(rect: Rect, stroke: Stroke) -> Vec<Shape> {
    let points = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    Shape::dashed_line(&points, stroke, 8.0, 5.0)
}

/// Draws a preview cell: shadow, background, photo (faded in by `loaded`),
/// border, accent dot and corner glyph.
pub fn preview_cell(
    ui: &Ui,
    rect: Rect,
    cell: &LayoutCell,
    class: ViewportClass,
    padding: f32,
    texture: Option<SizedTexture>,
    loaded: f32,
) {
    let frame = frame_for(cell.style, class);
    let painter = ui.painter();

    painter.add(frame.shadow.as_shape(rect, frame.rounding));
    painter.rect_filled(rect, frame.rounding, COLOR_SECTION_BG);

    let image_rect = rect.shrink(padding);
    let image_rounding = Rounding::same(12.0);
    painter.rect_filled(image_rect, image_rounding, COLOR_CELL_PLACEHOLDER);
    if let Some(texture) = texture {
        paint_photo(
            ui,
            image_rect,
            texture,
            image_rounding,
            Color32::WHITE.gamma_multiply(loaded),
        );
    }

    if frame.dashed {
        painter.extend(dashed_outline(rect, frame.stroke));
    } else {
        painter.rect_stroke(rect, frame.rounding, frame.stroke);
    }
    if frame.double {
        let inner = Stroke::new(1.0, frame.stroke.color);
        painter.rect_stroke(rect.shrink(frame.stroke.width + 2.0), frame.rounding, inner);
    }

    let (center, color) = match cell.accent {
        Accent::GoldBottomRight => (
            rect.right_bottom() - Vec2::splat(ACCENT_DOT_OFFSET),
            COLOR_GOLD.gamma_multiply(0.8),
        ),
        Accent::RedTopLeft => (
            rect.left_top() + Vec2::splat(ACCENT_DOT_OFFSET),
            COLOR_LACQUER_RED.gamma_multiply(0.7),
        ),
    };
    painter.circle_filled(center, ACCENT_DOT_RADIUS, color);

    if let Some(glyph) = cell.glyph {
        corner_glyph(ui, rect, glyph, class);
    }
}

/// Paints 囍 or 福 in its corner. Skipped when no loaded font covers the glyph.
fn corner_glyph(ui: &Ui, rect: Rect, glyph: CornerGlyph, class: ViewportClass) {
    let size = match class {
        ViewportClass::Mobile => GLYPH_SIZE_MOBILE,
        ViewportClass::Desktop => GLYPH_SIZE_DESKTOP,
    };
    let font = FontId::proportional(size);
    if !ui.fonts(|fonts| fonts.has_glyph(&font, glyph.as_char())) {
        return;
    }
    let (pos, anchor, color) = match glyph {
        CornerGlyph::DoubleHappiness => (
            rect.left_top() + Vec2::splat(GLYPH_OFFSET),
            Align2::LEFT_TOP,
            COLOR_LACQUER_RED.gamma_multiply(0.7),
        ),
        CornerGlyph::Fortune => (
            rect.right_bottom() - Vec2::splat(GLYPH_OFFSET),
            Align2::RIGHT_BOTTOM,
            COLOR_CHAMPAGNE.gamma_multiply(0.6),
        ),
    };
    ui.painter().text(pos, anchor, glyph.as_char(), font, color);
}

/// Draws an overlay photo scaled and faded according to its reveal state.
pub fn overlay_photo(ui: &Ui, rect: Rect, texture: Option<SizedTexture>, reveal: CellReveal) {
    if reveal.opacity <= 0.0 {
        return;
    }
    let rect = Rect::from_center_size(rect.center(), rect.size() * reveal.scale);
    let rounding = Rounding::same(OVERLAY_PHOTO_RADIUS);
    let painter = ui.painter();

    let mut drop = shadow(40.0, 0.0, COLOR_DROP_SHADOW);
    drop.color = drop.color.gamma_multiply(reveal.opacity);
    painter.add(drop.as_shape(rect, rounding));

    match texture {
        Some(texture) => paint_photo(
            ui,
            rect,
            texture,
            rounding,
            Color32::WHITE.gamma_multiply(reveal.opacity),
        ),
        None => {
            painter.rect_filled(
                rect,
                rounding,
                COLOR_CELL_PLACEHOLDER.gamma_multiply(reveal.opacity),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Rect, b: Rect) -> bool {
        (a.min - b.min).length() < 1e-5 && (a.max - b.max).length() < 1e-5
    }

    #[test]
    fn test_cover_uv_crops_wide_image_horizontally() {
        let uv = cover_uv(vec2(400.0, 100.0), vec2(100.0, 100.0));
        assert!(approx(uv, Rect::from_min_max(pos2(0.375, 0.0), pos2(0.625, 1.0))));
    }

    #[test]
    fn test_cover_uv_keeps_top_of_tall_image() {
        let uv = cover_uv(vec2(100.0, 400.0), vec2(100.0, 200.0));
        assert!(approx(uv, Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 0.5))));
    }

    #[test]
    fn test_cover_uv_degenerate_sizes_use_full_image() {
        let full = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        assert_eq!(cover_uv(vec2(0.0, 10.0), vec2(10.0, 10.0)), full);
        assert_eq!(cover_uv(vec2(10.0, 10.0), vec2(10.0, 0.0)), full);
    }

    #[test]
    fn test_every_variant_has_a_visible_border() {
        for class in [ViewportClass::Mobile, ViewportClass::Desktop] {
            for style in StyleVariant::ALL {
                let frame = frame_for(style, class);
                assert!(frame.stroke.width >= 1.0);
                assert!(frame.rounding.nw > 0.0 && frame.rounding.se > 0.0);
            }
        }
    }

    /// Number of shapes a frame produces when `draw` paints into the central panel.
    fn shape_count(draw: impl Fn(&Ui)) -> usize {
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| draw(ui));
        });
        output.shapes.len()
    }

    fn cell_rect() -> Rect {
        Rect::from_min_size(pos2(40.0, 40.0), vec2(200.0, 150.0))
    }

    #[test]
    fn test_overlay_photo_follows_reveal_state() {
        let texture = SizedTexture::new(egui::TextureId::Managed(7), vec2(640.0, 480.0));
        let baseline = shape_count(|_| {});

        let hidden = shape_count(|ui| {
            overlay_photo(ui, cell_rect(), Some(texture), CellReveal::HIDDEN);
        });
        assert_eq!(hidden, baseline);

        let placeholder = shape_count(|ui| {
            overlay_photo(ui, cell_rect(), None, CellReveal::SHOWN);
        });
        let photo = shape_count(|ui| {
            overlay_photo(ui, cell_rect(), Some(texture), CellReveal::SHOWN);
        });
        assert!(placeholder > baseline);
        assert!(photo > baseline);
    }

    #[test]
    fn test_corner_glyph_skipped_without_covering_font() {
        let cell = |glyph| LayoutCell {
            photo: crate::catalog::Photo::new("a.jpg"),
            span: crate::layout::Span::SQUARE,
            style: StyleVariant::ThinRounded,
            accent: Accent::RedTopLeft,
            glyph,
            is_full_size: false,
        };
        // The default egui fonts carry no CJK glyphs.
        let plain = shape_count(|ui| {
            preview_cell(ui, cell_rect(), &cell(None), ViewportClass::Desktop, 4.0, None, 1.0);
        });
        let marked = shape_count(|ui| {
            let glyph = Some(CornerGlyph::DoubleHappiness);
            preview_cell(ui, cell_rect(), &cell(glyph), ViewportClass::Desktop, 4.0, None, 1.0);
        });
        assert_eq!(plain, marked);
    }
}
