//! Centralized constants for gallery sizing, timing, and colors.
//!
//! Breakpoints, column policies and animation timings live here so the layout,
//! virtualization and reveal modules agree on the same numbers.

use eframe::egui::Color32;

// =============================================================================
// VIEWPORT CONSTANTS
// =============================================================================

/// Viewport width (in points) below which the gallery switches to its mobile layout.
pub const MOBILE_BREAKPOINT: f32 = 640.0;

/// Viewport width from which desktop preview rows use the tall row height.
pub const LARGE_BREAKPOINT: f32 = 1024.0;

/// Initial window width when the application starts.
pub const INITIAL_WINDOW_WIDTH: f32 = 1280.0;

/// Initial window height when the application starts.
pub const INITIAL_WINDOW_HEIGHT: f32 = 820.0;

// =============================================================================
// PREVIEW GRID CONSTANTS
// =============================================================================

/// Number of photos shown in the inline preview grid.
pub const DEFAULT_PREVIEW_COUNT: usize = 8;

/// Column count of the preview bento grid on desktop.
pub const BENTO_DESKTOP_COLUMNS: usize = 7;

/// Column count of the preview bento grid on mobile.
pub const BENTO_MOBILE_COLUMNS: usize = 2;

/// Preview row height on mobile and on narrow desktop windows.
pub const BENTO_ROW_HEIGHT: f32 = 180.0;

/// Preview row height on wide desktop windows.
pub const BENTO_ROW_HEIGHT_LARGE: f32 = 340.0;

/// Gap between preview cells on mobile.
pub const BENTO_GAP_MOBILE: f32 = 8.0;

/// Gap between preview cells on desktop.
pub const BENTO_GAP_DESKTOP: f32 = 32.0;

/// Inner padding between a preview cell's border and its image.
pub const CELL_PADDING_MOBILE: f32 = 2.0;

pub const CELL_PADDING_DESKTOP: f32 = 4.0;

/// Probability that a non-full mobile cell is drawn "tall" (1x2) instead of square.
pub const MOBILE_TALL_PROBABILITY: f64 = 0.6;

/// Radius of the accent dot drawn on preview cells.
pub const ACCENT_DOT_RADIUS: f32 = 4.0;

/// Offset of the accent dot from the cell corner.
pub const ACCENT_DOT_OFFSET: f32 = 10.0;

/// Every fifth preview cell carries 囍, every seventh (when not fifth) 福.
pub const DOUBLE_HAPPINESS_EVERY: usize = 5;
pub const FORTUNE_EVERY: usize = 7;

pub const GLYPH_SIZE_MOBILE: f32 = 18.0;
pub const GLYPH_SIZE_DESKTOP: f32 = 24.0;

/// Inset of a corner glyph from the cell edge.
pub const GLYPH_OFFSET: f32 = 8.0;

// =============================================================================
// OVERLAY GRID CONSTANTS
// =============================================================================

/// Column count of the overlay grid below the mobile breakpoint.
pub const OVERLAY_MOBILE_COLUMNS: usize = 2;

/// Column count of the overlay grid at or above the mobile breakpoint.
pub const OVERLAY_DESKTOP_COLUMNS: usize = 5;

/// Viewport height divisor for overlay row height on mobile.
pub const OVERLAY_MOBILE_ROW_DIVISOR: f32 = 3.2;

/// Viewport height divisor for overlay row height on desktop.
pub const OVERLAY_DESKTOP_ROW_DIVISOR: f32 = 2.1;

/// Extra rows materialized above and below the visible overlay window.
pub const DEFAULT_OVERSCAN_ROWS: usize = 1;

/// Corner radius of overlay photos.
pub const OVERLAY_PHOTO_RADIUS: f32 = 16.0;

/// Inset between an overlay cell's bounds and its photo.
pub const OVERLAY_CELL_INSET: f32 = 6.0;

/// Diameter of the overlay close button.
pub const CLOSE_BUTTON_SIZE: f32 = 48.0;

/// Margin between the close button and the top-right corner of the screen.
pub const CLOSE_BUTTON_MARGIN: f32 = 28.0;

// =============================================================================
// REVEAL ANIMATION CONSTANTS
// =============================================================================

/// Delay before the first cell of the reveal wave starts, in seconds.
pub const REVEAL_INITIAL_DELAY: f64 = 0.1;

/// Delay added per position in the reveal order, in seconds.
pub const REVEAL_STAGGER: f64 = 0.07;

/// Duration of a single cell's reveal, in seconds.
pub const REVEAL_DURATION: f64 = 0.55;

/// Overshoot of the `back.out` easing curve.
pub const REVEAL_BACK_OVERSHOOT: f32 = 1.7;

/// Scale a cell starts from before it is revealed.
pub const REVEAL_START_SCALE: f32 = 0.7;

// =============================================================================
// IMAGE LOADING CONSTANTS
// =============================================================================

/// Longest edge a decoded photo is downscaled to before it becomes a texture.
pub const DEFAULT_THUMBNAIL_MAX_DIMENSION: u32 = 1280;

/// How often the UI polls for finished decodes while some are still pending.
pub const PENDING_REPAINT_MS: u64 = 50;

/// Textures kept on the GPU besides the pinned preview ones. Least recently
/// drawn photos are released first.
pub const DEFAULT_MAX_RESIDENT_TEXTURES: usize = 64;

/// Lower bound for the resident cap, so a full overlay screen never thrashes.
pub const MIN_RESIDENT_TEXTURES: usize = 24;

/// Fonts tried for the 囍/福 corner glyphs when none is configured.
pub const ACCENT_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSerifCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
];

// =============================================================================
// COLORS - PALETTE
// =============================================================================

/// Warm champagne used for borders and the section title.
pub const COLOR_CHAMPAGNE: Color32 = Color32::from_rgb(200, 168, 130);

/// Darker bronze used for text links and the close button.
pub const COLOR_BRONZE: Color32 = Color32::from_rgb(166, 124, 82);

/// Metallic gold used for accent dots and the gold border variant.
pub const COLOR_GOLD: Color32 = Color32::from_rgb(212, 175, 55);

/// Lacquer red used for the red border variants and accent dots.
pub const COLOR_LACQUER_RED: Color32 = Color32::from_rgb(192, 57, 43);

/// Background of a cell whose photo is not (yet) available.
pub const COLOR_CELL_PLACEHOLDER: Color32 = Color32::from_rgb(248, 246, 240);

/// Background of the gallery section.
pub const COLOR_SECTION_BG: Color32 = Color32::from_rgb(237, 232, 220);

/// Dimmed backdrop behind the overlay.
pub const COLOR_OVERLAY_BACKDROP: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 150);

/// Soft gold glow used by the double-border variant.
pub const COLOR_GOLD_GLOW: Color32 = Color32::from_rgba_premultiplied(36, 30, 23, 46);

/// Semi-transparent red shadow.
pub const COLOR_RED_SHADOW: Color32 = Color32::from_rgba_premultiplied(58, 17, 13, 77);

/// Neutral drop shadow.
pub const COLOR_DROP_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 60);
