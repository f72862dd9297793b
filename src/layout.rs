//! Bento layout for the preview grid: random but constrained spans and
//! decorative variants per photo, plus sparse row-major placement into a grid.

use crate::catalog::Photo;
use crate::constants::{
    BENTO_DESKTOP_COLUMNS, BENTO_MOBILE_COLUMNS, DOUBLE_HAPPINESS_EVERY, FORTUNE_EVERY,
    MOBILE_BREAKPOINT, MOBILE_TALL_PROBABILITY,
};
use rand::Rng;

/// Coarse viewport size class, derived from the viewport width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewportClass {
    Mobile,
    Desktop,
}

impl ViewportClass {
    pub fn from_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            ViewportClass::Mobile
        } else {
            ViewportClass::Desktop
        }
    }

    /// Column count of the preview bento grid for this class.
    pub fn bento_columns(self) -> usize {
        match self {
            ViewportClass::Mobile => BENTO_MOBILE_COLUMNS,
            ViewportClass::Desktop => BENTO_DESKTOP_COLUMNS,
        }
    }
}

/// Number of grid columns and rows a cell covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub columns: usize,
    pub rows: usize,
}

impl Span {
    pub const SQUARE: Span = Span::new(1, 1);
    pub const TALL: Span = Span::new(1, 2);
    pub const FULL: Span = Span::new(2, 2);
    pub const HERO: Span = Span::new(3, 2);

    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }
}

/// Border/corner/shadow combination drawn around a preview cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleVariant {
    /// Double champagne border, rounded top-left corner, soft gold glow.
    DoubleGlow,
    /// Dashed red border, rounded bottom-right corner.
    DashedRed,
    /// Champagne border, rounded bottom-left corner, strong shadow.
    ChampagneDeep,
    /// Thin champagne border, evenly rounded, medium shadow.
    ThinRounded,
    /// Gold border, rounded top-right corner, gold shadow.
    GoldCorner,
    /// Red border, rounded bottom-left corner, red shadow.
    RedCorner,
}

impl StyleVariant {
    pub const ALL: [StyleVariant; 6] = [
        StyleVariant::DoubleGlow,
        StyleVariant::DashedRed,
        StyleVariant::ChampagneDeep,
        StyleVariant::ThinRounded,
        StyleVariant::GoldCorner,
        StyleVariant::RedCorner,
    ];

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Small decorative dot drawn in one corner of a preview cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accent {
    GoldBottomRight,
    RedTopLeft,
}

/// Wedding character painted in a corner of some preview cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerGlyph {
    /// 囍, top-left.
    DoubleHappiness,
    /// 福, bottom-right.
    Fortune,
}

impl CornerGlyph {
    /// Glyph for the preview cell at `index`, if any.
    pub fn for_index(index: usize) -> Option<Self> {
        if index % DOUBLE_HAPPINESS_EVERY == 0 {
            Some(CornerGlyph::DoubleHappiness)
        } else if index % FORTUNE_EVERY == 0 {
            Some(CornerGlyph::Fortune)
        } else {
            None
        }
    }

    pub fn as_char(self) -> char {
        match self {
            CornerGlyph::DoubleHappiness => '囍',
            CornerGlyph::Fortune => '福',
        }
    }
}

/// Per-render layout decision for one preview photo.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutCell {
    pub photo: Photo,
    pub span: Span,
    pub style: StyleVariant,
    pub accent: Accent,
    pub glyph: Option<CornerGlyph>,
    pub is_full_size: bool,
}

/// Assigns a span, style variant and accent to every photo.
///
/// Desktop: the first and last photo get the 3x2 hero span, the rest draw
/// columns from {1,2,3} and rows from {1,2}. Mobile: one or two distinct
/// photos (50/50) are full size (2x2), the rest are tall (1x2) with
/// probability 0.6 and square otherwise.
pub fn assign<R: Rng + ?Sized>(
    photos: &[Photo],
    class: ViewportClass,
    rng: &mut R,
) -> Vec<LayoutCell> {
    let n = photos.len();
    let full_indices = match class {
        ViewportClass::Mobile if n > 0 => {
            let wanted = if rng.random_bool(0.5) { 2 } else { 1 };
            rand::seq::index::sample(rng, n, wanted.min(n)).into_vec()
        }
        _ => Vec::new(),
    };

    photos
        .iter()
        .enumerate()
        .map(|(index, photo)| {
            let is_full_size = full_indices.contains(&index);
            let span = match class {
                ViewportClass::Desktop if index == 0 || index == n - 1 => Span::HERO,
                ViewportClass::Desktop => {
                    Span::new(rng.random_range(1..=3), rng.random_range(1..=2))
                }
                ViewportClass::Mobile if is_full_size => Span::FULL,
                ViewportClass::Mobile => {
                    if rng.random_bool(MOBILE_TALL_PROBABILITY) {
                        Span::TALL
                    } else {
                        Span::SQUARE
                    }
                }
            };
            let accent = if rng.random_bool(0.5) {
                Accent::GoldBottomRight
            } else {
                Accent::RedTopLeft
            };
            LayoutCell {
                photo: photo.clone(),
                span,
                style: StyleVariant::random(rng),
                accent,
                glyph: CornerGlyph::for_index(index),
                is_full_size,
            }
        })
        .collect()
}

/// Where a cell landed in the bento grid, with its span clamped to the grid width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub span: Span,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BentoGrid {
    pub columns: usize,
    pub row_count: usize,
    pub placements: Vec<Placement>,
}

/// Places spans in order using sparse row-major auto-placement: the cursor only
/// moves forward, and each item takes the first free slot at or after it.
pub fn pack(spans: impl IntoIterator<Item = Span>, columns: usize) -> BentoGrid {
    let columns = columns.max(1);
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut placements = Vec::new();
    let (mut cursor_row, mut cursor_column) = (0, 0);

    for span in spans {
        let span = Span::new(span.columns.clamp(1, columns), span.rows.max(1));
        let (mut row, mut column) = (cursor_row, cursor_column);
        loop {
            if column + span.columns > columns {
                row += 1;
                column = 0;
                continue;
            }
            if is_free(&occupied, row, column, span) {
                break;
            }
            column += 1;
        }

        while occupied.len() < row + span.rows {
            occupied.push(vec![false; columns]);
        }
        for line in &mut occupied[row..row + span.rows] {
            line[column..column + span.columns].fill(true);
        }
        placements.push(Placement { row, column, span });
        cursor_row = row;
        cursor_column = column + span.columns;
    }

    BentoGrid {
        columns,
        row_count: occupied.len(),
        placements,
    }
}

fn is_free(occupied: &[Vec<bool>], row: usize, column: usize, span: Span) -> bool {
    (row..row + span.rows).all(|r| {
        occupied
            .get(r)
            .map_or(true, |line| line[column..column + span.columns].iter().all(|c| !c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn photos(n: usize) -> Vec<Photo> {
        (0..n).map(|i| Photo::new(format!("p{i}.jpg"))).collect()
    }

    #[test]
    fn test_viewport_class_breakpoint() {
        assert_eq!(ViewportClass::from_width(500.0), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_width(639.9), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_width(640.0), ViewportClass::Desktop);
        assert_eq!(ViewportClass::from_width(1200.0), ViewportClass::Desktop);
    }

    #[test]
    fn test_desktop_spans_are_valid_with_hero_ends() {
        for seed in 0..200 {
            let mut rng = Pcg64::seed_from_u64(seed);
            for n in 1..12 {
                let cells = assign(&photos(n), ViewportClass::Desktop, &mut rng);
                assert_eq!(cells.len(), n);
                for cell in &cells {
                    assert!((1..=3).contains(&cell.span.columns));
                    assert!((1..=2).contains(&cell.span.rows));
                    assert!(!cell.is_full_size);
                }
                assert_eq!(cells[0].span, Span::HERO);
                assert_eq!(cells[n - 1].span, Span::HERO);
            }
        }
    }

    #[test]
    fn test_mobile_marks_one_or_two_full_cells() {
        let mut saw_one = false;
        let mut saw_two = false;
        for seed in 0..200 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let cells = assign(&photos(8), ViewportClass::Mobile, &mut rng);
            let full = cells.iter().filter(|c| c.is_full_size).count();
            assert!(full == 1 || full == 2, "seed {seed} produced {full} full cells");
            saw_one |= full == 1;
            saw_two |= full == 2;
            for cell in &cells {
                let expected = if cell.is_full_size {
                    vec![Span::FULL]
                } else {
                    vec![Span::TALL, Span::SQUARE]
                };
                assert!(expected.contains(&cell.span));
            }
        }
        assert!(saw_one && saw_two);
    }

    #[test]
    fn test_mobile_single_photo_is_full() {
        let mut rng = Pcg64::seed_from_u64(5);
        let cells = assign(&photos(1), ViewportClass::Mobile, &mut rng);
        assert!(cells[0].is_full_size);
        assert_eq!(cells[0].span, Span::FULL);
    }

    #[test]
    fn test_assign_empty() {
        let mut rng = Pcg64::seed_from_u64(0);
        assert!(assign(&[], ViewportClass::Mobile, &mut rng).is_empty());
        assert!(assign(&[], ViewportClass::Desktop, &mut rng).is_empty());
    }

    #[test]
    fn test_assign_keeps_photo_order() {
        let input = photos(6);
        let mut rng = Pcg64::seed_from_u64(11);
        let cells = assign(&input, ViewportClass::Desktop, &mut rng);
        let output: Vec<Photo> = cells.into_iter().map(|c| c.photo).collect();
        assert_eq!(output, input);
    }

    #[test]
    fn test_pack_sparse_placement() {
        let grid = pack([Span::HERO, Span::SQUARE, Span::new(3, 1), Span::TALL], 4);
        assert_eq!(
            grid.placements,
            vec![
                Placement { row: 0, column: 0, span: Span::HERO },
                Placement { row: 0, column: 3, span: Span::SQUARE },
                // Does not fit after the square; the cursor moves to the next row.
                Placement { row: 2, column: 0, span: Span::new(3, 1) },
                Placement { row: 2, column: 3, span: Span::TALL },
            ]
        );
        assert_eq!(grid.row_count, 4);
    }

    #[test]
    fn test_pack_clamps_wide_spans() {
        let grid = pack([Span::HERO, Span::FULL], 2);
        assert_eq!(grid.placements[0].span, Span::new(2, 2));
        assert_eq!(grid.placements[1], Placement { row: 2, column: 0, span: Span::FULL });
    }

    #[test]
    fn test_pack_never_overlaps() {
        for seed in 0..100 {
            let mut rng = Pcg64::seed_from_u64(seed);
            for class in [ViewportClass::Mobile, ViewportClass::Desktop] {
                let cells = assign(&photos(8), class, &mut rng);
                let grid = pack(cells.iter().map(|c| c.span), class.bento_columns());
                let mut covered = vec![vec![false; grid.columns]; grid.row_count];
                for p in &grid.placements {
                    assert!(p.column + p.span.columns <= grid.columns);
                    for row in &mut covered[p.row..p.row + p.span.rows] {
                        for slot in &mut row[p.column..p.column + p.span.columns] {
                            assert!(!*slot);
                            *slot = true;
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_corner_glyphs_by_position() {
        let mut rng = Pcg64::seed_from_u64(3);
        let cells = assign(&photos(15), ViewportClass::Desktop, &mut rng);
        let glyphs: Vec<Option<CornerGlyph>> = cells.iter().map(|c| c.glyph).collect();
        assert_eq!(glyphs[0], Some(CornerGlyph::DoubleHappiness));
        assert_eq!(glyphs[5], Some(CornerGlyph::DoubleHappiness));
        assert_eq!(glyphs[7], Some(CornerGlyph::Fortune));
        assert_eq!(glyphs[10], Some(CornerGlyph::DoubleHappiness));
        assert_eq!(glyphs[14], Some(CornerGlyph::Fortune));
        assert_eq!(glyphs.iter().flatten().count(), 5);
        assert_eq!(CornerGlyph::Fortune.as_char(), '福');
    }
}
