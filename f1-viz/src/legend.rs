//! Legend chip packing.
//!
//! Chips are laid out left to right and wrap onto a new row when the next chip
//! would overflow a row that already holds one. Each row is then centered in
//! the available width.

use serde::Serialize;

pub const CHIP_PAD_X: f64 = 12.0;
pub const CHIP_GAP_X: f64 = 10.0;
pub const CHIP_GAP_Y: f64 = 10.0;
pub const DOT_RADIUS: f64 = 6.0;
pub const CHIP_HEIGHT: f64 = 34.0;
/// Gap between the dot and the label text.
pub const DOT_TEXT_GAP: f64 = 10.0;
pub const CHIP_FONT: &str = "12px system-ui";

/// Measures rendered text width in pixels.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f64;
}

/// Fixed per-character width estimate, for contexts without a canvas.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    pub char_width: f64,
}

impl Default for ApproxMeasure {
    /// Average advance of a 12px sans-serif face.
    fn default() -> Self {
        Self { char_width: 6.6 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chip {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl Chip {
    /// Center of the color dot, relative to the chip origin.
    pub fn dot_center(&self) -> (f64, f64) {
        (CHIP_PAD_X + DOT_RADIUS, CHIP_HEIGHT / 2.0)
    }

    /// Left edge of the label text, relative to the chip origin.
    pub fn text_x(&self) -> f64 {
        CHIP_PAD_X + DOT_RADIUS * 2.0 + DOT_TEXT_GAP
    }
}

/// Full chip width for a label of `text_width` pixels.
pub fn chip_width(text_width: f64) -> f64 {
    CHIP_PAD_X * 2.0 + DOT_RADIUS * 2.0 + DOT_TEXT_GAP + text_width
}

/// Pack labels into centered rows no wider than `available`.
pub fn pack_chips(labels: &[String], available: f64, measure: &dyn TextMeasure) -> Vec<Chip> {
    let mut rows: Vec<Vec<Chip>> = Vec::new();
    let mut x = 0.0;
    let mut y = 0.0;

    for label in labels {
        let width = chip_width(measure.text_width(label));
        let row_has_chip = rows.last().is_some_and(|r| !r.is_empty());
        if row_has_chip && x + width > available {
            x = 0.0;
            y += CHIP_HEIGHT + CHIP_GAP_Y;
            rows.push(Vec::new());
        }
        if rows.is_empty() {
            rows.push(Vec::new());
        }
        if let Some(row) = rows.last_mut() {
            row.push(Chip {
                label: label.clone(),
                x,
                y,
                width,
            });
        }
        x += width + CHIP_GAP_X;
    }

    rows.into_iter()
        .flat_map(|mut row| {
            let row_width: f64 = row.iter().map(|c| c.width).sum::<f64>()
                + CHIP_GAP_X * (row.len().saturating_sub(1)) as f64;
            let offset = ((available - row_width) / 2.0).max(0.0);
            for chip in &mut row {
                chip.x += offset;
            }
            row
        })
        .collect()
}

/// Total height of packed chips.
pub fn packed_height(chips: &[Chip]) -> f64 {
    chips
        .iter()
        .map(|c| c.y + CHIP_HEIGHT)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is 10px wide, so a 3-letter label gives a 76px chip.
    struct Fixed;

    impl TextMeasure for Fixed {
        fn text_width(&self, text: &str) -> f64 {
            text.len() as f64 * 10.0
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chip_width_formula() {
        assert_eq!(chip_width(0.0), 46.0);
        assert_eq!(chip_width(30.0), 76.0);
    }

    #[test]
    fn single_row_is_centered() {
        let chips = pack_chips(&labels(&["abc", "def"]), 400.0, &Fixed);
        // Row width 76 + 10 + 76 = 162, offset (400 - 162) / 2 = 119.
        assert_eq!(chips[0].x, 119.0);
        assert_eq!(chips[1].x, 119.0 + 86.0);
        assert!(chips.iter().all(|c| c.y == 0.0));
    }

    #[test]
    fn wraps_when_row_is_full() {
        let chips = pack_chips(&labels(&["abc", "def", "ghi"]), 170.0, &Fixed);
        assert_eq!(chips[0].y, 0.0);
        assert_eq!(chips[1].y, 0.0);
        assert_eq!(chips[2].y, CHIP_HEIGHT + CHIP_GAP_Y);
        // Lone chip on the second row is centered on its own.
        assert_eq!(chips[2].x, (170.0 - 76.0) / 2.0);
        assert_eq!(packed_height(&chips), 2.0 * CHIP_HEIGHT + CHIP_GAP_Y);
    }

    #[test]
    fn oversized_first_chip_stays_on_first_row() {
        let chips = pack_chips(&labels(&["a-very-long-constructor"]), 100.0, &Fixed);
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].y, 0.0);
        assert_eq!(chips[0].x, 0.0);
    }

    #[test]
    fn packing_is_idempotent() {
        let names = labels(&["Ferrari", "Mercedes", "Red Bull", "McLaren", "Alpine", "Williams"]);
        let measure = ApproxMeasure::default();
        let a = pack_chips(&names, 320.0, &measure);
        let b = pack_chips(&names, 320.0, &measure);
        assert_eq!(a, b);
        assert!(a.iter().all(|c| c.x >= 0.0 && c.x + c.width <= 320.0));
    }

    #[test]
    fn empty_labels() {
        assert!(pack_chips(&[], 300.0, &Fixed).is_empty());
        assert_eq!(packed_height(&[]), 0.0);
    }
}
