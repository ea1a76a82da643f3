//! Constructor color palettes.

use f1_db::models::ConstructorInfo;
use std::collections::HashMap;

/// Marker color for races without a known winning constructor.
pub const NO_WINNER_COLOR: &str = "#888";

/// Season timeline palette, indexed by a constructor's rank in the season.
pub const TIMELINE_PALETTE: [&str; 25] = [
    "#FF0000", "#00A1FF", "#00FF00", "#FF9A00", "#8A2BE2", //
    "#FFD700", "#FF00FF", "#00FFFF", "#A52A2A", "#228B22", //
    "#1E90FF", "#FF1493", "#7FFF00", "#DC143C", "#00CED1", //
    "#FF4500", "#2F4F4F", "#DA70D6", "#87CE00", "#8B0000", //
    "#20B2AA", "#4169E1", "#C71585", "#6B8E23", "#708090",
];

/// Grid chart palette, assigned to constructor names in order of first use.
pub const GRID_PALETTE: [&str; 21] = [
    "#771155", "#114477", "#117744", "#AAAA44", "#774411", //
    "#77CCCC", "#CC99BB", "#4477AA", "#77AADD", "#117777", //
    "#44AAAA", "#44AA77", "#88CCAA", "#777711", "#DDDD77", //
    "#AA4488", "#AA7744", "#DDAA77", "#771122", "#AA4455", "#DD7788",
];

/// Colors of one season's constructors on the timeline.
///
/// Built from the season's constructor list sorted by id. Constructors past
/// the end of the palette, and unknown ids, fall back to [`NO_WINNER_COLOR`].
#[derive(Debug, Clone, Default)]
pub struct SeasonColors {
    by_id: HashMap<i64, &'static str>,
}

impl SeasonColors {
    pub fn new(constructors: &[ConstructorInfo]) -> Self {
        let by_id = constructors
            .iter()
            .zip(TIMELINE_PALETTE.iter())
            .map(|(c, color)| (c.constructor_id, *color))
            .collect();
        Self { by_id }
    }

    pub fn color(&self, constructor_id: Option<i64>) -> &'static str {
        constructor_id
            .and_then(|id| self.by_id.get(&id).copied())
            .unwrap_or(NO_WINNER_COLOR)
    }
}

/// Ordinal color assignment that cycles through a palette.
#[derive(Debug, Clone)]
pub struct OrdinalColors {
    palette: &'static [&'static str],
    assigned: Vec<String>,
}

impl OrdinalColors {
    pub fn new(palette: &'static [&'static str]) -> Self {
        Self {
            palette,
            assigned: Vec::new(),
        }
    }

    /// Color for `key`, assigning the next palette entry on first use.
    pub fn color(&mut self, key: &str) -> &'static str {
        let index = match self.assigned.iter().position(|k| k == key) {
            Some(i) => i,
            None => {
                self.assigned.push(key.to_string());
                self.assigned.len() - 1
            }
        };
        self.palette[index % self.palette.len()]
    }
}
