use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CategoryValue;

/// Accent used for the focus economy and the "with accounts" series.
pub const ACCENT: Color32 = Color32::from_rgb(0x07, 0xb1, 0xf0);

/// Muted tone for comparison series.
pub const MUTED: Color32 = Color32::GRAY;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of one grouping dimension to stable colours, so
/// a cohort keeps its colour regardless of how the chart is sorted.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CategoryValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a dimension's distinct values.
    pub fn new(values: &BTreeSet<CategoryValue>) -> Self {
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<CategoryValue, Color32> = values
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        ColorMap {
            mapping,
            default_color: MUTED,
        }
    }

    /// Look up the colour for a given category value.
    pub fn color_for(&self, value: &CategoryValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_hues() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(8);
        assert_eq!(colors.len(), 8);
        let distinct: std::collections::BTreeSet<_> =
            colors.iter().map(|c| (c.r(), c.g(), c.b())).collect();
        assert_eq!(distinct.len(), 8);
    }

    #[test]
    fn color_map_is_stable_per_value() {
        let values: BTreeSet<CategoryValue> = ["female", "male"]
            .iter()
            .map(|s| CategoryValue::str(*s))
            .collect();
        let map = ColorMap::new(&values);
        let female = map.color_for(&CategoryValue::str("female"));
        assert_eq!(female, map.color_for(&CategoryValue::str("female")));
        assert_ne!(female, map.color_for(&CategoryValue::str("male")));
        // unknown values fall back to the muted tone
        assert_eq!(map.color_for(&CategoryValue::str("other")), MUTED);
    }
}
