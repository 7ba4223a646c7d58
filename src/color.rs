use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// House colours for the standard product categories.
fn fixed_color(category: &str) -> Option<Color32> {
    match category {
        "Office Supplies" => Some(Color32::from_rgb(0x7F, 0xD4, 0xC1)),
        "Technology" => Some(Color32::from_rgb(0x30, 0xBF, 0xDD)),
        "Furniture" => Some(Color32::from_rgb(0x86, 0x90, 0xFF)),
        _ => None,
    }
}

/// Single bar colour for the sub-category chart.
pub const BAR_COLOR: Color32 = Color32::from_rgb(0x00, 0x83, 0xBB);

// ---------------------------------------------------------------------------
// Color mapping: group key → Color32
// ---------------------------------------------------------------------------

/// Maps category (or segment) names to colours. Known categories keep
/// their house colour; the rest share an evenly spaced palette.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let keys: Vec<&str> = keys.into_iter().collect();
        let others: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|k| fixed_color(k).is_none())
            .collect();
        let mut palette = generate_palette(others.len()).into_iter();

        let mapping = keys
            .iter()
            .map(|&k| {
                let color = fixed_color(k)
                    .or_else(|| palette.next())
                    .unwrap_or(Color32::GRAY);
                (k.to_string(), color)
            })
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, key: &str) -> Color32 {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }
}
