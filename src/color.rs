use std::collections::BTreeMap;
use std::fmt;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
// Named colours for comparison charts
// ---------------------------------------------------------------------------

/// Fixed colours used by comparison charts, cycled by group position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesColor {
    Green,
    Blue,
    Red,
    Purple,
    Orange,
}

impl SeriesColor {
    pub const PALETTE: [SeriesColor; 5] = [
        SeriesColor::Green,
        SeriesColor::Blue,
        SeriesColor::Red,
        SeriesColor::Purple,
        SeriesColor::Orange,
    ];

    /// Colour for the group at `index` in the sorted group list.
    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            SeriesColor::Green => "green",
            SeriesColor::Blue => "blue",
            SeriesColor::Red => "red",
            SeriesColor::Purple => "purple",
            SeriesColor::Orange => "orange",
        }
    }

    /// CSS / matplotlib values of the named colours.
    pub fn to_color32(self) -> Color32 {
        match self {
            SeriesColor::Green => Color32::from_rgb(0x00, 0x80, 0x00),
            SeriesColor::Blue => Color32::from_rgb(0x00, 0x00, 0xFF),
            SeriesColor::Red => Color32::from_rgb(0xFF, 0x00, 0x00),
            SeriesColor::Purple => Color32::from_rgb(0x80, 0x00, 0x80),
            SeriesColor::Orange => Color32::from_rgb(0xFF, 0xA5, 0x00),
        }
    }
}

impl fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Color mapping: series label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of a single-table chart to distinct colours.
#[derive(Debug, Clone)]
pub struct LabelColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl LabelColors {
    /// Build a colour map from labels in display order.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(l, c)| (l.to_string(), c))
            .collect();

        LabelColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
