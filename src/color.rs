use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct `#rrggbb` colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: predictor → colour
// ---------------------------------------------------------------------------

/// Assigns each known predictor a fixed colour so tracks keep their colour
/// whichever subset of them is drawn.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
    default_color: String,
}

impl ColorMap {
    pub fn new(predictors: &[String]) -> Self {
        let mapping = predictors
            .iter()
            .cloned()
            .zip(generate_palette(predictors.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: "#888888".to_string(),
        }
    }

    /// Look up the colour for a predictor.
    pub fn color_for(&self, predictor: &str) -> &str {
        self.mapping
            .get(predictor)
            .map(String::as_str)
            .unwrap_or(self.default_color.as_str())
    }
}
