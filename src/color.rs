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
// Named survey colours
// ---------------------------------------------------------------------------

pub const WATER: Color32 = Color32::from_rgb(30, 90, 220);
pub const LIGHT_WATER: Color32 = Color32::from_rgb(173, 216, 230);
pub const INFILTRATION: Color32 = Color32::from_rgb(0, 200, 220);
pub const SANDY_FUNNEL: Color32 = Color32::from_rgb(230, 210, 40);
pub const GRAVEL_FUNNEL: Color32 = Color32::from_rgb(139, 90, 43);
const UNKNOWN_SOIL: Color32 = Color32::GRAY;

/// Colour of a soil layer by its name. Unknown names are gray.
pub fn soil_color(name: &str) -> Color32 {
    match name.trim() {
        "Surface" => Color32::from_rgb(0, 128, 0),
        "Sandy" => Color32::from_rgb(255, 255, 0),
        "Sandy Loam" => Color32::from_rgb(255, 215, 0),
        "Light Loam" => Color32::from_rgb(255, 165, 0),
        "Medium Loam" => Color32::from_rgb(255, 69, 0),
        "Heavy Loam" => Color32::from_rgb(165, 42, 42),
        "Clay" => Color32::from_rgb(139, 69, 19),
        "Groundwater" => Color32::from_rgb(0, 0, 255),
        "Mineral" => Color32::from_rgb(128, 128, 128),
        "Bedrock" => Color32::from_rgb(20, 20, 20),
        // default 3D profile
        "Organic" => Color32::from_rgb(110, 70, 40),
        "Subsoil" => Color32::from_rgb(244, 164, 96),
        "Unconfined Aquifer" => LIGHT_WATER,
        "Confined Layer" => Color32::from_rgb(100, 100, 100),
        _ => UNKNOWN_SOIL,
    }
}

/// Same colour with the given opacity (0.0..=1.0).
pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(10);
        assert_eq!(p.len(), 10);
        assert_ne!(p[0], p[5]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn soil_names_map_to_table_colours() {
        assert_eq!(soil_color("Groundwater"), Color32::from_rgb(0, 0, 255));
        assert_eq!(soil_color(" Clay "), soil_color("Clay"));
        assert_eq!(soil_color("Peat"), Color32::GRAY);
    }
}
