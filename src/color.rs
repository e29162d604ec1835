use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

/// Fill for a selected pie slice or bar.
pub const SELECTED: Color32 = Color32::from_rgb(0x1e, 0x3a, 0x5f);

/// Default bar fill.
pub const BAR: Color32 = Color32::from_rgb(0x42, 0xa5, 0xf5);

/// Outline of a highlighted heatmap cell.
pub const HIGHLIGHT_STROKE: Color32 = Color32::from_rgb(0xff, 0x8c, 0x00);

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.65);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Sequential scale: count → colour
// ---------------------------------------------------------------------------

/// Viridis control points, low to high.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Map `t` in `0.0..=1.0` onto the viridis ramp, interpolating in linear RGB.
pub fn viridis(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (VIRIDIS.len() - 1) as f32;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = pos - idx as f32;

    let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = stop(VIRIDIS[idx]).mix(stop(VIRIDIS[idx + 1]), frac);
    to_color32(Srgb::from_linear(mixed))
}

/// Colour for a heatmap count on a `0..=max` domain.
pub fn count_color(count: usize, max: usize) -> Color32 {
    if max == 0 {
        return viridis(0.0);
    }
    viridis(count as f32 / max as f32)
}
