use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Theme colours
// ---------------------------------------------------------------------------

/// Indigo used for particles, links and accents.
pub const ACCENT: [u8; 3] = [99, 102, 241];
pub const ACCENT_END: [u8; 3] = [168, 85, 247];

/// Canvas background gradient (top-left → bottom-right).
pub const BACKGROUND_START: Color32 = Color32::from_rgb(3, 7, 18);
pub const BACKGROUND_END: Color32 = Color32::from_rgb(12, 18, 34);

/// Translucent fill for panels laid over the particle canvas.
pub const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(14, 18, 27, 204);

pub fn accent() -> Color32 {
    Color32::from_rgb(ACCENT[0], ACCENT[1], ACCENT[2])
}

/// Accent colour at the given opacity in `[0, 1]`.
pub fn accent_alpha(opacity: f32) -> Color32 {
    let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(ACCENT[0], ACCENT[1], ACCENT[2], a)
}

// ---------------------------------------------------------------------------
// Gradient generator
// ---------------------------------------------------------------------------

/// `n` colours blended in linear light from `from` to `to`.
pub fn gradient(from: [u8; 3], to: [u8; 3], n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let start: LinSrgb = Srgb::new(from[0], from[1], from[2])
        .into_format::<f32>()
        .into_linear();
    let end: LinSrgb = Srgb::new(to[0], to[1], to[2])
        .into_format::<f32>()
        .into_linear();

    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let rgb: Srgb<u8> = Srgb::<f32>::from_linear(start.mix(end, t)).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

/// Bar colours for the chart, indigo through purple.
pub fn bar_palette(n: usize) -> Vec<Color32> {
    gradient(ACCENT, ACCENT_END, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let colors = gradient([0, 0, 0], [255, 255, 255], 5);
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], Color32::from_rgb(0, 0, 0));
        assert_eq!(colors[4], Color32::from_rgb(255, 255, 255));
    }

    #[test]
    fn test_gradient_edge_sizes() {
        assert!(gradient(ACCENT, ACCENT_END, 0).is_empty());
        let single = bar_palette(1);
        assert_eq!(single.len(), 1);
        let [r, g, b, _] = single[0].to_array();
        assert!(r.abs_diff(ACCENT[0]) <= 1);
        assert!(g.abs_diff(ACCENT[1]) <= 1);
        assert!(b.abs_diff(ACCENT[2]) <= 1);
    }

    #[test]
    fn test_accent_alpha_clamps() {
        assert_eq!(accent_alpha(2.0).a(), 255);
        assert_eq!(accent_alpha(-1.0).a(), 0);
    }
}
