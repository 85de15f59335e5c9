//! Start → end interpolation over a particle's lifetime

use pyre_core::Color;

/// Linear interpolation between two floats.
///
/// Written as a weighted sum so both endpoints are reproduced exactly.
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Per-channel interpolation between two colors, truncated toward zero
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        lerp_channel(a.r, b.r, t),
        lerp_channel(a.g, b.g, t),
        lerp_channel(a.b, b.b, t),
        lerp_channel(a.a, b.a, t),
    )
}

fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    lerp_f32(a as f32, b as f32, t) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_f32_endpoints() {
        assert_eq!(lerp_f32(-20.0, 90.0, 0.0), -20.0);
        assert_eq!(lerp_f32(-20.0, 90.0, 1.0), 90.0);
        assert!((lerp_f32(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_color_endpoints() {
        let start = Color::new(16, 124, 167, 255);
        let end = Color::new(235, 128, 220, 0);
        assert_eq!(lerp_color(start, end, 0.0), start);
        assert_eq!(lerp_color(start, end, 1.0), end);
    }

    #[test]
    fn lerp_color_truncates() {
        // 0.75 * 255 = 191.25, 0.75 * 3 = 2.25
        let c = lerp_color(Color::new(0, 0, 0, 0), Color::new(255, 3, 0, 0), 0.75);
        assert_eq!(c.r, 191);
        assert_eq!(c.g, 2);
    }
}
