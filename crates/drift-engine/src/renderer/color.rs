//! Hue → sRGB conversion for particles, bursts and links.
//! Everything in the backdrop shares one saturation/lightness, only the hue varies.

/// Saturation used for every particle color (70%).
pub const SATURATION: f32 = 0.7;
/// Lightness used for every particle color (60%).
pub const LIGHTNESS: f32 = 0.6;

/// Gamma-encoded sRGB color, each channel in [0, 1]: the same values CSS
/// `hsl()` produces. Not linearized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    /// `hsl(hue, 70%, 60%)`.
    pub fn from_hue(hue: f32) -> Self {
        Self::from_hsl(hue, SATURATION, LIGHTNESS)
    }

    /// Standard HSL conversion. Hue in degrees (wrapped), saturation and lightness in [0, 1].
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        Rgb { r: r + m, g: g + m, b: b + m }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: [f32; 3]) -> bool {
        let a = a.to_array();
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-4)
    }

    #[test]
    fn primary_hues() {
        assert!(close(Rgb::from_hsl(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(close(Rgb::from_hsl(120.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
        assert!(close(Rgb::from_hsl(240.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
        assert!(close(Rgb::from_hsl(360.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn backdrop_blue() {
        // hsl(220, 70%, 60%) ≈ rgb(82, 129, 224)
        let c = Rgb::from_hue(220.0);
        assert!(close(c, [0.32, 0.50667, 0.88]), "{:?}", c);
    }

    #[test]
    fn channels_stay_in_unit_range() {
        for hue in (0..720).step_by(7) {
            let c = Rgb::from_hue(hue as f32);
            for v in c.to_array() {
                assert!((0.0..=1.0).contains(&v), "hue {} gave {:?}", hue, c);
            }
        }
    }
}
