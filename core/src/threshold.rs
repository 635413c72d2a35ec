use embedded_graphics::pixelcolor::BinaryColor;

/// Brightness cutoff used when none is given.
pub const DEFAULT_THRESHOLD: i32 = 128;

/// ITU-R 601-2 luma in 16.16 fixed point, rounded to nearest.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Maps a grayscale value to its pixel state.
///
/// A pixel is off when `(gray > threshold) ^ invert` holds and on otherwise,
/// so with the default polarity bright source pixels end up off. The OLED
/// firmware relies on this exact mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub level: i32,
    pub invert: bool,
}

impl Default for Threshold {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, false)
    }
}

impl Threshold {
    pub fn new(level: i32, invert: bool) -> Self {
        Self { level, invert }
    }

    pub fn classify(&self, gray: u8) -> BinaryColor {
        if (gray as i32 > self.level) ^ self.invert {
            BinaryColor::Off
        } else {
            BinaryColor::On
        }
    }

    pub fn classify_rgb(&self, r: u8, g: u8, b: u8) -> BinaryColor {
        self.classify(luma(r, g, b))
    }

    /// True when every gray level lands on the same side of the cutoff.
    pub fn is_degenerate(&self) -> bool {
        self.level < 0 || self.level >= u8::MAX as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bright_is_off_by_default() {
        let t = Threshold::default();
        assert_eq!(t.classify(255), BinaryColor::Off);
        assert_eq!(t.classify(129), BinaryColor::Off);
        assert_eq!(t.classify(128), BinaryColor::On);
        assert_eq!(t.classify(0), BinaryColor::On);
    }

    #[test]
    fn invert_flips_polarity() {
        let t = Threshold::new(128, true);
        assert_eq!(t.classify(255), BinaryColor::On);
        assert_eq!(t.classify(128), BinaryColor::Off);
        assert_eq!(t.classify(0), BinaryColor::Off);
    }

    #[test]
    fn xor_rule_holds_everywhere() {
        for level in [-1, 0, 1, 64, 128, 200, 254, 255, 300] {
            for invert in [false, true] {
                let t = Threshold::new(level, invert);
                for g in 0..=255u8 {
                    let expect_on = !((g as i32 > level) ^ invert);
                    assert_eq!(t.classify(g).is_on(), expect_on, "g={g} t={level} v={invert}");
                }
            }
        }
    }

    #[test]
    fn out_of_range_levels_degenerate() {
        let all_off = Threshold::new(-5, false);
        let all_on = Threshold::new(300, false);
        assert!(all_off.is_degenerate() && all_on.is_degenerate());
        assert!((0..=255u8).all(|g| all_off.classify(g) == BinaryColor::Off));
        assert!((0..=255u8).all(|g| all_on.classify(g) == BinaryColor::On));
        assert!(!Threshold::default().is_degenerate());
    }

    #[test]
    fn luma_matches_rec601() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }
}
