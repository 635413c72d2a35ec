use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Size},
};

pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 32;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// One 128x32 monochrome animation frame, one byte per pixel (0 = off, 1 = on).
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: [u8; PIXEL_COUNT],
}

impl Default for Frame {
    fn default() -> Self {
        Self::filled(BinaryColor::Off)
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Frame {}x{}", WIDTH, HEIGHT)?;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                f.write_str(if self.is_on(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Frame {
    pub fn filled(color: BinaryColor) -> Self {
        Self {
            pixels: [color.is_on() as u8; PIXEL_COUNT],
        }
    }

    /// Builds a frame from row-major 0/1 values. Any non-zero value counts as on.
    pub fn from_pixels(pixels: &[u8]) -> Option<Self> {
        if pixels.len() != PIXEL_COUNT {
            return None;
        }
        let mut frame = Self::default();
        for (dst, &src) in frame.pixels.iter_mut().zip(pixels) {
            *dst = (src != 0) as u8;
        }
        Some(frame)
    }

    pub fn pixels(&self) -> &[u8; PIXEL_COUNT] {
        &self.pixels
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.pixels[y * WIDTH + x] == 1
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return;
        }
        self.pixels[y as usize * WIDTH + x as usize] = color.is_on() as u8;
    }

    pub fn count_on(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == 1).count()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color.is_on() as u8);
        Ok(())
    }
}
