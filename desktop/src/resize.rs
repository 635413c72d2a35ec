use std::{fmt, str::FromStr};

use embedded_graphics::pixelcolor::BinaryColor;
use image::{GrayImage, imageops};
use log::debug;
use oled_anim_core::framebuffer::{Frame, HEIGHT, WIDTH};

/// Resampled values at or above this are treated as on.
const MIDPOINT: u8 = 128;

/// Filter used when a frame has to be scaled to the panel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    #[default]
    Lanczos,
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
}

impl From<Resample> for imageops::FilterType {
    fn from(resample: Resample) -> Self {
        match resample {
            Resample::Lanczos => imageops::FilterType::Lanczos3,
            Resample::Nearest => imageops::FilterType::Nearest,
            Resample::Triangle => imageops::FilterType::Triangle,
            Resample::CatmullRom => imageops::FilterType::CatmullRom,
            Resample::Gaussian => imageops::FilterType::Gaussian,
        }
    }
}

impl FromStr for Resample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lanczos" => Ok(Resample::Lanczos),
            "nearest" => Ok(Resample::Nearest),
            "triangle" => Ok(Resample::Triangle),
            "catmull-rom" => Ok(Resample::CatmullRom),
            "gaussian" => Ok(Resample::Gaussian),
            other => Err(format!(
                "unknown filter '{other}' (expected lanczos, nearest, triangle, catmull-rom or gaussian)"
            )),
        }
    }
}

impl fmt::Display for Resample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resample::Lanczos => "lanczos",
            Resample::Nearest => "nearest",
            Resample::Triangle => "triangle",
            Resample::CatmullRom => "catmull-rom",
            Resample::Gaussian => "gaussian",
        })
    }
}

/// Fits a binary frame onto the 128x32 panel canvas.
///
/// Frames that already have the panel size are copied as is. Anything else is
/// scaled with `filter` and snapped back to on/off at the midpoint.
pub fn to_frame(image: &GrayImage, filter: Resample) -> Frame {
    let (width, height) = (WIDTH as u32, HEIGHT as u32);
    let resized;
    let image = if image.dimensions() == (width, height) {
        image
    } else {
        debug!(
            "Resizing {}x{} to {}x{} ({})",
            image.width(),
            image.height(),
            width,
            height,
            filter
        );
        resized = imageops::resize(image, width, height, filter.into());
        &resized
    };

    let mut frame = Frame::default();
    for (x, y, pixel) in image.enumerate_pixels() {
        let color = if pixel[0] >= MIDPOINT {
            BinaryColor::On
        } else {
            BinaryColor::Off
        };
        frame.set_pixel(x as i32, y as i32, color);
    }
    frame
}
