use std::{fs, path::Path};

use image::{GrayImage, Luma};
use log::info;
use oled_anim_core::{
    framebuffer::{HEIGHT, WIDTH},
    packer::{PackedFrame, unpack},
};

use crate::error::{ConvertError, Result};

/// Each panel pixel becomes a SCALE x SCALE block in the PNG.
const SCALE: u32 = 4;

/// Renders the packed frames back to PNGs so the result can be checked
/// without flashing a keyboard. Lit pixels are drawn white.
pub fn write_previews(dir: &Path, frames: &[PackedFrame]) -> Result<()> {
    fs::create_dir_all(dir).map_err(ConvertError::io(dir))?;
    for (index, packed) in frames.iter().enumerate() {
        let frame = unpack(packed);
        let image = GrayImage::from_fn(WIDTH as u32 * SCALE, HEIGHT as u32 * SCALE, |x, y| {
            if frame.is_on((x / SCALE) as usize, (y / SCALE) as usize) {
                Luma([0xFF])
            } else {
                Luma([0x00])
            }
        });
        let path = dir.join(format!("frame_{index:03}.png"));
        image
            .save(&path)
            .map_err(|source| ConvertError::Preview { path, source })?;
    }
    info!("Wrote {} preview images to {:?}", frames.len(), dir);
    Ok(())
}
