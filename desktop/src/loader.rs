use std::{fs::File, io::BufReader, path::Path};

use image::{AnimationDecoder, GrayImage, Luma, RgbaImage, codecs::gif::GifDecoder};
use log::{debug, info};
use oled_anim_core::threshold::Threshold;

use crate::error::{ConvertError, Result};

/// Luma value of an "on" pixel in a binary frame.
pub const ON: u8 = 255;
/// Luma value of an "off" pixel in a binary frame.
pub const OFF: u8 = 0;

/// Decodes every frame of the GIF at `path` and binarizes it.
///
/// Frames come back fully composited at the logical screen size, in file order.
/// Pixels no frame has painted yet take the palette colour of the first
/// frame's transparent index. File handles are released before this returns.
pub fn load_frames(path: &Path, threshold: Threshold) -> Result<Vec<GrayImage>> {
    let file = File::open(path).map_err(ConvertError::io(path))?;
    let decoder = GifDecoder::new(BufReader::new(file))?;
    let frames = decoder.into_frames().collect_frames()?;
    // gif already rejects a stream without image descriptors
    if frames.is_empty() {
        return Err(ConvertError::NoFrames);
    }

    let backdrop = transparent_color(path)?;
    if let Some([r, g, b]) = backdrop {
        debug!("Transparent pixels read as #{r:02X}{g:02X}{b:02X}");
    }

    let frames: Vec<GrayImage> = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let (width, height) = frame.buffer().dimensions();
            debug!("Frame {}: {}x{}", index, width, height);
            binarize(frame.buffer(), threshold, backdrop)
        })
        .collect();
    info!("Decoded {} frames from {:?}", frames.len(), path);
    Ok(frames)
}

/// Palette colour behind the first frame's transparent index, if it has one.
fn transparent_color(path: &Path) -> Result<Option<[u8; 3]>> {
    let file = File::open(path).map_err(ConvertError::io(path))?;
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(BufReader::new(file))?;

    let Some(frame) = decoder.read_next_frame()? else {
        return Ok(None);
    };
    let Some(index) = frame.transparent else {
        return Ok(None);
    };
    let local = frame.palette.clone();
    let palette = local.as_deref().or(decoder.global_palette());

    let start = index as usize * 3;
    Ok(palette
        .and_then(|p| p.get(start..start + 3))
        .map(|c| [c[0], c[1], c[2]]))
}

/// Thresholds a composited RGBA frame. Fully transparent pixels use `backdrop`
/// when given, otherwise their stored RGB.
pub fn binarize(buffer: &RgbaImage, threshold: Threshold, backdrop: Option<[u8; 3]>) -> GrayImage {
    GrayImage::from_fn(buffer.width(), buffer.height(), |x, y| {
        let [r, g, b, a] = buffer.get_pixel(x, y).0;
        let [r, g, b] = match backdrop {
            Some(color) if a == 0 => color,
            _ => [r, g, b],
        };
        if threshold.classify_rgb(r, g, b).is_on() {
            Luma([ON])
        } else {
            Luma([OFF])
        }
    })
}
