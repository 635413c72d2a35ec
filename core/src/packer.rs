//! Page-addressed packing for SSD1306-style controllers.
//!
//! The panel memory is split into pages of 8 rows. Each byte covers one
//! column of a page with the top row in bit 0. Pages are stored one after the
//! other, so a frame is `PAGES * WIDTH` bytes and can be handed to
//! `oled_write_raw` as is.

use embedded_graphics::pixelcolor::BinaryColor;

use crate::framebuffer::{Frame, HEIGHT, WIDTH};

pub const PAGE_HEIGHT: usize = 8;
pub const PAGES: usize = HEIGHT / PAGE_HEIGHT;
pub const FRAME_SIZE: usize = PAGES * WIDTH;

pub type PackedFrame = [u8; FRAME_SIZE];

pub fn pack(frame: &Frame) -> PackedFrame {
    let mut packed = [0u8; FRAME_SIZE];
    for page in 0..PAGES {
        for x in 0..WIDTH {
            let mut byte = 0u8;
            for bit in 0..PAGE_HEIGHT {
                if frame.is_on(x, page * PAGE_HEIGHT + bit) {
                    byte |= 1 << bit;
                }
            }
            packed[page * WIDTH + x] = byte;
        }
    }
    packed
}

pub fn unpack(packed: &PackedFrame) -> Frame {
    let mut frame = Frame::default();
    for (index, &byte) in packed.iter().enumerate() {
        let page = index / WIDTH;
        let x = index % WIDTH;
        for bit in 0..PAGE_HEIGHT {
            let color = if (byte >> bit) & 1 == 1 {
                BinaryColor::On
            } else {
                BinaryColor::Off
            };
            frame.set_pixel(x as i32, (page * PAGE_HEIGHT + bit) as i32, color);
        }
    }
    frame
}
