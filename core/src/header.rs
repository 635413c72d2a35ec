use alloc::vec::Vec;
use embedded_io::{Error as _, Write, WriteFmtError};
use log::debug;

use crate::packer::{FRAME_SIZE, PackedFrame};

/// Minimum timer ticks between two frames in the generated update function.
pub const FRAME_INTERVAL: u32 = 100;

/// Hex values per line inside a frame block.
const VALUES_PER_LINE: usize = 16;

#[derive(Debug)]
pub enum HeaderError {
    IoError(embedded_io::ErrorKind),
    Format,
    NoFrames,
}

impl<E: embedded_io::Error> From<WriteFmtError<E>> for HeaderError {
    fn from(err: WriteFmtError<E>) -> Self {
        match err {
            WriteFmtError::FmtError => HeaderError::Format,
            WriteFmtError::Other(e) => HeaderError::IoError(e.kind()),
        }
    }
}

impl core::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HeaderError::IoError(kind) => write!(f, "I/O error: {kind:?}"),
            HeaderError::Format => f.write_str("formatting error"),
            HeaderError::NoFrames => f.write_str("animation has no frames"),
        }
    }
}

impl core::error::Error for HeaderError {}

type Result<T> = core::result::Result<T, HeaderError>;

/// A packed animation ready to be rendered as a QMK C header.
pub struct AnimationHeader {
    frames: Vec<PackedFrame>,
}

impl AnimationHeader {
    pub fn new(frames: Vec<PackedFrame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(HeaderError::NoFrames);
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[PackedFrame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_size(&self) -> usize {
        FRAME_SIZE
    }

    pub fn data_size(&self) -> usize {
        self.frame_count() * self.frame_size()
    }

    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        debug!(
            "Writing header: {} frames, {} bytes",
            self.frame_count(),
            self.data_size()
        );
        self.write_prelude(out)?;
        self.write_frames(out)?;
        write_playback(out)?;
        out.flush().map_err(|e| HeaderError::IoError(e.kind()))?;
        Ok(())
    }

    fn write_prelude<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "#pragma once\n\n")?;
        write!(
            out,
            "#include <stdint.h>\n#include \"oled_driver.h\"\n#include \"timer.h\"\n\n"
        )?;
        write!(out, "#define ANIM_FRAMES {}\n", self.frame_count())?;
        write!(out, "#define ANIM_FRAME_SIZE {}\n", self.frame_size())?;
        write!(out, "#define ANIM_DATA_SIZE {}\n\n", self.data_size())?;
        write!(out, "void oled_update_animation(void);\n")?;
        write!(out, "void oled_init_animation(void);\n\n")?;
        Ok(())
    }

    fn write_frames<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(
            out,
            "const char oled_animation[ANIM_FRAMES][ANIM_FRAME_SIZE] = {{\n"
        )?;
        for frame in &self.frames {
            write!(out, "    {{\n")?;
            for line in frame.chunks(VALUES_PER_LINE) {
                write!(out, "        ")?;
                for (i, byte) in line.iter().enumerate() {
                    if i > 0 {
                        write!(out, ", ")?;
                    }
                    write!(out, "0x{byte:02X}")?;
                }
                write!(out, ",\n")?;
            }
            write!(out, "    }},\n")?;
        }
        write!(out, "}};\n\n")?;
        Ok(())
    }
}

fn write_playback<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "uint32_t last_frame_time = 0;\n")?;
    write!(out, "uint8_t current_frame = 0;\n\n")?;

    write!(out, "void oled_update_animation(void) {{\n")?;
    write!(out, "    uint32_t now = timer_read32();\n")?;
    write!(out, "    if (now - last_frame_time < {FRAME_INTERVAL}) {{\n")?;
    write!(out, "        return;\n")?;
    write!(out, "    }}\n")?;
    write!(out, "    last_frame_time = now;\n\n")?;
    write!(out, "    oled_clear();\n")?;
    write!(
        out,
        "    oled_write_raw(oled_animation[current_frame], ANIM_FRAME_SIZE);\n\n"
    )?;
    write!(out, "    current_frame = (current_frame + 1) % ANIM_FRAMES;\n")?;
    write!(out, "}}\n\n")?;

    write!(out, "void oled_init_animation(void) {{\n")?;
    write!(out, "    oled_clear();\n")?;
    write!(out, "    last_frame_time = timer_read32();\n")?;
    write!(out, "    current_frame = 0;\n")?;
    write!(out, "}}\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::String, vec};

    fn render(frames: Vec<PackedFrame>) -> String {
        let header = AnimationHeader::new(frames).unwrap();
        let mut out = Vec::new();
        header.write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn frame_block(text: &str, index: usize) -> Vec<&str> {
        let body = text
            .split("= {\n")
            .nth(1)
            .unwrap()
            .split("};\n")
            .next()
            .unwrap();
        body.split("    {\n")
            .skip(1)
            .nth(index)
            .unwrap()
            .lines()
            .take_while(|l| *l != "    },")
            .collect()
    }

    #[test]
    fn rejects_empty_animation() {
        assert!(matches!(
            AnimationHeader::new(Vec::new()),
            Err(HeaderError::NoFrames)
        ));
    }

    #[test]
    fn counts_and_defines() {
        let text = render(vec![[0u8; FRAME_SIZE]; 3]);
        assert!(text.starts_with("#pragma once\n\n#include <stdint.h>\n"));
        assert!(text.contains("#include \"oled_driver.h\"\n#include \"timer.h\"\n"));
        assert!(text.contains("#define ANIM_FRAMES 3\n"));
        assert!(text.contains("#define ANIM_FRAME_SIZE 512\n"));
        assert!(text.contains("#define ANIM_DATA_SIZE 1536\n"));
        assert!(text.contains("void oled_update_animation(void);\nvoid oled_init_animation(void);\n"));
        assert!(text.contains("uint32_t last_frame_time = 0;\nuint8_t current_frame = 0;\n"));
        assert!(text.contains("    if (now - last_frame_time < 100) {\n        return;\n    }\n"));
        assert!(text.contains("    current_frame = (current_frame + 1) % ANIM_FRAMES;\n"));
        assert!(text.ends_with(
            "void oled_init_animation(void) {\n    oled_clear();\n    last_frame_time = timer_read32();\n    current_frame = 0;\n}\n"
        ));
    }

    #[test]
    fn frame_bytes_are_uppercase_hex_sixteen_per_line() {
        let mut frame = [0u8; FRAME_SIZE];
        for (i, b) in frame.iter_mut().enumerate() {
            *b = i as u8;
        }
        let text = render(vec![frame, [0xAB; FRAME_SIZE]]);

        let first = frame_block(&text, 0);
        assert_eq!(first.len(), FRAME_SIZE / VALUES_PER_LINE);
        assert_eq!(
            first[0],
            "        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,"
        );
        assert!(first[15].starts_with("        0xF0, 0xF1,"));

        let second = frame_block(&text, 1);
        assert_eq!(second.len(), 32);
        assert!(second.iter().all(|l| l.matches("0xAB").count() == 16));
    }

    #[test]
    fn exact_layout_for_single_frame() {
        let text = render(vec![[0xFF; FRAME_SIZE]]);
        let line = "        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,\n";
        let mut expected = String::from(
            "const char oled_animation[ANIM_FRAMES][ANIM_FRAME_SIZE] = {\n    {\n",
        );
        for _ in 0..32 {
            expected.push_str(line);
        }
        expected.push_str("    },\n};\n\nuint32_t last_frame_time = 0;\n");
        assert!(text.contains(&expected));
    }

    #[test]
    fn write_errors_are_reported() {
        let header = AnimationHeader::new(vec![[0u8; FRAME_SIZE]]).unwrap();
        let mut storage = [0u8; 64];
        let mut out: &mut [u8] = &mut storage;
        assert!(matches!(
            header.write(&mut out),
            Err(HeaderError::IoError(_))
        ));
    }

    struct FailingFlush(Vec<u8>);

    impl embedded_io::ErrorType for FailingFlush {
        type Error = embedded_io::ErrorKind;
    }

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Self::Error> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> core::result::Result<(), Self::Error> {
            Err(embedded_io::ErrorKind::BrokenPipe)
        }
    }

    #[test]
    fn flush_errors_are_reported() {
        let header = AnimationHeader::new(vec![[0u8; FRAME_SIZE]]).unwrap();
        let mut out = FailingFlush(Vec::new());
        assert!(matches!(
            header.write(&mut out),
            Err(HeaderError::IoError(embedded_io::ErrorKind::BrokenPipe))
        ));
        assert!(out.0.ends_with(b"current_frame = 0;\n}\n"));
    }
}
