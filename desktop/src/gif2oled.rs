use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use argh::FromArgs;
use log::{info, warn};
use oled_anim_core::{
    header::AnimationHeader,
    packer::{PackedFrame, pack},
    threshold::{DEFAULT_THRESHOLD, Threshold},
};

use crate::{
    error::{ConvertError, Result},
    resize::Resample,
    std_fs::StdFileWriter,
};

mod error;
mod loader;
mod preview;
mod resize;
mod std_fs;

#[derive(FromArgs)]
/// Convert an animated GIF into a QMK-compatible OLED header file.
struct Args {
    /// path to the input GIF file
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// threshold (0-255) to determine white vs black pixels
    #[argh(option, short = 't', default = "DEFAULT_THRESHOLD")]
    threshold: i32,

    /// invert colors in the generated image
    #[argh(switch)]
    invert: bool,

    /// filter used to scale frames that are not 128x32
    /// (lanczos, nearest, triangle, catmull-rom, gaussian)
    #[argh(option, default = "Resample::default()")]
    resample: Resample,

    /// write a PNG preview of every packed frame into this directory
    #[argh(option)]
    preview: Option<PathBuf>,
}

struct Options<'a> {
    input: &'a Path,
    threshold: Threshold,
    resample: Resample,
    preview: Option<&'a Path>,
}

impl Args {
    fn options(&self) -> Options<'_> {
        Options {
            input: &self.input,
            threshold: Threshold::new(self.threshold, self.invert),
            resample: self.resample,
            preview: self.preview.as_deref(),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    match convert(&args.options()) {
        Ok(output) => {
            println!("Header file '{}' generated successfully!", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the whole conversion and returns the path of the written header.
fn convert(options: &Options) -> Result<PathBuf> {
    let input = fs::canonicalize(options.input).map_err(ConvertError::io(options.input))?;
    let output = input.with_extension("h");

    if options.threshold.is_degenerate() {
        warn!(
            "Threshold {} is outside 0-254, every frame will be uniform",
            options.threshold.level
        );
    }

    let frames = loader::load_frames(&input, options.threshold)?;
    let packed: Vec<PackedFrame> = frames
        .iter()
        .map(|image| pack(&resize::to_frame(image, options.resample)))
        .collect();
    let header = AnimationHeader::new(packed)?;
    info!(
        "Packed {} frames ({} bytes each, {} bytes total)",
        header.frame_count(),
        header.frame_size(),
        header.data_size()
    );

    if let Some(dir) = options.preview {
        preview::write_previews(dir, header.frames())?;
    }

    let mut file = StdFileWriter::create(&output).map_err(ConvertError::io(&output))?;
    header.write(&mut file)?;
    Ok(output)
}
