use std::path::PathBuf;

use oled_anim_core::header::HeaderError;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to read GIF palette: {0}")]
    Gif(#[from] gif::DecodingError),
    #[error("No frames found in the GIF.")]
    NoFrames,
    #[error("failed to write header: {0}")]
    Header(HeaderError),
    #[error("failed to write preview '{}': {source}", .path.display())]
    Preview {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl From<HeaderError> for ConvertError {
    fn from(err: HeaderError) -> Self {
        match err {
            HeaderError::NoFrames => ConvertError::NoFrames,
            other => ConvertError::Header(other),
        }
    }
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConvertError::Io { path, source }
    }
}

pub type Result<T> = core::result::Result<T, ConvertError>;
