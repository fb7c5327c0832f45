//! Error types for the image core.

use std::fmt;

/// Source format of a failed decode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ImageFormat {
    Xpm42,
    Png,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Xpm42 => f.write_str("xpm42"),
            ImageFormat::Png => f.write_str("png"),
        }
    }
}

/// A malformed input file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub format: ImageFormat,
    pub message: String,
    /// 1-based source line for text formats; `None` for binary formats.
    pub line: Option<usize>,
}

impl DecodeError {
    pub(crate) fn xpm42(msg: impl Into<String>, line: usize) -> Self {
        Self { format: ImageFormat::Xpm42, message: msg.into(), line: Some(line) }
    }

    pub(crate) fn png(msg: impl Into<String>) -> Self {
        Self { format: ImageFormat::Png, message: msg.into(), line: None }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} decode error at line {}: {}", self.format, line, self.message),
            None => write!(f, "{} decode error: {}", self.format, self.message),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors reported by image allocation, decoding and blitting.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Zero-sized or otherwise unusable input.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A pixel or bookkeeping allocation could not be satisfied.
    #[error("out of memory: failed to allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A blit would write outside the target image.
    #[error(
        "blit of {src_width}x{src_height} at ({x}, {y}) does not fit a {dst_width}x{dst_height} image"
    )]
    BoundsViolation {
        src_width: u32,
        src_height: u32,
        x: i32,
        y: i32,
        dst_width: u16,
        dst_height: u16,
    },

    /// The handle refers to an image that was already deleted.
    #[error("image handle is no longer valid")]
    StaleHandle,

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reserves exactly `len` zeroed bytes, mapping allocation failure to
/// [`ImageError::OutOfMemory`] instead of aborting.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ImageError::OutOfMemory { bytes: len })?;
    buf.resize(len, 0);
    Ok(buf)
}
