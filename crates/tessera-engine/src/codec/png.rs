//! PNG loading.
//!
//! Bitstream decompression and filter reconstruction are delegated to the
//! `image` crate; this module only normalizes the result to RGBA8.

use std::path::Path;

use crate::error::{DecodeError, ImageError};
use crate::image::Texture;

/// Reads and decodes a PNG file.
pub fn load_png(path: impl AsRef<Path>) -> Result<Texture, ImageError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).inspect_err(|e| {
        log::error!("failed to read png file {}: {e}", path.display());
    })?;
    decode_png(&bytes)
}

/// Decodes a PNG byte stream into a 4-byte-per-pixel RGBA texture with a
/// top-left origin. Every PNG color type and bit depth is converted to RGBA8.
pub fn decode_png(bytes: &[u8]) -> Result<Texture, ImageError> {
    let decoded = ::image::load_from_memory_with_format(bytes, ::image::ImageFormat::Png)
        .map_err(|e| DecodeError::png(e.to_string()))
        .inspect_err(|e| log::error!("{e}"))?;

    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("decoded png {width}x{height}");
    Texture::new(width, height, 4, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(img: ::image::DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ::image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn rgba_png_round_trips_pixels() {
        let mut src = ::image::RgbaImage::new(2, 1);
        src.put_pixel(0, 0, ::image::Rgba([1, 2, 3, 4]));
        src.put_pixel(1, 0, ::image::Rgba([250, 251, 252, 253]));
        let t = decode_png(&encode(src.into())).unwrap();
        assert_eq!((t.width(), t.height(), t.bytes_per_pixel()), (2, 1, 4));
        assert_eq!(t.pixels(), &[1, 2, 3, 4, 250, 251, 252, 253]);
    }

    #[test]
    fn rgb_png_is_expanded_to_opaque_rgba() {
        let src = ::image::RgbImage::from_pixel(1, 2, ::image::Rgb([10, 20, 30]));
        let t = decode_png(&encode(src.into())).unwrap();
        assert_eq!(t.bytes_per_pixel(), 4);
        assert_eq!(t.texel(0, 1), 0x0A141EFF);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_png(b"definitely not a png").unwrap_err();
        assert!(matches!(err, ImageError::Decode(DecodeError { line: None, .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_png("/nonexistent/tessera/missing.png").unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }
}
