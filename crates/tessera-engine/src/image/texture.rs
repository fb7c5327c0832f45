use crate::error::ImageError;

use super::color::pack_texel;

/// Encoding mode declared by an indexed (XPM42) file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorMode {
    /// `c`: palette entries are full RGB(A) colors.
    Color,
    /// `m`: palette entries are grey levels.
    Monochrome,
}

impl ColorMode {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'c' => Some(ColorMode::Color),
            'm' => Some(ColorMode::Monochrome),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            ColorMode::Color => 'c',
            ColorMode::Monochrome => 'm',
        }
    }
}

/// Palette metadata recovered from an indexed file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PaletteInfo {
    pub color_count: u32,
    /// Width, in characters, of one pixel symbol.
    pub chars_per_pixel: u32,
    pub mode: ColorMode,
}

/// Decoded bitmap, independent of any window or GPU state.
///
/// Invariant: `pixels.len() == width * height * bytes_per_pixel`, with
/// `bytes_per_pixel` either 3 (RGB) or 4 (RGBA). Rows are top-to-bottom.
///
/// A texture is never drawn directly; blit it into an
/// [`ImageBuffer`](super::ImageBuffer) first.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    bytes_per_pixel: u8,
    pixels: Vec<u8>,
    palette: Option<PaletteInfo>,
}

impl Texture {
    /// Wraps raw row-major pixel data.
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_pixel: u8,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidArgument("texture dimensions must be non-zero"));
        }
        if bytes_per_pixel != 3 && bytes_per_pixel != 4 {
            return Err(ImageError::InvalidArgument("bytes per pixel must be 3 or 4"));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(bytes_per_pixel as usize))
            .ok_or(ImageError::InvalidArgument("texture dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(ImageError::InvalidArgument(
                "pixel data length does not match texture dimensions",
            ));
        }

        Ok(Self { width, height, bytes_per_pixel, pixels, palette: None })
    }

    /// Creates an RGBA texture filled with one packed color.
    pub fn solid(width: u32, height: u32, color: u32) -> Result<Self, ImageError> {
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(ImageError::InvalidArgument("texture dimensions overflow"))?;
        let pixels = color.to_be_bytes().repeat(count);
        Self::new(width, height, 4, pixels)
    }

    pub(crate) fn with_palette(mut self, palette: PaletteInfo) -> Self {
        self.palette = Some(palette);
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> u8 {
        self.bytes_per_pixel
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Palette metadata; `None` for non-indexed sources.
    #[inline]
    pub fn palette(&self) -> Option<&PaletteInfo> {
        self.palette.as_ref()
    }

    /// Returns the packed RGBA value of the texel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate lies outside the texture.
    pub fn texel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "texel ({x}, {y}) out of range");
        let bpp = self.bytes_per_pixel as usize;
        let i = (y as usize * self.width as usize + x as usize) * bpp;
        pack_texel(&self.pixels[i..i + bpp])
    }

    /// Iterates rows of raw texel bytes, top to bottom.
    pub(crate) fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels
            .chunks_exact(self.width as usize * self.bytes_per_pixel as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(Texture::new(0, 2, 4, vec![]).is_err());
        assert!(Texture::new(2, 0, 4, vec![]).is_err());
    }

    #[test]
    fn new_rejects_length_mismatch() {
        assert!(matches!(
            Texture::new(2, 2, 4, vec![0; 15]),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn new_rejects_unsupported_channel_count() {
        assert!(Texture::new(1, 1, 2, vec![0; 2]).is_err());
    }

    #[test]
    fn solid_fills_every_texel() {
        let t = Texture::solid(3, 2, 0x11223344).unwrap();
        assert_eq!(t.pixels().len(), 24);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(t.texel(x, y), 0x11223344);
            }
        }
    }

    #[test]
    fn rgb_texel_reads_opaque() {
        let t = Texture::new(1, 1, 3, vec![9, 8, 7]).unwrap();
        assert_eq!(t.texel(0, 0), 0x090807FF);
    }

    #[test]
    fn color_mode_chars() {
        assert_eq!(ColorMode::from_char('c'), Some(ColorMode::Color));
        assert_eq!(ColorMode::from_char('m'), Some(ColorMode::Monochrome));
        assert_eq!(ColorMode::from_char('x'), None);
        assert_eq!(ColorMode::Monochrome.as_char(), 'm');
    }
}
