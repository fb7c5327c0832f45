use crate::error::{ImageError, try_zeroed};
use crate::gpu::TextureHandle;

use super::Instance;
use super::color::unpack_rgba;

/// Fixed-size RGBA8 pixel surface; the unit of GPU upload.
///
/// Width and height are set at creation and never change, so
/// `pixels().len() == width * height * 4` holds for the whole lifetime.
/// Bytes are stored `R, G, B, A` per pixel, rows top to bottom.
///
/// Every placement of the buffer is an [`Instance`] stored here; the pixel data
/// is shared by all of them.
#[derive(Debug)]
pub struct ImageBuffer {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    instances: Vec<Instance>,
    enabled: bool,
    /// Pixels changed since the renderer last uploaded them.
    dirty: bool,
    texture: TextureHandle,
}

impl ImageBuffer {
    /// Allocates a zeroed buffer bound to `texture`.
    pub(crate) fn allocate(
        width: u16,
        height: u16,
        texture: TextureHandle,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidArgument("image dimensions must be non-zero"));
        }

        let len = width as usize * height as usize * 4;
        let pixels = try_zeroed(len)?;

        Ok(Self {
            width,
            height,
            pixels,
            instances: Vec::new(),
            enabled: true,
            dirty: true,
            texture,
        })
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the raw RGBA bytes. The slice length is fixed.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.dirty = true;
        &mut self.pixels
    }

    /// Writes a packed `0xRRGGBBAA` color at `(x, y)`.
    ///
    /// # Contract
    /// The caller must guarantee `x < width` and `y < height`. This is the
    /// per-pixel hot path and performs no bounds validation of its own:
    /// debug builds assert, release builds only get slice indexing, which
    /// stops writes past the end of the buffer but silently wraps a too-large
    /// `x` into the next row.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: u32) {
        debug_assert!(
            x < self.width as u32 && y < self.height as u32,
            "put_pixel: ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color.to_be_bytes());
        self.dirty = true;
    }

    /// Reads back the packed color at `(x, y)`, or `None` when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width as u32 || y >= self.height as u32 {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px: [u8; 4] = self.pixels[i..i + 4].try_into().ok()?;
        Some(u32::from_be_bytes(px))
    }

    /// Fills every pixel with one packed color.
    pub fn fill(&mut self, color: u32) {
        let rgba = unpack_rgba(color);
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        self.dirty = true;
    }

    /// Placements in the order they were added.
    #[inline]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    #[inline]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Whether the renderer should draw this image's instances.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggles visibility without touching instances or the render queue.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn texture_handle(&self) -> TextureHandle {
        self.texture
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn push_instance(&mut self, instance: Instance) -> Result<u32, ImageError> {
        let index = u32::try_from(self.instances.len())
            .map_err(|_| ImageError::InvalidArgument("too many instances"))?;
        self.instances
            .try_reserve(1)
            .map_err(|_| ImageError::OutOfMemory { bytes: size_of::<Instance>() })?;
        self.instances.push(instance);
        Ok(index)
    }

    #[inline]
    pub(crate) fn instance_mut(&mut self, index: usize) -> Option<&mut Instance> {
        self.instances.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(w: u16, h: u16) -> ImageBuffer {
        ImageBuffer::allocate(w, h, TextureHandle::from_raw(1)).unwrap()
    }

    #[test]
    fn allocate_is_zeroed_and_sized() {
        let img = image(7, 3);
        assert_eq!(img.pixels().len(), 7 * 3 * 4);
        assert!(img.pixels().iter().all(|&b| b == 0));
        assert!(img.is_enabled());
        assert_eq!(img.instance_count(), 0);
    }

    #[test]
    fn allocate_rejects_zero_sizes() {
        let h = TextureHandle::from_raw(1);
        assert!(ImageBuffer::allocate(0, 5, h).is_err());
        assert!(ImageBuffer::allocate(5, 0, h).is_err());
    }

    #[test]
    fn put_pixel_round_trips() {
        for (w, h) in [(1, 1), (3, 2), (7, 5), (16, 1), (1, 9)] {
            let mut img = image(w, h);
            let color = |x: u32, y: u32| 0x0100_0000u32.wrapping_mul(x + 1) ^ (y << 8) ^ 0xA5;
            for y in 0..h as u32 {
                for x in 0..w as u32 {
                    img.put_pixel(x, y, color(x, y));
                }
            }
            for y in 0..h as u32 {
                for x in 0..w as u32 {
                    assert_eq!(img.pixel(x, y), Some(color(x, y)), "{w}x{h} at ({x}, {y})");
                }
            }
            assert_eq!(img.pixel(w as u32, 0), None);
            assert_eq!(img.pixel(0, h as u32), None);
        }
    }

    #[test]
    fn put_pixel_stores_big_endian_rgba() {
        let mut img = image(4, 4);
        img.put_pixel(3, 2, 0xDEADBEEF);
        let i = (2 * 4 + 3) * 4;
        assert_eq!(&img.pixels()[i..i + 4], &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn pixel_out_of_range_is_none() {
        let img = image(2, 2);
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "put_pixel")]
    fn put_pixel_out_of_range_asserts_in_debug() {
        let mut img = image(2, 2);
        img.put_pixel(2, 0, 0xFFFFFFFF);
    }

    #[test]
    fn fill_and_dirty_tracking() {
        let mut img = image(2, 2);
        img.mark_clean();
        assert!(!img.is_dirty());
        img.fill(0x00FF00FF);
        assert!(img.is_dirty());
        assert!((0..2).all(|y| (0..2).all(|x| img.pixel(x, y) == Some(0x00FF00FF))));
    }

    #[test]
    fn pixels_mut_keeps_length() {
        let mut img = image(3, 3);
        img.mark_clean();
        img.pixels_mut()[0] = 0xFF;
        assert!(img.is_dirty());
        assert_eq!(img.pixels().len(), 36);
        assert_eq!(img.pixel(0, 0), Some(0xFF000000));
    }
}
