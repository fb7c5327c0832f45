use crate::error::ImageError;

use super::color::pack_texel;
use super::{ImageBuffer, Texture};

/// Copies every texel of `texture` into `image` with its top-left corner at
/// `(x, y)`.
///
/// Unlike [`ImageBuffer::put_pixel`], this entry point validates placement: the
/// texture must fit entirely inside the image. Negative offsets are rejected as
/// well; there is no clipping. Each texel is repacked into `0xRRGGBBAA` order
/// (3-channel sources become opaque) and written through `put_pixel`.
pub fn blit(image: &mut ImageBuffer, texture: &Texture, x: i32, y: i32) -> Result<(), ImageError> {
    let fits = x >= 0
        && y >= 0
        && x as i64 + texture.width() as i64 <= image.width() as i64
        && y as i64 + texture.height() as i64 <= image.height() as i64;

    if !fits {
        let err = ImageError::BoundsViolation {
            src_width: texture.width(),
            src_height: texture.height(),
            x,
            y,
            dst_width: image.width(),
            dst_height: image.height(),
        };
        log::error!("{err}");
        return Err(err);
    }

    let (ox, oy) = (x as u32, y as u32);
    let bpp = texture.bytes_per_pixel() as usize;

    for (row, texels) in texture.rows().enumerate() {
        for (col, texel) in texels.chunks_exact(bpp).enumerate() {
            image.put_pixel(ox + col as u32, oy + row as u32, pack_texel(texel));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::TextureHandle;

    fn image(w: u16, h: u16) -> ImageBuffer {
        ImageBuffer::allocate(w, h, TextureHandle::from_raw(1)).unwrap()
    }

    #[test]
    fn solid_red_covers_same_size_image() {
        let mut img = image(4, 4);
        let tex = Texture::solid(4, 4, 0xFF0000FF).unwrap();
        blit(&mut img, &tex, 0, 0).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(img.pixel(x, y), Some(0xFF0000FF));
            }
        }
    }

    #[test]
    fn offset_blit_leaves_rest_untouched() {
        let mut img = image(4, 4);
        let tex = Texture::solid(2, 2, 0x11223344).unwrap();
        blit(&mut img, &tex, 2, 1).unwrap();
        assert_eq!(img.pixel(2, 1), Some(0x11223344));
        assert_eq!(img.pixel(3, 2), Some(0x11223344));
        assert_eq!(img.pixel(1, 1), Some(0));
        assert_eq!(img.pixel(2, 3), Some(0));
    }

    #[test]
    fn rejects_every_overhanging_placement() {
        let tex = Texture::solid(3, 2, 0xFFFFFFFF).unwrap();
        for (iw, ih) in [(3u16, 2u16), (4, 4), (5, 3)] {
            let mut img = image(iw, ih);
            for x in -1..=6i32 {
                for y in -1..=5i32 {
                    let overhangs = x < 0
                        || y < 0
                        || x + 3 > iw as i32
                        || y + 2 > ih as i32;
                    let res = blit(&mut img, &tex, x, y);
                    assert_eq!(res.is_err(), overhangs, "image {iw}x{ih} at ({x}, {y})");
                    if overhangs {
                        assert!(matches!(res, Err(ImageError::BoundsViolation { .. })));
                    }
                }
            }
        }
    }

    #[test]
    fn rejects_texture_larger_than_image() {
        let mut img = image(2, 2);
        let tex = Texture::solid(3, 1, 0).unwrap();
        assert!(blit(&mut img, &tex, 0, 0).is_err());
    }

    #[test]
    fn rgb_texture_is_written_opaque() {
        let mut img = image(2, 1);
        let tex = Texture::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        blit(&mut img, &tex, 0, 0).unwrap();
        assert_eq!(img.pixel(0, 0), Some(0x010203FF));
        assert_eq!(img.pixel(1, 0), Some(0x040506FF));
    }
}
