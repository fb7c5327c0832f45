//! Packed RGBA8 helpers.
//!
//! A packed color is `(R << 24) | (G << 16) | (B << 8) | A`. In memory the
//! image buffer stores the same value big-endian, i.e. bytes `R, G, B, A`.

/// Packs four channel bytes into a color value.
#[inline]
pub const fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_be_bytes([r, g, b, a])
}

/// Splits a packed color into `[r, g, b, a]`.
#[inline]
pub const fn unpack_rgba(color: u32) -> [u8; 4] {
    color.to_be_bytes()
}

/// Packs one source texel of 3 (RGB) or 4 (RGBA) channels.
///
/// Three-channel texels are treated as opaque.
#[inline]
pub(crate) fn pack_texel(texel: &[u8]) -> u32 {
    match *texel {
        [r, g, b] => pack_rgba(r, g, b, 0xFF),
        [r, g, b, a, ..] => pack_rgba(r, g, b, a),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_is_most_significant() {
        assert_eq!(pack_rgba(0xFF, 0x00, 0x00, 0xFF), 0xFF0000FF);
        assert_eq!(pack_rgba(0x12, 0x34, 0x56, 0x78), 0x12345678);
    }

    #[test]
    fn unpack_matches_memory_order() {
        assert_eq!(unpack_rgba(0x12345678), [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn rgb_texel_is_opaque() {
        assert_eq!(pack_texel(&[1, 2, 3]), 0x010203FF);
        assert_eq!(pack_texel(&[1, 2, 3, 4]), 0x01020304);
    }
}
