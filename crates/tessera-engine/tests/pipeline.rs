use std::io::Cursor;

use tessera_engine::codec::{decode_png, decode_xpm42, load_xpm42};
use tessera_engine::image::{blit, pack_rgba};
use tessera_engine::{Compositor, ImageError, Texture};

fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba.to_vec()).unwrap();
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

// ── xpm42 ─────────────────────────────────────────────────────────────────

#[test]
fn xpm42_two_by_two_to_image() {
    let src = "!XPM42\n2 2 2 1 c\nr #FF0000FF\nb #0000FFFF\nrb\nbr\n";
    let tex = decode_xpm42(src).unwrap();
    assert_eq!((tex.width(), tex.height(), tex.bytes_per_pixel()), (2, 2, 4));
    assert_eq!(tex.pixels().len(), 16);
    assert_eq!(
        tex.pixels(),
        &[
            0xFF, 0, 0, 0xFF, 0, 0, 0xFF, 0xFF, //
            0, 0, 0xFF, 0xFF, 0xFF, 0, 0, 0xFF,
        ]
    );

    let mut c = Compositor::new();
    let id = c.texture_to_image(&tex).unwrap();
    let img = c.image(id).unwrap();
    assert_eq!(img.pixel(0, 0), Some(0xFF0000FF));
    assert_eq!(img.pixel(1, 0), Some(0x0000FFFF));
}

#[test]
fn xpm42_from_file() {
    let path = std::env::temp_dir().join(format!("tessera-{}.xpm42", std::process::id()));
    std::fs::write(&path, "!XPM42\n1 1 1 1 c\nx #10203040\nx\n").unwrap();

    let tex = load_xpm42(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(tex.pixels(), &[0x10, 0x20, 0x30, 0x40]);
}

#[test]
fn xpm42_missing_file_is_io_error() {
    let err = load_xpm42("/definitely/not/here.xpm42").unwrap_err();
    assert!(matches!(err, ImageError::Io(_)));
}

// ── blit ──────────────────────────────────────────────────────────────────

#[test]
fn solid_red_blit_fills_image() {
    let mut c = Compositor::new();
    let id = c.new_image(4, 4).unwrap();
    let red = Texture::solid(4, 4, pack_rgba(0xFF, 0, 0, 0xFF)).unwrap();

    blit(c.image_mut(id).unwrap(), &red, 0, 0).unwrap();
    let img = c.image(id).unwrap();
    assert!(img.pixels().chunks_exact(4).all(|px| px == [0xFF, 0, 0, 0xFF]));
}

#[test]
fn oversized_blit_leaves_image_untouched() {
    let mut c = Compositor::new();
    let id = c.new_image(4, 4).unwrap();
    let big = Texture::solid(5, 1, 0xFFFFFFFF).unwrap();

    let err = blit(c.image_mut(id).unwrap(), &big, 0, 0).unwrap_err();
    assert!(matches!(err, ImageError::BoundsViolation { .. }));
    assert!(c.image(id).unwrap().pixels().iter().all(|&b| b == 0));
}

// ── png ───────────────────────────────────────────────────────────────────

#[test]
fn png_to_image() {
    let rgba: Vec<u8> = (0..3 * 2).flat_map(|i| [i * 40, 255 - i * 40, 7, 255]).collect();
    let tex = decode_png(&encode_png(3, 2, &rgba)).unwrap();
    assert_eq!((tex.width(), tex.height(), tex.bytes_per_pixel()), (3, 2, 4));

    let mut c = Compositor::new();
    let id = c.texture_to_image(&tex).unwrap();
    let img = c.image(id).unwrap();
    assert_eq!(img.pixels(), rgba.as_slice());
}

#[test]
fn png_file_to_image() {
    let path = std::env::temp_dir().join(format!("tessera-{}.png", std::process::id()));
    std::fs::write(&path, encode_png(1, 1, &[1, 2, 3, 4])).unwrap();

    let mut c = Compositor::new();
    let id = c.load_png_image(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(c.image(id).unwrap().pixel(0, 0), Some(0x01020304));
}

#[test]
fn corrupt_png_creates_no_image() {
    let mut bytes = encode_png(2, 2, &[0; 16]);
    bytes.truncate(bytes.len() / 2);

    let mut c = Compositor::new();
    assert!(matches!(decode_png(&bytes), Err(ImageError::Decode(_))));

    let path = std::env::temp_dir().join(format!("tessera-corrupt-{}.png", std::process::id()));
    std::fs::write(&path, &bytes).unwrap();
    let result = c.load_png_image(&path);
    let _ = std::fs::remove_file(&path);
    assert!(result.is_err());
    assert_eq!(c.image_count(), 0);
}
