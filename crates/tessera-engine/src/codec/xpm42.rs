//! XPM42 indexed-color text format.
//!
//! ```text
//! !XPM42
//! 4 2 2 1 c
//! . #FF0000FF
//! # #0000FF
//! ..##
//! ##..
//! ```
//!
//! Line 2 is `width height color_count chars_per_pixel mode`. Each palette line
//! maps a `chars_per_pixel`-wide symbol to `#RRGGBB[AA]` (mode `c`) or a grey
//! level `#GG[AA]` (mode `m`). Then follow `height` rows of `width` symbols.
//! Empty lines are ignored everywhere.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{DecodeError, ImageError};
use crate::image::{ColorMode, PaletteInfo, Texture};

const MAGIC: &str = "!XPM42";
const MAX_CHARS_PER_PIXEL: u32 = 10;
const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Reads and decodes an XPM42 file.
pub fn load_xpm42(path: impl AsRef<Path>) -> Result<Texture, ImageError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).inspect_err(|e| {
        log::error!("failed to read xpm42 file {}: {e}", path.display());
    })?;
    decode_xpm42(&src)
}

/// Decodes XPM42 source text into a 4-byte-per-pixel RGBA texture.
///
/// On failure nothing partially decoded escapes: every intermediate buffer is
/// dropped before the error is returned.
pub fn decode_xpm42(src: &str) -> Result<Texture, ImageError> {
    Parser::new(src).parse().inspect_err(|e| log::error!("{e}"))
}

struct Header {
    width: u32,
    height: u32,
    color_count: u32,
    cpp: u32,
    mode: ColorMode,
}

struct Parser<'s> {
    lines: Box<dyn Iterator<Item = (usize, &'s str)> + 's>,
    /// Line number reported when input ends early.
    eof_line: usize,
}

impl<'s> Parser<'s> {
    fn new(src: &'s str) -> Self {
        let eof_line = src.lines().count() + 1;
        let lines = src
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.is_empty());
        Self { lines: Box::new(lines), eof_line }
    }

    fn next_line(&mut self, what: &str) -> Result<(usize, &'s str), DecodeError> {
        self.lines
            .next()
            .ok_or_else(|| DecodeError::xpm42(format!("unexpected end of file, expected {what}"), self.eof_line))
    }

    fn parse(mut self) -> Result<Texture, ImageError> {
        let (line, magic) = self.next_line("`!XPM42` header")?;
        if magic.trim() != MAGIC {
            return Err(DecodeError::xpm42(format!("expected `{MAGIC}`, found `{}`", magic.trim()), line).into());
        }

        let header = self.header()?;
        let palette = self.palette(&header)?;
        let pixels = self.rows(&header, &palette)?;

        if let Some((line, _)) = self.lines.next() {
            return Err(DecodeError::xpm42("unexpected data after the last pixel row", line).into());
        }

        let texture = Texture::new(header.width, header.height, 4, pixels)?;
        Ok(texture.with_palette(PaletteInfo {
            color_count: header.color_count,
            chars_per_pixel: header.cpp,
            mode: header.mode,
        }))
    }

    fn header(&mut self) -> Result<Header, DecodeError> {
        let (line, text) = self.next_line("image info line")?;
        let fields: Vec<&str> = text.split_whitespace().collect();
        let [w, h, n, cpp, mode] = fields[..] else {
            return Err(DecodeError::xpm42(
                format!("expected `width height colors chars_per_pixel mode`, found {} fields", fields.len()),
                line,
            ));
        };

        let number = |field: &str, name: &str| -> Result<u32, DecodeError> {
            match field.parse::<u32>() {
                Ok(v) if v > 0 => Ok(v),
                _ => Err(DecodeError::xpm42(format!("invalid {name} `{field}`"), line)),
            }
        };
        // Larger textures can never become an image.
        let dimension = |field: &str, name: &str| -> Result<u32, DecodeError> {
            let v = number(field, name)?;
            if v > MAX_DIMENSION {
                return Err(DecodeError::xpm42(format!("{name} {v} exceeds {MAX_DIMENSION}"), line));
            }
            Ok(v)
        };

        let width = dimension(w, "width")?;
        let height = dimension(h, "height")?;
        let color_count = number(n, "color count")?;
        let cpp = number(cpp, "chars per pixel")?;
        if cpp > MAX_CHARS_PER_PIXEL {
            return Err(DecodeError::xpm42(
                format!("chars per pixel {cpp} exceeds {MAX_CHARS_PER_PIXEL}"),
                line,
            ));
        }

        let mut mode_chars = mode.chars();
        let mode = match (mode_chars.next().and_then(ColorMode::from_char), mode_chars.next()) {
            (Some(m), None) => m,
            _ => return Err(DecodeError::xpm42(format!("unknown color mode `{mode}`"), line)),
        };

        Ok(Header { width, height, color_count, cpp, mode })
    }

    fn palette(&mut self, header: &Header) -> Result<HashMap<&'s str, [u8; 4]>, DecodeError> {
        let mut palette = HashMap::new();

        for _ in 0..header.color_count {
            let (line, text) = self.next_line("palette entry")?;

            let split = text
                .char_indices()
                .nth(header.cpp as usize)
                .map(|(i, _)| i)
                .ok_or_else(|| DecodeError::xpm42("palette entry is missing its color", line))?;
            let (symbol, value) = text.split_at(split);

            let rgba = parse_color(value.trim(), header.mode)
                .ok_or_else(|| DecodeError::xpm42(format!("invalid color `{}`", value.trim()), line))?;

            if palette.insert(symbol, rgba).is_some() {
                return Err(DecodeError::xpm42(format!("duplicate palette symbol `{symbol}`"), line));
            }
        }

        Ok(palette)
    }

    fn rows(
        &mut self,
        header: &Header,
        palette: &HashMap<&'s str, [u8; 4]>,
    ) -> Result<Vec<u8>, ImageError> {
        let width = header.width as usize;
        let cpp = header.cpp as usize;
        let row_bytes = width * 4;

        // Grows one validated row at a time; a header alone never commits memory.
        let mut pixels = Vec::new();
        for _ in 0..header.height {
            let (line, text) = self.next_line("pixel row")?;

            let found = text.chars().count();
            if found != width * cpp {
                let msg = format!("row has {found} characters, expected {}", width * cpp);
                return Err(DecodeError::xpm42(msg, line).into());
            }

            pixels
                .try_reserve(row_bytes)
                .map_err(|_| ImageError::OutOfMemory { bytes: pixels.len() + row_bytes })?;

            let mut starts = text.char_indices().map(|(i, _)| i).step_by(cpp);
            let mut start = starts.next().unwrap_or(0);
            for _ in 0..width {
                let end = starts.next().unwrap_or(text.len());
                let symbol = &text[start..end];
                let rgba = palette.get(symbol).ok_or_else(|| {
                    DecodeError::xpm42(format!("symbol `{symbol}` is not in the palette"), line)
                })?;
                pixels.extend_from_slice(rgba);
                start = end;
            }
        }

        Ok(pixels)
    }
}

fn parse_color(value: &str, mode: ColorMode) -> Option<[u8; 4]> {
    let hex = value.strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match (mode, hex.len()) {
        (ColorMode::Color, 6) => Some([byte(0)?, byte(2)?, byte(4)?, 0xFF]),
        (ColorMode::Color, 8) => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        (ColorMode::Monochrome, 2) => {
            let g = byte(0)?;
            Some([g, g, g, 0xFF])
        }
        (ColorMode::Monochrome, 4) => {
            let g = byte(0)?;
            Some([g, g, g, byte(2)?])
        }
        _ => None,
    }
}
