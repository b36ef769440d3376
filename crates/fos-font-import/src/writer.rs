//! Font resource persistence
//!
//! Compact little-endian binary layout:
//!
//! ```text
//! magic "FOSF" | version u16
//! em_resolution u32 | line_height f32 | ascent f32
//! atlas width u32 | atlas height u32 | format u8 | pixels
//! glyph count u32 | per glyph: char u32, advance f32, bearing, size,
//!                   uv_min, uv_max (2 x f32 each)
//! kerning flag u8 | pair count u32 | per pair: left u32, right u32, f32
//! ```

use std::io::{Read, Write};

use crate::assembler::{FontResource, GlyphRecord, KerningMap};
use crate::atlas::AtlasImage;
use crate::geometry::Vec2;
use crate::{ImportError, Result};

/// Resource file magic
pub const MAGIC: &[u8; 4] = b"FOSF";
/// Current format version
pub const VERSION: u16 = 1;
/// Single channel 8-bit alpha
pub const FORMAT_A8: u8 = 1;

/// Persists an assembled font
pub trait ResourceSerializer {
    fn write_font(&mut self, font: FontResource) -> Result<()>;
}

/// Writes the binary resource format to any byte sink
pub struct BinaryFontWriter<W: Write> {
    inner: W,
}

impl<W: Write> BinaryFontWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Get the underlying sink back
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ResourceSerializer for BinaryFontWriter<W> {
    fn write_font(&mut self, font: FontResource) -> Result<()> {
        let buf = encode_font(&font);
        self.inner.write_all(&buf)?;
        self.inner.flush()?;
        tracing::debug!("Wrote {} byte font resource", buf.len());
        Ok(())
    }
}

/// Encode a resource into a fresh buffer
pub fn encode_font(font: &FontResource) -> Vec<u8> {
    let mut buf = Vec::with_capacity(32 + font.atlas.pixels.len() + font.glyphs.len() * 40);

    buf.extend_from_slice(MAGIC);
    write_u16(&mut buf, VERSION);
    write_u32(&mut buf, font.em_resolution);
    write_f32(&mut buf, font.line_height);
    write_f32(&mut buf, font.ascent);

    write_u32(&mut buf, font.atlas.width);
    write_u32(&mut buf, font.atlas.height);
    buf.push(FORMAT_A8);
    buf.extend_from_slice(&font.atlas.pixels);

    write_u32(&mut buf, font.glyphs.len() as u32);
    for glyph in &font.glyphs {
        write_u32(&mut buf, glyph.character as u32);
        write_f32(&mut buf, glyph.advance);
        for v in [glyph.bearing, glyph.size, glyph.uv_min, glyph.uv_max] {
            write_vec2(&mut buf, v);
        }
    }

    match &font.kerning {
        Some(kerning) => {
            buf.push(1);
            write_u32(&mut buf, kerning.len() as u32);
            for (&(left, right), &adjustment) in kerning {
                write_u32(&mut buf, left as u32);
                write_u32(&mut buf, right as u32);
                write_f32(&mut buf, adjustment);
            }
        }
        None => buf.push(0),
    }

    buf
}

/// Load a resource written by [`BinaryFontWriter`]
pub fn read_font<R: Read>(reader: &mut R) -> Result<FontResource> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode_font(&data)
}

/// Decode a resource from bytes
pub fn decode_font(data: &[u8]) -> Result<FontResource> {
    let mut cursor = Cursor { data, pos: 0 };

    if cursor.take(4)? != MAGIC {
        return Err(ImportError::Format("bad magic".into()));
    }
    let version = cursor.u16()?;
    if version != VERSION {
        return Err(ImportError::Format(format!("unsupported version {version}")));
    }

    let em_resolution = cursor.u32()?;
    let line_height = cursor.f32()?;
    let ascent = cursor.f32()?;

    let width = cursor.u32()?;
    let height = cursor.u32()?;
    let format = cursor.u8()?;
    if format != FORMAT_A8 {
        return Err(ImportError::Format(format!("unknown atlas format {format}")));
    }
    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| ImportError::Format("atlas size overflow".into()))?;
    let atlas = AtlasImage::from_pixels(width, height, cursor.take(pixel_count)?.to_vec())?;

    let glyph_count = cursor.u32()? as usize;
    let mut glyphs = Vec::with_capacity(glyph_count.min(cursor.remaining() / 40));
    for _ in 0..glyph_count {
        glyphs.push(GlyphRecord {
            character: cursor.char()?,
            advance: cursor.f32()?,
            bearing: cursor.vec2()?,
            size: cursor.vec2()?,
            uv_min: cursor.vec2()?,
            uv_max: cursor.vec2()?,
        });
    }

    let kerning = match cursor.u8()? {
        0 => None,
        1 => {
            let count = cursor.u32()?;
            let mut map = KerningMap::new();
            for _ in 0..count {
                let left = cursor.char()?;
                let right = cursor.char()?;
                map.insert((left, right), cursor.f32()?);
            }
            Some(map)
        }
        flag => {
            return Err(ImportError::Format(format!("bad kerning flag {flag}")));
        }
    };

    if cursor.remaining() != 0 {
        return Err(ImportError::Format(format!(
            "{} trailing bytes",
            cursor.remaining()
        )));
    }

    Ok(FontResource {
        em_resolution,
        line_height,
        ascent,
        atlas,
        glyphs,
        kerning,
    })
}

fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_vec2(buf: &mut Vec<u8>, v: Vec2) {
    write_f32(buf, v.x);
    write_f32(buf, v.y);
}

/// Bounds-checked reader over a byte slice
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(ImportError::Format(format!(
                "unexpected end of data at offset {}",
                self.pos
            )));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    fn f32(&mut self) -> Result<f32> {
        self.array().map(f32::from_le_bytes)
    }

    fn vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.f32()?, self.f32()?))
    }

    fn char(&mut self) -> Result<char> {
        let code = self.u32()?;
        char::from_u32(code)
            .ok_or_else(|| ImportError::Format(format!("invalid code point {code:#x}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FontResource {
        let mut atlas = AtlasImage::new(4, 2);
        atlas.set_pixel(1, 1, 200);

        let mut kerning = KerningMap::new();
        kerning.insert(('A', 'V'), -1.5);

        FontResource {
            em_resolution: 32,
            line_height: 38.5,
            ascent: 29.0,
            atlas,
            glyphs: vec![
                GlyphRecord {
                    character: 'A',
                    advance: 20.0,
                    bearing: Vec2::new(1.0, 24.0),
                    size: Vec2::new(18.0, 24.0),
                    uv_min: Vec2::new(0.25, 0.0),
                    uv_max: Vec2::new(0.75, 0.5),
                },
                GlyphRecord {
                    character: ' ',
                    advance: 8.0,
                    bearing: Vec2::ZERO,
                    size: Vec2::new(8.0, 38.5),
                    uv_min: Vec2::ZERO,
                    uv_max: Vec2::ZERO,
                },
            ],
            kerning: Some(kerning),
        }
    }

    #[test]
    fn test_write_then_read() {
        let mut writer = BinaryFontWriter::new(Vec::new());
        writer.write_font(sample()).unwrap();
        let bytes = writer.into_inner();

        assert_eq!(&bytes[..4], MAGIC);
        let loaded = read_font(&mut bytes.as_slice()).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_no_kerning_flag() {
        let mut font = sample();
        font.kerning = None;
        let bytes = encode_font(&font);
        assert_eq!(*bytes.last().unwrap(), 0);
        assert_eq!(decode_font(&bytes).unwrap().kerning, None);
    }

    #[test]
    fn test_truncated_data() {
        let bytes = encode_font(&sample());
        for len in [0, 3, 6, 20, bytes.len() - 1] {
            assert!(
                matches!(decode_font(&bytes[..len]), Err(ImportError::Format(_))),
                "length {len} should fail"
            );
        }
    }

    #[test]
    fn test_bad_magic_and_trailing_bytes() {
        let mut bytes = encode_font(&sample());
        bytes.push(0);
        assert!(matches!(decode_font(&bytes), Err(ImportError::Format(_))));

        bytes.pop();
        bytes[0] = b'X';
        assert!(matches!(decode_font(&bytes), Err(ImportError::Format(_))));
    }
}
