//! Minimal PNG encoder producing random RGBA noise images.
//!
//! The output is a single-frame truecolor-with-alpha image made of exactly
//! three chunks: `IHDR`, `IDAT` and `IEND`. Each chunk is laid out as a 4-byte
//! big-endian data length, the 4-byte tag, the data and a big-endian CRC32
//! over tag and data.

use crate::error::Result;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rand::Rng;
use std::io::Write;

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Side length of generated images.
pub const DEFAULT_IMAGE_SIDE: u32 = 64;

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode one chunk.
pub fn png_pack(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag);
    hasher.update(data);

    let mut chunk = Vec::with_capacity(data.len() + 12);
    chunk.extend_from_slice(&(data.len() as u32).to_be_bytes());
    chunk.extend_from_slice(tag);
    chunk.extend_from_slice(data);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());
    chunk
}

/// Generate a `width` x `height` PNG of random opaque pixels.
pub fn generate_png<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Result<Vec<u8>> {
    let row_len = width as usize * 4;

    // Each scanline starts with filter type 0 (none)
    let mut raw = Vec::with_capacity((row_len + 1) * height as usize);
    for _ in 0..height {
        raw.push(0);
        for _ in 0..width {
            let rgb: u32 = rng.random_range(0..1 << 24);
            raw.extend_from_slice(&((rgb << 8) | 0xff).to_be_bytes());
        }
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    let mut header = Vec::with_capacity(13);
    header.extend_from_slice(&width.to_be_bytes());
    header.extend_from_slice(&height.to_be_bytes());
    // Bit depth, color type, compression, filter and interlace methods
    header.extend_from_slice(&[BIT_DEPTH, COLOR_TYPE_RGBA, 0, 0, 0]);

    let mut png = PNG_SIGNATURE.to_vec();
    png.extend(png_pack(b"IHDR", &header));
    png.extend(png_pack(b"IDAT", &compressed));
    png.extend(png_pack(b"IEND", &[]));
    Ok(png)
}
