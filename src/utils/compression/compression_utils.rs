use flate2::read::{MultiGzDecoder, ZlibDecoder};
use std::io::Read;

#[inline]
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B
}

#[inline]
pub fn is_deflate(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x78 && matches!(bytes[1], 0x01 | 0x5E | 0x9C | 0xDA)
}

pub fn decompress_gzip(content: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(content);
    let mut decoded = Vec::with_capacity(content.len().saturating_mul(4));
    decoder.read_to_end(&mut decoded)?;
    Ok(decoded)
}

pub fn decompress_deflate(content: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(content);
    let mut decoded = Vec::with_capacity(content.len().saturating_mul(4));
    decoder.read_to_end(&mut decoded)?;
    Ok(decoded)
}
