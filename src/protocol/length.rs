//! Word length prefix codec
//!
//! Every word on the wire is preceded by its length, encoded in 1 to 5 bytes.
//! The leading bits of the first byte tell how many bytes follow.
//!
//! ```text
//! len <= 0x7F        0xxxxxxx
//! len <= 0x3FFF      10xxxxxx xxxxxxxx
//! len <= 0x1FFFFF    110xxxxx xxxxxxxx xxxxxxxx
//! len <= 0xFFFFFFF   1110xxxx xxxxxxxx xxxxxxxx xxxxxxxx
//! otherwise          11110000 xxxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ApiError, Result};

/// Longest possible length prefix
pub const MAX_PREFIX_LEN: usize = 5;

/// Number of bytes the prefix for `len` occupies
pub fn encoded_len(len: u32) -> usize {
    match len {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Append the minimal length prefix for `len` to `dst`
pub fn put_length<B: BufMut>(dst: &mut B, len: u32) {
    match len {
        0..=0x7F => dst.put_u8(len as u8),
        0x80..=0x3FFF => dst.put_u16(len as u16 | 0x8000),
        0x4000..=0x1F_FFFF => {
            let marked = len | 0x00C0_0000;
            dst.put_u8((marked >> 16) as u8);
            dst.put_u16(marked as u16);
        }
        0x20_0000..=0x0FFF_FFFF => dst.put_u32(len | 0xE000_0000),
        _ => {
            dst.put_u8(0xF0);
            dst.put_u32(len);
        }
    }
}

/// Encode `len` as a standalone prefix
pub fn encode_length(len: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(encoded_len(len));
    put_length(&mut buf, len);
    buf.freeze()
}

/// Decode a length prefix, pulling bytes one at a time from `next_byte`.
///
/// Consumes exactly as many bytes as the first byte announces. A first byte
/// in `0xF1..=0xFF` is not a valid prefix.
pub fn decode_length<F>(mut next_byte: F) -> Result<u32>
where
    F: FnMut() -> Result<u8>,
{
    let first = next_byte()?;

    let (mut len, continuation) = match first {
        b if b & 0x80 == 0x00 => (u32::from(b), 0),
        b if b & 0xC0 == 0x80 => (u32::from(b & 0x3F), 1),
        b if b & 0xE0 == 0xC0 => (u32::from(b & 0x1F), 2),
        b if b & 0xF0 == 0xE0 => (u32::from(b & 0x0F), 3),
        0xF0 => (0, 4),
        b => return Err(ApiError::InvalidLength(b)),
    };

    for _ in 0..continuation {
        len = (len << 8) | u32::from(next_byte()?);
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Result<(u32, usize)> {
        let mut consumed = 0;
        let len = decode_length(|| {
            let b = bytes.get(consumed).copied().ok_or(ApiError::ShortRead {
                read: 0,
                expected: 1,
            })?;
            consumed += 1;
            Ok(b)
        })?;
        Ok((len, consumed))
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(&encode_length(0)[..], &[0x00]);
        assert_eq!(&encode_length(0x7F)[..], &[0x7F]);
        assert_eq!(&encode_length(200)[..], &[0x80, 0xC8]);
        assert_eq!(&encode_length(0x3FFF)[..], &[0xBF, 0xFF]);
        assert_eq!(&encode_length(0x4000)[..], &[0xC0, 0x40, 0x00]);
        assert_eq!(&encode_length(0x1F_FFFF)[..], &[0xDF, 0xFF, 0xFF]);
        assert_eq!(&encode_length(0x20_0000)[..], &[0xE0, 0x20, 0x00, 0x00]);
        assert_eq!(&encode_length(0x0FFF_FFFF)[..], &[0xEF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&encode_length(0x1000_0000)[..], &[0xF0, 0x10, 0x00, 0x00, 0x00]);
        assert_eq!(&encode_length(u32::MAX)[..], &[0xF0, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_boundaries_roundtrip_with_minimal_prefix() {
        let boundaries = [
            0, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, 0x0FFF_FFFF, 0x1000_0000,
            u32::MAX,
        ];
        for &n in &boundaries {
            let encoded = encode_length(n);
            assert_eq!(encoded.len(), encoded_len(n), "prefix size for {:#x}", n);
            let (decoded, consumed) = decode_all(&encoded).unwrap();
            assert_eq!(decoded, n);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn test_decode_stops_after_prefix() {
        let (len, consumed) = decode_all(&[0x81, 0x00, 0xAA, 0xBB]).unwrap();
        assert_eq!(len, 0x100);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_invalid_leading_bytes() {
        for b in 0xF1..=0xFFu8 {
            match decode_all(&[b, 0, 0, 0, 0]) {
                Err(ApiError::InvalidLength(got)) => assert_eq!(got, b),
                other => panic!("expected InvalidLength for {:#x}, got {:?}", b, other),
            }
        }
    }

    #[test]
    fn test_truncated_prefix_propagates_source_error() {
        assert!(matches!(
            decode_all(&[0xE0, 0x01]),
            Err(ApiError::ShortRead { .. })
        ));
    }
}
