//! Variable-length quantities.
//!
//! Each octet carries 7 bits of the value. The most significant bit is set on
//! every octet except the last one. Octets are ordered most significant group
//! first, so 128 encodes as `[0x81, 0x00]`.

use crate::error::DecodeError;

/// Append the VLQ encoding of `value` to `buf`.
pub fn encode(value: u64, buf: &mut Vec<u8>) {
    let mut groups = [0u8; 10];
    let mut count = 0;
    let mut rest = value;
    loop {
        groups[count] = (rest & 0x7F) as u8;
        count += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for i in (0..count).rev() {
        let continuation = if i > 0 { 0x80 } else { 0x00 };
        buf.push(groups[i] | continuation);
    }
}

/// Return the VLQ encoding of `value` as a fresh buffer.
pub fn to_vlq(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2);
    encode(value, &mut buf);
    return buf;
}

/// Decode one VLQ from `data`, starting at `*pos` and advancing it.
pub fn decode(data: &[u8], pos: &mut usize) -> Result<u64, DecodeError> {
    let mut value: u64 = 0;
    loop {
        let byte = *data.get(*pos).ok_or(DecodeError::UnexpectedEnd)?;
        *pos += 1;

        if value > (u64::MAX >> 7) {
            return Err(DecodeError::VlqOverflow);
        }
        value = (value << 7) | (byte & 0x7F) as u64;

        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
}

/// Decode a VLQ that is used as an index or a length.
pub fn decode_usize(data: &[u8], pos: &mut usize) -> Result<usize, DecodeError> {
    let value = decode(data, pos)?;
    return usize::try_from(value).map_err(|_| DecodeError::VlqOverflow);
}
