#![doc = r#"
MIDI variable-length quantities

A variable-length quantity stores 7 bits per byte, most significant group
first. Every byte but the last has its high bit set. MIDI files use them
for delta times and meta event lengths, and cap them at four bytes, which
makes `0x0FFF_FFFF` the largest value that can be written.

```text
value        bytes
0x0000_0000  00
0x0000_0080  81 00
0x0000_3FFF  FF 7F
0x0FFF_FFFF  FF FF FF 7F
```
"#]

use thiserror::Error;

/// The largest value a four-byte quantity can hold
pub const MAX: u32 = 0x0FFF_FFFF;

/// The maximum number of bytes in a quantity
pub const MAX_LEN: usize = 4;

/// Errors while encoding or decoding a variable-length quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VlqError {
    /// The value needs more than four bytes
    #[error("{0:#x} does not fit in a variable-length quantity")]
    TooLarge(u64),
    /// Four bytes were read and the last still had its continuation bit set
    #[error("Variable-length quantity is longer than four bytes")]
    TooLong,
    /// The input ended before the final byte
    #[error("Variable-length quantity is truncated")]
    Truncated,
}

/// Appends the encoding of `value` to `out`.
///
/// # Errors
/// if `value` is above [`MAX`]. Nothing is written in that case.
pub fn write(value: u64, out: &mut Vec<u8>) -> Result<(), VlqError> {
    if value > MAX as u64 {
        return Err(VlqError::TooLarge(value));
    }
    let mut buf = [0u8; MAX_LEN];
    let mut start = MAX_LEN - 1;
    let mut rest = value;
    buf[start] = (rest & 0x7F) as u8;
    rest >>= 7;
    while rest > 0 {
        start -= 1;
        buf[start] = ((rest & 0x7F) as u8) | 0x80;
        rest >>= 7;
    }
    out.extend_from_slice(&buf[start..]);
    Ok(())
}

/// Decodes a quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes it took.
pub fn read(bytes: &[u8]) -> Result<(u32, usize), VlqError> {
    let mut value = 0u32;
    for (i, byte) in bytes.iter().take(MAX_LEN).enumerate() {
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= MAX_LEN {
        Err(VlqError::TooLong)
    } else {
        Err(VlqError::Truncated)
    }
}

#[cfg(test)]
const TABLE: [(u32, &[u8]); 12] = [
    (0x0000_0000, &[0x00]),
    (0x0000_0040, &[0x40]),
    (0x0000_007F, &[0x7F]),
    (0x0000_0080, &[0x81, 0x00]),
    (0x0000_2000, &[0xC0, 0x00]),
    (0x0000_3FFF, &[0xFF, 0x7F]),
    (0x0000_4000, &[0x81, 0x80, 0x00]),
    (0x0010_0000, &[0xC0, 0x80, 0x00]),
    (0x001F_FFFF, &[0xFF, 0xFF, 0x7F]),
    (0x0020_0000, &[0x81, 0x80, 0x80, 0x00]),
    (0x0800_0000, &[0xC0, 0x80, 0x80, 0x00]),
    (0x0FFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
];

#[test]
fn encode_reference_values() {
    use pretty_assertions::assert_eq;
    for (value, expected) in TABLE {
        let mut out = Vec::new();
        write(value as u64, &mut out).unwrap();
        assert_eq!(out, expected, "encoding {value:#x}");
    }
}

#[test]
fn decode_reference_values() {
    use pretty_assertions::assert_eq;
    for (value, bytes) in TABLE {
        assert_eq!(read(bytes), Ok((value, bytes.len())), "decoding {value:#x}");
    }
}

#[test]
fn decode_stops_at_the_last_byte() {
    use pretty_assertions::assert_eq;
    assert_eq!(read(&[0x81, 0x00, 0x90, 0x3C]), Ok((0x80, 2)));
}

#[test]
fn out_of_range() {
    use pretty_assertions::assert_eq;
    let mut out = Vec::new();
    assert_eq!(write(0x1000_0000, &mut out), Err(VlqError::TooLarge(0x1000_0000)));
    assert!(out.is_empty());

    assert_eq!(read(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]), Err(VlqError::TooLong));
    assert_eq!(read(&[0x81, 0x80]), Err(VlqError::Truncated));
    assert_eq!(read(&[]), Err(VlqError::Truncated));
}
