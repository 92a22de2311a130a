#![doc = r#"
Chunk framing

Every chunk is a 4-character ASCII type, a 32-bit big-endian length and
that many bytes of data:

```text
[Header Chunk: "MThd"]
[Track Chunk: "MTrk"]
```

A reader skips chunks of any other type.
"#]

/// Type of the header chunk
pub const HEADER_ID: [u8; 4] = *b"MThd";

/// Type of a track chunk
pub const TRACK_ID: [u8; 4] = *b"MTrk";

/// Appends a chunk with type `id` and body `body` to `out`.
///
/// Returns `None`, writing nothing, if the body is longer than a 32-bit
/// length can describe.
pub fn write_chunk(id: [u8; 4], body: &[u8], out: &mut Vec<u8>) -> Option<()> {
    let len = u32::try_from(body.len()).ok()?;
    out.reserve(8 + body.len());
    out.extend_from_slice(&id);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(body);
    Some(())
}

#[test]
fn chunk_framing() {
    use pretty_assertions::assert_eq;
    let mut out = Vec::new();
    write_chunk(HEADER_ID, &[0x00, 0x7F, 0x00, 0x80, 0x90, 0xFF, 0x76], &mut out).unwrap();
    assert_eq!(
        out,
        b"MThd\x00\x00\x00\x07\x00\x7F\x00\x80\x90\xFF\x76".as_slice()
    );

    out.clear();
    write_chunk(*b"abcd", &[], &mut out).unwrap();
    assert_eq!(out, b"abcd\x00\x00\x00\x00".as_slice());
}
