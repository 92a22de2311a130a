use melodia::prelude::*;
use pretty_assertions::assert_eq;

const TEMPO: &[u8] = &[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20];
const FOUR_FOUR: &[u8] = &[0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08];
const END: &[u8] = &[0x00, 0xFF, 0x2F, 0x00];

fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut body = format.to_be_bytes().to_vec();
    body.extend_from_slice(&tracks.to_be_bytes());
    body.extend_from_slice(&division.to_be_bytes());
    chunk(b"MThd", &body)
}

/// A format 0 file at 480 ticks per quarter with the given track events
fn file(events: &[&[u8]]) -> Vec<u8> {
    let mut out = header(0, 1, 480);
    out.extend(chunk(b"MTrk", &events.concat()));
    out
}

fn malformed(bytes: &[u8]) -> (usize, MalformedError) {
    let error = MidiReader::default().read(bytes).unwrap_err();
    assert!(error.is_malformed(), "{error}");
    match error.error_kind() {
        ReaderErrorKind::Malformed(reason) => (error.position(), reason.clone()),
        ReaderErrorKind::MissingSignature => unreachable!(),
    }
}

fn quarter(notation: &str) -> Note {
    Note::from_notation(notation, Duration::new(1, 4).unwrap(), Velocity::new(100).unwrap())
        .unwrap()
}

#[test]
fn corrupted_chunk_id() {
    let track = Track::with_notes(Signature::default(), [quarter("C4")]);
    let mut bytes = MidiWriter::default().write(&track).unwrap();
    bytes[1] = b'X';
    assert_eq!(
        malformed(&bytes),
        (
            0,
            MalformedError::InvalidChunkId {
                expected: *b"MThd",
                found: *b"MXhd",
            }
        )
    );
}

#[test]
fn truncated_file() {
    let track = Track::with_notes(Signature::default(), [quarter("C4")]);
    let bytes = MidiWriter::default().write(&track).unwrap();
    for len in [0, 3, 13, 20, bytes.len() - 1] {
        let error = MidiReader::default().read(&bytes[..len]).unwrap_err();
        assert!(error.is_out_of_bounds(), "{len}: {error}");
    }
}

#[test]
fn header_rejections() {
    let body = [TEMPO, FOUR_FOUR, END].concat();
    let with_header = |header: Vec<u8>| {
        let mut out = header;
        out.extend(chunk(b"MTrk", &body));
        out
    };

    assert_eq!(
        malformed(&with_header(header(2, 1, 480))).1,
        MalformedError::UnsupportedFormat(2)
    );
    assert_eq!(
        malformed(&with_header(header(0, 2, 480))).1,
        MalformedError::TrackCount(2)
    );
    assert_eq!(
        malformed(&with_header(header(0, 1, 0xE728))).1,
        MalformedError::SmpteTiming
    );
    assert_eq!(
        malformed(&with_header(header(0, 1, 0))).1,
        MalformedError::ZeroDivision
    );
    assert_eq!(
        malformed(&with_header(chunk(b"MThd", &[0, 0, 0, 1]))).1,
        MalformedError::HeaderLength(4)
    );

    // a single-track format 1 file is laid out like format 0
    assert!(MidiReader::default().read(&with_header(header(1, 1, 480))).is_ok());
}

#[test]
fn track_chunk_rejections() {
    let mut no_track = header(0, 1, 480);
    assert_eq!(malformed(&no_track).1, MalformedError::MissingTrack);

    let track = chunk(b"MTrk", &[TEMPO, FOUR_FOUR, END].concat());
    no_track.extend(track.clone());
    no_track.extend(track);
    assert_eq!(malformed(&no_track), (41, MalformedError::ExtraTrack));

    let mut twice = header(0, 1, 480);
    twice.extend(header(0, 1, 480));
    assert_eq!(malformed(&twice), (14, MalformedError::DuplicateHeader));
}

#[test]
fn delta_time_longer_than_four_bytes() {
    let bytes = file(&[FOUR_FOUR, &[0x81, 0x80, 0x80, 0x80, 0x00, 0x90, 0x3C, 0x40], END]);
    assert_eq!(
        malformed(&bytes),
        (30, MalformedError::Vlq(melodia::vlq::VlqError::TooLong))
    );
}

#[test]
fn unmatched_note_off() {
    let bytes = file(&[FOUR_FOUR, &[0x00, 0x80, 0x3C, 0x00], END]);
    assert_eq!(
        malformed(&bytes),
        (
            31,
            MalformedError::UnmatchedNoteOff { key: 0x3C, tick: 0 }
        )
    );
}

#[test]
fn overlapping_notes() {
    let bytes = file(&[
        FOUR_FOUR,
        &[0x00, 0x90, 0x3C, 0x40],
        &[0x60, 0x90, 0x3E, 0x40],
        &[0x60, 0x80, 0x3C, 0x00],
        &[0x60, 0x80, 0x3E, 0x00],
        END,
    ]);
    assert_eq!(
        malformed(&bytes).1,
        MalformedError::OverlappingNotes { key: 0x3E, tick: 0x60 }
    );
}

#[test]
fn notes_that_never_end_or_have_no_length() {
    let bytes = file(&[FOUR_FOUR, &[0x00, 0x90, 0x3C, 0x40], END]);
    assert_eq!(malformed(&bytes).1, MalformedError::UnterminatedNote { key: 0x3C });

    let bytes = file(&[FOUR_FOUR, &[0x10, 0x90, 0x3C, 0x40, 0x00, 0x90, 0x3C, 0x00], END]);
    assert_eq!(
        malformed(&bytes).1,
        MalformedError::ZeroLengthNote { key: 0x3C, tick: 0x10 }
    );
}

#[test]
fn end_of_track_rejections() {
    let bytes = file(&[FOUR_FOUR]);
    assert_eq!(malformed(&bytes).1, MalformedError::MissingEndOfTrack);

    let bytes = file(&[FOUR_FOUR, END, TEMPO]);
    assert_eq!(malformed(&bytes).1, MalformedError::DataAfterEndOfTrack);

    let bytes = file(&[FOUR_FOUR, &[0x00, 0xFF, 0x2F, 0x01, 0x00]]);
    assert_eq!(
        malformed(&bytes).1,
        MalformedError::MetaLength {
            meta_type: 0x2F,
            len: 1
        }
    );
}

#[test]
fn status_byte_rejections() {
    let bytes = file(&[&[0x00, 0x3C, 0x40], FOUR_FOUR, END]);
    assert_eq!(malformed(&bytes), (23, MalformedError::MissingStatus));

    let bytes = file(&[FOUR_FOUR, &[0x00, 0xF8], END]);
    assert_eq!(malformed(&bytes).1, MalformedError::UnexpectedStatus(0xF8));

    let bytes = file(&[FOUR_FOUR, &[0x00, 0x90, 0x3C, 0xC0], END]);
    assert_eq!(malformed(&bytes).1, MalformedError::InvalidDataByte(0xC0));
}

#[test]
fn bad_meta_data() {
    let bytes = file(&[&[0x00, 0xFF, 0x58, 0x04, 0x00, 0x02, 0x18, 0x08], END]);
    assert_eq!(
        malformed(&bytes).1,
        MalformedError::TimeSignature(TimeSignatureError::ZeroBeats)
    );

    let bytes = file(&[FOUR_FOUR, &[0x00, 0xFF, 0x51, 0x03, 0x00, 0x00, 0x00], END]);
    assert_eq!(
        malformed(&bytes).1,
        MalformedError::Tempo(TempoError::OutOfRange(0))
    );

    let bytes = file(&[FOUR_FOUR, &[0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1], END]);
    assert_eq!(
        malformed(&bytes).1,
        MalformedError::MetaLength {
            meta_type: 0x51,
            len: 2
        }
    );
}

#[test]
fn missing_signature() {
    let bytes = file(&[TEMPO, &[0x00, 0x90, 0x3C, 0x40, 0x60, 0x80, 0x3C, 0x00], END]);
    let error = MidiReader::default().read(&bytes).unwrap_err();
    assert!(!error.is_malformed());
    assert_eq!(error.error_kind(), &ReaderErrorKind::MissingSignature);
}
