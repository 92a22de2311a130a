//! Files written by other tools use more of the format than this crate
//! writes. The reader skips what it doesn't need.

use melodia::prelude::*;
use pretty_assertions::assert_eq;

fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

fn dur(numerator: u64, denominator: u64) -> Duration {
    Duration::new(numerator, denominator).unwrap()
}

fn note(pitch: i32, numerator: u64, denominator: u64, velocity: u8) -> Note {
    Note::new(
        Tone::new(pitch),
        dur(numerator, denominator),
        Velocity::new(velocity).unwrap(),
    )
}

#[test]
fn sequencer_export() {
    // format 1, 96 ticks per quarter, with an 8 byte header
    let mut bytes = chunk(b"MThd", &[0, 1, 0, 1, 0, 96, 0xAB, 0xCD]);
    bytes.extend(chunk(b"XFIH", b"vendor data"));

    let track = [
        // track name
        &[0x00, 0xFF, 0x03, 0x04, b'L', b'e', b'a', b'd'][..],
        // 6/8, with unusual clocks per click
        &[0x00, 0xFF, 0x58, 0x04, 0x06, 0x03, 0x24, 0x08],
        // program change and a controller on channel 3
        &[0x00, 0xC2, 0x05],
        &[0x00, 0xB2, 0x07, 0x64],
        // sysex
        &[0x00, 0xF0, 0x03, 0x7E, 0x09, 0xF7],
        // note on, then a running status note on with velocity 0 to end it
        &[0x00, 0x92, 0x3C, 0x50],
        &[0x30, 0x3C, 0x00],
        // pitch bend between notes
        &[0x10, 0xE2, 0x00, 0x40],
        // a second time signature is ignored
        &[0x00, 0xFF, 0x58, 0x04, 0x02, 0x02, 0x18, 0x08],
        &[0x20, 0x92, 0x40, 0x7F],
        &[0x60, 0x82, 0x40, 0x40],
        &[0x30, 0xFF, 0x2F, 0x00],
    ]
    .concat();
    bytes.extend(chunk(b"MTrk", &track));
    bytes.extend(chunk(b"XTRA", &[]));

    let file = MidiReader::default().read_file(&bytes).unwrap();
    assert_eq!(file.header.format(), FormatType::Simultaneous);
    assert_eq!(file.header.timing().get(), 96);
    assert_eq!(file.tempo, None);

    let expected = Track::with_notes(
        Signature::new(6, 8).unwrap(),
        [
            note(48, 1, 8, 0x50),
            Note::rest(dur(1, 8)),
            note(52, 1, 4, 0x7F),
            Note::rest(dur(1, 8)),
        ],
    );
    assert_eq!(file.track, expected);
}

#[test]
fn note_off_before_note_on_on_the_same_tick() {
    // the note-off of the first note is written after the next note-on
    let track = [
        &[0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08][..],
        &[0x00, 0x90, 0x3C, 0x64],
        &[0x83, 0x60, 0x90, 0x3E, 0x64],
        &[0x00, 0x80, 0x3C, 0x00],
        &[0x83, 0x60, 0x80, 0x3E, 0x00],
        &[0x00, 0xFF, 0x2F, 0x00],
    ]
    .concat();
    let mut bytes = chunk(b"MThd", &[0, 0, 0, 1, 0x01, 0xE0]);
    bytes.extend(chunk(b"MTrk", &track));

    let read = MidiReader::default().read(&bytes).unwrap();
    assert_eq!(read.notes(), [note(48, 1, 4, 100), note(50, 1, 4, 100)]);
}

#[test]
fn keys_follow_the_configured_middle_c() {
    let track = [
        &[0x00, 0xFF, 0x58, 0x04, 0x03, 0x02, 0x18, 0x08][..],
        &[0x00, 0x90, 0x3C, 0x64, 0x60, 0x80, 0x3C, 0x00],
        &[0x00, 0xFF, 0x2F, 0x00],
    ]
    .concat();
    let mut bytes = chunk(b"MThd", &[0, 0, 0, 1, 0, 96]);
    bytes.extend(chunk(b"MTrk", &track));

    let c4 = MidiReader::default().read(&bytes).unwrap();
    assert_eq!(c4.notes()[0].tone().unwrap().to_string(), "C4");

    let config = MidiConfig::default().with_middle_c(Tone::from_notation("C3").unwrap());
    let c3 = MidiReader::new(config).read(&bytes).unwrap();
    assert_eq!(c3.notes()[0].tone().unwrap().to_string(), "C3");
}
