#![doc = r#"
Writes a [`Track`] as a format 0 Standard MIDI File

The file has one header chunk and one track chunk. The track chunk starts
with the tempo and time signature at tick zero, then a note-on and a
note-off for each note, and ends with an end-of-track event at the tick
where the last note or rest ends. Rests produce no events; they only move
the following notes later.
"#]

mod error;
pub use error::*;

use crate::{
    file::chunk::{HEADER_ID, TRACK_ID, write_chunk},
    prelude::*,
    vlq,
};

#[doc = r#"
Encodes a [`Track`] into MIDI bytes.

# Example
```rust
# use melodia::prelude::*;
let quarter = Duration::new(1, 4).unwrap();
let track = Track::with_notes(
    Signature::default(),
    [Note::from_notation("C4", quarter, Velocity::MAX).unwrap()],
);

let bytes = MidiWriter::default().write(&track).unwrap();
assert_eq!(&bytes[..4], b"MThd");
assert_eq!(&bytes[14..18], b"MTrk");
```
"#]
#[derive(Debug, Clone, Default)]
pub struct MidiWriter {
    config: MidiConfig,
}

impl MidiWriter {
    /// Create a writer with the given configuration
    pub const fn new(config: MidiConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of the writer
    pub const fn config(&self) -> &MidiConfig {
        &self.config
    }

    /// Returns the events of the track chunk in the order they are written.
    ///
    /// # Errors
    /// If a note can't be placed on a tick, maps outside the MIDI key
    /// range, or the signature can't be encoded.
    pub fn events(&self, track: &Track) -> Result<Vec<Ticked<TrackMessage>>, WriterError> {
        let signature = track.signature();
        let time_signature = TimeSignature::from_signature(signature)
            .map_err(|source| WriterError::Signature { signature, source })?;

        let timing = self.config.ticks_per_quarter;
        let channel = self.config.channel;
        let offset = self.config.key_offset() as i64;

        let mut events = Vec::with_capacity(track.len() * 2 + 3);
        events.push(Ticked::new(0, MetaMessage::Tempo(self.config.tempo).into()));
        events.push(Ticked::new(0, MetaMessage::TimeSignature(time_signature).into()));

        let mut tick = 0u64;
        for note in track.notes() {
            let length = timing.ticks_for(note.duration())?;
            let end = tick
                .checked_add(length)
                .ok_or(WriterError::DeltaTooLong(length))?;
            if let Some(tone) = note.tone() {
                let key = tone.pitch() as i64 + offset;
                let key = u8::try_from(key)
                    .ok()
                    .filter(|k| *k < 0x80)
                    .ok_or(WriterError::KeyOutOfRange { tone, key })?;
                let velocity = note.velocity();
                let on = VoiceEvent::NoteOn { key, velocity };
                let off = VoiceEvent::NoteOff {
                    key,
                    velocity: Velocity::ZERO,
                };
                events.push(Ticked::new(tick, ChannelVoiceMessage::new(channel, on).into()));
                events.push(Ticked::new(end, ChannelVoiceMessage::new(channel, off).into()));
            }
            tick = end;
        }

        sort_events(&mut events);
        events.push(Ticked::new(tick, MetaMessage::EndOfTrack.into()));
        Ok(events)
    }

    /// Encode the track as a complete MIDI file.
    ///
    /// # Errors
    /// See [`MidiWriter::events`]. The track may also be too long for the
    /// delta times or the chunk length of the format.
    pub fn write(&self, track: &Track) -> Result<Vec<u8>, WriterError> {
        let events = self.events(track)?;

        let mut body = Vec::with_capacity(events.len() * 4);
        let mut previous = 0u64;
        for event in &events {
            let delta = event.accumulated_ticks() - previous;
            vlq::write(delta, &mut body).map_err(|_| WriterError::DeltaTooLong(delta))?;
            event.event().write_to(&mut body);
            previous = event.accumulated_ticks();
        }

        let header = MidiFileHeader::single_track(self.config.ticks_per_quarter);
        let mut out = Vec::with_capacity(14 + 8 + body.len());
        write_chunk(HEADER_ID, &header.to_bytes(), &mut out)
            .ok_or(WriterError::ChunkTooLong(MidiFileHeader::LEN as usize))?;
        write_chunk(TRACK_ID, &body, &mut out).ok_or(WriterError::ChunkTooLong(body.len()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            notes = track.len(),
            events = events.len(),
            bytes = out.len(),
            "wrote MIDI track"
        );

        Ok(out)
    }
}

#[cfg(test)]
fn quarter() -> Duration {
    Duration::new(1, 4).unwrap()
}

#[test]
fn ticks_of_consecutive_quarters() {
    use pretty_assertions::assert_eq;
    let mut track = Track::default();
    for pitch in [48, 50, 52, 53] {
        track.add(Note::new(Tone::new(pitch), quarter(), Velocity::default()));
    }
    let config = MidiConfig::default().with_ticks_per_quarter(TicksPerQuarterNote::new(120).unwrap());
    let events = MidiWriter::new(config).events(&track).unwrap();

    let starts: Vec<u64> = events
        .iter()
        .filter(|e| matches!(e.event(), TrackMessage::ChannelVoice(m) if matches!(m.event(), VoiceEvent::NoteOn { .. })))
        .map(|e| e.accumulated_ticks())
        .collect();
    assert_eq!(starts, [0, 120, 240, 360]);

    let last = events.last().unwrap();
    assert_eq!(last.event(), &TrackMessage::Meta(MetaMessage::EndOfTrack));
    assert_eq!(last.accumulated_ticks(), 480);
}

#[test]
fn rests_shift_later_notes() {
    use pretty_assertions::assert_eq;
    let track = Track::with_notes(
        Signature::default(),
        [
            Note::rest(quarter()),
            Note::new(Tone::new(48), quarter(), Velocity::MAX),
            Note::rest(Duration::new(1, 2).unwrap()),
        ],
    );
    let events = MidiWriter::default().events(&track).unwrap();
    let ticks: Vec<(u64, u8)> = events
        .iter()
        .map(|e| (e.accumulated_ticks(), e.event().priority()))
        .collect();
    // tempo, signature, on, off, end of track
    assert_eq!(ticks, [(0, 0), (0, 0), (480, 2), (960, 1), (1920, 0)]);
}

#[test]
fn minimal_file_bytes() {
    use pretty_assertions::assert_eq;
    let track = Track::with_notes(
        Signature::default(),
        [Note::new(Tone::new(48), quarter(), Velocity::MAX)],
    );
    let bytes = MidiWriter::default().write(&track).unwrap();
    let expected: &[u8] = &[
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 28, //
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
        0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, //
        0x00, 0x90, 60, 127, //
        0x83, 0x60, 0x80, 60, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    assert_eq!(bytes, expected);
}

#[test]
fn unwritable_tracks() {
    use pretty_assertions::assert_eq;
    let writer = MidiWriter::default();

    let triplet = Track::with_notes(
        Signature::default(),
        [Note::rest(Duration::new(1, 7).unwrap())],
    );
    assert_eq!(
        writer.write(&triplet),
        Err(WriterError::Quantization(QuantizationError {
            numerator: 1,
            denominator: 7,
            ticks_per_quarter: 480,
        }))
    );

    let high = Tone::new(200);
    let too_high = Track::with_notes(Signature::default(), [Note::new(high, quarter(), Velocity::MAX)]);
    assert_eq!(
        writer.write(&too_high),
        Err(WriterError::KeyOutOfRange { tone: high, key: 212 })
    );

    let signature = Signature::new(5, 6).unwrap();
    assert_eq!(
        writer.write(&Track::new(signature)),
        Err(WriterError::Signature {
            signature,
            source: TimeSignatureError::UnitNotPowerOfTwo(6),
        })
    );

    // each rest fits in 64-bit ticks, the two together don't
    let longest = Duration::new(u64::MAX / 1920, 1).unwrap();
    let endless = Track::with_notes(Signature::default(), [Note::rest(longest); 2]);
    assert_eq!(
        writer.events(&endless),
        Err(WriterError::DeltaTooLong(u64::MAX / 1920 * 1920))
    );
}
