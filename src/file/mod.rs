#![doc = r#"
The Standard MIDI File container: configuration, header and chunk layout,
and the one-call helpers around [`MidiWriter`] and [`MidiReader`].
"#]

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod meta;
pub use meta::*;

mod event;
pub use event::*;

pub mod chunk;

use std::io;

use crate::prelude::*;

#[doc = r#"
Settings shared by the writer and the reader.

There is no global state: a [`MidiWriter`] and a [`MidiReader`] each own
their configuration, so two codecs with different settings can live side
by side.

# Example
```rust
# use melodia::prelude::*;
let config = MidiConfig::default()
    .with_ticks_per_quarter(TicksPerQuarterNote::new(96).unwrap())
    .with_channel(Channel::Ten)
    .with_middle_c(Tone::from_notation("C3").unwrap());

assert_eq!(config.key_offset(), 24);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiConfig {
    /// The resolution written to the header
    pub ticks_per_quarter: TicksPerQuarterNote,
    /// The tempo written at the start of the track
    pub tempo: Tempo,
    /// The channel notes are written on
    pub channel: Channel,
    /// The tone written as MIDI key 60
    pub middle_c: Tone,
}

impl MidiConfig {
    /// MIDI key number of middle C
    pub const MIDDLE_C_KEY: i32 = 60;

    /// Write at a different resolution
    pub const fn with_ticks_per_quarter(mut self, ticks_per_quarter: TicksPerQuarterNote) -> Self {
        self.ticks_per_quarter = ticks_per_quarter;
        self
    }

    /// Write a different tempo
    pub const fn with_tempo(mut self, tempo: Tempo) -> Self {
        self.tempo = tempo;
        self
    }

    /// Write notes on a different channel
    pub const fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Map a different tone to MIDI key 60.
    pub const fn with_middle_c(mut self, middle_c: Tone) -> Self {
        self.middle_c = middle_c;
        self
    }

    /// Returns what is added to a tone's pitch to get its MIDI key
    pub const fn key_offset(&self) -> i32 {
        Self::MIDDLE_C_KEY - self.middle_c.pitch()
    }
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            ticks_per_quarter: TicksPerQuarterNote::DEFAULT,
            tempo: Tempo::DEFAULT,
            channel: Channel::One,
            // C4
            middle_c: Tone::new(48),
        }
    }
}

#[doc = r#"
Everything a [`MidiReader`] extracts from a file.
"#]
#[derive(Clone, Debug, PartialEq)]
pub struct MidiFile {
    /// The header chunk
    pub header: MidiFileHeader,
    /// The first tempo of the track, if it has one
    pub tempo: Option<Tempo>,
    /// The melody
    pub track: Track,
}

/// Encode a track with the default configuration.
pub fn dumps(track: &Track) -> crate::Result<Vec<u8>> {
    Ok(MidiWriter::default().write(track)?)
}

/// Decode a track with the default configuration.
pub fn loads(bytes: &[u8]) -> crate::Result<Track> {
    Ok(MidiReader::default().read(bytes)?)
}

/// Encode a track with the default configuration into `writer`.
///
/// Nothing is written if the track can't be encoded.
pub fn dump<W: io::Write>(track: &Track, mut writer: W) -> crate::Result<()> {
    let bytes = dumps(track)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read `reader` to its end and decode a track from it with the default
/// configuration.
pub fn load<R: io::Read>(mut reader: R) -> crate::Result<Track> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    loads(&bytes)
}

#[test]
fn default_config() {
    use pretty_assertions::assert_eq;
    let config = MidiConfig::default();
    assert_eq!(config.key_offset(), 12);
    assert_eq!(config.ticks_per_quarter.get(), 480);
    assert_eq!(config.tempo.micros_per_quarter_note(), 500_000);
    assert_eq!(config.channel, Channel::One);
}

#[test]
fn dump_and_load_through_io() {
    use pretty_assertions::assert_eq;
    let quarter = Duration::new(1, 4).unwrap();
    let track = Track::with_notes(
        Signature::new(2, 4).unwrap(),
        [
            Note::from_notation("A4", quarter, Velocity::MAX).unwrap(),
            Note::rest(quarter),
        ],
    );

    let mut sink = Vec::new();
    dump(&track, &mut sink).unwrap();
    assert_eq!(sink, dumps(&track).unwrap());

    let loaded = load(io::Cursor::new(sink)).unwrap();
    assert_eq!(loaded, track);
}
