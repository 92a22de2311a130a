#![doc = r#"
Reads a single-track Standard MIDI File back into a [`Track`]

Reading happens in two passes. The first walks the chunks and decodes
every event of the track chunk into absolute ticks. The second sorts the
events, pairs each note-on with the note-off that releases it, and fills
the gaps with rests. The [`Track`] is only built once both passes have
succeeded.

Pairing is strictly monophonic: a note-on while another note sounds is
rejected rather than guessed at.
"#]

mod error;
pub use error::*;

use crate::{
    file::chunk::{HEADER_ID, TRACK_ID},
    prelude::*,
    vlq,
};

#[doc = r#"
A cursor over the bytes of a MIDI file.

Every read either returns the requested bytes or a [`ReaderError`] with
the position where the data ran out.
"#]
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over a byte slice
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            position: 0,
        }
    }

    /// A reader over a slice found at `offset` of the file, so positions
    /// in errors stay relative to the whole file.
    const fn at_offset(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            offset,
            position: 0,
        }
    }

    /// Returns the position in the file of the next byte
    pub const fn buffer_position(&self) -> usize {
        self.offset + self.position
    }

    /// Returns the number of bytes left
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// True if every byte has been read
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Create a malformed error at the current position
    pub const fn malformed(&self, error: MalformedError) -> ReaderError {
        ReaderError::malformed(self.buffer_position(), error)
    }

    /// Reads the next `len` bytes.
    pub fn read_exact(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.malformed(MalformedError::Truncated {
                needed: len,
                available: self.remaining(),
            }));
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Reads an exact-size array
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    /// Returns the next byte without consuming it
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.bytes
            .get(self.position)
            .copied()
            .ok_or_else(|| {
                self.malformed(MalformedError::Truncated {
                    needed: 1,
                    available: 0,
                })
            })
    }

    /// Reads one byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let [byte] = self.read_exact_size()?;
        Ok(byte)
    }

    /// Reads a big-endian `u16`
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes(self.read_exact_size()?))
    }

    /// Reads a big-endian `u32`
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        Ok(u32::from_be_bytes(self.read_exact_size()?))
    }

    /// Reads a variable-length quantity
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let (value, len) = vlq::read(&self.bytes[self.position..])
            .map_err(|e| self.malformed(e.into()))?;
        self.position += len;
        Ok(value)
    }

    /// Reads a chunk, returning its type, the position of its body in the
    /// file and its body.
    pub fn read_chunk(&mut self) -> ReadResult<([u8; 4], usize, &'a [u8])> {
        let id = self.read_exact_size::<4>()?;
        let len = self.read_u32()?;
        let start = self.buffer_position();
        let body = self.read_exact(len as usize)?;
        Ok((id, start, body))
    }
}

#[doc = r#"
Decodes MIDI bytes into a [`Track`].

The resolution comes from the file header. The only configuration the
reader uses is the middle C mapping from MIDI keys to tones, which must
match the one the file was written with.

# Example
```rust
# use melodia::prelude::*;
let quarter = Duration::new(1, 4).unwrap();
let mut track = Track::new(Signature::new(3, 4).unwrap());
track.add(Note::from_notation("E4", quarter, Velocity::default()).unwrap());
track.add(Note::rest(quarter));
track.add(Note::from_notation("G4", quarter, Velocity::default()).unwrap());

let bytes = MidiWriter::default().write(&track).unwrap();
let read = MidiReader::default().read(&bytes).unwrap();

assert_eq!(read, track);
```
"#]
#[derive(Debug, Clone, Default)]
pub struct MidiReader {
    config: MidiConfig,
}

/// A note-on waiting for its note-off
struct Sounding {
    key: u8,
    start: u64,
    velocity: Velocity,
}

/// The decoded contents of a track chunk, before notes are paired
struct RawTrack {
    /// Events with the file position they were read at
    events: Vec<(usize, Ticked<TrackMessage>)>,
    end_tick: u64,
}

impl MidiReader {
    /// Create a reader with the given configuration
    pub const fn new(config: MidiConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of the reader
    pub const fn config(&self) -> &MidiConfig {
        &self.config
    }

    /// Read a track from MIDI bytes.
    pub fn read(&self, bytes: &[u8]) -> ReadResult<Track> {
        self.read_file(bytes).map(|file| file.track)
    }

    /// Read a track, along with the header and tempo, from MIDI bytes.
    pub fn read_file(&self, bytes: &[u8]) -> ReadResult<MidiFile> {
        let mut reader = Reader::from_byte_slice(bytes);

        let header = read_header(&mut reader)?;
        let (track_offset, track_bytes) = find_track(&mut reader)?;

        let raw = read_track_chunk(Reader::at_offset(track_bytes, track_offset))?;
        let end_position = track_offset + track_bytes.len();
        let (track, tempo) = self.build_track(raw, header.timing(), end_position)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(notes = track.len(), "read MIDI track");

        Ok(MidiFile {
            header,
            tempo,
            track,
        })
    }

    fn build_track(
        &self,
        raw: RawTrack,
        timing: TicksPerQuarterNote,
        end_position: usize,
    ) -> ReadResult<(Track, Option<Tempo>)> {
        let RawTrack {
            mut events,
            end_tick,
        } = raw;
        events.sort_by_key(|(_, e)| (e.accumulated_ticks(), e.event().priority()));

        let mut signature = None;
        let mut tempo = None;
        let mut notes = Vec::new();
        let mut cursor = 0u64;
        let mut sounding: Option<Sounding> = None;

        for (position, event) in events {
            let tick = event.accumulated_ticks();
            let voice = match event.event() {
                TrackMessage::Meta(MetaMessage::TimeSignature(ts)) => {
                    if signature.is_none() {
                        signature = Some(ts.signature());
                    } else {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(tick, "ignoring time signature change");
                    }
                    continue;
                }
                TrackMessage::Meta(MetaMessage::Tempo(t)) => {
                    tempo.get_or_insert(*t);
                    continue;
                }
                TrackMessage::Meta(MetaMessage::EndOfTrack) => continue,
                TrackMessage::ChannelVoice(voice) => *voice.event(),
            };

            let malformed = |error| ReaderError::malformed(position, error);
            match voice {
                VoiceEvent::NoteOn { key, velocity }
                    if velocity == Velocity::ZERO
                        && sounding.as_ref().is_some_and(|s| s.key == key) =>
                {
                    if let Some(s) = sounding.take() {
                        notes.push(self.close(s, tick, timing).map_err(malformed)?);
                        cursor = tick;
                    }
                }
                VoiceEvent::NoteOn { key, velocity } => {
                    if sounding.is_some() {
                        return Err(malformed(MalformedError::OverlappingNotes { key, tick }));
                    }
                    if let Some(gap) = timing.duration_for(tick - cursor) {
                        notes.push(Note::rest(gap));
                    }
                    sounding = Some(Sounding {
                        key,
                        start: tick,
                        velocity,
                    });
                }
                VoiceEvent::NoteOff { key, .. } => match sounding.take() {
                    Some(s) if s.key == key => {
                        notes.push(self.close(s, tick, timing).map_err(malformed)?);
                        cursor = tick;
                    }
                    _ => return Err(malformed(MalformedError::UnmatchedNoteOff { key, tick })),
                },
            }
        }

        if let Some(s) = sounding {
            return Err(ReaderError::malformed(
                end_position,
                MalformedError::UnterminatedNote { key: s.key },
            ));
        }
        if let Some(gap) = timing.duration_for(end_tick - cursor) {
            notes.push(Note::rest(gap));
        }

        let signature = signature
            .ok_or_else(|| ReaderError::new(end_position, ReaderErrorKind::MissingSignature))?;

        Ok((Track::with_notes(signature, notes), tempo))
    }

    fn close(
        &self,
        sounding: Sounding,
        tick: u64,
        timing: TicksPerQuarterNote,
    ) -> Result<Note, MalformedError> {
        let Sounding {
            key,
            start,
            velocity,
        } = sounding;
        let duration = timing
            .duration_for(tick - start)
            .ok_or(MalformedError::ZeroLengthNote { key, tick })?;
        let tone = Tone::new(key as i32 - self.config.key_offset());
        Ok(Note::new(tone, duration, velocity))
    }
}

fn read_header(reader: &mut Reader<'_>) -> ReadResult<MidiFileHeader> {
    let id_position = reader.buffer_position();
    let (id, body_position, body) = reader.read_chunk()?;
    if id != HEADER_ID {
        return Err(ReaderError::malformed(
            id_position,
            MalformedError::InvalidChunkId {
                expected: HEADER_ID,
                found: id,
            },
        ));
    }
    if body.len() < MidiFileHeader::LEN as usize {
        return Err(ReaderError::malformed(
            id_position + 4,
            MalformedError::HeaderLength(body.len() as u32),
        ));
    }

    // longer headers are allowed, the extra bytes are skipped
    let mut body = Reader::at_offset(body, body_position);
    let format_word = body.read_u16()?;
    let format = FormatType::try_from(format_word)
        .ok()
        .filter(FormatType::is_single_track_compatible)
        .ok_or_else(|| body.malformed(MalformedError::UnsupportedFormat(format_word)))?;

    let num_tracks = body.read_u16()?;
    if num_tracks != 1 {
        return Err(body.malformed(MalformedError::TrackCount(num_tracks)));
    }

    let division = body.read_u16()?;
    if division & 0x8000 != 0 {
        return Err(body.malformed(MalformedError::SmpteTiming));
    }
    let timing =
        TicksPerQuarterNote::new(division).map_err(|_| body.malformed(MalformedError::ZeroDivision))?;

    Ok(MidiFileHeader::new(format, num_tracks, timing))
}

/// Finds the one track chunk, skipping unknown chunks around it.
fn find_track<'a>(reader: &mut Reader<'a>) -> ReadResult<(usize, &'a [u8])> {
    let mut track = None;
    while !reader.is_empty() {
        let id_position = reader.buffer_position();
        let (id, body_position, body) = reader.read_chunk()?;
        match id {
            TRACK_ID if track.is_some() => {
                return Err(ReaderError::malformed(id_position, MalformedError::ExtraTrack));
            }
            TRACK_ID => track = Some((body_position, body)),
            HEADER_ID => {
                return Err(ReaderError::malformed(
                    id_position,
                    MalformedError::DuplicateHeader,
                ));
            }
            _unknown => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    chunk = %String::from_utf8_lossy(&_unknown),
                    len = body.len(),
                    "skipping unknown chunk"
                );
            }
        }
    }
    track.ok_or_else(|| reader.malformed(MalformedError::MissingTrack))
}

/// Decodes every event of a track chunk into absolute ticks.
fn read_track_chunk(mut reader: Reader<'_>) -> ReadResult<RawTrack> {
    let mut events = Vec::new();
    let mut tick = 0u64;
    let mut running_status = None;
    let mut end_tick = None;

    while !reader.is_empty() {
        if end_tick.is_some() {
            return Err(reader.malformed(MalformedError::DataAfterEndOfTrack));
        }
        tick += reader.read_vlq()? as u64;
        let position = reader.buffer_position();

        let status = if reader.peek_u8()? & 0x80 != 0 {
            reader.read_u8()?
        } else {
            running_status.ok_or_else(|| reader.malformed(MalformedError::MissingStatus))?
        };

        match status {
            META_STATUS => {
                running_status = None;
                let meta_type = reader.read_u8()?;
                let len = reader.read_vlq()?;
                let data = reader.read_exact(len as usize)?;
                let wrong_length = MalformedError::MetaLength { meta_type, len };
                let message = match MetaType::try_from(meta_type) {
                    Ok(MetaType::EndOfTrack) if len == 0 => {
                        end_tick = Some(tick);
                        MetaMessage::EndOfTrack
                    }
                    Ok(MetaType::Tempo) => {
                        let bytes = <[u8; 3]>::try_from(data)
                            .map_err(|_| ReaderError::malformed(position, wrong_length))?;
                        let tempo = Tempo::from_bytes(bytes)
                            .map_err(|e| ReaderError::malformed(position, e.into()))?;
                        MetaMessage::Tempo(tempo)
                    }
                    Ok(MetaType::TimeSignature) => {
                        let signature = TimeSignature::parse(data)
                            .map_err(|e| ReaderError::malformed(position, e.into()))?;
                        MetaMessage::TimeSignature(signature)
                    }
                    Ok(MetaType::EndOfTrack) => {
                        return Err(ReaderError::malformed(position, wrong_length));
                    }
                    Err(_) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(meta_type, len, "skipping meta event");
                        continue;
                    }
                };
                events.push((position, Ticked::new(tick, message.into())));
            }
            0xF0 | 0xF7 => {
                running_status = None;
                let len = reader.read_vlq()?;
                reader.read_exact(len as usize)?;
                #[cfg(feature = "tracing")]
                tracing::debug!(len, "skipping system exclusive event");
            }
            0x80..=0xEF => {
                running_status = Some(status);
                let kind = StatusKind::try_from(status >> 4)
                    .map_err(|_| ReaderError::malformed(position, MalformedError::UnexpectedStatus(status)))?;
                let data = reader.read_exact(kind.data_len())?;
                if let Some(&byte) = data.iter().find(|b| **b & 0x80 != 0) {
                    return Err(ReaderError::malformed(
                        position,
                        MalformedError::InvalidDataByte(byte),
                    ));
                }
                let channel = Channel::from_status(status);
                let key = data[0];
                let velocity = data
                    .get(1)
                    .and_then(|v| Velocity::new(*v).ok())
                    .unwrap_or(Velocity::ZERO);
                let event = match kind {
                    StatusKind::NoteOn => VoiceEvent::NoteOn { key, velocity },
                    StatusKind::NoteOff => VoiceEvent::NoteOff { key, velocity },
                    _other => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(kind = ?_other, "skipping channel event");
                        continue;
                    }
                };
                let message = ChannelVoiceMessage::new(channel, event);
                events.push((position, Ticked::new(tick, message.into())));
            }
            other => {
                return Err(ReaderError::malformed(
                    position,
                    MalformedError::UnexpectedStatus(other),
                ));
            }
        }
    }

    let end_tick = end_tick.ok_or_else(|| reader.malformed(MalformedError::MissingEndOfTrack))?;
    Ok(RawTrack { events, end_tick })
}
