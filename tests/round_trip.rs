use melodia::prelude::*;
use pretty_assertions::assert_eq;

fn dur(numerator: u64, denominator: u64) -> Duration {
    Duration::new(numerator, denominator).unwrap()
}

fn note(notation: &str, numerator: u64, denominator: u64, velocity: u8) -> Note {
    Note::from_notation(
        notation,
        dur(numerator, denominator),
        Velocity::new(velocity).unwrap(),
    )
    .unwrap()
}

fn round_trip(track: &Track, config: MidiConfig) -> Track {
    let bytes = MidiWriter::new(config).write(track).unwrap();
    MidiReader::new(config).read(&bytes).unwrap()
}

#[test]
fn melody_with_rests() {
    let track = Track::with_notes(
        Signature::new(3, 4).unwrap(),
        [
            note("C4", 1, 4, 100),
            note("D#4", 1, 8, 64),
            Note::rest(dur(1, 8)),
            note("G3", 3, 8, 127),
            note("Bb5", 1, 16, 1),
            Note::rest(dur(1, 16)),
            note("C-1", 1, 2, 90),
        ],
    );
    assert_eq!(round_trip(&track, MidiConfig::default()), track);
}

#[test]
fn leading_and_trailing_rests_survive() {
    let track = Track::with_notes(
        Signature::default(),
        [
            Note::rest(dur(1, 2)),
            note("A4", 1, 4, 100),
            Note::rest(dur(5, 4)),
        ],
    );
    let read = round_trip(&track, MidiConfig::default());
    assert_eq!(read, track);
    assert_eq!(read.length(), Position::new(2, 1));
}

#[test]
fn only_rests() {
    let track = Track::with_notes(Signature::new(6, 8).unwrap(), [Note::rest(dur(3, 4))]);
    assert_eq!(round_trip(&track, MidiConfig::default()), track);
}

#[test]
fn empty_track() {
    let track = Track::new(Signature::new(7, 16).unwrap());
    assert_eq!(round_trip(&track, MidiConfig::default()), track);
}

#[test]
fn adjacent_rests_merge() {
    let track = Track::with_notes(
        Signature::default(),
        [
            note("E4", 1, 4, 100),
            Note::rest(dur(1, 8)),
            Note::rest(dur(1, 8)),
            note("E4", 1, 4, 100),
        ],
    );
    let read = round_trip(&track, MidiConfig::default());
    assert_eq!(
        read.notes(),
        [
            note("E4", 1, 4, 100),
            Note::rest(dur(1, 4)),
            note("E4", 1, 4, 100),
        ]
    );
}

#[test]
fn rests_ignore_velocity() {
    let loud_rest = Note::rest(dur(1, 4)).with_velocity(Velocity::MAX);
    let track = Track::with_notes(Signature::default(), [note("C4", 1, 4, 127), loud_rest]);
    assert_eq!(loud_rest, Note::rest(dur(1, 4)));
    assert_eq!(round_trip(&track, MidiConfig::default()), track);
}

/// Deterministic source of numbers for generated tracks.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) % bound
    }
}

/// Every denominator here is a whole number of ticks at 96 and 480 per quarter.
const DENOMINATORS: [u64; 9] = [1, 2, 4, 8, 16, 3, 6, 12, 32];

fn generated_track(seed: u64, adjacent_rests: bool) -> Track {
    let mut rng = Lcg(seed);
    let beats = 1 + rng.below(7) as u32;
    let beat_unit = 1 << rng.below(5);
    let mut track = Track::new(Signature::new(beats, beat_unit).unwrap());
    for _ in 0..rng.below(24) {
        let duration = dur(1 + rng.below(3), DENOMINATORS[rng.below(9) as usize]);
        let choice = rng.below(6);
        let after_rest = track.notes().last().is_some_and(Note::is_rest);
        let next = if choice == 0 && (adjacent_rests || !after_rest) {
            Note::rest(duration)
        } else {
            let tone = match track.notes().last().and_then(Note::tone) {
                Some(previous) if choice == 1 => previous,
                _ => Tone::new(24 + rng.below(48) as i32),
            };
            let velocity = match choice {
                2 => 0,
                _ => rng.below(128) as u8,
            };
            Note::new(tone, duration, Velocity::new(velocity).unwrap())
        };
        track.add(next);
    }
    track
}

fn with_rests_merged(track: &Track) -> Track {
    let mut notes: Vec<Note> = Vec::new();
    for &next in track.notes() {
        match notes.last_mut() {
            Some(last) if last.is_rest() && next.is_rest() => {
                *last = Note::rest(last.duration() + next.duration());
            }
            _ => notes.push(next),
        }
    }
    Track::with_notes(track.signature(), notes)
}

#[test]
fn generated_tracks_round_trip() {
    let coarse =
        MidiConfig::default().with_ticks_per_quarter(TicksPerQuarterNote::new(96).unwrap());
    for seed in 0..300 {
        let track = generated_track(seed, false);
        assert_eq!(round_trip(&track, MidiConfig::default()), track, "seed {seed}");
        assert_eq!(round_trip(&track, coarse), track, "seed {seed}");
    }
}

#[test]
fn generated_adjacent_rests_merge() {
    let mut merged = 0;
    for seed in 0..300 {
        let track = generated_track(seed, true);
        let expected = with_rests_merged(&track);
        merged += track.len() - expected.len();
        let read = round_trip(&track, MidiConfig::default());
        assert_eq!(read, expected, "seed {seed}");
        assert_eq!(read.length(), track.length(), "seed {seed}");
    }
    assert!(merged > 0);
}

#[test]
fn repeated_key_back_to_back() {
    let track = Track::with_notes(
        Signature::default(),
        [
            note("C4", 1, 4, 100),
            note("C4", 1, 4, 100),
            note("C#4", 1, 4, 100),
            note("D4", 1, 4, 100),
        ],
    );
    assert_eq!(round_trip(&track, MidiConfig::default()), track);
}

#[test]
fn silent_note_is_not_a_rest() {
    let track = Track::with_notes(
        Signature::default(),
        [note("F4", 1, 4, 0), note("G4", 1, 4, 100)],
    );
    let read = round_trip(&track, MidiConfig::default());
    assert_eq!(read, track);
    assert!(!read.notes()[0].is_rest());
}

#[test]
fn custom_config() {
    let config = MidiConfig::default()
        .with_ticks_per_quarter(TicksPerQuarterNote::new(96).unwrap())
        .with_tempo(Tempo::from_bpm(90.).unwrap())
        .with_channel(Channel::Ten)
        .with_middle_c(Tone::from_notation("C3").unwrap());
    let track = Track::with_notes(
        Signature::new(5, 8).unwrap(),
        [note("C3", 1, 8, 80), note("C8", 1, 32, 80), Note::rest(dur(1, 2))],
    );

    let bytes = MidiWriter::new(config).write(&track).unwrap();
    let file = MidiReader::new(config).read_file(&bytes).unwrap();
    assert_eq!(file.track, track);
    assert_eq!(file.tempo, Some(config.tempo));
    assert_eq!(file.header.timing(), config.ticks_per_quarter);
    assert_eq!(file.header.format(), FormatType::SingleMultiChannel);

    // C3 is written as key 60 with this config
    let events = MidiWriter::new(config).events(&track).unwrap();
    let first_on = events
        .iter()
        .find_map(|e| match e.event() {
            TrackMessage::ChannelVoice(message) => Some(*message),
            TrackMessage::Meta(_) => None,
        })
        .unwrap();
    assert_eq!(first_on.event().key(), 60);
    assert_eq!(first_on.status(), 0x99);
}

#[test]
fn consecutive_quarters_start_on_beats() {
    let track = Track::with_notes(
        Signature::default(),
        ["C4", "C4", "C#4", "D4"].map(|n| note(n, 1, 4, 100)),
    );
    let note_ons = |ticks_per_quarter: u16| -> Vec<u64> {
        let config = MidiConfig::default()
            .with_ticks_per_quarter(TicksPerQuarterNote::new(ticks_per_quarter).unwrap());
        MidiWriter::new(config)
            .events(&track)
            .unwrap()
            .iter()
            .filter(|e| e.event().priority() == 2)
            .map(|e| e.accumulated_ticks())
            .collect()
    };
    assert_eq!(note_ons(480), [0, 480, 960, 1440]);
    assert_eq!(note_ons(120), [0, 120, 240, 360]);
}

#[test]
fn quantization_failure_writes_nothing() {
    let track = Track::with_notes(Signature::default(), [note("C4", 1, 3, 100)]);
    let config =
        MidiConfig::default().with_ticks_per_quarter(TicksPerQuarterNote::new(4).unwrap());
    let result = MidiWriter::new(config).write(&track);
    assert!(matches!(result, Err(WriterError::Quantization(_))));

    // 1/3 of a whole note is 640 ticks at 480 per quarter
    assert!(MidiWriter::default().write(&track).is_ok());
}

#[test]
fn convenience_functions() {
    let track = Track::with_notes(Signature::default(), [note("A4", 1, 1, 100)]);
    let bytes = melodia::dumps(&track).unwrap();
    assert_eq!(melodia::loads(&bytes).unwrap(), track);

    let error = melodia::loads(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(error, melodia::Error::Read(_)));
}
