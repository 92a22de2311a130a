#![doc = r#"
An ordered, owned sequence of [`Note`]s.
"#]

use core::fmt;
use core::iter::FusedIterator;
use core::slice;

use crate::prelude::*;

#[doc = r#"
A melody: a time signature and notes played one after another.

The track stores the notes and nothing else. The start of each note is
the sum of the durations before it, computed when asked for, so there is
no stored timeline to fall out of sync with the notes.

Notes never overlap. A track is a single monophonic voice; rests fill the
gaps.

# Example
```rust
# use melodia::prelude::*;
let quarter = Duration::new(1, 4).unwrap();
let mut track = Track::new(Signature::default());

for notation in ["C4", "E4", "G4"] {
    track.add(Note::from_notation(notation, quarter, Velocity::default()).unwrap());
}

let starts: Vec<_> = track.iter().map(|(start, _)| start.to_string()).collect();
assert_eq!(starts, ["0/1", "1/4", "1/2"]);
assert_eq!(track.length(), Position::new(3, 4));
```
"#]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    signature: Signature,
    notes: Vec<Note>,
}

impl Track {
    /// Create an empty track.
    pub const fn new(signature: Signature) -> Self {
        Self {
            signature,
            notes: Vec::new(),
        }
    }

    /// Create a track holding `notes` in order.
    pub fn with_notes<I>(signature: Signature, notes: I) -> Self
    where
        I: IntoIterator<Item = Note>,
    {
        Self {
            signature,
            notes: notes.into_iter().collect(),
        }
    }

    /// Returns the time signature of the track
    #[inline]
    pub const fn signature(&self) -> Signature {
        self.signature
    }

    /// Appends a note to the end of the track.
    pub fn add(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Returns the number of notes, rests included
    #[inline]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True if the track has no notes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Returns the notes in playback order
    #[inline]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the start of the note at `index`, or `None` if there is no
    /// such note or its start is too fine-grained to represent.
    ///
    /// This sums every duration before the note, so it is linear in `index`.
    /// Use [`Track::iter`] to walk all the notes.
    pub fn start_of(&self, index: usize) -> Option<Position> {
        if index >= self.notes.len() {
            return None;
        }
        end_of(&self.notes[..index])
    }

    /// Returns the point at which the last note (or rest) ends, or `None`
    /// if that point is too fine-grained to represent.
    pub fn length(&self) -> Option<Position> {
        end_of(&self.notes)
    }

    /// Iterate through `(start, note)` pairs in playback order.
    pub fn iter(&self) -> TrackIter<'_> {
        TrackIter {
            start: Some(Position::zero()),
            notes: self.notes.iter(),
        }
    }
}

impl Extend<Note> for Track {
    fn extend<T: IntoIterator<Item = Note>>(&mut self, iter: T) {
        self.notes.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = (Position, &'a Note);
    type IntoIter = TrackIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Track {} with {} notes", self.signature, self.notes.len())
    }
}

fn end_of(notes: &[Note]) -> Option<Position> {
    notes
        .iter()
        .try_fold(Position::zero(), |end, note| end.checked_add(note.duration()))
}

/// An iterator returned from [`Track::iter`]
///
/// Keeps a running sum of durations, yielding each note with its start.
/// Iteration stops at the first note whose start can't be represented,
/// which only happens on tracks where [`Track::length`] is `None`.
#[derive(Clone, Debug)]
pub struct TrackIter<'a> {
    start: Option<Position>,
    notes: slice::Iter<'a, Note>,
}

impl<'a> Iterator for TrackIter<'a> {
    type Item = (Position, &'a Note);
    fn next(&mut self) -> Option<Self::Item> {
        let start = self.start?;
        let note = self.notes.next()?;
        self.start = start.checked_add(note.duration());
        Some((start, note))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.start {
            Some(_) => (0, Some(self.notes.len())),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for TrackIter<'_> {}

#[cfg(test)]
fn note(notation: &str, numerator: u64, denominator: u64) -> Note {
    Note::from_notation(
        notation,
        Duration::new(numerator, denominator).unwrap(),
        Velocity::default(),
    )
    .unwrap()
}

#[test]
fn empty_track() {
    use pretty_assertions::assert_eq;
    let track = Track::new(Signature::new(3, 8).unwrap());
    assert!(track.is_empty());
    assert_eq!(track.len(), 0);
    assert_eq!(track.length(), Some(Position::zero()));
    assert_eq!(track.start_of(0), None);
    assert_eq!(track.iter().next(), None);
    assert_eq!(track.signature().beats(), 3);
    assert_eq!(track.signature().beat_unit(), 8);
}

#[test]
fn start_times_are_prefix_sums() {
    use pretty_assertions::assert_eq;
    let mut track = Track::default();
    track.add(note("C4", 1, 4));
    track.add(Note::rest(Duration::new(1, 8).unwrap()));
    track.add(note("D4", 3, 8));
    track.add(note("E4", 1, 2));

    assert_eq!(track.len(), 4);
    assert_eq!(track.start_of(0), Some(Position::zero()));
    assert_eq!(track.start_of(1), Some(Position::new(1, 4).unwrap()));
    assert_eq!(track.start_of(2), Some(Position::new(3, 8).unwrap()));
    assert_eq!(track.start_of(3), Some(Position::new(3, 4).unwrap()));
    assert_eq!(track.start_of(4), None);
    assert_eq!(track.length(), Position::new(5, 4));

    let from_iter: Vec<Position> = track.iter().map(|(start, _)| start).collect();
    let from_index: Vec<Position> = (0..track.len())
        .filter_map(|i| track.start_of(i))
        .collect();
    assert_eq!(from_iter, from_index);
}

#[test]
fn insertion_order_is_playback_order() {
    use pretty_assertions::assert_eq;
    let mut track = Track::with_notes(Signature::default(), [note("G4", 1, 4)]);
    track.extend([note("C4", 1, 4), note("A3", 1, 4)]);

    let tones: Vec<String> = (&track)
        .into_iter()
        .filter_map(|(_, n)| n.tone())
        .map(|t| t.to_string())
        .collect();
    assert_eq!(tones, ["G4", "C4", "A3"]);
    assert_eq!(track.iter().count(), 3);
    assert_eq!(track.to_string(), "Track 4/4 with 3 notes");
}

#[test]
fn bars_follow_the_signature() {
    use pretty_assertions::assert_eq;
    let signature = Signature::new(3, 4).unwrap();
    let track = Track::with_notes(signature, (0..7).map(|_| note("C4", 1, 4)));
    let bars: Vec<u64> = track.iter().map(|(start, _)| start.bar(signature)).collect();
    assert_eq!(bars, [0, 0, 0, 1, 1, 1, 2]);
}

#[test]
fn starts_too_fine_to_represent() {
    use pretty_assertions::assert_eq;
    let wide = Note::rest(Duration::new(1, 1 << 40).unwrap());
    let narrow = Note::rest(Duration::new(1, 3u64.pow(26)).unwrap());
    let track = Track::with_notes(Signature::default(), [wide, narrow, note("C4", 1, 4)]);

    assert_eq!(track.length(), None);
    assert_eq!(track.start_of(1), Position::new(1, 1 << 40));
    assert_eq!(track.start_of(2), None);

    let starts: Vec<Position> = track.iter().map(|(start, _)| start).collect();
    assert_eq!(starts, [Position::zero(), Position::new(1, 1 << 40).unwrap()]);
}
