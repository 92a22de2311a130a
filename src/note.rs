use core::fmt;

use crate::prelude::*;

#[doc = r#"
A single note: a [`Tone`] (or a rest), how long it lasts and how loud it is.

A note has no start time of its own. Its place in time comes from the
[`Track`] that holds it. Notes are plain values; the `with_*` methods
return modified copies and leave the original untouched.

# Example
```rust
# use melodia::prelude::*;
let a4 = Tone::from_notation("A4").unwrap();
let quarter = Duration::new(1, 4).unwrap();

let note = Note::new(a4, quarter, Velocity::new(80).unwrap());
let louder = note.with_velocity(Velocity::MAX);

assert_eq!(note.velocity().byte(), 80);
assert_eq!(louder.velocity().byte(), 127);
assert_eq!(louder.tone(), Some(a4));
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "NoteFields")
)]
pub struct Note {
    tone: Option<Tone>,
    duration: Duration,
    velocity: Velocity,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct NoteFields {
    tone: Option<Tone>,
    duration: Duration,
    velocity: Velocity,
}

#[cfg(feature = "serde")]
impl From<NoteFields> for Note {
    fn from(fields: NoteFields) -> Self {
        match fields.tone {
            Some(tone) => Self::new(tone, fields.duration, fields.velocity),
            None => Self::rest(fields.duration),
        }
    }
}

impl Note {
    /// Create a sounding note.
    pub const fn new(tone: Tone, duration: Duration, velocity: Velocity) -> Self {
        Self {
            tone: Some(tone),
            duration,
            velocity,
        }
    }

    /// Create a rest. Rests take up time but make no sound, and have a
    /// velocity of zero.
    pub const fn rest(duration: Duration) -> Self {
        Self {
            tone: None,
            duration,
            velocity: Velocity::ZERO,
        }
    }

    /// Parse the tone from notation and build a note from it.
    ///
    /// ```rust
    /// # use melodia::prelude::*;
    /// let note = Note::from_notation("C#4", Duration::new(1, 8).unwrap(), Velocity::default()).unwrap();
    /// assert_eq!(note.tone().unwrap().pitch(), 49);
    /// ```
    pub fn from_notation(
        notation: &str,
        duration: Duration,
        velocity: Velocity,
    ) -> Result<Self, ParseError> {
        Ok(Self::new(Tone::from_notation(notation)?, duration, velocity))
    }

    /// The tone of the note, `None` for rests
    #[inline]
    pub const fn tone(&self) -> Option<Tone> {
        self.tone
    }

    /// True if the note is a rest
    #[inline]
    pub const fn is_rest(&self) -> bool {
        self.tone.is_none()
    }

    /// How long the note lasts
    #[inline]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// How loud the note is
    #[inline]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Returns a copy of the note with a different duration.
    pub const fn with_duration(self, duration: Duration) -> Self {
        Self { duration, ..self }
    }

    /// Returns a copy of the note with a different velocity. Rests are
    /// silent, so a rest is returned unchanged.
    pub const fn with_velocity(self, velocity: Velocity) -> Self {
        match self.tone {
            Some(_) => Self { velocity, ..self },
            None => self,
        }
    }

    /// Returns a copy of the note with a different tone. A rest given a tone
    /// becomes a sounding note, keeping its velocity.
    pub const fn with_tone(self, tone: Tone) -> Self {
        Self {
            tone: Some(tone),
            ..self
        }
    }

    /// Returns a copy of the note transposed by `semitones`. Rests stay rests.
    pub fn transposed(self, semitones: i32) -> Self {
        Self {
            tone: self.tone.map(|t| t.transposed(semitones)),
            ..self
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tone {
            Some(tone) => write!(f, "{} {} ({})", tone, self.duration, self.velocity),
            None => write!(f, "rest {}", self.duration),
        }
    }
}

#[cfg(test)]
fn quarter() -> Duration {
    Duration::new(1, 4).unwrap()
}

#[test]
fn copies_leave_the_original_alone() {
    use pretty_assertions::assert_eq;
    let original = Note::from_notation("A4", Duration::new(3, 8).unwrap(), Velocity::default())
        .unwrap();
    let longer = original.with_duration(Duration::new(7, 4).unwrap());
    let quieter = original.with_velocity(Velocity::new(10).unwrap());

    assert_eq!(original.duration(), Duration::new(3, 8).unwrap());
    assert_eq!(longer.duration(), Duration::new(7, 4).unwrap());
    assert_eq!(longer.tone(), original.tone());
    assert_eq!(longer.velocity(), original.velocity());

    assert_eq!(quieter.velocity().byte(), 10);
    assert_eq!(quieter.duration(), original.duration());
}

#[test]
fn equality_covers_every_field() {
    use pretty_assertions::assert_eq;
    let c4 = Tone::from_notation("C4").unwrap();
    let note = Note::new(c4, quarter(), Velocity::default());

    assert_eq!(
        note,
        Note::new(c4, Duration::new(2, 8).unwrap(), Velocity::default())
    );
    assert_ne!(note, note.with_velocity(Velocity::MAX));
    assert_ne!(note, note.transposed(12));
    assert_ne!(note, Note::rest(quarter()));
}

#[test]
fn rests() {
    use pretty_assertions::assert_eq;
    let rest = Note::rest(quarter());
    assert!(rest.is_rest());
    assert_eq!(rest.velocity(), Velocity::ZERO);
    assert_eq!(rest.transposed(5), rest);
    assert_eq!(rest.with_velocity(Velocity::MAX), rest);
    assert_eq!(rest.with_velocity(Velocity::MAX).velocity(), Velocity::ZERO);
    assert_eq!(rest.to_string(), "rest 1/4");

    let sounding = rest.with_tone(Tone::new(48));
    assert!(!sounding.is_rest());
    assert_eq!(sounding.to_string(), "C4 1/4 (0)");
}

#[cfg(feature = "serde")]
#[test]
fn deserialized_rests_are_silent() {
    use pretty_assertions::assert_eq;
    let fields = |tone| NoteFields {
        tone,
        duration: quarter(),
        velocity: Velocity::MAX,
    };
    assert_eq!(Note::from(fields(None)), Note::rest(quarter()));
    assert_eq!(
        Note::from(fields(Some(Tone::new(48)))),
        Note::new(Tone::new(48), quarter(), Velocity::MAX)
    );
}
