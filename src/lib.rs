#![warn(missing_docs)]
#![doc = r#"
Melodies as plain values, and an exact Standard MIDI File codec for them.

A [`Track`] is a time signature and a sequence of [`Note`]s. Each note is a
[`Tone`] (or a rest), a [`Duration`] and a [`Velocity`]. Durations are exact
fractions of a whole note, so start times never drift and a track written
with [`MidiWriter`] reads back from [`MidiReader`] unchanged.

# Example
```rust
use melodia::prelude::*;

let quarter = Duration::new(1, 4)?;
let mut track = Track::new(Signature::new(3, 4)?);
for notation in ["C4", "E4", "G4"] {
    track.add(Note::from_notation(notation, quarter, Velocity::default())?);
}

let bytes = melodia::dumps(&track)?;
assert_eq!(melodia::loads(&bytes)?, track);
# Ok::<(), melodia::Error>(())
```

# Features
- `tracing` (default): log skipped events and codec summaries through
  [`tracing`](https://docs.rs/tracing)
- `serde`: derive `Serialize` and `Deserialize` for the data model
"#]

/// Pitches, their notation and their frequency
pub mod tone;
pub use tone::*;

/// Note loudness
pub mod velocity;
pub use velocity::*;

pub mod time;
pub use time::*;

/// A tone, or a rest, with a duration and a velocity
pub mod note;
pub use note::*;

pub mod track;
pub use track::*;

pub mod message;
pub use message::*;

pub mod vlq;

pub mod file;
pub use file::*;

pub mod writer;
pub use writer::*;

pub mod reader;
pub use reader::*;

mod error;
pub use error::{Error, Result};

/// Everything needed to build, write and read tracks
pub mod prelude {
    pub use crate::{
        file::*, message::*, note::*, reader::*, time::*, tone::*, track::*, velocity::*,
        writer::*,
    };
}
