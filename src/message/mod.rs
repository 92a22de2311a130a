#![doc = r#"
Contains the MIDI messages exchanged with a track chunk
"#]

pub mod channel;
pub use channel::*;
