#![doc = r#"
Contains the channel messages a melody is made of

# Layout
```text
 status byte      data bytes
|-----------|   |-----|-------|
| kind | ch |   | key | value |
|-----------|   |-----|-------|
  4 bit  4 bit    7 bit  7 bit
```

Only note-on and note-off are produced. The other kinds are recognised
so that a reader can skip them with the right number of data bytes.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::prelude::*;

#[doc = r#"
One of the sixteen MIDI channels.

Channels are named from one, as they are in sequencers, and encoded from
zero in the low nibble of the status byte.
"#]
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Default for Channel {
    fn default() -> Self {
        Self::One
    }
}

impl Channel {
    /// Identify the channel from the low nibble of a status byte.
    pub fn from_status(status: u8) -> Self {
        // a nibble is always a valid channel
        Self::try_from(status & 0x0F).unwrap_or_default()
    }

    /// Returns the zero-based channel number
    pub fn index(&self) -> u8 {
        (*self).into()
    }
}

/// The high nibble of a channel status byte
#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum StatusKind {
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyphonicAftertouch = 0xA,
    ControlChange = 0xB,
    ProgramChange = 0xC,
    ChannelAftertouch = 0xD,
    PitchBend = 0xE,
}

impl StatusKind {
    /// Returns the number of data bytes following a status of this kind.
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelAftertouch => 1,
            _ => 2,
        }
    }
}

/// A note event on some channel
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VoiceEvent {
    /// A key starts sounding
    NoteOn {
        /// MIDI key number, 0-127
        key: u8,
        /// Attack velocity
        velocity: Velocity,
    },
    /// A key stops sounding
    NoteOff {
        /// MIDI key number, 0-127
        key: u8,
        /// Release velocity
        velocity: Velocity,
    },
}

impl VoiceEvent {
    /// Returns the key the event is about
    pub const fn key(&self) -> u8 {
        match self {
            Self::NoteOn { key, .. } | Self::NoteOff { key, .. } => *key,
        }
    }

    /// Returns the status kind of the event
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::NoteOn { .. } => StatusKind::NoteOn,
            Self::NoteOff { .. } => StatusKind::NoteOff,
        }
    }
}

/// A [`VoiceEvent`] bound to a [`Channel`]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Create a new channel voice message
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Returns the channel of the message
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the event of the message
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// Returns the status byte of the message
    pub fn status(&self) -> u8 {
        (u8::from(self.event.kind()) << 4) | self.channel.index()
    }

    /// Appends the status and data bytes of the message to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        let velocity = match self.event {
            VoiceEvent::NoteOn { velocity, .. } | VoiceEvent::NoteOff { velocity, .. } => velocity,
        };
        out.extend_from_slice(&[self.status(), self.event.key(), velocity.byte()]);
    }
}

#[test]
fn status_bytes() {
    use pretty_assertions::assert_eq;
    let on = ChannelVoiceMessage::new(
        Channel::Four,
        VoiceEvent::NoteOn {
            key: 0x3C,
            velocity: Velocity::MAX,
        },
    );
    let mut bytes = Vec::new();
    on.write_to(&mut bytes);
    assert_eq!(bytes, [0x93, 0x3C, 0x7F]);

    let off = ChannelVoiceMessage::new(
        Channel::Sixteen,
        VoiceEvent::NoteOff {
            key: 0x48,
            velocity: Velocity::ZERO,
        },
    );
    assert_eq!(off.status(), 0x8F);
}

#[test]
fn channels_from_status() {
    use pretty_assertions::assert_eq;
    assert_eq!(Channel::from_status(0x90), Channel::One);
    assert_eq!(Channel::from_status(0x8A), Channel::Eleven);
    assert_eq!(Channel::try_from(16).ok(), None);
    assert_eq!(StatusKind::try_from(0xC).unwrap().data_len(), 1);
    assert_eq!(StatusKind::try_from(0xB).unwrap().data_len(), 2);
    assert!(StatusKind::try_from(0xF).is_err());
}
