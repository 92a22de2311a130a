use crate::prelude::*;

/// The message part of a track event
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrackMessage {
    /// A note event
    ChannelVoice(ChannelVoiceMessage),
    /// A meta event
    Meta(MetaMessage),
}

impl TrackMessage {
    /// Where the message sorts among messages on the same tick.
    ///
    /// Meta events come first, then note-offs, then note-ons, so a note
    /// ending on the same tick another starts is released before the next
    /// one is struck.
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Meta(_) => 0,
            Self::ChannelVoice(message) => match message.event() {
                VoiceEvent::NoteOff { .. } => 1,
                VoiceEvent::NoteOn { .. } => 2,
            },
        }
    }

    /// Appends the status and data bytes of the message to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::ChannelVoice(message) => message.write_to(out),
            Self::Meta(message) => message.write_to(out),
        }
    }
}

impl From<ChannelVoiceMessage> for TrackMessage {
    fn from(value: ChannelVoiceMessage) -> Self {
        Self::ChannelVoice(value)
    }
}

impl From<MetaMessage> for TrackMessage {
    fn from(value: MetaMessage) -> Self {
        Self::Meta(value)
    }
}

/// An event placed at an absolute tick from the start of the track
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ticked<T> {
    accumulated_ticks: u64,
    event: T,
}

impl<T> Ticked<T> {
    /// Place `event` at `accumulated_ticks`
    pub const fn new(accumulated_ticks: u64, event: T) -> Self {
        Self {
            accumulated_ticks,
            event,
        }
    }

    /// Returns the absolute tick of the event
    pub const fn accumulated_ticks(&self) -> u64 {
        self.accumulated_ticks
    }

    /// Returns the event
    pub const fn event(&self) -> &T {
        &self.event
    }
}

/// Stable sort by tick, then by [`TrackMessage::priority`].
pub fn sort_events(events: &mut [Ticked<TrackMessage>]) {
    events.sort_by_key(|e| (e.accumulated_ticks, e.event.priority()));
}

#[cfg(test)]
fn voice(event: VoiceEvent) -> TrackMessage {
    ChannelVoiceMessage::new(Channel::One, event).into()
}

#[test]
fn simultaneous_events_are_ordered() {
    use pretty_assertions::assert_eq;
    let on = voice(VoiceEvent::NoteOn {
        key: 60,
        velocity: Velocity::MAX,
    });
    let off = voice(VoiceEvent::NoteOff {
        key: 60,
        velocity: Velocity::ZERO,
    });
    let tempo: TrackMessage = MetaMessage::Tempo(Tempo::DEFAULT).into();

    let mut events = vec![
        Ticked::new(480, on),
        Ticked::new(480, off),
        Ticked::new(0, on),
        Ticked::new(0, tempo),
    ];
    sort_events(&mut events);

    let order: Vec<(u64, u8)> = events
        .iter()
        .map(|e| (e.accumulated_ticks(), e.event().priority()))
        .collect();
    assert_eq!(order, [(0, 0), (0, 2), (480, 1), (480, 2)]);
}
