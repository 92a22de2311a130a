use core::fmt;

use thiserror::Error;

/// An error returned for velocities above `127`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Velocity {0} is out of range, expected 0-127")]
pub struct VelocityError(pub u8);

#[doc = r#"
How loud a note is played, from `0` to `127`.

Velocities are 7-bit numbers so they can be written straight into a MIDI
note event.

# Example
```rust
# use melodia::prelude::*;
let velocity = Velocity::new(64).unwrap();
assert_eq!(velocity.byte(), 64);

assert!(Velocity::new(128).is_err());
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct Velocity(u8);

impl Velocity {
    /// Silence. Rests carry this velocity.
    pub const ZERO: Self = Self(0);
    /// The loudest velocity
    pub const MAX: Self = Self(127);

    /// Create a new velocity.
    ///
    /// Checks for correctness (leading 0 bit).
    pub const fn new(velocity: u8) -> Result<Self, VelocityError> {
        if velocity > 127 {
            return Err(VelocityError(velocity));
        }
        Ok(Self(velocity))
    }

    /// Returns the underlying byte of the velocity
    #[inline]
    pub const fn byte(&self) -> u8 {
        self.0
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self(100)
    }
}

impl TryFrom<u8> for Velocity {
    type Error = VelocityError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Velocity> for u8 {
    fn from(velocity: Velocity) -> Self {
        velocity.0
    }
}

impl fmt::Display for Velocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn velocity_range() {
    use pretty_assertions::assert_eq;
    assert_eq!(Velocity::new(0), Ok(Velocity::ZERO));
    assert_eq!(Velocity::new(127), Ok(Velocity::MAX));
    assert_eq!(Velocity::new(128), Err(VelocityError(128)));
    assert_eq!(Velocity::try_from(255), Err(VelocityError(255)));
    assert_eq!(u8::from(Velocity::MAX), 127);
}
