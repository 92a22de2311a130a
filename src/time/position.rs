use core::fmt;
use core::ops::{Add, AddAssign};

use super::{Duration, Rational, Signature, checked_difference, checked_sum};

#[doc = r#"
A point in time inside a track, in whole notes from its beginning.

Unlike a [`Duration`], a position may be zero: the first note of every
track starts at [`Position::zero`].

# Example
```rust
# use melodia::prelude::*;
let quarter = Duration::new(1, 4).unwrap();
let position = Position::zero() + quarter + quarter;

assert_eq!(position, Position::new(1, 2).unwrap());
assert_eq!(position.to_string(), "1/2");
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position(Rational);

impl Position {
    /// The beginning of a track
    pub fn zero() -> Self {
        Self(Rational::from_integer(0))
    }

    /// Create a position from a fraction of whole notes. Returns `None` when
    /// the denominator is zero.
    pub fn new(numerator: u64, denominator: u64) -> Option<Self> {
        (denominator != 0).then(|| Self(Rational::new(numerator, denominator)))
    }

    /// Returns the reduced numerator
    #[inline]
    pub fn numerator(&self) -> u64 {
        *self.0.numer()
    }

    /// Returns the reduced denominator
    #[inline]
    pub fn denominator(&self) -> u64 {
        *self.0.denom()
    }

    /// True for the beginning of a track
    pub fn is_zero(&self) -> bool {
        self.numerator() == 0
    }

    /// Returns the time elapsed since `earlier`, or `None` if `earlier` is
    /// not strictly before this position.
    pub fn duration_since(&self, earlier: Position) -> Option<Duration> {
        checked_difference(self.0, earlier.0).and_then(Duration::from_ratio)
    }

    /// Returns the zero-based bar this position falls in under `signature`.
    ///
    /// ```rust
    /// # use melodia::prelude::*;
    /// let three_four = Signature::new(3, 4).unwrap();
    /// assert_eq!(Position::new(1, 2).unwrap().bar(three_four), 0);
    /// assert_eq!(Position::new(3, 4).unwrap().bar(three_four), 1);
    /// ```
    pub fn bar(&self, signature: Signature) -> u64 {
        // (n / d) / (beats / unit), floored, in u128 so nothing overflows
        let scaled = *self.0.numer() as u128 * signature.beat_unit() as u128;
        let bar = *self.0.denom() as u128 * signature.beats() as u128;
        u64::try_from(scaled / bar).unwrap_or(u64::MAX)
    }

    /// Moves the position later by `duration`, or returns `None` if the
    /// exact result doesn't fit in a 64-bit numerator and denominator.
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        checked_sum(self.0, duration.ratio()).map(Self)
    }

    pub(crate) fn ratio(&self) -> Rational {
        self.0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Duration> for Position {
    fn from(value: Duration) -> Self {
        Self(value.ratio())
    }
}

/// # Panics
/// if the sum overflows. See [`Position::checked_add`].
impl Add<Duration> for Position {
    type Output = Position;
    fn add(self, rhs: Duration) -> Self::Output {
        match self.checked_add(rhs) {
            Some(sum) => sum,
            None => panic!("overflow when moving position {self} by {rhs}"),
        }
    }
}

impl AddAssign<Duration> for Position {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator(), self.denominator())
    }
}

#[test]
fn positions_accumulate_durations() {
    use pretty_assertions::assert_eq;
    let mut position = Position::zero();
    assert!(position.is_zero());
    position += Duration::new(1, 3).unwrap();
    position += Duration::new(2, 3).unwrap();
    assert_eq!(position, Position::new(1, 1).unwrap());
    assert_eq!(Position::new(0, 7).unwrap(), Position::zero());
    assert_eq!(Position::new(1, 0), None);
}

#[test]
fn checked_moves() {
    use pretty_assertions::assert_eq;
    let start = Position::new(1, 1 << 40).unwrap();
    assert_eq!(start.checked_add(Duration::new(1, 3u64.pow(26)).unwrap()), None);
    assert_eq!(
        start.checked_add(Duration::new(1, 1 << 40).unwrap()),
        Position::new(1, 1 << 39)
    );
    assert_eq!(
        Position::zero().checked_add(Duration::new(1, 3u64.pow(26)).unwrap()),
        Position::new(1, 3u64.pow(26))
    );
}

#[test]
fn duration_between_positions() {
    use pretty_assertions::assert_eq;
    let start = Position::new(1, 4).unwrap();
    let end = Position::new(7, 8).unwrap();
    assert_eq!(end.duration_since(start), Some(Duration::new(5, 8).unwrap()));
    assert_eq!(start.duration_since(end), None);
    assert_eq!(start.duration_since(start), None);
}
