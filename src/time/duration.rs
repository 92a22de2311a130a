use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use thiserror::Error;

use super::{Rational, checked_sum};

/// An error returned when building a [`Duration`] from a zero component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid duration {numerator}/{denominator}: both parts must be positive")]
pub struct DurationError {
    /// The rejected numerator
    pub numerator: u64,
    /// The rejected denominator
    pub denominator: u64,
}

#[doc = r#"
The length of a note as a fraction of a whole note.

A duration is always positive and always stored in lowest terms, so
`2/8` and `1/4` are the same value.

# Example
```rust
# use melodia::prelude::*;
let quarter = Duration::new(1, 4).unwrap();
let eighth = Duration::new(2, 16).unwrap();

assert_eq!(eighth, Duration::new(1, 8).unwrap());
assert_eq!(quarter + eighth, Duration::new(3, 8).unwrap());
assert!(eighth < quarter);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(u64, u64)", into = "(u64, u64)")
)]
pub struct Duration(Rational);

impl Duration {
    /// Create a new duration, reduced to lowest terms.
    ///
    /// # Errors
    /// if either the numerator or the denominator is zero.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, DurationError> {
        if numerator == 0 || denominator == 0 {
            return Err(DurationError {
                numerator,
                denominator,
            });
        }
        Ok(Self(Rational::new(numerator, denominator)))
    }

    /// A whole note
    pub fn whole() -> Self {
        Self(Rational::from_integer(1))
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

    pub(crate) fn ratio(&self) -> Rational {
        self.0
    }

    /// Adds two durations, or returns `None` if the exact sum doesn't fit in
    /// a 64-bit numerator and denominator.
    ///
    /// ```rust
    /// # use melodia::prelude::*;
    /// let third = Duration::new(1, 3).unwrap();
    /// assert_eq!(third.checked_add(third), Duration::new(2, 3).ok());
    ///
    /// let tiny = Duration::new(1, u64::MAX).unwrap();
    /// assert_eq!(tiny.checked_add(Duration::new(1, 2).unwrap()), None);
    /// ```
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        checked_sum(self.0, rhs.0).map(Self)
    }

    /// Wraps a ratio already known to be positive.
    pub(crate) fn from_ratio(ratio: Rational) -> Option<Self> {
        (*ratio.numer() != 0).then_some(Self(ratio))
    }
}

impl TryFrom<(u64, u64)> for Duration {
    type Error = DurationError;
    fn try_from((numerator, denominator): (u64, u64)) -> Result<Self, Self::Error> {
        Self::new(numerator, denominator)
    }
}

impl From<Duration> for (u64, u64) {
    fn from(duration: Duration) -> Self {
        (duration.numerator(), duration.denominator())
    }
}

/// # Panics
/// if the sum overflows. See [`Duration::checked_add`].
impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Self) -> Self::Output {
        match self.checked_add(rhs) {
            Some(sum) => sum,
            None => panic!("overflow when adding durations {self} and {rhs}"),
        }
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator(), self.denominator())
    }
}

/// Sums durations into an optional duration. The sum of nothing is `None`,
/// since a duration can't be zero, and so is a sum that overflows.
impl Sum<Duration> for Option<Duration> {
    fn sum<I: Iterator<Item = Duration>>(mut iter: I) -> Self {
        let first = iter.next()?;
        iter.try_fold(first, Duration::checked_add)
    }
}

#[test]
fn durations_are_reduced() {
    use pretty_assertions::assert_eq;
    let d = Duration::new(6, 8).unwrap();
    assert_eq!((d.numerator(), d.denominator()), (3, 4));
    let d = Duration::new(16, 4).unwrap();
    assert_eq!((d.numerator(), d.denominator()), (4, 1));
    assert_eq!(Duration::new(1, 2).unwrap(), Duration::new(2, 4).unwrap());
}

#[test]
fn zero_components_are_rejected() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        Duration::new(0, 4),
        Err(DurationError {
            numerator: 0,
            denominator: 4
        })
    );
    assert!(Duration::new(1, 0).is_err());
    assert!(Duration::try_from((0, 0)).is_err());
}

#[test]
fn durations_convert_through_pairs() {
    use pretty_assertions::assert_eq;
    let pair: (u64, u64) = Duration::new(6, 8).unwrap().into();
    assert_eq!(pair, (3, 4));
    // unreduced pairs are reduced on the way in
    assert_eq!(Duration::try_from((2, 8)), Duration::new(1, 4));
    assert_eq!(
        Duration::try_from((5, 0)),
        Err(DurationError {
            numerator: 5,
            denominator: 0
        })
    );
}

#[test]
fn addition_is_exact() {
    use pretty_assertions::assert_eq;
    let third = Duration::new(1, 3).unwrap();
    let sixth = Duration::new(1, 6).unwrap();
    let quarter = Duration::new(1, 4).unwrap();

    assert_eq!(third + sixth, Duration::new(1, 2).unwrap());
    assert_eq!((third + sixth) + quarter, third + (sixth + quarter));
    assert_eq!(third + quarter, quarter + third);

    let mut total = Duration::new(1, 16).unwrap();
    for _ in 0..15 {
        total += Duration::new(1, 16).unwrap();
    }
    assert_eq!(total, Duration::whole());
    assert_eq!((total.numerator(), total.denominator()), (1, 1));
}

#[test]
fn sum_of_durations() {
    use pretty_assertions::assert_eq;
    let sum: Option<Duration> = [(1, 4), (1, 8), (1, 8)]
        .into_iter()
        .map(|(n, d)| Duration::new(n, d).unwrap())
        .sum();
    assert_eq!(sum, Some(Duration::new(1, 2).unwrap()));

    let empty: Option<Duration> = core::iter::empty().sum();
    assert_eq!(empty, None);
}

#[test]
fn sums_that_outgrow_64_bits() {
    use pretty_assertions::assert_eq;
    // 2^32 * 3^20 still fits in a u64
    let fits = Duration::new(1, 1 << 32)
        .unwrap()
        .checked_add(Duration::new(1, 3u64.pow(20)).unwrap())
        .unwrap();
    assert_eq!(fits.numerator(), 3u64.pow(20) + (1 << 32));
    assert_eq!(fits.denominator(), (1 << 32) * 3u64.pow(20));

    // 2^40 * 3^26 doesn't
    let wide = Duration::new(1, 1 << 40).unwrap();
    let narrow = Duration::new(1, 3u64.pow(26)).unwrap();
    assert_eq!(wide.checked_add(narrow), None);
    let sum: Option<Duration> = [wide, narrow].into_iter().sum();
    assert_eq!(sum, None);

    // terms above u64 cancel out before the result is stored
    let big = Duration::new(u64::MAX - 1, u64::MAX).unwrap();
    let small = Duration::new(1, u64::MAX).unwrap();
    assert_eq!(big.checked_add(small), Some(Duration::whole()));
}

#[test]
fn display() {
    use pretty_assertions::assert_eq;
    assert_eq!(Duration::new(3, 12).unwrap().to_string(), "1/4");
}
