#![doc = r#"
Rational musical time.

Every length and every point in time is an exact fraction of a whole note.
Nothing in this module touches floating point, so a track of any length
accumulates without drift.

- [`Duration`]: how long a note lasts, always positive
- [`Position`]: where a note starts inside a track, zero or positive
- [`Signature`]: the time signature of a track
"#]

mod duration;
pub use duration::*;

mod position;
pub use position::*;

mod signature;
pub use signature::*;

/// The rational number type backing [`Duration`] and [`Position`].
pub(crate) type Rational = fraction::Ratio<u64>;

/// Adds two ratios exactly. Returns `None` when the reduced sum has a term
/// that doesn't fit in a `u64`.
pub(crate) fn checked_sum(a: Rational, b: Rational) -> Option<Rational> {
    let ([a_numer, b_numer], denom) = common_denominator(a, b);
    narrow(a_numer.checked_add(b_numer)?, denom)
}

/// Subtracts `b` from `a` exactly. Returns `None` when `b` is larger, or the
/// reduced difference has a term that doesn't fit in a `u64`.
pub(crate) fn checked_difference(a: Rational, b: Rational) -> Option<Rational> {
    let ([a_numer, b_numer], denom) = common_denominator(a, b);
    narrow(a_numer.checked_sub(b_numer)?, denom)
}

/// Both numerators over the product of the denominators. Each product of two
/// `u64` terms fits in a `u128`.
fn common_denominator(a: Rational, b: Rational) -> ([u128; 2], u128) {
    let (a_numer, a_denom) = (*a.numer() as u128, *a.denom() as u128);
    let (b_numer, b_denom) = (*b.numer() as u128, *b.denom() as u128);
    ([a_numer * b_denom, b_numer * a_denom], a_denom * b_denom)
}

fn narrow(numer: u128, denom: u128) -> Option<Rational> {
    let reduced = fraction::Ratio::new(numer, denom);
    Some(Rational::new_raw(
        u64::try_from(*reduced.numer()).ok()?,
        u64::try_from(*reduced.denom()).ok()?,
    ))
}
