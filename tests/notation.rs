use melodia::prelude::*;
use pretty_assertions::assert_eq;

fn melody(notation: &[(&str, u64, u64)]) -> melodia::Result<Track> {
    let mut track = Track::default();
    for &(text, numerator, denominator) in notation {
        let duration = Duration::new(numerator, denominator)?;
        let note = match text {
            "r" => Note::rest(duration),
            _ => Note::from_notation(text, duration, Velocity::default())?,
        };
        track.add(note);
    }
    Ok(track)
}

#[test]
fn spelling_is_not_stored() {
    let track = melody(&[("Ab3", 1, 4), ("G#3", 1, 4), ("Cb4", 1, 2)]).unwrap();
    let spelled: Vec<String> = track.iter().map(|(_, n)| n.to_string()).collect();
    assert_eq!(spelled, ["G#3 1/4 (100)", "G#3 1/4 (100)", "B3 1/2 (100)"]);
}

#[test]
fn errors_convert_to_the_crate_error() {
    let error = melody(&[("C4", 1, 4), ("H4", 1, 4)]).unwrap_err();
    assert!(matches!(
        error,
        melodia::Error::Parse(ParseError::InvalidLetter('H'))
    ));

    let error = melody(&[("C4", 0, 4)]).unwrap_err();
    assert!(matches!(error, melodia::Error::Duration(_)));
}

#[test]
fn starts_and_bars() {
    let track = melody(&[
        ("E4", 1, 2),
        ("r", 1, 4),
        ("D4", 1, 4),
        ("C4", 3, 4),
        ("B3", 1, 8),
    ])
    .unwrap();

    let bars: Vec<(String, u64)> = track
        .iter()
        .map(|(start, _)| (start.to_string(), start.bar(track.signature())))
        .collect();
    assert_eq!(
        bars,
        [
            ("0/1".to_owned(), 0),
            ("1/2".to_owned(), 0),
            ("3/4".to_owned(), 0),
            ("1/1".to_owned(), 1),
            ("7/4".to_owned(), 1),
        ]
    );
    assert_eq!(track.length(), Position::new(15, 8));
}

#[test]
fn frequencies_double_per_octave() {
    for pitch in -24..120 {
        let tone = Tone::new(pitch);
        let ratio = (tone + 12).to_frequency() / tone.to_frequency();
        assert!((ratio - 2.).abs() < 1e-12, "{tone}");
        assert_eq!(Tone::from_notation(&tone.to_notation(true)).unwrap(), tone);
    }
}
