// Timing, pitch spelling and tempo through the public API

use abc_sketch_wasm::models::{Event, PitchNotation};
use abc_sketch_wasm::theory::{extract_tempo, Fraction, KeySignature};
use abc_sketch_wasm::{structure_text, EngineConfig, Structured};

fn run(text: &str) -> Structured {
    structure_text(text, &EngineConfig::default())
}

fn pitches(result: &Structured) -> Vec<String> {
    result
        .score
        .events()
        .filter_map(Event::timing)
        .filter_map(|t| t.pitch.as_ref().map(PitchNotation::display))
        .collect()
}

#[test]
fn test_key_signature_applies_to_pitches() {
    let result = run("K:D\n| f c =f ^^G, |]");
    assert_eq!(pitches(&result), vec!["F#5", "C#5", "F5", "Gx3"]);

    let result = run("K:Bb\n| B e _e' ^B |]");
    assert_eq!(pitches(&result), vec!["Bb4", "Eb5", "Ebb6", "B4"]);
}

#[test]
fn test_key_lookup_is_case_insensitive() {
    let lower: KeySignature = "f#m".parse().unwrap();
    let upper: KeySignature = "F#M".parse().unwrap();
    assert_eq!(lower, upper);
    assert_eq!(lower, "A".parse::<KeySignature>().unwrap());
}

#[test]
fn test_dotted_pair_law() {
    let result = run("L:1/8\n| A>B c<d e>>f g2 |]");
    let ticks: Vec<Fraction> = result
        .score
        .events()
        .filter_map(Event::timing)
        .map(|t| t.tick)
        .collect();

    // L:1/8 in 4/4: one unit is half a beat
    let half = Fraction::new(1, 2);
    assert_eq!(ticks[0], half * Fraction::new(3, 2));
    assert_eq!(ticks[1], half * Fraction::new(1, 2));
    assert_eq!(ticks[2], half * Fraction::new(1, 2));
    assert_eq!(ticks[3], half * Fraction::new(3, 2));
    assert_eq!(ticks[4], half * Fraction::new(7, 4));
    assert_eq!(ticks[5], half * Fraction::new(1, 4));
    for pair in ticks[..6].chunks(2) {
        assert_eq!(pair[0] + pair[1], Fraction::from_integer(1));
    }

    let measure = result.score.measures().next().unwrap();
    assert_eq!(measure.duration, Fraction::from_integer(1));
}

#[test]
fn test_tempo_extraction() {
    assert_eq!(extract_tempo("1/4=120"), Some(120.0));
    assert_eq!(extract_tempo("1/4 1/8=120"), Some(180.0));
    assert_eq!(extract_tempo("120"), Some(120.0));
    assert_eq!(extract_tempo("\"Allegro\" 3/8=80"), Some(120.0));
    assert_eq!(extract_tempo("120 130"), None);
    assert_eq!(extract_tempo("1/4"), None);
    assert_eq!(extract_tempo("fast"), None);
}

#[test]
fn test_seconds_and_start_times() {
    let result = run("Q:1/4=60\n| A B2 c |]");
    let timings: Vec<_> = result.score.events().filter_map(Event::timing).collect();
    let starts: Vec<f64> = timings.iter().map(|t| t.start_time).collect();
    let seconds: Vec<f64> = timings.iter().map(|t| t.seconds).collect();
    assert_eq!(starts, vec![0.0, 1.0, 3.0]);
    assert_eq!(seconds, vec![1.0, 2.0, 1.0]);
    assert_eq!(result.duration, 4.0);
}

#[test]
fn test_meter_denominator_scales_ticks() {
    let result = run("L:1/8\nM:6/8\nQ:3/8=60\n| A B c d e f |]");
    let first = result.score.events().find_map(Event::timing).unwrap();
    assert_eq!(first.tick, Fraction::from_integer(1));
    assert_eq!(first.measure_fraction, Fraction::new(1, 6));
    // 3/8=60 is 90 quarters a minute; an eighth lasts a third of a second
    assert!((first.seconds - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(first.note_value.as_deref(), Some("8n"));

    let measure = result.score.measures().next().unwrap();
    assert!(measure.is_complete);
}

#[test]
fn test_invalid_tempo_falls_back_to_default() {
    let result = run("Q:1/4=60\n| A B c d |\nQ:soon\n| A B c d |]");
    let timings: Vec<_> = result.score.events().filter_map(Event::timing).collect();
    assert_eq!(timings[0].seconds, 1.0);
    // The unreadable value is replaced by the default tempo of 120
    assert_eq!(timings[7].seconds, 0.5);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_chord_pitches_and_rests() {
    let result = run("K:G\n| [G2bd] z2 |]");
    let timings: Vec<_> = result.score.events().filter_map(Event::timing).collect();
    assert_eq!(
        timings[0].pitch,
        Some(PitchNotation::Chord(vec![
            "G4".to_string(),
            "B5".to_string(),
            "D5".to_string()
        ]))
    );
    assert!(timings[1].pitch.is_none());
    assert_eq!(timings[1].note_value.as_deref(), Some("2n"));
}
