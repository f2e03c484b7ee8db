// Cursor lookups, status text and playback scheduling

use abc_sketch_wasm::renderers::{describe_location, loop_region, schedule, LoopRegion};
use abc_sketch_wasm::{locate, structure_text, EngineConfig, Selection, Structured};

const TUNE: &str = "K:D\n| A B c d | f/ g/ a3 |]";

fn run(text: &str) -> Structured {
    structure_text(text, &EngineConfig::default())
}

fn status_at(text: &str, pos: usize) -> String {
    let result = run(text);
    let location = locate(&result.score, &Selection::cursor(pos));
    describe_location(&result.score, &location)
}

#[test]
fn test_cursor_inside_note() {
    let result = run(TUNE);
    let location = locate(&result.score, &Selection::cursor(17));

    assert_eq!(location.measures.len(), 1);
    assert_eq!(location.measures[0].index, 2);
    assert_eq!(location.events.len(), 1);
    assert_eq!(location.event(&result.score).unwrap().raw_text(), "f/");
    assert_eq!(
        describe_location(&result.score, &location),
        "Measure 2 (Valid) -- Note F#5, 8n"
    );
}

#[test]
fn test_cursor_before_note_only_finds_measure() {
    let result = run(TUNE);
    let location = locate(&result.score, &Selection::cursor(16));
    assert_eq!(location.measures[0].index, 2);
    assert!(location.events.is_empty());
    assert_eq!(describe_location(&result.score, &location), "Measure 2 (Valid)");
}

#[test]
fn test_last_measure_is_open_ended() {
    let result = run(TUNE);
    let location = locate(&result.score, &Selection::cursor(TUNE.len()));
    assert_eq!(location.measures[0].index, 2);
}

#[test]
fn test_only_main_selection_counts() {
    let result = run(TUNE);
    let selection = Selection::new(vec![
        abc_sketch_wasm::TextRange::new(7, 7),
        abc_sketch_wasm::TextRange::new(17, 17),
    ]);
    let location = locate(&result.score, &selection);
    assert_eq!(location.measures[0].index, 1);
}

#[test]
fn test_empty_score_has_no_location() {
    let result = run("T:Nothing yet\n");
    let location = locate(&result.score, &Selection::cursor(3));
    assert!(location.is_empty());
    assert_eq!(describe_location(&result.score, &location), "");
    assert_eq!(loop_region(&result.score, &location), None);
}

#[test]
fn test_chord_rest_and_pickup_descriptions() {
    assert_eq!(
        status_at("| [C2EG] z2 |]", 4),
        "Measure 1 (Valid) -- Chord [C4 E4 G4], 2n"
    );
    assert_eq!(status_at("| [C2EG] z2 |]", 10), "Measure 1 (Valid) -- Rest 2n");
    assert_eq!(status_at("A2 | B4 |]", 1), "Measure 0 (Pickup) -- Note A4, 2n");
}

#[test]
fn test_measure_status_in_description() {
    assert_eq!(status_at("| A B c |]", 5), "Measure 1 (Underfilled) -- Note B4, 4n");
    assert_eq!(status_at("| A B c d e |]", 5), "Measure 1 (Overfilled) -- Note B4, 4n");
}

#[test]
fn test_loop_region_covers_cursor_measure() {
    let result = run(TUNE);
    let second = locate(&result.score, &Selection::cursor(17));
    assert_eq!(
        loop_region(&result.score, &second),
        Some(LoopRegion {
            start: 2.0,
            end: 4.0
        })
    );

    let first = locate(&result.score, &Selection::cursor(8));
    assert_eq!(
        loop_region(&result.score, &first),
        Some(LoopRegion {
            start: 0.0,
            end: 2.0
        })
    );
}

#[test]
fn test_playback_schedule() {
    let result = run(TUNE);
    let playback = schedule(&result.score);

    let notes: Vec<String> = playback
        .events
        .iter()
        .flat_map(|e| e.notes.clone())
        .collect();
    assert_eq!(notes, vec!["A4", "B4", "C#5", "D5", "F#5", "G5", "A5"]);

    let times: Vec<f64> = playback.events.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.25, 2.5]);
    assert_eq!(playback.events[6].duration, 1.5);
    assert_eq!(playback.duration, 4.0);
    assert_eq!(playback.duration, result.duration);
}

#[test]
fn test_rests_are_scheduled_silent() {
    let playback = schedule(&run("| z2 [C2E] |]").score);
    assert_eq!(playback.events.len(), 2);
    assert!(playback.events[0].notes.is_empty());
    assert_eq!(playback.events[1].notes, vec!["C4", "E4"]);
    assert_eq!(playback.events[1].time, 1.0);
}
