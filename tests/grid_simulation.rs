//! Grid simulation integration tests

use echolocation::cell::{CellKind, Instrument};
use echolocation::core::config::CellDefaults;
use echolocation::core::types::GRID_SIZE;
use echolocation::pattern::{Pattern, PatternEdit};
use echolocation::simulation::{run_simulation_tick, Simulation};

fn sim_with(edits: Vec<PatternEdit>) -> Simulation {
    let mut sim = Simulation::default();
    Pattern { edits }
        .apply_to_grid(&mut sim.grid, &CellDefaults::default())
        .unwrap();
    sim
}

fn pitch_at(sim: &Simulation, row: usize, col: usize) -> String {
    match sim.grid.get(row, col).unwrap().kind {
        CellKind::Note(note) => note.pitch(),
        ref other => panic!("expected note at ({}, {}), got {:?}", row, col, other),
    }
}

#[test]
fn test_metronome_next_to_note_plays_quarter_note() {
    let mut sim = sim_with(vec![
        PatternEdit::new(0, 0, &["m", "1"]),
        PatternEdit::new(0, 1, &["c"]),
    ]);

    // Fired pulse rests on the metronome during its first tick
    let first = run_simulation_tick(&mut sim);
    assert!(first.sounds.is_silent());

    let second = run_simulation_tick(&mut sim);
    let synth = second.sounds.get(Instrument::Synth);
    assert_eq!(synth.pitches, vec!["C4"]);
    assert_eq!(synth.durations, vec![0.25]);

    // With ticks_per_beat = 1 the note keeps playing every tick
    for _ in 0..5 {
        let out = run_simulation_tick(&mut sim);
        assert_eq!(out.sounds.get(Instrument::Synth).pitches, vec!["C4"]);
    }
}

#[test]
fn test_pulse_circulates_in_redirector_loop() {
    let mut sim = sim_with(vec![
        PatternEdit::new(5, 4, &["m", "9"]),
        PatternEdit::new(5, 5, &["right"]),
        PatternEdit::new(5, 6, &["down"]),
        PatternEdit::new(6, 6, &["left"]),
        PatternEdit::new(6, 5, &["up"]),
    ]);
    run_simulation_tick(&mut sim); // tick 0: fire

    let expected = [(5, 5), (5, 6), (6, 6), (6, 5), (5, 5), (5, 6), (6, 6), (6, 5)];
    for (row, col) in expected {
        let out = run_simulation_tick(&mut sim);
        let occupied: Vec<(usize, usize)> = out
            .grid
            .iter()
            .filter(|(_, cell)| !cell.signals.is_empty())
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(occupied, vec![(row, col)], "tick {}", out.tick);
    }
}

#[test]
fn test_adjuster_cycles_note_back_after_twelve_hits() {
    let mut sim = sim_with(vec![
        PatternEdit::new(0, 0, &["n", "1"]),
        PatternEdit::new(1, 0, &["c", "+", "3"]),
    ]);

    run_simulation_tick(&mut sim); // first pulse only rests on the adjuster
    let mut seen = Vec::new();
    for _ in 0..12 {
        run_simulation_tick(&mut sim);
        seen.push(pitch_at(&sim, 1, 0));
    }
    assert_eq!(
        seen,
        vec!["D3", "D#3", "E3", "F3", "F#3", "G3", "G#3", "A3", "A#3", "B3", "C3", "C#3"]
    );
}

#[test]
fn test_metronome_and_adjuster_meet_on_one_note() {
    // Metronome pulse arrives from the west, adjuster pulse from the north, same tick
    let mut sim = sim_with(vec![
        PatternEdit::new(1, 0, &["m", "9"]),
        PatternEdit::new(0, 1, &["n", "9"]),
        PatternEdit::new(1, 1, &["e", "^"]),
    ]);
    run_simulation_tick(&mut sim);
    let out = run_simulation_tick(&mut sim);

    // Routing is in scan order: the adjuster pulse from row 0 lands first
    assert_eq!(out.sounds.get(Instrument::MonoSynth).pitches, vec!["F4"]);
    assert_eq!(pitch_at(&sim, 1, 1), "F4");
}

#[test]
fn test_edge_pulses_vanish_without_effect() {
    let mut sim = sim_with(vec![
        PatternEdit::new(0, GRID_SIZE - 1, &["m", "1"]),
        PatternEdit::new(GRID_SIZE - 1, 0, &["n", "1"]),
    ]);
    for _ in 0..10 {
        let out = run_simulation_tick(&mut sim);
        assert!(out.sounds.is_silent());
        let resting: usize = out.grid.iter().map(|(_, cell)| cell.signals.len()).sum();
        assert_eq!(resting, 2);
    }
    assert_eq!(sim.grid.width, GRID_SIZE);
    assert_eq!(sim.grid.height, GRID_SIZE);
}

#[test]
fn test_demo_pattern_runs_and_plays() {
    let mut sim = Simulation::default();
    Pattern::demo()
        .apply_to_grid(&mut sim.grid, &CellDefaults::default())
        .unwrap();

    let mut played = 0;
    for _ in 0..64 {
        played += run_simulation_tick(&mut sim).sounds.note_count();
    }
    assert!(played > 0);
    assert_eq!(sim.current_tick, 64);
}

#[test]
fn test_random_pattern_runs() {
    let mut sim = Simulation::default();
    Pattern::random(2024, 0.4)
        .apply_to_grid(&mut sim.grid, &CellDefaults::default())
        .unwrap();
    for _ in 0..100 {
        run_simulation_tick(&mut sim);
    }
    assert_eq!(sim.current_tick, 100);
}

#[test]
fn test_tick_output_wire_shape() {
    let mut sim = sim_with(vec![
        PatternEdit::new(0, 0, &["m", "1"]),
        PatternEdit::new(0, 1, &["b", "-", "5", "!"]),
    ]);
    run_simulation_tick(&mut sim);
    let out = run_simulation_tick(&mut sim);
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["tick"], 1);
    assert_eq!(json["grid"].as_array().unwrap().len(), GRID_SIZE);
    assert_eq!(json["grid"][0].as_array().unwrap().len(), GRID_SIZE);
    assert_eq!(json["grid"][0][0]["type"], "metronome");
    assert_eq!(json["grid"][0][1]["note"], "b");
    assert_eq!(json["grid"][0][1]["accidental"], "b");
    assert_eq!(json["sounds"]["amsynth"]["pitches"], serde_json::json!(["Bb5"]));
    assert_eq!(json["sounds"]["amsynth"]["durations"], serde_json::json!([0.25]));
}
