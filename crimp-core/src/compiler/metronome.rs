//! Metronome recipes

use super::recipe::{count, push_rest, Recipe, RecipeInput};
use super::step::{Step, TempoPattern};
use crate::config::Config;
use crate::metronome::clamp_bpm;

/// Default length of a metronome block
const DEFAULT_DURATION_S: u32 = 300;

/// Metronome recipes in priority order
pub static RECIPES: &[Recipe] = &[
    Recipe {
        name: "surge-cruise",
        matches: has_surge_cruise,
        build: build_surge_cruise,
    },
    Recipe {
        name: "deceleration",
        matches: has_deceleration,
        build: build_deceleration,
    },
    Recipe {
        name: "fixed",
        matches: always,
        build: build_fixed,
    },
];

fn duration(config: &Config) -> u32 {
    config
        .u32("duration")
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_DURATION_S)
}

fn bpm(config: &Config, key: &str, default: u32) -> u16 {
    clamp_bpm(config.u32_or(key, default))
}

fn has_surge_cruise(config: &Config) -> bool {
    config.has_all(&["slowBpm", "fastBpm"])
}

fn build_surge_cruise(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let tempo = TempoPattern::SurgeCruise {
        slow_bpm: bpm(config, "slowBpm", 40),
        fast_bpm: bpm(config, "fastBpm", 80),
        slow_moves: config.u32_or("slowMoves", 8).max(1),
        fast_moves: config.u32_or("fastMoves", 4).max(1),
    };
    vec![
        Step::variable_metronome(duration(config), tempo, "Surge and cruise")
            .announce(format!("Cruise at {} beats per minute", tempo.start_bpm())),
    ]
}

fn has_deceleration(config: &Config) -> bool {
    config.has_all(&["startBpm", "endBpm"])
}

fn build_deceleration(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let start_bpm = bpm(config, "startBpm", 90);
    // The pattern only ever slows down
    let end_bpm = bpm(config, "endBpm", 50).min(start_bpm);
    let tempo = TempoPattern::Deceleration {
        start_bpm,
        end_bpm,
        decrement_per_phase: config.u32_or("decrementPerPhase", 5).clamp(1, 190) as u16,
        moves_per_phase: config.u32_or("movesPerPhase", 10).max(1),
    };
    vec![Step::variable_metronome(duration(config), tempo, "Deceleration")
        .announce(format!("Start at {start_bpm} beats per minute"))]
}

fn always(_: &Config) -> bool {
    true
}

fn build_fixed(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let tempo = bpm(config, "bpm", 60);
    let block = duration(config);
    let sets = count(config, "sets", 1);
    let rest = config.u32_or("restBetweenSets", 0);

    let mut steps = Vec::new();
    for set in 1..=sets {
        let label = if sets > 1 {
            format!("Set {set} of {sets}")
        } else {
            "Metronome".to_owned()
        };
        steps.push(
            Step::metronome(block, tempo, label)
                .announce(format!("{tempo} beats per minute")),
        );
        if set < sets {
            push_rest(&mut steps, rest, "Rest", "Rest".to_owned());
        }
    }
    steps
}
