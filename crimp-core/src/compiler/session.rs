//! Session recipes
//!
//! Structured climbing sessions. The ordering below matters: several
//! shapes share keys (`sets`, `problems`, `circuits`), and the more
//! specific shape is always tried first.

use super::recipe::{
    count, exercises, has_list, push_rest, reminder_from, repeat_blocks, Recipe, RecipeInput,
    DEFAULT_EXERCISE_S, MAX_REPEATS,
};
use super::step::Step;
use super::template::{render, TemplateVars};
use crate::config::{value_as_u32, Config};

/// Session recipes in priority order
pub static RECIPES: &[Recipe] = &[
    Recipe {
        name: "observe-climb",
        matches: has_observe_climb,
        build: build_observe_climb,
    },
    Recipe {
        name: "attempts",
        matches: has_attempts,
        build: build_attempts,
    },
    Recipe {
        name: "circuit",
        matches: has_circuit,
        build: build_circuit,
    },
    Recipe {
        name: "sets",
        matches: has_sets,
        build: build_sets,
    },
    Recipe {
        name: "laps",
        matches: has_laps,
        build: build_laps,
    },
    Recipe {
        name: "circuits",
        matches: has_circuits,
        build: build_circuits,
    },
    Recipe {
        name: "rounds",
        matches: has_rounds,
        build: build_rounds,
    },
    Recipe {
        name: "pyramid",
        matches: has_pyramid,
        build: build_pyramid,
    },
    Recipe {
        name: "problems",
        matches: has_problems,
        build: build_problems,
    },
    Recipe {
        name: "block",
        matches: has_block,
        build: build_block,
    },
];

fn has_observe_climb(config: &Config) -> bool {
    config.has_all(&["problems", "observeTime"])
}

fn build_observe_climb(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let problems = count(config, "problems", 1);
    let observe = config.u32_or("observeTime", 0);
    let climb = config.u32_or("climbTime", 240).max(1);
    let rest = config.u32_or("restBetweenProblems", 0);

    let mut steps = Vec::new();
    for n in 1..=problems {
        push_rest(
            &mut steps,
            observe,
            &format!("Observe problem {n}"),
            format!("Problem {n} of {problems}. Read the sequence"),
        );
        steps.push(
            Step::active(climb, format!("Climb problem {n}"))
                .announce("Climb")
                .reminder(reminder_from(config)),
        );
        if n < problems {
            push_rest(&mut steps, rest, "Rest", format!("Rest. Problem {} next", n + 1));
        }
    }
    steps
}

fn has_attempts(config: &Config) -> bool {
    config.has_all(&["attempts", "restBetweenAttempts"])
}

fn build_attempts(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let attempts = count(config, "attempts", 1);
    let duration = config.u32_or("attemptDuration", 120).max(1);
    let rest = config.u32_or("restBetweenAttempts", 0);

    let mut steps = Vec::new();
    for n in 1..=attempts {
        steps.push(
            Step::active(duration, format!("Attempt {n} of {attempts}"))
                .announce(format!("Attempt {n}")),
        );
        if n < attempts {
            push_rest(
                &mut steps,
                rest,
                "Rest",
                format!("Rest. {} attempts left", attempts - n),
            );
        }
    }
    steps
}

fn has_circuit(config: &Config) -> bool {
    has_list(config, "exercises") && config.has("sets")
}

/// Every set of one exercise before moving to the next exercise
fn build_circuit(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let items = exercises(config);
    let sets = count(config, "sets", 1);
    let default_duration = config.u32_or("setDuration", DEFAULT_EXERCISE_S).max(1);
    let rest_set = config.u32_or("restBetweenSets", 0);
    let rest_exercise = config.u32_or("restBetweenExercises", 0);

    let mut steps = Vec::new();
    for (i, exercise) in items.iter().enumerate() {
        for set in 1..=sets {
            let label = format!("{}: set {set} of {sets}", exercise.name);
            let announce = if set == 1 {
                exercise
                    .announce
                    .clone()
                    .unwrap_or_else(|| format!("{}. Set 1 of {sets}", exercise.name))
            } else {
                format!("Set {set} of {sets}")
            };
            steps.push(
                Step::active(exercise.duration.unwrap_or(default_duration), label)
                    .announce(announce)
                    .reminder(exercise.reminder.clone()),
            );
            if set < sets {
                push_rest(&mut steps, rest_set, "Rest", "Rest".to_owned());
            }
        }
        if let Some(next) = items.get(i + 1) {
            push_rest(
                &mut steps,
                rest_exercise,
                "Change exercise",
                format!("Rest. Next: {}", next.name),
            );
        }
    }
    steps
}

fn has_sets(config: &Config) -> bool {
    config.has_all(&["sets", "setDuration"])
}

fn build_sets(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let mut steps = Vec::new();
    repeat_blocks(
        &mut steps,
        "Set",
        count(config, "sets", 1),
        config.u32_or("setDuration", 0).max(1),
        config.u32_or("restBetweenSets", 0),
    );
    steps
}

fn has_laps(config: &Config) -> bool {
    config.has_all(&["laps", "lapDuration"])
}

fn build_laps(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let mut steps = Vec::new();
    repeat_blocks(
        &mut steps,
        "Lap",
        count(config, "laps", 1),
        config.u32_or("lapDuration", 0).max(1),
        config.u32_or("restBetweenLaps", 0),
    );
    steps
}

fn has_circuits(config: &Config) -> bool {
    config.has_all(&["circuits", "circuitDuration"])
}

fn build_circuits(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let mut steps = Vec::new();
    repeat_blocks(
        &mut steps,
        "Circuit",
        count(config, "circuits", 1),
        config.u32_or("circuitDuration", 0).max(1),
        config.u32_or("restBetweenCircuits", 0),
    );
    steps
}

fn has_rounds(config: &Config) -> bool {
    config.has_all(&["rounds", "roundDuration"])
}

fn build_rounds(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let total = count(config, "rounds", 1);
    let duration = config.u32_or("roundDuration", 0).max(1);
    let rest = config.u32_or("restBetweenRounds", 0);
    let round_label = config.str("roundLabel").unwrap_or("Round {n} of {total}");
    let round_announce = config.str("roundAnnounce").unwrap_or(round_label);
    let rest_label = config.str("restLabel").unwrap_or("Rest");
    let rest_announce = config
        .str("restAnnounce")
        .unwrap_or("Rest. {remaining} rounds to go");

    let mut steps = Vec::new();
    for n in 1..=total {
        let vars = TemplateVars::work(n, total);
        steps.push(
            Step::active(duration, render(round_label, vars))
                .announce(render(round_announce, vars))
                .reminder(reminder_from(config)),
        );
        if n < total {
            let vars = TemplateVars::rest_after(n, total);
            push_rest(
                &mut steps,
                rest,
                &render(rest_label, vars),
                render(rest_announce, vars),
            );
        }
    }
    steps
}

fn has_pyramid(config: &Config) -> bool {
    has_list(config, "problemsPerTier")
}

fn build_pyramid(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let tiers: Vec<u32> = config
        .array("problemsPerTier")
        .map(|items| {
            items
                .iter()
                .filter_map(value_as_u32)
                .filter(|n| *n > 0)
                .map(|n| n.min(MAX_REPEATS))
                .take(MAX_REPEATS as usize)
                .collect()
        })
        .unwrap_or_default();
    let duration = config.u32_or("problemDuration", 180).max(1);
    let rest_problem = config.u32_or("restBetweenProblems", 0);
    let rest_tier = config.u32_or("restBetweenTiers", 0);
    let tier_count = tiers.len();

    let mut steps = Vec::new();
    for (t, &problems) in tiers.iter().enumerate() {
        let tier = t + 1;
        for p in 1..=problems {
            let announce = if p == 1 {
                format!("Tier {tier}. {problems} problems")
            } else {
                format!("Problem {p} of {problems}")
            };
            steps.push(
                Step::active(duration, format!("Tier {tier}: problem {p} of {problems}"))
                    .announce(announce),
            );
            if p < problems {
                push_rest(&mut steps, rest_problem, "Rest", "Rest".to_owned());
            }
        }
        if tier < tier_count {
            push_rest(
                &mut steps,
                rest_tier,
                "Tier rest",
                format!("Tier {tier} done. Rest"),
            );
        }
    }
    steps
}

fn has_problems(config: &Config) -> bool {
    config.has("problems")
}

fn build_problems(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let problems = count(config, "problems", 1);
    let circuits = count(config, "circuits", 1);
    let duration = config.u32_or("problemDuration", 180).max(1);
    let rest_problem = config.u32_or("restBetweenProblems", 0);
    let rest_circuit = config.u32_or("restBetweenCircuits", 0);

    let mut steps = Vec::new();
    for c in 1..=circuits {
        for p in 1..=problems {
            let label = if circuits > 1 {
                format!("Circuit {c}: problem {p} of {problems}")
            } else {
                format!("Problem {p} of {problems}")
            };
            steps.push(Step::active(duration, label).announce(format!("Problem {p}")));
            if p < problems {
                push_rest(&mut steps, rest_problem, "Rest", "Rest".to_owned());
            }
        }
        if c < circuits {
            push_rest(
                &mut steps,
                rest_circuit,
                "Circuit rest",
                format!("Circuit {c} of {circuits} done. Rest"),
            );
        }
    }
    steps
}

fn has_block(config: &Config) -> bool {
    config.u32("duration").is_some_and(|d| d > 0)
}

fn build_block(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    vec![Step::active(config.u32_or("duration", 0), input.tool.name.clone())
        .announce(config.str("announce").unwrap_or("Go"))
        .reminder(reminder_from(config))]
}
