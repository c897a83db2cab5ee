//! Timer recipes
//!
//! Work/rest timers: exercise lists, phase lists, decaying intervals,
//! EMOM, visualization and single blocks.

use super::recipe::{
    count, exercises, has_list, push_rest, reminder_from, Recipe, RecipeInput,
    DEFAULT_EXERCISE_S, MAX_REPEATS,
};
use super::step::Step;
use crate::config::Config;

/// Timer recipes in priority order
pub static RECIPES: &[Recipe] = &[
    Recipe {
        name: "exercises",
        matches: has_exercises,
        build: build_exercises,
    },
    Recipe {
        name: "phases",
        matches: has_phases,
        build: build_phases,
    },
    Recipe {
        name: "interval-decay",
        matches: has_decay,
        build: build_decay,
    },
    Recipe {
        name: "emom",
        matches: has_emom,
        build: build_emom,
    },
    Recipe {
        name: "visualization",
        matches: has_visualization,
        build: build_visualization,
    },
    Recipe {
        name: "single",
        matches: has_single,
        build: build_single,
    },
];

fn has_exercises(config: &Config) -> bool {
    has_list(config, "exercises")
}

fn build_exercises(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let items = exercises(config);
    let sets = count(config, "sets", 1);
    let rest_exercise = config.u32_or("restBetweenExercises", 0);
    let rest_set = config.u32_or("restBetweenSets", 0);

    let mut steps = Vec::new();
    for set in 1..=sets {
        for (i, exercise) in items.iter().enumerate() {
            let label = if sets > 1 {
                format!("{} (set {set} of {sets})", exercise.name)
            } else {
                exercise.name.clone()
            };
            let announce = exercise
                .announce
                .clone()
                .unwrap_or_else(|| exercise.name.clone());
            steps.push(
                Step::active(exercise.duration.unwrap_or(DEFAULT_EXERCISE_S), label)
                    .announce(announce)
                    .reminder(exercise.reminder.clone()),
            );
            if let Some(next) = items.get(i + 1) {
                push_rest(
                    &mut steps,
                    rest_exercise,
                    "Rest",
                    format!("Rest. Next: {}", next.name),
                );
            }
        }
        if set < sets {
            push_rest(
                &mut steps,
                rest_set,
                "Set rest",
                format!("Set {set} of {sets} done. Rest"),
            );
        }
    }
    steps
}

fn has_phases(config: &Config) -> bool {
    has_list(config, "phases")
}

fn build_phases(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let sets = count(config, "sets", 1);
    let rest_set = config.u32_or("restBetweenSets", 0);
    let phases: Vec<Config> = config
        .array("phases")
        .map(|items| items.iter().filter_map(Config::view).collect())
        .unwrap_or_default();

    let mut steps = Vec::new();
    for set in 1..=sets {
        for (i, phase) in phases.iter().enumerate() {
            let name = phase
                .str("name")
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Phase {}", i + 1));
            let duration = phase.u32_or("duration", DEFAULT_EXERCISE_S);
            if duration == 0 {
                continue;
            }
            let announce = phase
                .str("announce")
                .map(str::to_owned)
                .unwrap_or_else(|| name.clone());
            let mut step = match phase.str("type") {
                Some("rest") => Step::rest(duration, name),
                _ => Step::active(duration, name).reminder(reminder_from(phase)),
            }
            .announce(announce);
            if let Some(color) = phase.str("color") {
                step = step.color(color);
            }
            steps.push(step);
        }
        if set < sets {
            push_rest(
                &mut steps,
                rest_set,
                "Set rest",
                format!("Set {set} of {sets} done. Rest"),
            );
        }
    }
    steps
}

fn has_decay(config: &Config) -> bool {
    config.has_all(&["startWork", "startRest"])
}

/// Work blocks shrink by `workDecrement` each round until the next one
/// would fall below `minWork`. Rest blocks sit between work blocks, so
/// there is always one fewer rest than work.
fn build_decay(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let mut work = config.u32_or("startWork", 0);
    let mut rest = config.u32_or("startRest", 0);
    let work_decrement = config.u32_or("workDecrement", 30);
    let rest_decrement = config.u32_or("restDecrement", 0);
    let min_work = config.u32_or("minWork", 30).max(1);
    let min_rest = config.u32_or("minRest", 0);

    let mut steps = Vec::new();
    let mut round = 1;
    while work >= min_work && round <= MAX_REPEATS {
        steps.push(
            Step::active(work, format!("Round {round}"))
                .announce(format!("Round {round}. Work {work} seconds")),
        );
        // A zero decrement would never terminate
        let next = match work.checked_sub(work_decrement) {
            Some(next) if work_decrement > 0 && next >= min_work => next,
            _ => break,
        };
        push_rest(&mut steps, rest, "Rest", format!("Rest {rest} seconds"));
        rest = rest.saturating_sub(rest_decrement).max(min_rest);
        work = next;
        round += 1;
    }
    steps
}

fn has_emom(config: &Config) -> bool {
    config.u32("emomInterval").is_some_and(|i| i > 0)
}

fn build_emom(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let interval = config.u32_or("emomInterval", 60).max(1);
    let duration = config
        .u32("duration")
        .filter(|d| *d > 0)
        .unwrap_or_else(|| count(config, "rounds", 10).saturating_mul(interval));
    let rounds = duration.div_ceil(interval);
    let announce = if interval == 60 {
        format!("Every minute on the minute, {rounds} rounds. Go")
    } else {
        format!("Every {interval} seconds, {rounds} rounds. Go")
    };
    vec![Step::active(duration, "EMOM")
        .announce(announce)
        .emom(interval)
        .reminder(reminder_from(config))]
}

fn has_visualization(config: &Config) -> bool {
    config.u32("visualizationTime").is_some_and(|t| t > 0)
}

fn build_visualization(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let duration = config.u32_or("visualizationTime", 0);
    vec![Step::active(duration, "Visualize")
        .announce(
            config
                .str("announce")
                .unwrap_or("Close your eyes and climb the route in your head"),
        )
        .reminder(reminder_from(config))
        .color("indigo")]
}

fn has_single(config: &Config) -> bool {
    config.bool("openEnded") == Some(true) || config.u32("duration").is_some_and(|d| d > 0)
}

fn build_single(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let label = config.str("label").unwrap_or(&input.tool.name);
    let announce = config.str("announce").unwrap_or("Go");
    let step = if config.bool("openEnded") == Some(true) {
        Step::open_ended(label)
    } else {
        Step::active(config.u32_or("duration", 0), label)
    };
    vec![step.announce(announce).reminder(reminder_from(config))]
}

#[cfg(test)]
mod tests {
    use super::super::step::StepKind;
    use super::*;
    use crate::config::{ToolDefinition, ToolType};
    use serde_json::json;

    fn build(recipe: &str, config: Config) -> Vec<Step> {
        let tool = ToolDefinition::new("Timer", ToolType::Timer);
        let recipe = RECIPES.iter().find(|r| r.name == recipe).unwrap();
        assert!((recipe.matches)(&config), "{} should match", recipe.name);
        (recipe.build)(&RecipeInput {
            tool: &tool,
            config: &config,
        })
    }

    fn durations(steps: &[Step], kind: StepKind) -> Vec<u32> {
        steps
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.duration_or_zero())
            .collect()
    }

    #[test]
    fn test_interval_decay_ladder() {
        let config = Config::new()
            .with("startWork", 180)
            .with("startRest", 120)
            .with("workDecrement", 30)
            .with("restDecrement", 20)
            .with("minWork", 30);
        let steps = build("interval-decay", config);
        assert_eq!(
            durations(&steps, StepKind::Active),
            [180, 150, 120, 90, 60, 30]
        );
        assert_eq!(durations(&steps, StepKind::Rest), [120, 100, 80, 60, 40]);
        assert_eq!(steps.last().unwrap().kind, StepKind::Active);
    }

    #[test]
    fn test_interval_decay_zero_decrement_terminates() {
        let config = Config::new()
            .with("startWork", 60)
            .with("startRest", 30)
            .with("workDecrement", 0);
        assert_eq!(build("interval-decay", config).len(), 1);
    }

    #[test]
    fn test_interval_decay_start_below_min_is_empty() {
        let config = Config::new()
            .with("startWork", 20)
            .with("startRest", 30)
            .with("minWork", 30);
        assert!(build("interval-decay", config).is_empty());
    }

    #[test]
    fn test_exercise_list_with_sets() {
        let config = Config::new()
            .with("exercises", json!([{"name": "Hang", "duration": 10}, "Pull-up"]))
            .with("sets", 2)
            .with("restBetweenExercises", 20)
            .with("restBetweenSets", 90);
        let steps = build("exercises", config);
        let labels: Vec<&str> = steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Hang (set 1 of 2)",
                "Rest",
                "Pull-up (set 1 of 2)",
                "Set rest",
                "Hang (set 2 of 2)",
                "Rest",
                "Pull-up (set 2 of 2)",
            ]
        );
        assert_eq!(steps[0].duration, Some(10));
        assert_eq!(steps[2].duration, Some(DEFAULT_EXERCISE_S));
        assert_eq!(steps[3].duration, Some(90));
        assert_eq!(steps[1].announce.as_deref(), Some("Rest. Next: Pull-up"));
    }

    #[test]
    fn test_phase_list_kinds_and_colors() {
        let config = Config::new().with(
            "phases",
            json!([
                {"name": "Climb", "duration": 45, "color": "red"},
                {"name": "Shake out", "duration": 15, "type": "rest"},
            ]),
        );
        let steps = build("phases", config);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].kind, StepKind::Active);
        assert_eq!(steps[0].color.as_deref(), Some("red"));
        assert_eq!(steps[1].kind, StepKind::Rest);
    }

    #[test]
    fn test_emom_single_step() {
        let config = Config::new().with("emomInterval", 60).with("rounds", 8);
        let steps = build("emom", config);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].duration, Some(480));
        assert_eq!(steps[0].emom_interval, Some(60));
    }

    #[test]
    fn test_visualization_carries_reminder() {
        let config = Config::new()
            .with("visualizationTime", 120)
            .with("reminderInterval", 30)
            .with("reminderText", "Breathe");
        let steps = build("visualization", config);
        assert_eq!(steps[0].label, "Visualize");
        assert_eq!(steps[0].reminder.as_ref().unwrap().text, "Breathe");
    }

    #[test]
    fn test_open_ended_single() {
        let steps = build("single", Config::new().with("openEnded", true));
        assert_eq!(steps[0].duration, None);
        assert_eq!(steps[0].label, "Timer");
    }
}
