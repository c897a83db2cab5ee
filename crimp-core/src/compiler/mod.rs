//! Step compiler
//!
//! Turns a tool definition and its resolved config into the ordered list
//! of steps a session runs. Compilation is pure and deterministic: the same
//! tool and config always give the same steps.

pub mod callout;
pub mod metronome;
pub mod recipe;
pub mod session;
pub mod step;
pub mod template;
pub mod timer;

use serde::Serialize;
use tracing::{debug, warn};

pub use recipe::{recipes, Recipe, RecipeInput, MAX_REPEATS};
pub use step::{Reminder, Step, StepKind, TempoPattern};
pub use template::{render, TemplateVars};

use crate::config::settings::FALLBACK_DURATION_S;
use crate::config::{Config, ToolDefinition, ToolType};

/// Why the compiler used the global fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "reason")]
pub enum FallbackReason {
    /// No recipe accepted the config
    NoRecipeMatched,
    /// A recipe matched but produced no steps
    EmptyRecipe { recipe: &'static str },
}

/// Non-fatal compiler findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// A generic active block replaced the recipe output
    FallbackUsed {
        tool_type: ToolType,
        duration_s: u32,
        reason: FallbackReason,
    },
}

/// A compiled session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// Steps, pre-roll first
    pub steps: Vec<Step>,
    /// Recipe that produced the steps, if any did
    pub recipe: Option<&'static str>,
    pub diagnostics: Vec<Diagnostic>,
    /// Config the steps were compiled from
    pub config: Config,
}

impl Program {
    /// Sum of all step durations
    pub fn total_duration(&self) -> u32 {
        total_duration(&self.steps)
    }

    /// Steps without the pre-roll
    pub fn summary(&self) -> Vec<SummaryItem> {
        summary(&self.steps)
    }
}

/// Compile `tool` with `config` into steps
///
/// Never fails for a known tool type. Configs no recipe understands get a
/// single generic active block and a [`Diagnostic::FallbackUsed`].
pub fn compile(tool: &ToolDefinition, config: &Config) -> Program {
    let mut steps = vec![Step::preroll()];
    let mut diagnostics = Vec::new();

    let input = RecipeInput { tool, config };
    let chosen = recipes(tool.tool_type)
        .iter()
        .find(|recipe| (recipe.matches)(config));

    if let Some(recipe) = chosen {
        debug!(tool = %tool.name, recipe = recipe.name, "recipe selected");
        steps.extend((recipe.build)(&input));
    }

    if steps.len() == 1 {
        let duration_s = config
            .u32("duration")
            .filter(|d| *d > 0)
            .or_else(|| config.u32("sessionDuration").filter(|d| *d > 0))
            .unwrap_or(FALLBACK_DURATION_S);
        let reason = match chosen {
            Some(recipe) => FallbackReason::EmptyRecipe {
                recipe: recipe.name,
            },
            None => FallbackReason::NoRecipeMatched,
        };
        warn!(
            tool = %tool.name,
            tool_type = %tool.tool_type,
            duration_s,
            ?reason,
            "no recipe produced steps; using a generic block"
        );
        steps.push(Step::active(duration_s, tool.name.clone()).announce("Go"));
        diagnostics.push(Diagnostic::FallbackUsed {
            tool_type: tool.tool_type,
            duration_s,
            reason,
        });
    }

    Program {
        steps,
        recipe: chosen.map(|r| r.name),
        diagnostics,
        config: config.clone(),
    }
}

/// Sum of step durations; open-ended steps count as zero
///
/// Saturates at `u32::MAX`.
pub fn total_duration(steps: &[Step]) -> u32 {
    steps
        .iter()
        .map(Step::duration_or_zero)
        .fold(0, u32::saturating_add)
}

/// Estimated session length for `tool` with `config`
pub fn estimated_duration(tool: &ToolDefinition, config: &Config) -> u32 {
    compile(tool, config).total_duration()
}

/// One row of a session overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryItem {
    /// Index in the compiled step list
    pub index: usize,
    pub label: String,
    pub kind: StepKind,
    pub duration: Option<u32>,
    pub is_rest: bool,
}

/// Overview of `steps` without the pre-roll
pub fn summary(steps: &[Step]) -> Vec<SummaryItem> {
    steps
        .iter()
        .enumerate()
        .filter(|(_, step)| step.kind != StepKind::Countdown)
        .map(|(index, step)| SummaryItem {
            index,
            label: step.label.clone(),
            kind: step.kind,
            duration: step.duration,
            is_rest: step.is_rest(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn tool(tool_type: ToolType) -> ToolDefinition {
        ToolDefinition::new("Test tool", tool_type)
    }

    #[test]
    fn test_session_sets_compile_exactly() {
        let config = Config::new()
            .with("sets", 3)
            .with("setDuration", 30)
            .with("restBetweenSets", 15);
        let program = compile(&tool(ToolType::Session), &config);
        let shape: Vec<(StepKind, Option<u32>, &str)> = program
            .steps
            .iter()
            .map(|s| (s.kind, s.duration, s.label.as_str()))
            .collect();
        assert_eq!(
            shape,
            [
                (StepKind::Countdown, Some(5), "Get ready"),
                (StepKind::Active, Some(30), "Set 1 of 3"),
                (StepKind::Rest, Some(15), "Rest"),
                (StepKind::Active, Some(30), "Set 2 of 3"),
                (StepKind::Rest, Some(15), "Rest"),
                (StepKind::Active, Some(30), "Set 3 of 3"),
            ]
        );
        assert_eq!(program.recipe, Some("sets"));
        assert!(program.diagnostics.is_empty());
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let config = Config::new().with("sessionDuration", 900);
        let program = compile(&tool(ToolType::Session), &config);
        assert_eq!(program.steps.len(), 2);
        assert_eq!(program.steps[1].duration, Some(900));
        assert_eq!(
            program.diagnostics,
            [Diagnostic::FallbackUsed {
                tool_type: ToolType::Session,
                duration_s: 900,
                reason: FallbackReason::NoRecipeMatched,
            }]
        );
    }

    #[test]
    fn test_fallback_default_duration() {
        let program = compile(&tool(ToolType::Timer), &Config::new());
        assert_eq!(program.steps[1].duration, Some(FALLBACK_DURATION_S));
        assert_eq!(program.recipe, None);
    }

    #[test]
    fn test_fallback_after_empty_recipe() {
        let config = Config::new()
            .with("startWork", 10)
            .with("startRest", 10)
            .with("minWork", 30);
        let program = compile(&tool(ToolType::Timer), &config);
        assert_eq!(program.recipe, Some("interval-decay"));
        assert!(matches!(
            program.diagnostics[0],
            Diagnostic::FallbackUsed {
                reason: FallbackReason::EmptyRecipe {
                    recipe: "interval-decay"
                },
                ..
            }
        ));
    }

    #[test]
    fn test_summary_drops_preroll() {
        let config = Config::new()
            .with("sets", 2)
            .with("setDuration", 30)
            .with("restBetweenSets", 15);
        let program = compile(&tool(ToolType::Session), &config);
        let summary = program.summary();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].index, 1);
        assert!(!summary[0].is_rest);
        assert!(summary[1].is_rest);
    }

    #[test]
    fn test_total_duration_open_ended_is_zero() {
        let program = compile(&tool(ToolType::Callout), &Config::new());
        assert_eq!(program.steps[1].duration, None);
        assert_eq!(program.total_duration(), 5);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let config = Config::new()
            .with("emomInterval", 3_000_000_000u32)
            .with("rounds", 2);
        let program = compile(&tool(ToolType::Timer), &config);
        assert_eq!(program.recipe, Some("emom"));
        assert_eq!(program.steps[1].duration, Some(u32::MAX));
        assert_eq!(program.total_duration(), u32::MAX);

        let config = Config::new()
            .with("sets", 2)
            .with("setDuration", 3_000_000_000u32);
        let program = compile(&tool(ToolType::Session), &config);
        assert_eq!(program.steps.len(), 3);
        assert_eq!(program.total_duration(), u32::MAX);
    }

    fn tool_type_strategy() -> impl Strategy<Value = ToolType> {
        prop_oneof![
            Just(ToolType::Timer),
            Just(ToolType::Callout),
            Just(ToolType::Metronome),
            Just(ToolType::Session),
        ]
    }

    const KEYS: &[&str] = &[
        "duration",
        "sessionDuration",
        "sets",
        "setDuration",
        "restBetweenSets",
        "startWork",
        "startRest",
        "workDecrement",
        "minWork",
        "emomInterval",
        "rounds",
        "roundDuration",
        "problems",
        "observeTime",
        "attempts",
        "restBetweenAttempts",
        "laps",
        "lapDuration",
        "circuits",
        "circuitDuration",
        "slowBpm",
        "fastBpm",
        "startBpm",
        "endBpm",
        "bpm",
        "visualizationTime",
    ];

    fn value_strategy() -> impl Strategy<Value = u32> {
        prop_oneof![
            8 => 0u32..400,
            1 => Just(u32::MAX),
            1 => (u32::MAX / 2)..=u32::MAX,
        ]
    }

    fn config_strategy() -> impl Strategy<Value = Config> {
        (
            proptest::collection::vec((0..KEYS.len(), value_strategy()), 0..8),
            proptest::option::of(proptest::collection::vec(0u32..5, 0..4)),
            any::<bool>(),
        )
            .prop_map(|(pairs, tiers, with_exercises)| {
                let mut config = Config::new();
                for (key, value) in pairs {
                    config.set(KEYS[key], value);
                }
                if let Some(tiers) = tiers {
                    config.set("problemsPerTier", json!(tiers));
                }
                if with_exercises {
                    config.set("exercises", json!([{"name": "Hang", "duration": 10}, "Pinch"]));
                }
                config
            })
    }

    proptest! {
        #[test]
        fn prop_preroll_first_and_nonempty(
            tool_type in tool_type_strategy(),
            config in config_strategy(),
        ) {
            let program = compile(&tool(tool_type), &config);
            prop_assert!(program.steps.len() >= 2);
            prop_assert_eq!(program.steps[0].kind, StepKind::Countdown);
            prop_assert_eq!(program.steps[0].duration, Some(5));
            prop_assert!(program.steps[1..].iter().all(|s| s.kind != StepKind::Countdown));
        }

        #[test]
        fn prop_estimate_matches_sum(
            tool_type in tool_type_strategy(),
            config in config_strategy(),
        ) {
            let t = tool(tool_type);
            let program = compile(&t, &config);
            let sum = program
                .steps
                .iter()
                .map(|s| s.duration.unwrap_or(0))
                .fold(0u32, u32::saturating_add);
            prop_assert_eq!(sum, estimated_duration(&t, &config));
        }

        #[test]
        fn prop_compile_is_deterministic(
            tool_type in tool_type_strategy(),
            config in config_strategy(),
        ) {
            let t = tool(tool_type);
            prop_assert_eq!(compile(&t, &config), compile(&t, &config));
        }

        #[test]
        fn prop_no_zero_length_rests(
            tool_type in tool_type_strategy(),
            config in config_strategy(),
        ) {
            let program = compile(&tool(tool_type), &config);
            prop_assert!(program
                .steps
                .iter()
                .filter(|s| s.is_rest())
                .all(|s| s.duration_or_zero() > 0));
        }
    }
}
