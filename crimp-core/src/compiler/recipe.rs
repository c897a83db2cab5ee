//! Recipe table
//!
//! A recipe turns one config shape into a run of steps. Each tool type has
//! an ordered list of recipes; the first whose predicate accepts the config
//! wins. The order is part of the contract and is what [`recipes`] returns.

use serde_json::Value;

use super::step::{Reminder, Step};
use super::template::{render, TemplateVars};
use super::{callout, metronome, session, timer};
use crate::config::{value_as_u32, Config, ToolDefinition, ToolType};

/// Upper bound on any repetition count read from a config
pub const MAX_REPEATS: u32 = 100;

/// Default duration for an exercise that does not say how long it runs
pub const DEFAULT_EXERCISE_S: u32 = 30;

/// Everything a recipe may read
#[derive(Debug, Clone, Copy)]
pub struct RecipeInput<'a> {
    pub tool: &'a ToolDefinition,
    pub config: &'a Config,
}

/// One compiler branch
#[derive(Clone, Copy)]
pub struct Recipe {
    /// Stable name, reported in the compiled program
    pub name: &'static str,
    /// Whether the config has the shape this recipe needs
    pub matches: fn(&Config) -> bool,
    /// Produce the steps that follow the pre-roll
    pub build: fn(&RecipeInput<'_>) -> Vec<Step>,
}

impl core::fmt::Debug for Recipe {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Recipe").field("name", &self.name).finish()
    }
}

/// Recipes for `tool_type`, in priority order
pub fn recipes(tool_type: ToolType) -> &'static [Recipe] {
    match tool_type {
        ToolType::Timer => timer::RECIPES,
        ToolType::Callout => callout::RECIPES,
        ToolType::Metronome => metronome::RECIPES,
        ToolType::Session => session::RECIPES,
    }
}

/// Repetition count, at least 1 and at most [`MAX_REPEATS`]
pub(crate) fn count(config: &Config, key: &str, default: u32) -> u32 {
    config.u32_or(key, default).clamp(1, MAX_REPEATS)
}

/// Whether `key` holds a non-empty array
pub(crate) fn has_list(config: &Config, key: &str) -> bool {
    config.array(key).is_some_and(|items| !items.is_empty())
}

/// Reminder from `reminderInterval` / `reminderText`
pub(crate) fn reminder_from(config: &Config) -> Option<Reminder> {
    let interval = config.u32("reminderInterval").filter(|i| *i > 0)?;
    Some(Reminder {
        interval,
        text: config.str("reminderText").unwrap_or("Keep going").to_owned(),
    })
}

/// Push a rest unless it has no length
pub(crate) fn push_rest(steps: &mut Vec<Step>, duration: u32, label: &str, announce: String) {
    if duration > 0 {
        steps.push(Step::rest(duration, label).announce(announce));
    }
}

/// `count` work blocks of `duration` named "{noun} n of total", with rests
pub(crate) fn repeat_blocks(
    steps: &mut Vec<Step>,
    noun: &str,
    total: u32,
    duration: u32,
    rest: u32,
) {
    for n in 1..=total {
        let label = render(&format!("{noun} {{n}} of {{total}}"), TemplateVars::work(n, total));
        steps.push(Step::active(duration, label.clone()).announce(label));
        if n < total {
            push_rest(steps, rest, "Rest", format!("Rest. {noun} {} next", n + 1));
        }
    }
}

/// An entry of an `exercises` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Exercise {
    pub name: String,
    pub duration: Option<u32>,
    pub announce: Option<String>,
    pub reminder: Option<Reminder>,
}

/// Parse `exercises`
///
/// Entries may be plain names or objects with `name`, `duration`,
/// `announce`, `reminderInterval` and `reminderText`.
pub(crate) fn exercises(config: &Config) -> Vec<Exercise> {
    let Some(items) = config.array("exercises") else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(name) => Exercise {
                name: name.clone(),
                duration: None,
                announce: None,
                reminder: None,
            },
            other => {
                let view = Config::view(other).unwrap_or_default();
                Exercise {
                    name: view
                        .str("name")
                        .map(str::to_owned)
                        .unwrap_or_else(|| format!("Exercise {}", i + 1)),
                    duration: view
                        .get("duration")
                        .and_then(value_as_u32)
                        .filter(|d| *d > 0),
                    announce: view.str("announce").map(str::to_owned),
                    reminder: reminder_from(&view),
                }
            }
        })
        .collect()
}
