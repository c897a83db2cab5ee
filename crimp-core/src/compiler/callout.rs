//! Callout recipe

use super::recipe::{Recipe, RecipeInput};
use super::step::Step;
use crate::config::Config;

/// Callout recipes in priority order
pub static RECIPES: &[Recipe] = &[Recipe {
    name: "callout",
    matches: always,
    build: build_callout,
}];

fn always(_: &Config) -> bool {
    true
}

/// One callout step, bounded by `duration` or open until stopped
fn build_callout(input: &RecipeInput<'_>) -> Vec<Step> {
    let config = input.config;
    let duration = config.u32("duration").filter(|d| *d > 0);
    let label = config.str("label").unwrap_or(&input.tool.name);
    vec![Step::callout(duration, label).announce(config.str("announce").unwrap_or("Climb"))]
}
