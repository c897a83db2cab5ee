//! Label and announcement templates
//!
//! Recipes that repeat a block accept strings such as
//! `"Round {n} of {total}"`. Placeholders are filled at compile time.

/// Values available to a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateVars {
    /// Current (or upcoming, for rests) repetition, 1-based
    pub n: u32,
    /// Total repetitions
    pub total: u32,
    /// Previous repetition (0 before the first)
    pub prev: u32,
    /// Repetitions left after the current one
    pub remaining: u32,
}

impl TemplateVars {
    /// Variables while working repetition `n` of `total`
    pub fn work(n: u32, total: u32) -> Self {
        Self {
            n,
            total,
            prev: n.saturating_sub(1),
            remaining: total.saturating_sub(n),
        }
    }

    /// Variables while resting after repetition `done` of `total`
    ///
    /// `n` points at the upcoming repetition.
    pub fn rest_after(done: u32, total: u32) -> Self {
        Self {
            n: done + 1,
            total,
            prev: done,
            remaining: total.saturating_sub(done),
        }
    }
}

/// Substitute `{n}`, `{total}`, `{prev}` and `{remaining}`
///
/// Unknown placeholders are left as written.
pub fn render(template: &str, vars: TemplateVars) -> String {
    template
        .replace("{n}", &vars.n.to_string())
        .replace("{total}", &vars.total.to_string())
        .replace("{prev}", &vars.prev.to_string())
        .replace("{remaining}", &vars.remaining.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_vars() {
        let out = render("Round {n} of {total}, {remaining} left", TemplateVars::work(2, 5));
        assert_eq!(out, "Round 2 of 5, 3 left");
    }

    #[test]
    fn test_rest_vars() {
        let out = render(
            "Round {prev} done. Next: {n}. {remaining} to go",
            TemplateVars::rest_after(2, 5),
        );
        assert_eq!(out, "Round 2 done. Next: 3. 3 to go");
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        assert_eq!(render("{name} {n}", TemplateVars::work(1, 1)), "{name} 1");
    }
}
