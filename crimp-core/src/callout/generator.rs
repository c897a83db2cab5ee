//! Callout generator

use heapless::Deque;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::Value;

use crate::config::{value_as_u32, Config};

/// Phrases kept for display
pub const HISTORY_LEN: usize = 20;

/// Seconds between automatic callouts when the config does not say
pub const DEFAULT_INTERVAL_S: u32 = 5;

/// Where phrases come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalloutSource {
    /// Complete phrases, one picked per callout
    Phrases(Vec<String>),
    /// Named fragment pools; one item from each, joined in pool order
    Pools(Vec<(String, Vec<String>)>),
}

impl CalloutSource {
    /// Read `callouts` or `pools` from a config
    ///
    /// `callouts` wins when both are present. Pools may be an object of
    /// name -> items or an array of `{name, items}`. Empty lists and
    /// pools are ignored.
    pub fn from_config(config: &Config) -> Option<Self> {
        if let Some(phrases) = config.array("callouts").map(|items| strings(items)) {
            if !phrases.is_empty() {
                return Some(Self::Phrases(phrases));
            }
        }

        let pools: Vec<(String, Vec<String>)> = match config.get("pools")? {
            Value::Object(map) => map
                .iter()
                .filter_map(|(name, items)| Some((name.clone(), strings(items.as_array()?))))
                .collect(),
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| {
                    let view = Config::view(entry)?;
                    let name = view.str("name").unwrap_or_default().to_owned();
                    Some((name, strings(view.array("items")?)))
                })
                .collect(),
            _ => return None,
        };
        let pools: Vec<_> = pools
            .into_iter()
            .filter(|(_, items)| !items.is_empty())
            .collect();
        (!pools.is_empty()).then_some(Self::Pools(pools))
    }

    /// Hand and hold callouts used when nothing is configured
    pub fn builtin() -> Self {
        let pool = |name: &str, items: &[&str]| {
            (
                name.to_owned(),
                items.iter().map(|s| (*s).to_owned()).collect(),
            )
        };
        Self::Pools(vec![
            pool("limb", &["Left hand", "Right hand", "Left foot", "Right foot"]),
            pool("hold", &["crimp", "sloper", "pinch", "jug", "pocket"]),
        ])
    }
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

/// Random phrase generator with a short history
///
/// Selection is uniform and memoryless; the history is only for display.
#[derive(Debug, Clone)]
pub struct CalloutGenerator {
    source: CalloutSource,
    interval_s: u32,
    rng: SmallRng,
    current: Option<String>,
    /// Most recent first
    history: Deque<String, HISTORY_LEN>,
    auto: bool,
}

impl CalloutGenerator {
    /// Create a generator over `source`
    pub fn new(source: CalloutSource, interval_s: u32, seed: u64) -> Self {
        Self {
            source,
            interval_s: interval_s.max(1),
            rng: SmallRng::seed_from_u64(seed),
            current: None,
            history: Deque::new(),
            auto: false,
        }
    }

    /// Create from a tool config, falling back to the built-in pools
    pub fn from_config(config: &Config, seed: u64) -> Self {
        let source = CalloutSource::from_config(config).unwrap_or_else(CalloutSource::builtin);
        let interval = config
            .get("interval")
            .and_then(value_as_u32)
            .unwrap_or(DEFAULT_INTERVAL_S);
        Self::new(source, interval, seed)
    }

    pub fn source(&self) -> &CalloutSource {
        &self.source
    }

    /// Seconds between automatic callouts
    pub fn interval_s(&self) -> u32 {
        self.interval_s
    }

    /// Most recent phrase
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Past phrases, most recent first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Whether automatic generation is on
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Produce a new phrase
    pub fn generate(&mut self) -> String {
        let phrase = match &self.source {
            CalloutSource::Phrases(phrases) => phrases
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_default(),
            CalloutSource::Pools(pools) => pools
                .iter()
                .filter_map(|(_, items)| items.choose(&mut self.rng))
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        };

        if self.history.is_full() {
            self.history.pop_back();
        }
        // Cannot fail: a slot was freed above
        let _ = self.history.push_front(phrase.clone());
        self.current = Some(phrase.clone());
        phrase
    }

    /// Turn on automatic generation; returns the first phrase right away
    pub fn start_auto(&mut self) -> String {
        self.auto = true;
        self.generate()
    }

    /// Turn off automatic generation; current phrase and history stay
    pub fn stop_auto(&mut self) {
        self.auto = false;
    }
}
