// src/condition.rs
//! Condition classifier: weighted keyword signals → original / restored / modified.
//!
//! Each class owns a set of phrases with positive weights. The text is folded
//! (entities decoded, lowercased, spaces condensed) and every phrase found as a
//! substring adds its weight to its class. Overlapping hits count independently,
//! so "restored" also fires inside "unrestored".
//!
//! The class with the strictly highest total wins. No signal, or a tie at the
//! top, yields `Unknown`.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::config::ConditionCfg;
use crate::text;
use crate::types::ConditionClass;

/// Per-class signal totals for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConditionScores {
    pub original: u32,
    pub restored: u32,
    pub modified: u32,
}

impl ConditionScores {
    pub fn get(&self, class: ConditionClass) -> u32 {
        match class {
            ConditionClass::Original => self.original,
            ConditionClass::Restored => self.restored,
            ConditionClass::Modified => self.modified,
            ConditionClass::Unknown => 0,
        }
    }

    fn add(&mut self, class: ConditionClass, weight: u32) {
        match class {
            ConditionClass::Original => self.original += weight,
            ConditionClass::Restored => self.restored += weight,
            ConditionClass::Modified => self.modified += weight,
            ConditionClass::Unknown => {}
        }
    }

    /// Strictly highest nonzero total, else `Unknown`.
    pub fn winner(&self) -> ConditionClass {
        let ranked = [
            (ConditionClass::Original, self.original),
            (ConditionClass::Restored, self.restored),
            (ConditionClass::Modified, self.modified),
        ];
        let max = ranked.iter().map(|(_, s)| *s).max().unwrap_or(0);
        if max == 0 {
            return ConditionClass::Unknown;
        }
        let mut leaders = ranked.iter().filter(|(_, s)| *s == max);
        match (leaders.next(), leaders.next()) {
            (Some((class, _)), None) => *class,
            _ => ConditionClass::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
struct Signal {
    phrase: String,
    weight: u32,
    class: ConditionClass,
}

/// Compiled signal sets. Immutable once built.
#[derive(Debug, Clone)]
pub struct ConditionClassifier {
    signals: Vec<Signal>,
}

impl ConditionClassifier {
    /// Build from config, validating weights and that the three sets are disjoint.
    pub fn from_config(cfg: &ConditionCfg) -> Result<Self> {
        let mut owner: BTreeMap<String, ConditionClass> = BTreeMap::new();
        let mut signals = Vec::new();

        let sets: [(ConditionClass, &HashMap<String, u32>); 3] = [
            (ConditionClass::Original, &cfg.original),
            (ConditionClass::Restored, &cfg.restored),
            (ConditionClass::Modified, &cfg.modified),
        ];

        for (class, set) in sets {
            for (raw_phrase, &weight) in set {
                let phrase = text::fold(raw_phrase);
                if phrase.is_empty() {
                    return Err(anyhow!("empty {class} signal phrase"));
                }
                if weight == 0 {
                    return Err(anyhow!("{class} signal `{phrase}` must have a positive weight"));
                }
                if let Some(prev) = owner.insert(phrase.clone(), class) {
                    return Err(anyhow!(
                        "signal `{phrase}` is listed for both {prev} and {class}"
                    ));
                }
                signals.push(Signal {
                    phrase,
                    weight,
                    class,
                });
            }
        }

        // Deterministic iteration regardless of map order.
        signals.sort_by(|a, b| a.phrase.cmp(&b.phrase));
        Ok(Self { signals })
    }

    /// Sum of matched signal weights per class.
    pub fn scores(&self, text: Option<&str>) -> ConditionScores {
        let mut scores = ConditionScores::default();
        let Some(folded) = text::fold_opt(text) else {
            return scores;
        };
        for s in &self.signals {
            if folded.contains(s.phrase.as_str()) {
                scores.add(s.class, s.weight);
            }
        }
        scores
    }

    pub fn classify(&self, text: Option<&str>) -> ConditionClass {
        self.scores(text).winner()
    }

    /// Number of configured phrases (all classes).
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
