// src/trim.rs
//! Trim / body-style extraction from listing titles.
//!
//! The pattern library is an ordered list per target field. Every entry has a
//! canonical output ("GT3 RS") and optional alternative spellings; a pattern
//! fires on whole words, case-insensitively, with any run of whitespace
//! between words. The first firing pattern wins and its canonical string is
//! returned, never the matched substring.
//!
//! Precedence is established when the library is compiled, not by trusting
//! declaration order alone: if pattern A would fire on the text of pattern B
//! ("GT3" fires on "GT3 RS", "Carrera" on "Carrera 4S"), B is ranked ahead of
//! A. Unrelated patterns keep their declared order. Two patterns that fire on
//! each other's text cannot be ranked and are rejected.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::fmt;

use crate::config::{PatternEntry, PatternsCfg};
use crate::text;
use crate::types::TrimAndBodyStyle;

/// Which output field a pattern feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetField {
    Trim,
    BodyStyle,
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetField::Trim => "trim",
            TargetField::BodyStyle => "body_style",
        })
    }
}

/// One compiled library entry.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub canonical: String,
    pub field: TargetField,
    /// Canonical spelling first, then alternatives.
    variants: Vec<String>,
    re: Regex,
}

impl PatternRule {
    pub fn new(field: TargetField, canonical: &str, alternatives: &[String]) -> Result<Self> {
        let canonical = canonical.trim().to_string();
        let mut variants = vec![canonical.clone()];
        variants.extend(alternatives.iter().map(|a| a.trim().to_string()));

        let mut alts = Vec::with_capacity(variants.len());
        for v in &variants {
            let edge_ok = |c: Option<char>| c.is_some_and(char::is_alphanumeric);
            if !edge_ok(v.chars().next()) || !edge_ok(v.chars().last()) {
                return Err(anyhow!(
                    "{field} pattern `{v}` must start and end with a letter or digit"
                ));
            }
            let words: Vec<String> = v.split_whitespace().map(regex::escape).collect();
            alts.push(words.join(r"\s+"));
        }

        let pattern = format!(r"(?i)\b(?:{})\b", alts.join("|"));
        let re = Regex::new(&pattern)
            .with_context(|| format!("{field} pattern `{canonical}` regex"))?;
        Ok(Self {
            canonical,
            field,
            variants,
            re,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// True if this rule would fire on any spelling of `other`.
    fn shadows(&self, other: &PatternRule) -> bool {
        other.variants.iter().any(|v| self.re.is_match(v))
    }
}

/// Stable precedence ranking: a rule that shadows another goes after it.
/// Among rules free to go next, the earliest declared is taken.
fn rank(field: TargetField, rules: Vec<PatternRule>) -> Result<Vec<PatternRule>> {
    let n = rules.len();
    // must_follow[a] = rules that have to be placed before `a`
    let mut must_follow: Vec<Vec<usize>> = vec![Vec::new(); n];
    for a in 0..n {
        for b in 0..n {
            if a != b && rules[a].shadows(&rules[b]) {
                if rules[b].shadows(&rules[a]) {
                    return Err(anyhow!(
                        "{field} patterns `{}` and `{}` match each other's text; cannot rank",
                        rules[a].canonical,
                        rules[b].canonical
                    ));
                }
                must_follow[a].push(b);
            }
        }
    }

    let mut placed = vec![false; n];
    let mut order = Vec::with_capacity(n);
    while order.len() < n {
        let next = (0..n).find(|&i| !placed[i] && must_follow[i].iter().all(|&b| placed[b]));
        match next {
            Some(i) => {
                placed[i] = true;
                order.push(i);
            }
            None => {
                let stuck: Vec<&str> = (0..n)
                    .filter(|&i| !placed[i])
                    .map(|i| rules[i].canonical.as_str())
                    .collect();
                return Err(anyhow!("{field} patterns form a precedence cycle: {stuck:?}"));
            }
        }
    }

    let mut slots: Vec<Option<PatternRule>> = rules.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

fn compile_field(field: TargetField, entries: &[PatternEntry]) -> Result<Vec<PatternRule>> {
    let rules = entries
        .iter()
        .map(|e| PatternRule::new(field, e.canonical(), e.alternatives()))
        .collect::<Result<Vec<_>>>()?;
    rank(field, rules)
}

/// Ranked trim and body-style libraries.
#[derive(Debug, Clone)]
pub struct TrimExtractor {
    trims: Vec<PatternRule>,
    body_styles: Vec<PatternRule>,
}

impl TrimExtractor {
    pub fn from_config(cfg: &PatternsCfg) -> Result<Self> {
        Ok(Self {
            trims: compile_field(TargetField::Trim, &cfg.trim)?,
            body_styles: compile_field(TargetField::BodyStyle, &cfg.body_style)?,
        })
    }

    /// Rules of one field in effective precedence order.
    pub fn ranked(&self, field: TargetField) -> &[PatternRule] {
        match field {
            TargetField::Trim => &self.trims,
            TargetField::BodyStyle => &self.body_styles,
        }
    }

    fn first_match<'a>(rules: &'a [PatternRule], text: &str) -> Option<&'a PatternRule> {
        rules.iter().find(|r| r.is_match(text))
    }

    /// Trim from the title only; body style from the title, else the description.
    pub fn extract(&self, title: &str, description: Option<&str>) -> TrimAndBodyStyle {
        let title = text::decode_entities(title);

        let trim = Self::first_match(&self.trims, &title).map(|r| r.canonical.clone());

        let body_style = Self::first_match(&self.body_styles, &title)
            .or_else(|| {
                let desc = text::decode_entities(description?);
                Self::first_match(&self.body_styles, &desc)
            })
            .map(|r| r.canonical.clone());

        TrimAndBodyStyle { trim, body_style }
    }
}
