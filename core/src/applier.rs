//! Ordered rewrite-rule application.
//!
//! [`RuleApplier`] walks a word left to right. At each cursor position the
//! first rule (in declaration order) whose pattern and contexts match is
//! selected and the frontier branches over its alternatives; if no rule
//! matches, the character under the cursor is copied to every candidate.
//! The cursor always advances, so a word of `n` characters takes at most
//! `n` steps.
use tracing::trace;

use crate::{Frontier, Language, Rule, RuleList};

/// Counters collected while applying a rule list to one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Rule-resolution steps (cursor positions visited).
    pub steps: usize,
    /// Steps resolved by a rule.
    pub rule_matches: usize,
    /// Steps resolved by copying the literal character.
    pub literal_copies: usize,
}

/// Applies one ordered rule list, bounded by `max_phonemes`.
#[derive(Debug, Clone, Copy)]
pub struct RuleApplier<'a> {
    rules: &'a RuleList,
    language: Option<&'a Language>,
    max_phonemes: usize,
}

impl<'a> RuleApplier<'a> {
    /// An applier that accepts every alternative (the finalization pass).
    pub fn new(rules: &'a RuleList, max_phonemes: usize) -> Self {
        Self {
            rules,
            language: None,
            max_phonemes,
        }
    }

    /// Restrict language-tagged alternatives to those valid for `language`.
    pub fn for_language(mut self, language: &'a Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Rewrite `word` into its capped set of phoneme strings.
    pub fn apply(&self, word: &str) -> Frontier {
        self.apply_with_stats(word).0
    }

    pub fn apply_with_stats(&self, word: &str) -> (Frontier, ApplyStats) {
        let mut frontier = Frontier::seed(self.max_phonemes);
        let mut stats = ApplyStats::default();
        let mut pos = 0;

        while pos < word.len() {
            stats.steps += 1;
            if let Some((rule, alternatives)) = self.select(word, pos) {
                trace!(
                    word,
                    pos,
                    rule = %rule,
                    language = ?self.language.map(Language::as_str),
                    "rule selected"
                );
                frontier = frontier.expand(alternatives.as_slice());
                pos += rule.pattern().len();
                stats.rule_matches += 1;
            } else {
                let Some(ch) = word[pos..].chars().next() else {
                    break;
                };
                let mut buf = [0u8; 4];
                frontier.append(ch.encode_utf8(&mut buf));
                pos += ch.len_utf8();
                stats.literal_copies += 1;
            }
        }

        (frontier, stats)
    }

    /// Apply the rule list to every candidate of `input` and union the
    /// results in order, capped.
    pub fn apply_frontier(&self, input: &Frontier) -> Frontier {
        let mut out = Frontier::new(self.max_phonemes);
        for candidate in input {
            if out.is_full() {
                break;
            }
            out.union(self.apply(candidate));
        }
        out
    }

    /// First rule matching at `pos` that has at least one alternative valid
    /// for this applier's language, with those alternatives.
    fn select(&self, word: &str, pos: usize) -> Option<(&'a Rule, Vec<&'a str>)> {
        for rule in self.rules.candidates_at(word, pos) {
            if !rule.matches_at(word, pos) {
                continue;
            }
            let alternatives: Vec<&'a str> = rule
                .phonemes()
                .iter()
                .filter(|p| p.applies_to(self.language))
                .map(|p| p.text())
                .collect();
            if !alternatives.is_empty() {
                return Some((rule, alternatives));
            }
        }
        None
    }
}
