// core/src/engine.rs
//
// Name encoder that drives language guessing, per-language rule application
// and finalization against any injected rule table.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::{
    utils, Config, Frontier, LanguageGuesser, LanguageSet, NameType, RuleApplier, RuleSet,
    RuleTable, RuleType,
};

/// Widest raw frontier tried per word, as a multiple of `max_phonemes`.
const RAW_HEADROOM: usize = 64;

/// Converts names into `|`-separated phonetic alternatives.
///
/// The engine holds its configuration and a shared, read-only rule table.
/// `encode` takes `&self`, performs no I/O and keeps no state between calls,
/// so one engine can serve any number of threads.
pub struct PhoneticEngine<T: RuleTable + ?Sized = RuleSet> {
    table: Arc<T>,
    name_type: NameType,
    rule_type: RuleType,
    concat: bool,
    max_phonemes: usize,
}

impl<T: RuleTable + ?Sized> PhoneticEngine<T> {
    /// Create an engine, checking that `table` can serve every language the
    /// guesser may produce for `name_type`.
    pub fn new(
        table: Arc<T>,
        name_type: NameType,
        rule_type: RuleType,
        concat: bool,
        max_phonemes: usize,
    ) -> Result<Self, ConfigError> {
        if max_phonemes == 0 {
            return Err(ConfigError::InvalidMaxPhonemes(max_phonemes));
        }

        let declared = table.languages(name_type);
        if declared.is_empty() {
            return Err(ConfigError::NoLanguages(name_type));
        }

        let mut reachable: LanguageSet = declared.iter().cloned().collect();
        for language in table.fallback_languages(name_type).iter() {
            reachable.insert(language.clone());
        }
        for rule in table.guess_rules(name_type) {
            for language in rule.languages().iter() {
                reachable.insert(language.clone());
            }
        }
        for language in reachable.iter() {
            if table.rules(name_type, rule_type, language).is_none() {
                return Err(ConfigError::MissingRules {
                    name_type,
                    rule_type,
                    language: language.clone(),
                });
            }
        }

        if table.final_rules(name_type, rule_type).is_none() {
            return Err(ConfigError::MissingFinalRules {
                name_type,
                rule_type,
            });
        }

        debug!(
            %name_type,
            %rule_type,
            concat,
            max_phonemes,
            languages = %reachable,
            "phonetic engine ready"
        );

        Ok(Self {
            table,
            name_type,
            rule_type,
            concat,
            max_phonemes,
        })
    }

    pub fn from_config(table: Arc<T>, config: &Config) -> Result<Self, ConfigError> {
        Self::new(
            table,
            config.name_type,
            config.rule_type,
            config.concat,
            config.max_phonemes,
        )
    }

    /// Encode a name. Total over all input; degenerate input yields `""`.
    pub fn encode(&self, input: &str) -> String {
        self.encode_name(input, None)
    }

    /// Encode a name using `languages` for every word instead of guessing.
    pub fn encode_with_languages(
        &self,
        input: &str,
        languages: &LanguageSet,
    ) -> Result<String, ConfigError> {
        if languages.is_empty() {
            return Err(ConfigError::EmptyLanguageSet);
        }
        for language in languages {
            if self
                .table
                .rules(self.name_type, self.rule_type, language)
                .is_none()
            {
                return Err(ConfigError::MissingRules {
                    name_type: self.name_type,
                    rule_type: self.rule_type,
                    language: language.clone(),
                });
            }
        }
        Ok(self.encode_name(input, Some(languages)))
    }

    /// Languages the guesser selects for a single word.
    pub fn guess_languages(&self, word: &str) -> LanguageSet {
        LanguageGuesser::from_table(&*self.table, self.name_type).guess(word)
    }

    pub fn name_type(&self) -> NameType {
        self.name_type
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    pub fn is_concat(&self) -> bool {
        self.concat
    }

    pub fn max_phonemes(&self) -> usize {
        self.max_phonemes
    }

    pub fn table(&self) -> &Arc<T> {
        &self.table
    }

    fn encode_name(&self, input: &str, languages: Option<&LanguageSet>) -> String {
        let name = self.normalize(input);

        if self.name_type == NameType::Generic {
            if let Some((rest, joined)) = self.split_prefix(&name) {
                trace!(name = %name, rest = %rest, joined = %joined, "prefixed name");
                return format!(
                    "({})-({})",
                    self.encode_name(&rest, languages),
                    self.encode_name(&joined, languages)
                );
            }
        }

        let words = self.split_words(&name);
        let encoded: Vec<Frontier> = words
            .iter()
            .map(|word| self.encode_word(word, languages))
            .collect();

        if self.concat {
            let mut combined = Frontier::seed(self.max_phonemes);
            for word in &encoded {
                combined = combined.expand(word.as_slice());
            }
            combined.join("|")
        } else {
            encoded
                .iter()
                .map(|word| word.join("|"))
                .collect::<Vec<_>>()
                .join("-")
        }
    }

    /// NFC, lower case, runs of boundary characters collapsed to one space.
    /// `|` separates alternatives in the output, so it always splits words.
    fn normalize(&self, input: &str) -> String {
        utils::normalize(input)
            .split(|c: char| c == '|' || self.table.is_word_boundary(c))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// For a name starting with a prefix, the remainder and the name with
    /// the prefix joined on. The longest matching prefix wins.
    fn split_prefix(&self, name: &str) -> Option<(String, String)> {
        let mut best: Option<(usize, &str, &str)> = None;

        for prefix in self.table.name_prefixes(self.name_type) {
            let found = match prefix.strip_suffix('\'') {
                // Elided: "d'ortley" -> "ortley", "dortley".
                Some(stem) => name.strip_prefix(prefix.as_str()).map(|rest| (rest, stem)),
                // Detached: "van helsing" -> "helsing", "vanhelsing".
                None => name
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_prefix(' '))
                    .map(|rest| (rest, prefix.as_str())),
            };
            if let Some((rest, head)) = found {
                if !rest.is_empty() && best.map_or(true, |(len, _, _)| prefix.len() > len) {
                    best = Some((prefix.len(), rest, head));
                }
            }
        }

        best.map(|(_, rest, head)| {
            let mut joined: String = head.chars().filter(|c| *c != ' ').collect();
            joined.push_str(rest);
            (rest.to_string(), joined)
        })
    }

    /// Words to encode. Outside GENERIC, words equal to a prefix are
    /// dropped unless nothing else is left.
    fn split_words(&self, name: &str) -> Vec<String> {
        let words: Vec<&str> = name
            .split(' ')
            .map(|word| match self.name_type {
                NameType::Sephardic => word.rsplit('\'').next().unwrap_or(word),
                _ => word,
            })
            .filter(|word| word.chars().any(char::is_alphanumeric))
            .collect();

        if self.name_type == NameType::Generic {
            return words.into_iter().map(str::to_string).collect();
        }

        let prefixes = self.table.name_prefixes(self.name_type);
        let kept: Vec<&str> = words
            .iter()
            .copied()
            .filter(|word| !prefixes.iter().any(|p| p == word))
            .collect();
        let words = if kept.is_empty() { words } else { kept };
        words.into_iter().map(str::to_string).collect()
    }

    /// Encode one word into at most `max_phonemes` finalized alternatives.
    ///
    /// Finalization can merge raw candidates, so when the finalized set
    /// comes up short the raw frontier is regenerated wider, up to
    /// `RAW_HEADROOM` times the cap, until it fills or the raw candidates
    /// run out. Raw frontiers of any width agree on their common prefix, so
    /// the result is always the head of the uncapped encoding.
    fn encode_word(&self, word: &str, explicit: Option<&LanguageSet>) -> Frontier {
        let guessed;
        let languages = match explicit {
            Some(languages) => languages,
            None => {
                guessed = self.guess_languages(word);
                &guessed
            }
        };

        let Some(finals) = self.table.final_rules(self.name_type, self.rule_type) else {
            return self.apply_primary(word, languages, self.max_phonemes);
        };
        let finalizer = RuleApplier::new(finals, self.max_phonemes);
        let budget = self.max_phonemes.saturating_mul(RAW_HEADROOM);

        let mut width = self.max_phonemes;
        loop {
            let raw = self.apply_primary(word, languages, width);
            let out = finalizer.apply_frontier(&raw);
            if out.is_full() || raw.len() < width || width >= budget {
                return out;
            }
            width = width.saturating_mul(2).min(budget);
            trace!(word, width, finalized = out.len(), "widening raw candidates");
        }
    }

    /// Union of the per-language primary rule outputs, in language order,
    /// capped at `width`.
    fn apply_primary(&self, word: &str, languages: &LanguageSet, width: usize) -> Frontier {
        let mut merged = Frontier::new(width);
        for language in languages {
            if merged.is_full() {
                break;
            }
            let Some(rules) = self.table.rules(self.name_type, self.rule_type, language) else {
                continue;
            };
            let raw = RuleApplier::new(rules, width)
                .for_language(language)
                .apply(word);
            trace!(word, language = %language, candidates = raw.len(), "applied primary rules");
            merged.union(raw);
        }
        merged
    }
}

impl<T: RuleTable + ?Sized> Clone for PhoneticEngine<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            name_type: self.name_type,
            rule_type: self.rule_type,
            concat: self.concat,
            max_phonemes: self.max_phonemes,
        }
    }
}

impl<T: RuleTable + ?Sized> fmt::Debug for PhoneticEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneticEngine")
            .field("name_type", &self.name_type)
            .field("rule_type", &self.rule_type)
            .field("concat", &self.concat)
            .field("max_phonemes", &self.max_phonemes)
            .finish_non_exhaustive()
    }
}
