//! Language guessing from whole-word patterns.
use std::borrow::Cow;

use regex::Regex;
use tracing::trace;

use crate::error::RuleError;
use crate::{Language, LanguageSet, NameType, RuleTable};

/// A whole-word test that votes for (or against) a set of languages.
#[derive(Debug, Clone)]
pub struct LanguageRule {
    pattern: Regex,
    languages: LanguageSet,
    accept_on_match: bool,
}

impl LanguageRule {
    /// Build a guess rule. The pattern is searched anywhere in the word;
    /// anchor it with `^`/`$` to test prefixes or suffixes.
    pub fn new(
        pattern: &str,
        languages: LanguageSet,
        accept_on_match: bool,
    ) -> Result<Self, RuleError> {
        if languages.is_empty() {
            return Err(RuleError::NoGuessLanguages {
                pattern: pattern.to_string(),
            });
        }
        let pattern = Regex::new(pattern).map_err(|source| RuleError::InvalidGuessPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            languages,
            accept_on_match,
        })
    }

    /// A rule adding `languages` to the guess when it matches.
    pub fn accept(pattern: &str, languages: LanguageSet) -> Result<Self, RuleError> {
        Self::new(pattern, languages, true)
    }

    /// A rule removing `languages` from the guess when it matches.
    pub fn reject(pattern: &str, languages: LanguageSet) -> Result<Self, RuleError> {
        Self::new(pattern, languages, false)
    }

    pub fn matches(&self, word: &str) -> bool {
        self.pattern.is_match(word)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    pub fn accepts_on_match(&self) -> bool {
        self.accept_on_match
    }
}

/// Selects the languages whose rules should be applied to a word.
#[derive(Debug, Clone)]
pub struct LanguageGuesser<'a> {
    rules: &'a [LanguageRule],
    declared: &'a [Language],
    fallback: LanguageSet,
}

impl<'a> LanguageGuesser<'a> {
    pub fn new(rules: &'a [LanguageRule], declared: &'a [Language], fallback: LanguageSet) -> Self {
        Self {
            rules,
            declared,
            fallback,
        }
    }

    /// The guesser for `name_type` as configured by `table`.
    pub fn from_table<T: RuleTable + ?Sized>(table: &'a T, name_type: NameType) -> Self {
        Self::new(
            table.guess_rules(name_type),
            table.languages(name_type),
            table.fallback_languages(name_type),
        )
    }

    /// Languages for `word`, never empty.
    ///
    /// The result is the union of the languages of every matching accepting
    /// rule, minus the languages of every matching rejecting rule, in
    /// declared order. When nothing is left the fallback set is returned.
    ///
    /// Matching is case-insensitive. Words from `PhoneticEngine` are already
    /// lower case and are matched as is; other callers may pass mixed case.
    pub fn guess(&self, word: &str) -> LanguageSet {
        let text = lowercase(word);
        let mut accepted = LanguageSet::new();
        let mut rejected = LanguageSet::new();

        for rule in self.rules.iter().filter(|r| r.matches(&text)) {
            let target = if rule.accept_on_match {
                &mut accepted
            } else {
                &mut rejected
            };
            for language in rule.languages.iter() {
                target.insert(language.clone());
            }
        }

        let mut guessed: LanguageSet = self
            .declared
            .iter()
            .filter(|l| accepted.contains(l))
            .cloned()
            .collect();
        // Languages named by guess rules but not declared keep rule order.
        for language in accepted.iter() {
            guessed.insert(language.clone());
        }
        for language in rejected.iter() {
            guessed.remove(language);
        }

        if guessed.is_empty() {
            trace!(word = %text, fallback = %self.fallback, "no guess rule matched");
            return self.fallback.clone();
        }
        trace!(word = %text, languages = %guessed, "languages guessed");
        guessed
    }
}

/// `word` in lower case, borrowed when it already is.
fn lowercase(word: &str) -> Cow<'_, str> {
    if word.chars().any(char::is_uppercase) {
        Cow::Owned(word.to_lowercase())
    } else {
        Cow::Borrowed(word)
    }
}
