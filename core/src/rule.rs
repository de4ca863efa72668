//! Rewrite rules and the enumerations that key rule tables.
//!
//! A [`Rule`] rewrites a literal input pattern into one or more phoneme
//! alternatives when its left and right contexts match. Rules are grouped in
//! a [`RuleList`], whose declaration order decides which rule wins when more
//! than one could apply at a position.
use ahash::AHashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseKindError, RuleError};
use crate::{Language, LanguageSet};

/// Family of language-guessing heuristics and rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameType {
    Generic,
    Ashkenazi,
    Sephardic,
}

impl NameType {
    pub const ALL: [NameType; 3] = [NameType::Generic, NameType::Ashkenazi, NameType::Sephardic];

    /// Short code used in rule-file names (`gen`, `ash`, `sep`).
    pub fn code(self) -> &'static str {
        match self {
            NameType::Generic => "gen",
            NameType::Ashkenazi => "ash",
            NameType::Sephardic => "sep",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NameType::Generic => "generic",
            NameType::Ashkenazi => "ashkenazi",
            NameType::Sephardic => "sephardic",
        }
    }

    /// Built-in name prefixes.
    ///
    /// For `Generic` a prefix ending in an apostrophe is elided (`d'ortley`),
    /// every other prefix is detached and followed by a space (`van helsing`).
    /// For `Ashkenazi` and `Sephardic` words equal to a prefix are dropped.
    pub fn default_prefixes(self) -> &'static [&'static str] {
        match self {
            NameType::Generic => &[
                "d'", "da", "dal", "de", "del", "dela", "de la", "della", "des", "di", "do", "dos",
                "du", "van", "von",
            ],
            NameType::Ashkenazi => &["bar", "ben", "da", "de", "van", "von"],
            NameType::Sephardic => &[
                "al", "el", "da", "dal", "de", "del", "dela", "de la", "della", "des", "di", "do",
                "dos", "du", "van", "von",
            ],
        }
    }
}

impl fmt::Display for NameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NameType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "gen" => Ok(NameType::Generic),
            "ashkenazi" | "ash" => Ok(NameType::Ashkenazi),
            "sephardic" | "sep" => Ok(NameType::Sephardic),
            _ => Err(ParseKindError {
                kind: "name type",
                value: s.to_string(),
            }),
        }
    }
}

/// Selects the finalization rule set.
///
/// `Approx` collapses acoustically similar phonemes, `Exact` keeps them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Approx,
    Exact,
}

impl RuleType {
    pub const ALL: [RuleType; 2] = [RuleType::Approx, RuleType::Exact];

    pub fn name(self) -> &'static str {
        match self {
            RuleType::Approx => "approx",
            RuleType::Exact => "exact",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approx" => Ok(RuleType::Approx),
            "exact" => Ok(RuleType::Exact),
            _ => Err(ParseKindError {
                kind: "rule type",
                value: s.to_string(),
            }),
        }
    }
}

/// One output alternative of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phoneme {
    text: String,
    /// Languages this alternative is restricted to; `None` means all.
    languages: Option<LanguageSet>,
}

impl Phoneme {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            languages: None,
        }
    }

    /// An alternative used only when applying rules for one of `languages`.
    pub fn restricted<T: Into<String>>(text: T, languages: LanguageSet) -> Self {
        Self {
            text: text.into(),
            languages: Some(languages),
        }
    }

    /// Unrestricted alternatives from plain strings, in order.
    pub fn alternatives<I, S>(texts: I) -> Vec<Phoneme>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts.into_iter().map(Phoneme::new).collect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn languages(&self) -> Option<&LanguageSet> {
        self.languages.as_ref()
    }

    /// Whether this alternative may be emitted while applying rules for
    /// `language`. `None` (the finalization pass) and `"any"` accept every
    /// alternative.
    pub fn applies_to(&self, language: Option<&Language>) -> bool {
        match (language, &self.languages) {
            (None, _) | (_, None) => true,
            (Some(language), Some(allowed)) => language.is_any() || allowed.contains(language),
        }
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.languages {
            Some(languages) => write!(f, "{}[{}]", self.text, languages),
            None => f.write_str(&self.text),
        }
    }
}

/// An immutable context-sensitive rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    left_source: String,
    right_source: String,
    left: Option<Regex>,
    right: Option<Regex>,
    phonemes: Vec<Phoneme>,
}

impl Rule {
    /// Build a rule.
    ///
    /// `left` must match the text immediately preceding the cursor and
    /// `right` the text immediately following the matched pattern; both are
    /// regular expressions and an empty context always matches.
    pub fn new(
        pattern: &str,
        left: &str,
        right: &str,
        phonemes: Vec<Phoneme>,
    ) -> Result<Self, RuleError> {
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        if phonemes.is_empty() {
            return Err(RuleError::NoPhonemes {
                pattern: pattern.to_string(),
            });
        }

        Ok(Self {
            pattern: pattern.to_string(),
            left_source: left.to_string(),
            right_source: right.to_string(),
            left: compile_context(left, |c| format!("(?:{})$", c))?,
            right: compile_context(right, |c| format!("^(?:{})", c))?,
            phonemes,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn left_context(&self) -> &str {
        &self.left_source
    }

    pub fn right_context(&self) -> &str {
        &self.right_source
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.phonemes
    }

    /// True if the pattern occurs at byte offset `pos` of `input` and both
    /// contexts match around it.
    pub fn matches_at(&self, input: &str, pos: usize) -> bool {
        let Some(rest) = input.get(pos..) else {
            return false;
        };
        if !rest.starts_with(&self.pattern) {
            return false;
        }
        let end = pos + self.pattern.len();

        if let Some(right) = &self.right {
            if !right.is_match(&input[end..]) {
                return false;
            }
        }
        match &self.left {
            Some(left) => left.is_match(&input[..pos]),
            None => true,
        }
    }
}

fn compile_context(
    context: &str,
    anchor: impl Fn(&str) -> String,
) -> Result<Option<Regex>, RuleError> {
    if context.is_empty() {
        return Ok(None);
    }
    Regex::new(&anchor(context))
        .map(Some)
        .map_err(|source| RuleError::InvalidContext {
            context: context.to_string(),
            source,
        })
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" \"{}\" \"{}\" \"",
            self.pattern, self.left_source, self.right_source
        )?;
        if self.phonemes.len() == 1 {
            write!(f, "{}", self.phonemes[0])?;
        } else {
            f.write_str("(")?;
            for (i, p) in self.phonemes.iter().enumerate() {
                if i > 0 {
                    f.write_str("|")?;
                }
                write!(f, "{}", p)?;
            }
            f.write_str(")")?;
        }
        f.write_str("\"")
    }
}

/// An ordered list of rules indexed by the first character of each pattern.
///
/// The index only narrows the scan; within one first character the rules
/// are visited in declaration order, so the first matching rule is the same
/// one a full linear scan would find.
#[derive(Debug, Clone, Default)]
pub struct RuleList {
    rules: Vec<Rule>,
    by_first_char: AHashMap<char, Vec<usize>>,
}

impl RuleList {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut by_first_char: AHashMap<char, Vec<usize>> = AHashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            if let Some(first) = rule.pattern.chars().next() {
                by_first_char.entry(first).or_default().push(i);
            }
        }
        Self {
            rules,
            by_first_char,
        }
    }

    /// Rules whose pattern starts with the character at byte offset `pos`,
    /// in declaration order.
    pub fn candidates_at<'a>(&'a self, input: &str, pos: usize) -> impl Iterator<Item = &'a Rule> + 'a {
        let indices: &'a [usize] = input
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .and_then(|c| self.by_first_char.get(&c))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        indices.iter().map(move |&i| &self.rules[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleList {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleList::new(iter.into_iter().collect())
    }
}
