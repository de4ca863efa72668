//! Language identifiers and ordered language sets.
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque language identifier such as `"english"` or `"german"`.
///
/// The identifier `"any"` is the fallback bucket used when no guess rule
/// matches a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    /// Name of the fallback language.
    pub const ANY: &'static str = "any";

    pub fn new<T: Into<String>>(name: T) -> Self {
        Self(name.into())
    }

    /// The fallback language `"any"`.
    pub fn any() -> Self {
        Self(Self::ANY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_any(&self) -> bool {
        self.0 == Self::ANY
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Language {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Language {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ordered, duplicate-free set of languages.
///
/// Iteration follows insertion order. Sets produced by the language guesser
/// follow the rule table's declared language order, which is the order in
/// which per-language results are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet {
    languages: Vec<Language>,
}

impl LanguageSet {
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
        }
    }

    /// The set `{"any"}`.
    pub fn any() -> Self {
        Self {
            languages: vec![Language::any()],
        }
    }

    /// Insert a language, keeping the first position if already present.
    ///
    /// Returns `true` if the language was not yet in the set.
    pub fn insert(&mut self, language: Language) -> bool {
        if self.contains(&language) {
            return false;
        }
        self.languages.push(language);
        true
    }

    /// Remove a language. Returns `true` if it was present.
    pub fn remove(&mut self, language: &Language) -> bool {
        let before = self.languages.len();
        self.languages.retain(|l| l != language);
        self.languages.len() != before
    }

    pub fn contains(&self, language: &Language) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Language> {
        self.languages.iter()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// True if this is exactly the fallback set `{"any"}`.
    pub fn is_any(&self) -> bool {
        self.languages.len() == 1 && self.languages[0].is_any()
    }
}

impl<L: Into<Language>> FromIterator<L> for LanguageSet {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut set = LanguageSet::new();
        for language in iter {
            set.insert(language.into());
        }
        set
    }
}

impl<'a> IntoIterator for &'a LanguageSet {
    type Item = &'a Language;
    type IntoIter = std::slice::Iter<'a, Language>;

    fn into_iter(self) -> Self::IntoIter {
        self.languages.iter()
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, language) in self.languages.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(language.as_str())?;
        }
        Ok(())
    }
}
