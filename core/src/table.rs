//! The read-only rule lookup consumed by the engine.
//!
//! [`RuleTable`] is the seam between the engine and whatever produced the
//! rules. [`RuleSet`] is the in-memory implementation: tests build small
//! synthetic sets with it and the `bmpm-rules` loader fills one from rule
//! files.
use std::collections::HashMap;

use crate::{Language, LanguageRule, LanguageSet, NameType, Rule, RuleList, RuleType};

/// Read-only rule lookup.
///
/// Implementations must be immutable once handed to an engine; engines
/// share them behind an `Arc` without locking.
pub trait RuleTable {
    /// Languages declared for a name type, in merge order.
    fn languages(&self, name_type: NameType) -> &[Language];

    /// Primary rules for one language.
    fn rules(
        &self,
        name_type: NameType,
        rule_type: RuleType,
        language: &Language,
    ) -> Option<&RuleList>;

    /// Language-independent finalization rules.
    fn final_rules(&self, name_type: NameType, rule_type: RuleType) -> Option<&RuleList>;

    /// Language guess rules, in evaluation order.
    fn guess_rules(&self, name_type: NameType) -> &[LanguageRule];

    /// Name prefixes (see [`NameType::default_prefixes`]).
    fn name_prefixes(&self, name_type: NameType) -> &[String];

    /// Languages used when no guess rule matches.
    fn fallback_languages(&self, _name_type: NameType) -> LanguageSet {
        LanguageSet::any()
    }

    /// Characters that separate the words of a name.
    fn is_word_boundary(&self, c: char) -> bool {
        c.is_whitespace() || c == '-'
    }
}

#[derive(Debug, Clone, Default)]
struct NameTypeRules {
    languages: Vec<Language>,
    rules: HashMap<Language, RuleList>,
    final_rules: HashMap<RuleType, RuleList>,
    guess_rules: Vec<LanguageRule>,
    prefixes: Option<Vec<String>>,
}

/// In-memory rule table.
///
/// Primary rules are stored per (name type, language) and served for every
/// rule type; the rule type only selects the finalization list.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    by_name_type: HashMap<NameType, NameTypeRules>,
    default_prefixes: HashMap<NameType, Vec<String>>,
}

impl RuleSet {
    pub fn new() -> Self {
        let default_prefixes = NameType::ALL
            .iter()
            .map(|&nt| {
                let prefixes = nt.default_prefixes().iter().map(|p| p.to_string()).collect();
                (nt, prefixes)
            })
            .collect();
        Self {
            by_name_type: HashMap::new(),
            default_prefixes,
        }
    }

    fn entry(&mut self, name_type: NameType) -> &mut NameTypeRules {
        self.by_name_type.entry(name_type).or_default()
    }

    /// Declare a language for a name type. Declaration order is merge order.
    pub fn declare_language<L: Into<Language>>(&mut self, name_type: NameType, language: L) {
        let language = language.into();
        let entry = self.entry(name_type);
        if !entry.languages.contains(&language) {
            entry.languages.push(language);
        }
    }

    /// Set the primary rules for a language, declaring it if needed.
    pub fn insert_rules<L: Into<Language>>(
        &mut self,
        name_type: NameType,
        language: L,
        rules: Vec<Rule>,
    ) {
        let language = language.into();
        self.declare_language(name_type, language.clone());
        self.entry(name_type)
            .rules
            .insert(language, RuleList::new(rules));
    }

    pub fn insert_final_rules(&mut self, name_type: NameType, rule_type: RuleType, rules: Vec<Rule>) {
        self.entry(name_type)
            .final_rules
            .insert(rule_type, RuleList::new(rules));
    }

    pub fn push_guess_rule(&mut self, name_type: NameType, rule: LanguageRule) {
        self.entry(name_type).guess_rules.push(rule);
    }

    /// Replace the built-in name prefixes of a name type.
    pub fn set_prefixes<I, S>(&mut self, name_type: NameType, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry(name_type).prefixes = Some(prefixes.into_iter().map(Into::into).collect());
    }

    /// Name types that have at least one declared language.
    pub fn name_types(&self) -> Vec<NameType> {
        NameType::ALL
            .into_iter()
            .filter(|nt| {
                self.by_name_type
                    .get(nt)
                    .is_some_and(|r| !r.languages.is_empty())
            })
            .collect()
    }

    /// Total number of rules (primary and final) stored for a name type.
    pub fn rule_count(&self, name_type: NameType) -> usize {
        self.by_name_type.get(&name_type).map_or(0, |r| {
            r.rules.values().map(RuleList::len).sum::<usize>()
                + r.final_rules.values().map(RuleList::len).sum::<usize>()
        })
    }
}

impl RuleTable for RuleSet {
    fn languages(&self, name_type: NameType) -> &[Language] {
        self.by_name_type
            .get(&name_type)
            .map_or(&[], |r| r.languages.as_slice())
    }

    fn rules(
        &self,
        name_type: NameType,
        _rule_type: RuleType,
        language: &Language,
    ) -> Option<&RuleList> {
        self.by_name_type.get(&name_type)?.rules.get(language)
    }

    fn final_rules(&self, name_type: NameType, rule_type: RuleType) -> Option<&RuleList> {
        self.by_name_type.get(&name_type)?.final_rules.get(&rule_type)
    }

    fn guess_rules(&self, name_type: NameType) -> &[LanguageRule] {
        self.by_name_type
            .get(&name_type)
            .map_or(&[], |r| r.guess_rules.as_slice())
    }

    fn name_prefixes(&self, name_type: NameType) -> &[String] {
        match self.by_name_type.get(&name_type).and_then(|r| r.prefixes.as_ref()) {
            Some(prefixes) => prefixes,
            None => self
                .default_prefixes
                .get(&name_type)
                .map_or(&[], Vec::as_slice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phoneme;

    #[test]
    fn lookups_by_key() {
        let mut set = RuleSet::new();
        set.insert_rules(
            NameType::Generic,
            "french",
            vec![Rule::new("au", "", "", Phoneme::alternatives(["o"])).unwrap()],
        );
        set.insert_final_rules(NameType::Generic, RuleType::Approx, vec![]);

        let french = Language::new("french");
        assert_eq!(set.languages(NameType::Generic), &[french.clone()]);
        assert!(set.rules(NameType::Generic, RuleType::Exact, &french).is_some());
        assert!(set.rules(NameType::Ashkenazi, RuleType::Approx, &french).is_none());
        assert!(set.final_rules(NameType::Generic, RuleType::Approx).is_some());
        assert!(set.final_rules(NameType::Generic, RuleType::Exact).is_none());
        assert_eq!(set.name_types(), vec![NameType::Generic]);
        assert_eq!(set.rule_count(NameType::Generic), 1);
    }

    #[test]
    fn declaration_order_is_kept() {
        let mut set = RuleSet::new();
        set.declare_language(NameType::Generic, "any");
        set.insert_rules(NameType::Generic, "german", vec![]);
        set.insert_rules(NameType::Generic, "any", vec![]);
        let names: Vec<&str> = set
            .languages(NameType::Generic)
            .iter()
            .map(Language::as_str)
            .collect();
        assert_eq!(names, vec!["any", "german"]);
    }

    #[test]
    fn prefixes_default_and_override() {
        let mut set = RuleSet::new();
        assert!(set
            .name_prefixes(NameType::Ashkenazi)
            .iter()
            .any(|p| p == "ben"));
        set.set_prefixes(NameType::Ashkenazi, ["ibn"]);
        assert_eq!(set.name_prefixes(NameType::Ashkenazi), &["ibn".to_string()]);
        assert!(set.name_prefixes(NameType::Generic).iter().any(|p| p == "d'"));
    }

    #[test]
    fn default_boundaries() {
        let set = RuleSet::new();
        assert!(set.is_word_boundary(' '));
        assert!(set.is_word_boundary('-'));
        assert!(set.is_word_boundary('\t'));
        assert!(!set.is_word_boundary('\''));
        assert!(set.fallback_languages(NameType::Sephardic).is_any());
    }
}
