// bmpm/rules/src/loader.rs
//
// Builds a `RuleSet` from a directory of rule files.
//
// For every name type code `{nt}` (gen, ash, sep) the loader reads:
// - `{nt}_languages.txt`     declared languages (name type skipped if absent)
// - `{nt}_lang.txt`          language guess rules (optional)
// - `{nt}_rules_{lang}.txt`  primary rules, one file per declared language
// - `{nt}_approx_common.txt` / `{nt}_exact_common.txt` finalization rules
// - `{nt}_prefixes.txt`      name prefixes (optional, built-in list otherwise)

use std::path::{Path, PathBuf};

use bmpm_core::{NameType, Rule, RuleSet, RuleType};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::parser::{self, RuleItem};

/// Load every name type found in `dir`.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<RuleSet, LoadError> {
    RuleLoader::new(dir.as_ref()).load()
}

/// Reads rule files from one directory.
#[derive(Debug, Clone)]
pub struct RuleLoader {
    dir: PathBuf,
}

impl RuleLoader {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load all name types present. At least one must be.
    pub fn load(&self) -> Result<RuleSet, LoadError> {
        let mut set = RuleSet::new();
        let mut loaded = 0;
        for name_type in NameType::ALL {
            if self.load_name_type(&mut set, name_type)? {
                loaded += 1;
            }
        }
        if loaded == 0 {
            return Err(LoadError::Empty {
                dir: self.dir.clone(),
            });
        }
        Ok(set)
    }

    /// Load one name type into `set`. Returns `false` if the directory has
    /// no language list for it.
    pub fn load_name_type(&self, set: &mut RuleSet, name_type: NameType) -> Result<bool, LoadError> {
        let nt = name_type.code();
        let Some(text) = self.read_optional(&format!("{nt}_languages"))? else {
            debug!(dir = %self.dir.display(), name_type = %name_type, "no language list, skipping");
            return Ok(false);
        };
        let languages = parser::parse_languages(&text);

        for language in &languages {
            let stem = format!("{nt}_rules_{}", language.as_str());
            let rules = self.load_rules(&stem)?;
            debug!(name_type = %name_type, language = %language, rules = rules.len(), "loaded primary rules");
            set.insert_rules(name_type, language.clone(), rules);
        }

        for rule_type in RuleType::ALL {
            let stem = format!("{nt}_{}_common", rule_type.name());
            let rules = self.load_rules(&stem)?;
            debug!(name_type = %name_type, rule_type = %rule_type, rules = rules.len(), "loaded final rules");
            set.insert_final_rules(name_type, rule_type, rules);
        }

        let guess_file = format!("{nt}_lang");
        if let Some(text) = self.read_optional(&guess_file)? {
            let rules = parser::parse_guess_rules(&file_name(&guess_file), &text)?;
            for rule in rules {
                for language in rule.languages() {
                    if !languages.contains(language) {
                        warn!(
                            name_type = %name_type,
                            pattern = rule.pattern(),
                            language = %language,
                            "guess rule names an undeclared language"
                        );
                    }
                }
                set.push_guess_rule(name_type, rule);
            }
        }

        if let Some(text) = self.read_optional(&format!("{nt}_prefixes"))? {
            set.set_prefixes(name_type, parser::parse_prefixes(&text));
        }

        Ok(true)
    }

    /// Parse `<stem>.txt`, following includes.
    pub fn load_rules(&self, stem: &str) -> Result<Vec<Rule>, LoadError> {
        let mut rules = Vec::new();
        let mut stack = Vec::new();
        self.collect_rules(stem, &mut stack, &mut rules)?;
        Ok(rules)
    }

    fn collect_rules(
        &self,
        stem: &str,
        stack: &mut Vec<String>,
        rules: &mut Vec<Rule>,
    ) -> Result<(), LoadError> {
        if stack.iter().any(|s| s == stem) {
            let mut chain = stack.clone();
            chain.push(stem.to_string());
            return Err(LoadError::IncludeCycle {
                chain: chain.join(" -> "),
            });
        }

        let path = self.path(stem);
        let text = self
            .read_optional(stem)?
            .ok_or(LoadError::MissingFile { path })?;

        stack.push(stem.to_string());
        for item in parser::parse_rules(&file_name(stem), &text)? {
            match item {
                RuleItem::Rule(rule) => rules.push(rule),
                RuleItem::Include(included) => self.collect_rules(&included, stack, rules)?,
            }
        }
        stack.pop();
        Ok(())
    }

    fn path(&self, stem: &str) -> PathBuf {
        self.dir.join(file_name(stem))
    }

    fn read_optional(&self, stem: &str) -> Result<Option<String>, LoadError> {
        let path = self.path(stem);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LoadError::Io { path, source }),
        }
    }
}

fn file_name(stem: &str) -> String {
    format!("{stem}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmpm_core::{Language, RuleTable};
    use std::fs;

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).unwrap();
    }

    fn minimal(dir: &Path, nt: &str) {
        write(dir, &format!("{nt}_languages.txt"), "any\n");
        write(dir, &format!("{nt}_rules_any.txt"), "\"a\" \"\" \"\" \"(a|o)\"\n");
        write(dir, &format!("{nt}_approx_common.txt"), "");
        write(dir, &format!("{nt}_exact_common.txt"), "");
    }

    #[test]
    fn loads_present_name_types_only() {
        let dir = tempfile::tempdir().unwrap();
        minimal(dir.path(), "ash");

        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.name_types(), vec![NameType::Ashkenazi]);
        assert_eq!(set.languages(NameType::Ashkenazi), &[Language::any()]);
        assert!(set.final_rules(NameType::Ashkenazi, RuleType::Exact).is_some());
        assert!(set.guess_rules(NameType::Ashkenazi).is_empty());
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_dir(dir.path()), Err(LoadError::Empty { .. })));
    }

    #[test]
    fn missing_language_rules_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        minimal(dir.path(), "gen");
        write(dir.path(), "gen_languages.txt", "any\npolish\n");
        match load_dir(dir.path()) {
            Err(LoadError::MissingFile { path }) => {
                assert!(path.ends_with("gen_rules_polish.txt"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn includes_are_spliced_in_place() {
        let dir = tempfile::tempdir().unwrap();
        minimal(dir.path(), "gen");
        write(
            dir.path(),
            "gen_rules_any.txt",
            "\"a\" \"\" \"\" \"a\"\n#include gen_shared\n\"c\" \"\" \"\" \"c\"\n",
        );
        write(dir.path(), "gen_shared.txt", "\"b\" \"\" \"\" \"b\"\n");

        let set = load_dir(dir.path()).unwrap();
        let rules = set
            .rules(NameType::Generic, RuleType::Approx, &Language::any())
            .unwrap();
        let patterns: Vec<&str> = rules.iter().map(Rule::pattern).collect();
        assert_eq!(patterns, vec!["a", "b", "c"]);
    }

    #[test]
    fn include_cycles_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        minimal(dir.path(), "gen");
        write(dir.path(), "gen_rules_any.txt", "#include gen_a\n");
        write(dir.path(), "gen_a.txt", "#include gen_b\n");
        write(dir.path(), "gen_b.txt", "#include gen_a\n");
        match load_dir(dir.path()) {
            Err(LoadError::IncludeCycle { chain }) => {
                assert_eq!(chain, "gen_rules_any -> gen_a -> gen_b -> gen_a")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn same_file_may_be_included_twice() {
        let dir = tempfile::tempdir().unwrap();
        minimal(dir.path(), "gen");
        write(dir.path(), "gen_rules_any.txt", "#include gen_a\n#include gen_a\n");
        write(dir.path(), "gen_a.txt", "\"a\" \"\" \"\" \"a\"\n");
        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.rule_count(NameType::Generic), 2);
    }

    #[test]
    fn prefixes_and_guess_rules() {
        let dir = tempfile::tempdir().unwrap();
        minimal(dir.path(), "sep");
        write(dir.path(), "sep_prefixes.txt", "ibn\nabu\n");
        write(dir.path(), "sep_lang.txt", "^ibn any true\n");

        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.name_prefixes(NameType::Sephardic), &["ibn", "abu"]);
        assert_eq!(set.guess_rules(NameType::Sephardic).len(), 1);
    }

    #[test]
    fn errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        minimal(dir.path(), "gen");
        write(dir.path(), "gen_exact_common.txt", "\n\"h\" \"\" \"$\"\n");
        let err = load_dir(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "gen_exact_common.txt:2: expected four quoted fields, found \"\\\"h\\\" \\\"\\\" \\\"$\\\"\""
        );
    }
}
