// bmpm/rules/src/parser.rs
//
// Parsers for the Beider-Morse rule file formats.
//
// All formats share the same comment conventions:
// - `//` starts a comment that runs to the end of the line
// - a line starting with `/*` opens a block comment that is closed by the
//   first line ending with `*/`
//
// Rule files hold one rule per line as four double-quoted fields
//
//     "pattern" "left context" "right context" "phonemes"
//
// or an `#include <stem>` directive that splices in `<stem>.txt` from the
// same directory. Guess-rule files hold `<regex> <lang>[+<lang>...] <bool>`
// lines. Language and prefix files hold one entry per line.

use bmpm_core::{Language, LanguageRule, LanguageSet, Phoneme, Rule};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LoadError;

static RULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"([^"]*)"\s+"([^"]*)"\s+"([^"]*)"\s+"([^"]*)"$"#).expect("rule line pattern")
});

/// One significant line of a rule file.
#[derive(Debug, Clone)]
pub enum RuleItem {
    Rule(Rule),
    Include(String),
}

/// Lines left after removing comments and blank lines, with their 1-based
/// line numbers.
pub fn significant_lines(text: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut in_block = false;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_start_matches('\u{feff}').trim();
        if in_block {
            if line.ends_with("*/") {
                in_block = false;
            }
            continue;
        }
        if line.starts_with("/*") {
            in_block = !(line.len() >= 4 && line.ends_with("*/"));
            continue;
        }
        let line = match line.find("//") {
            Some(at) => line[..at].trim_end(),
            None => line,
        };
        if !line.is_empty() {
            lines.push((index + 1, line));
        }
    }
    lines
}

/// Parse a rule file into rules and include directives, in file order.
pub fn parse_rules(file: &str, text: &str) -> Result<Vec<RuleItem>, LoadError> {
    let mut items = Vec::new();

    for (line_no, line) in significant_lines(text) {
        if let Some(rest) = line.strip_prefix("#include") {
            let stem = rest.trim();
            if stem.is_empty()
                || stem.contains(char::is_whitespace)
                || stem.contains(|c: char| c == '/' || c == '\\')
            {
                return Err(LoadError::syntax(
                    file,
                    line_no,
                    format!("malformed include directive {:?}", line),
                ));
            }
            items.push(RuleItem::Include(stem.to_string()));
            continue;
        }

        let caps = RULE_LINE.captures(line).ok_or_else(|| {
            LoadError::syntax(
                file,
                line_no,
                format!("expected four quoted fields, found {:?}", line),
            )
        })?;
        let phonemes =
            parse_phonemes(&caps[4]).map_err(|message| LoadError::syntax(file, line_no, message))?;
        let rule = Rule::new(&caps[1], &caps[2], &caps[3], phonemes).map_err(|source| {
            LoadError::InvalidRule {
                file: file.to_string(),
                line: line_no,
                source,
            }
        })?;
        items.push(RuleItem::Rule(rule));
    }

    Ok(items)
}

/// Parse a phoneme expression: `text`, `text[lang+lang]` or a parenthesized
/// `|`-separated list of those. Empty alternatives are allowed.
pub fn parse_phonemes(expr: &str) -> Result<Vec<Phoneme>, String> {
    match expr.strip_prefix('(') {
        Some(body) => {
            let body = body
                .strip_suffix(')')
                .ok_or_else(|| format!("unclosed phoneme list {:?}", expr))?;
            body.split('|').map(parse_phoneme).collect()
        }
        None => Ok(vec![parse_phoneme(expr)?]),
    }
}

fn parse_phoneme(text: &str) -> Result<Phoneme, String> {
    let Some(open) = text.find('[') else {
        if text.contains(']') {
            return Err(format!("unbalanced language restriction in {:?}", text));
        }
        return Ok(Phoneme::new(text));
    };
    let languages = text[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| format!("unclosed language restriction in {:?}", text))?;
    let languages = parse_language_list(languages)
        .ok_or_else(|| format!("empty language restriction in {:?}", text))?;
    Ok(Phoneme::restricted(&text[..open], languages))
}

/// `a+b+c` as a set; `None` if no language is named.
fn parse_language_list(list: &str) -> Option<LanguageSet> {
    let set: LanguageSet = list
        .split('+')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

/// Parse a language guess file.
pub fn parse_guess_rules(file: &str, text: &str) -> Result<Vec<LanguageRule>, LoadError> {
    let mut rules = Vec::new();

    for (line_no, line) in significant_lines(text) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [pattern, languages, accept] = fields.as_slice() else {
            return Err(LoadError::syntax(
                file,
                line_no,
                format!("expected <pattern> <languages> <true|false>, found {:?}", line),
            ));
        };
        let accept = match *accept {
            "true" => true,
            "false" => false,
            other => {
                return Err(LoadError::syntax(
                    file,
                    line_no,
                    format!("expected true or false, found {:?}", other),
                ))
            }
        };
        let languages = parse_language_list(languages).unwrap_or_default();
        let rule = LanguageRule::new(pattern, languages, accept).map_err(|source| {
            LoadError::InvalidRule {
                file: file.to_string(),
                line: line_no,
                source,
            }
        })?;
        rules.push(rule);
    }

    Ok(rules)
}

/// Parse a language list file: one language per line, duplicates ignored.
pub fn parse_languages(text: &str) -> Vec<Language> {
    let mut languages: Vec<Language> = Vec::new();
    for (_, line) in significant_lines(text) {
        let language = Language::new(line);
        if !languages.contains(&language) {
            languages.push(language);
        }
    }
    languages
}

/// Parse a name-prefix file: one prefix per line, lower-cased. A prefix may
/// contain inner spaces (`de la`).
pub fn parse_prefixes(text: &str) -> Vec<String> {
    significant_lines(text)
        .into_iter()
        .map(|(_, line)| line.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines() {
        let text = "\u{feff}// header\n\n/*\n\"a\" \"\" \"\" \"b\"\n*/\n\"x\" \"\" \"\" \"y\" // trailing\n/* one line */\n  \n";
        let lines = significant_lines(text);
        assert_eq!(lines, vec![(6, "\"x\" \"\" \"\" \"y\"")]);
    }

    #[test]
    fn rule_lines_and_includes() {
        let text = "\"au\" \"\" \"\" \"(D|a|o|u)\"\n#include gen_common\n\"lt\" \"\" \"$\" \"(|lt)\"\n";
        let items = parse_rules("gen_rules_french.txt", text).unwrap();
        assert_eq!(items.len(), 3);

        let RuleItem::Rule(first) = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(first.pattern(), "au");
        let texts: Vec<&str> = first.phonemes().iter().map(Phoneme::text).collect();
        assert_eq!(texts, vec!["D", "a", "o", "u"]);

        assert!(matches!(&items[1], RuleItem::Include(stem) if stem == "gen_common"));

        let RuleItem::Rule(last) = &items[2] else {
            panic!("expected rule");
        };
        assert_eq!(last.right_context(), "$");
        let texts: Vec<&str> = last.phonemes().iter().map(Phoneme::text).collect();
        assert_eq!(texts, vec!["", "lt"]);
    }

    #[test]
    fn phoneme_restrictions() {
        let phonemes = parse_phonemes("(o|u[polish+russian]|)").unwrap();
        assert_eq!(phonemes.len(), 3);
        assert!(phonemes[0].languages().is_none());
        assert_eq!(phonemes[1].to_string(), "u[polish+russian]");
        assert_eq!(phonemes[2].text(), "");

        let single = parse_phonemes("v[german]").unwrap();
        assert_eq!(single[0].text(), "v");
        assert_eq!(single[0].languages().map(ToString::to_string).as_deref(), Some("german"));

        assert_eq!(parse_phonemes("").unwrap()[0].text(), "");
    }

    #[test]
    fn malformed_phonemes() {
        assert!(parse_phonemes("(a|b").is_err());
        assert!(parse_phonemes("a[german").is_err());
        assert!(parse_phonemes("a[]").is_err());
        assert!(parse_phonemes("a]").is_err());
    }

    #[test]
    fn syntax_errors_carry_location() {
        let text = "\"a\" \"\" \"\" \"b\"\n\n\"broken\" \"\"\n";
        match parse_rules("gen_rules_any.txt", text) {
            Err(LoadError::Syntax { file, line, .. }) => {
                assert_eq!(file, "gen_rules_any.txt");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected {other:?}"),
        }

        match parse_rules("x.txt", "\"a\" \"[\" \"\" \"b\"") {
            Err(LoadError::InvalidRule { line: 1, .. }) => {}
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            parse_rules("x.txt", "#include a b"),
            Err(LoadError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            parse_rules("x.txt", "#include ../gen_rules_any"),
            Err(LoadError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            parse_rules("x.txt", "\"\" \"\" \"\" \"b\""),
            Err(LoadError::InvalidRule { .. })
        ));
    }

    #[test]
    fn guess_rules() {
        let text = "// guess rules\nault$ french true\n^j german+spanish+french true\nburg$ spanish false\n";
        let rules = parse_guess_rules("gen_lang.txt", text).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[1].languages().to_string(), "german+spanish+french");
        assert!(rules[1].accepts_on_match());
        assert!(!rules[2].accepts_on_match());
        assert!(rules[0].matches("renault"));

        assert!(matches!(
            parse_guess_rules("gen_lang.txt", "ault$ french maybe"),
            Err(LoadError::Syntax { line: 1, .. })
        ));
        assert!(matches!(
            parse_guess_rules("gen_lang.txt", "ault$ french"),
            Err(LoadError::Syntax { .. })
        ));
        assert!(matches!(
            parse_guess_rules("gen_lang.txt", "( french true"),
            Err(LoadError::InvalidRule { .. })
        ));
    }

    #[test]
    fn language_and_prefix_lists() {
        let languages = parse_languages("any\n// comment\ngerman\n\ngerman\nfrench\n");
        let names: Vec<&str> = languages.iter().map(Language::as_str).collect();
        assert_eq!(names, vec!["any", "german", "french"]);

        assert_eq!(parse_prefixes("Van\nde la\n"), vec!["van", "de la"]);
    }
}
