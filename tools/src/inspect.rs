use anyhow::Result;
use bmpm_rules::{NameType, RuleSet, RuleTable, RuleType};
use std::fmt::Write;

/// Summary of a loaded rule directory, one block per name type.
pub fn report(rules: &RuleSet) -> String {
    let mut out = String::new();
    for name_type in rules.name_types() {
        let _ = writeln!(out, "[{}] {} rules", name_type, rules.rule_count(name_type));
        let _ = writeln!(out, "  languages:");
        for lang in rules.languages(name_type) {
            let count = rules
                .rules(name_type, RuleType::Approx, lang)
                .map_or(0, |r| r.len());
            let _ = writeln!(out, "    {lang}: {count}");
        }
        for rule_type in RuleType::ALL {
            match rules.final_rules(name_type, rule_type) {
                Some(list) => {
                    let _ = writeln!(out, "  final {rule_type}: {}", list.len());
                }
                None => {
                    let _ = writeln!(out, "  final {rule_type}: missing");
                }
            }
        }
        let _ = writeln!(out, "  guess rules: {}", rules.guess_rules(name_type).len());
        let _ = writeln!(out, "  prefixes: {}", prefixes(rules, name_type));
    }
    out
}

fn prefixes(rules: &RuleSet, name_type: NameType) -> String {
    let list = rules.name_prefixes(name_type);
    if list.is_empty() {
        "(none)".to_string()
    } else {
        list.join(" ")
    }
}

pub fn run(rules: &RuleSet) -> Result<()> {
    print!("{}", report(rules));
    Ok(())
}
