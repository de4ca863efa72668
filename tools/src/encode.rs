use anyhow::{Context, Result};
use bmpm_rules::{LanguageSet, PhoneticEngine};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::debug;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Encoded {
    pub name: String,
    pub encoding: String,
}

/// Split a `--languages` value ("french,german" or "french+german").
pub fn parse_languages(value: &str) -> LanguageSet {
    value.split(|c: char| c == ',' || c == '+')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn encode_all(
    engine: &PhoneticEngine,
    names: &[String],
    languages: Option<&LanguageSet>,
) -> Result<Vec<Encoded>> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let encoding = match languages {
            Some(langs) => engine
                .encode_with_languages(name, langs)
                .with_context(|| format!("cannot encode {name:?} as {langs}"))?,
            None => engine.encode(name),
        };
        out.push(Encoded {
            name: name.clone(),
            encoding,
        });
    }
    Ok(out)
}

pub fn run(
    engine: &PhoneticEngine,
    names: Vec<String>,
    languages: Option<&str>,
    json: bool,
) -> Result<()> {
    let names = if names.is_empty() {
        let stdin = std::io::stdin();
        let mut lines = Vec::new();
        for line in stdin.lock().lines() {
            let line = line.context("reading names from stdin")?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        lines
    } else {
        names
    };

    let languages = languages.map(parse_languages);
    debug!(count = names.len(), languages = ?languages, "encoding names");
    let encoded = encode_all(engine, &names, languages.as_ref())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &encoded)?;
        writeln!(out)?;
    } else {
        for e in &encoded {
            writeln!(out, "{}\t{}", e.name, e.encoding)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_lists() {
        assert_eq!(parse_languages("french,german").to_string(), "french+german");
        assert_eq!(parse_languages(" spanish + french ").to_string(), "spanish+french");
        assert!(parse_languages(",").is_empty());
    }
}
