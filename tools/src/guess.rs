use anyhow::Result;
use bmpm_rules::PhoneticEngine;

pub fn run(engine: &PhoneticEngine, words: &[String]) -> Result<()> {
    for word in words {
        println!("{}\t{}", word, engine.guess_languages(word));
    }
    Ok(())
}
