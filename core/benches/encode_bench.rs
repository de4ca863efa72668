// Criterion benchmarks for bmpm-core.
//
// The rule table is built in code so the benchmark needs no data files.
//
// Run:
//   cargo bench -p bmpm-core

use std::sync::Arc;

use bmpm_core::{LanguageRule, NameType, Phoneme, PhoneticEngine, Rule, RuleSet, RuleType};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

fn rule(pattern: &str, left: &str, right: &str, alts: &[&str]) -> Rule {
    Rule::new(pattern, left, right, Phoneme::alternatives(alts.iter().copied()))
        .expect("benchmark rule")
}

fn table() -> Arc<RuleSet> {
    let nt = NameType::Generic;
    let mut set = RuleSet::new();
    set.insert_rules(
        nt,
        "any",
        vec![
            rule("sch", "", "", &["S"]),
            rule("ch", "", "", &["tS", "x"]),
            rule("th", "", "", &["t"]),
            rule("h", "[aeiou]", "", &[""]),
            rule("w", "", "", &["v", "w"]),
            rule("y", "", "", &["i", "j"]),
        ],
    );
    set.insert_rules(
        nt,
        "german",
        vec![
            rule("sch", "", "", &["S"]),
            rule("ei", "", "", &["aj"]),
            rule("ie", "", "", &["i"]),
            rule("j", "", "", &["i"]),
            rule("u", "", "rg$", &["Y", "i", "u"]),
            rule("g", "", "$", &["k"]),
            rule("w", "", "", &["v"]),
        ],
    );
    set.insert_rules(
        nt,
        "french",
        vec![
            rule("eau", "", "", &["o"]),
            rule("au", "", "", &["D", "a", "o", "u"]),
            rule("lt", "", "$", &["", "lt"]),
            rule("j", "", "", &["z"]),
            rule("ch", "", "", &["S"]),
        ],
    );
    set.insert_final_rules(
        nt,
        RuleType::Approx,
        vec![
            rule("e", "d", "n", &[""]),
            rule("e", "", "", &["i"]),
            rule("Y", "", "", &["i", "u"]),
        ],
    );
    set.insert_final_rules(nt, RuleType::Exact, vec![rule("h", "", "$", &[""])]);
    let french: bmpm_core::LanguageSet = ["french"].into_iter().collect();
    let germanic: bmpm_core::LanguageSet = ["german", "french"].into_iter().collect();
    set.push_guess_rule(nt, LanguageRule::accept("(ault|eau)$", french).expect("guess rule"));
    set.push_guess_rule(nt, LanguageRule::accept("^j|sch", germanic).expect("guess rule"));
    Arc::new(set)
}

const NAMES: &[&str] = &[
    "Renault",
    "Judenburg",
    "Schwarzenegger",
    "Rousseau",
    "SntJohn-Smith",
    "van Helsing",
    "d'Ortley",
    "Weinreich Schneider",
];

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Encode a fixed list of names at several caps.
fn bench_encode_names(c: &mut Criterion) {
    let table = table();
    let mut group = c.benchmark_group("encode_names");
    for max in [1usize, 20, 100] {
        let engine = PhoneticEngine::new(table.clone(), NameType::Generic, RuleType::Approx, true, max)
            .expect("engine");
        group.bench_with_input(BenchmarkId::from_parameter(max), &engine, |b, engine| {
            b.iter(|| {
                for name in NAMES {
                    black_box(engine.encode(black_box(name)));
                }
            })
        });
    }
    group.finish();
}

/// Unconcatenated multi-word names.
fn bench_encode_words(c: &mut Criterion) {
    let engine = PhoneticEngine::new(table(), NameType::Generic, RuleType::Exact, false, 20)
        .expect("engine");
    c.bench_function("encode_words_exact", |b| {
        b.iter(|| black_box(engine.encode(black_box("Weinreich Schneider-Rousseau Judenburg"))))
    });
}

fn bench_guess(c: &mut Criterion) {
    let engine = PhoneticEngine::new(table(), NameType::Generic, RuleType::Approx, true, 20)
        .expect("engine");
    c.bench_function("guess_languages", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(engine.guess_languages(black_box(name)));
            }
        })
    });
}

criterion_group!(benches, bench_encode_names, bench_encode_words, bench_guess);
criterion_main!(benches);
