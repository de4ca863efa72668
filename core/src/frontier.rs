//! Bounded, insertion-ordered candidate sets.
//!
//! A [`Frontier`] holds the in-progress phoneme strings of one rule
//! application. Every operation that can grow it (cross-product with a
//! rule's alternatives, union with another frontier) keeps the first
//! `max_phonemes` distinct strings in generation order and drops the rest,
//! so output is reproducible and a smaller cap always yields a prefix of a
//! larger one.
use ahash::AHashSet;

/// An ordered, deduplicated, capacity-bounded set of candidate strings.
#[derive(Debug, Clone)]
pub struct Frontier {
    items: Vec<String>,
    seen: AHashSet<String>,
    max_phonemes: usize,
}

impl Frontier {
    /// An empty frontier bounded by `max_phonemes`.
    pub fn new(max_phonemes: usize) -> Self {
        Self {
            // The cap may be usize::MAX; size the first allocation modestly.
            items: Vec::with_capacity(max_phonemes.min(16)),
            seen: AHashSet::new(),
            max_phonemes,
        }
    }

    /// A frontier holding the single empty candidate.
    pub fn seed(max_phonemes: usize) -> Self {
        let mut frontier = Self::new(max_phonemes);
        frontier.push(String::new());
        frontier
    }

    /// Add a candidate. Returns `false` if it was already present or the
    /// frontier is full.
    pub fn push(&mut self, candidate: String) -> bool {
        if self.is_full() || self.seen.contains(&candidate) {
            return false;
        }
        self.seen.insert(candidate.clone());
        self.items.push(candidate);
        true
    }

    /// Cross-product with `alternatives`: every candidate (in order) joined
    /// with every alternative (in order), keeping the first `max_phonemes`
    /// distinct results.
    pub fn expand<S: AsRef<str>>(&self, alternatives: &[S]) -> Frontier {
        let mut next = Frontier::new(self.max_phonemes);
        'outer: for candidate in &self.items {
            for alternative in alternatives {
                let alternative = alternative.as_ref();
                let mut joined = String::with_capacity(candidate.len() + alternative.len());
                joined.push_str(candidate);
                joined.push_str(alternative);
                next.push(joined);
                if next.is_full() {
                    break 'outer;
                }
            }
        }
        next
    }

    /// Append `suffix` to every candidate.
    ///
    /// Distinct candidates stay distinct, so neither order nor size changes.
    pub fn append(&mut self, suffix: &str) {
        if suffix.is_empty() {
            return;
        }
        self.seen.clear();
        for candidate in self.items.iter_mut() {
            candidate.push_str(suffix);
            self.seen.insert(candidate.clone());
        }
    }

    /// Append the candidates of `other` that are not present yet, in order,
    /// until the frontier is full.
    pub fn union(&mut self, other: Frontier) {
        for candidate in other.items {
            if self.is_full() {
                break;
            }
            self.push(candidate);
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_phonemes
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_phonemes(&self) -> usize {
        self.max_phonemes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }

    /// Join the candidates with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.items.join(separator)
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Frontier {}

impl<'a> IntoIterator for &'a Frontier {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
