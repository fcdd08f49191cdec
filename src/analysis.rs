//! Title tokenization and keyword frequency ranking.
//!
//! Tokens are maximal runs of Hangul syllables, ASCII letters and digits;
//! every other character separates tokens and is dropped. Latin letters are
//! lowercased.

use crate::models::{Post, Ranking};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{AC00}-\x{D7A3}A-Za-z0-9]+").unwrap());

/// Stop words used when no config file overrides them.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "속보", "단독", "합니다", "더", "첫", "수", "제", "오늘", "있다", "너무", "정말", "하는", "왜",
];

/// Tokens excluded from frequency counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(words.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS.iter().copied())
    }
}

/// Split a title into normalized tokens.
pub fn tokenize(title: &str) -> Vec<String> {
    TOKEN
        .find_iter(title)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Occurrence counts that remember first-seen order for tie breaking.
#[derive(Debug, Default)]
struct FrequencyTable {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl FrequencyTable {
    fn add(&mut self, token: String) {
        match self.counts.get_mut(&token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.clone(), 1);
                self.order.push(token);
            }
        }
    }

    /// Highest counts first; equal counts keep first-seen order.
    fn ranked(&self, top_n: usize) -> Ranking {
        self.order
            .iter()
            .map(|token| (token.clone(), self.counts[token]))
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .take(top_n)
            .collect()
    }
}

/// Rank the most frequent title words and adjacent word pairs.
///
/// Stop words are removed before pairing, so no pair contains a stop word,
/// and a title left without tokens contributes nothing.
pub fn compute_frequencies(posts: &[Post], stop_words: &StopWords, top_n: usize) -> (Ranking, Ranking) {
    let mut words = FrequencyTable::default();
    let mut bigrams = FrequencyTable::default();

    for post in posts {
        let tokens: Vec<String> = tokenize(&post.title)
            .into_iter()
            .filter(|t| !stop_words.contains(t))
            .collect();

        if tokens.is_empty() {
            continue;
        }

        for (a, b) in tokens.iter().tuple_windows() {
            bigrams.add(format!("{a} {b}"));
        }
        for token in tokens {
            words.add(token);
        }
    }

    (words.ranked(top_n), bigrams.ranked(top_n))
}

/// The single highest-ranked word, if any.
pub fn top_keyword(words: &Ranking) -> Option<&str> {
    words.first().map(|(token, _)| token.as_str())
}

/// Posts whose tokenized title contains `keyword` as a whole token.
pub fn posts_with_keyword<'a>(posts: &'a [Post], keyword: &str) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| tokenize(&post.title).iter().any(|t| t == keyword))
        .collect()
}
