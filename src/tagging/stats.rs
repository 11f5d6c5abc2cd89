use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::tagging::TaggedSent;

/// Descriptive statistics of a tagged corpus.
#[derive(Debug, Clone, Default)]
pub struct PosStats {
    sent_count: usize,
    token_count: usize,
    word_freq: HashMap<String, u64>,
    tag_freq: BTreeMap<String, u64>,
    tag_words: HashMap<String, HashMap<String, u64>>,
    word_tags: HashMap<String, BTreeSet<String>>,
}

fn sorted_by_count<'a, I>(items: I) -> Vec<(&'a str, u64)>
where
    I: Iterator<Item = (&'a String, &'a u64)>,
{
    let mut items: Vec<(&str, u64)> = items.map(|(k, v)| (k.as_str(), *v)).collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    items
}

impl PosStats {
    pub fn new(tagged_sents: &[TaggedSent]) -> Self {
        let mut stats = Self {
            sent_count: tagged_sents.len(),
            ..Self::default()
        };
        for sent in tagged_sents.iter() {
            stats.token_count += sent.len();
            for (word, tag) in sent.iter() {
                *stats.word_freq.entry(word.clone()).or_insert(0) += 1;
                *stats.tag_freq.entry(tag.clone()).or_insert(0) += 1;
                *stats
                    .tag_words
                    .entry(tag.clone())
                    .or_default()
                    .entry(word.clone())
                    .or_insert(0) += 1;
                stats
                    .word_tags
                    .entry(word.clone())
                    .or_default()
                    .insert(tag.clone());
            }
        }
        stats
    }

    pub fn sent_count(&self) -> usize {
        self.sent_count
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Vocabulary size.
    pub fn word_count(&self) -> usize {
        self.word_freq.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tag_freq.len()
    }

    pub fn word_freq(&self, word: &str) -> u64 {
        self.word_freq.get(word).copied().unwrap_or(0)
    }

    pub fn tag_freq(&self, tag: &str) -> u64 {
        self.tag_freq.get(tag).copied().unwrap_or(0)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tag_freq.keys().map(|x| x.as_str())
    }

    /// Tags by descending frequency.
    pub fn most_frequent_tags(&self, k: usize) -> Vec<(&str, u64)> {
        let mut tags = sorted_by_count(self.tag_freq.iter());
        tags.truncate(k);
        tags
    }

    /// Most frequent words carrying `tag`.
    pub fn top_words(&self, tag: &str, k: usize) -> Vec<(&str, u64)> {
        match self.tag_words.get(tag) {
            Some(words) => {
                let mut words = sorted_by_count(words.iter());
                words.truncate(k);
                words
            }
            None => Vec::new(),
        }
    }

    /// Words seen with exactly `n` distinct tags, most frequent first.
    pub fn ambiguous_words(&self, n: usize) -> Vec<&str> {
        let mut words: Vec<&str> = self
            .word_tags
            .iter()
            .filter(|(_, tags)| tags.len() == n)
            .map(|(word, _)| word.as_str())
            .collect();
        words.sort_by(|a, b| self.word_freq(b).cmp(&self.word_freq(a)).then_with(|| a.cmp(b)));
        words
    }
}
