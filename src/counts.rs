// Counts of every k-gram (0 <= k <= order) in a padded corpus.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{NgramError, Result};
use crate::tokens::{pad, start_context};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountStore {
    order: usize,
    n_sents: u64,
    counts: HashMap<Vec<String>, u64>,
}

impl CountStore {
    /// Count all k-grams with `k <= order`.
    ///
    /// Sentences are padded with `order - 1` start sentinels and one end
    /// sentinel. A k-gram is counted once for every position where it ends on
    /// a real token or on the end sentinel, so a context's count equals the
    /// sum of the counts of its one-token extensions. All-start contexts never
    /// end on a real token; they get a base count of one per sentence instead.
    pub fn build<S: AsRef<str>>(sents: &[Vec<S>], order: usize) -> Result<Self> {
        if order == 0 {
            return Err(NgramError::InvalidConfiguration(
                "n-gram order must be at least 1".to_string(),
            ));
        }

        let mut counts: HashMap<Vec<String>, u64> = HashMap::new();
        let mut n_tokens: u64 = 0;
        for sent in sents.iter() {
            n_tokens += sent.len() as u64 + 1;
            let padded = pad(sent, order - 1);
            for k in 1..=order {
                for j in (order - k)..=(padded.len() - k) {
                    *counts.entry(padded[j..j + k].to_vec()).or_insert(0) += 1;
                }
            }
        }

        let n_sents = sents.len() as u64;
        if n_sents > 0 {
            for k in 1..order {
                *counts.entry(start_context(k)).or_insert(0) += n_sents;
            }
        }
        counts.insert(Vec::new(), n_tokens);

        Ok(Self {
            order,
            n_sents,
            counts,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn n_sents(&self) -> u64 {
        self.n_sents
    }

    /// Count of a k-gram, 0 if it was never seen.
    pub fn count(&self, ngram: &[String]) -> u64 {
        self.counts.get(ngram).copied().unwrap_or(0)
    }

    /// Count of `context + (token,)`.
    pub fn count_with(&self, context: &[String], token: &str) -> u64 {
        let mut ngram = Vec::with_capacity(context.len() + 1);
        ngram.extend_from_slice(context);
        ngram.push(token.to_string());
        self.count(&ngram)
    }

    /// Number of distinct stored k-grams, the empty key included.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[String], u64)> {
        self.counts.iter().map(|(k, v)| (k.as_slice(), *v))
    }

    /// Stored k-grams of exactly `len` tokens.
    pub fn ngrams(&self, len: usize) -> impl Iterator<Item = (&[String], u64)> {
        self.iter().filter(move |(k, _)| k.len() == len)
    }
}
