pub mod baseline;
pub mod evaluation;
pub mod hmm;
pub mod stats;
pub mod viterbi;

use std::collections::BTreeSet;

use crate::error::Result;
use crate::stat_utils::log2_prob;
use crate::tokens::pad;

pub use self::baseline::BaselineTagger;
pub use self::hmm::{Hmm, MlHmm};
pub use self::viterbi::ViterbiTagger;

/// A sentence of (word, tag) pairs.
pub type TaggedSent = Vec<(String, String)>;

/// Split a tagged sentence into its words and its tags.
pub fn split_tagged(sent: &[(String, String)]) -> (Vec<String>, Vec<String>) {
    sent.iter().cloned().unzip()
}

/// A Markov model over tag sequences with per-tag word emissions.
pub trait TagModel {
    fn order(&self) -> usize;

    fn tagset(&self) -> &BTreeSet<String>;

    /// P(tag | prev_tags) where `prev_tags` holds `order - 1` tags.
    fn trans_prob(&self, tag: &str, prev_tags: &[String]) -> f64;

    /// P(word | tag).
    fn out_prob(&self, word: &str, tag: &str) -> f64;

    /// Probability of a tag sequence, start and end transitions included.
    fn tag_prob(&self, tags: &[String]) -> f64 {
        let n = self.order();
        let padded = pad(tags, n - 1);
        padded
            .windows(n)
            .map(|window| self.trans_prob(&window[n - 1], &window[..n - 1]))
            .product()
    }

    fn tag_log_prob(&self, tags: &[String]) -> f64 {
        let n = self.order();
        let padded = pad(tags, n - 1);
        let mut log_prob = 0.;
        for window in padded.windows(n) {
            let prob = self.trans_prob(&window[n - 1], &window[..n - 1]);
            if prob == 0. {
                return f64::NEG_INFINITY;
            }
            log_prob += log2_prob(prob);
        }
        log_prob
    }

    /// Joint probability of a sentence and a tagging of it.
    fn prob(&self, words: &[String], tags: &[String]) -> f64 {
        let emissions: f64 = words
            .iter()
            .zip(tags.iter())
            .map(|(word, tag)| self.out_prob(word, tag))
            .product();
        self.tag_prob(tags) * emissions
    }

    fn log_prob(&self, words: &[String], tags: &[String]) -> f64 {
        let mut log_prob = self.tag_log_prob(tags);
        for (word, tag) in words.iter().zip(tags.iter()) {
            let prob = self.out_prob(word, tag);
            if prob == 0. {
                return f64::NEG_INFINITY;
            }
            log_prob += log2_prob(prob);
        }
        log_prob
    }
}

/// Anything that assigns one tag per word.
pub trait Tagger {
    fn tag(&self, sent: &[String]) -> Result<Vec<String>>;

    /// Whether the word was never seen in training.
    fn unknown(&self, word: &str) -> bool;
}
