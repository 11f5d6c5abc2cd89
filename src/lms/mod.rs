pub mod addone;
pub mod backoff;
pub mod grid_search;
pub mod interpolated;
pub mod unsmoothed;

use serde::{Deserialize, Serialize};

use crate::counts::CountStore;
use crate::stat_utils::{cross_entropy, log2_prob, perplexity};
use crate::tokens::{pad, word_count};

pub use self::addone::AddOne;
pub use self::backoff::BackOff;
pub use self::interpolated::Interpolated;
pub use self::unsmoothed::Unsmoothed;

/// A language model over padded sentences.
///
/// Implementors only provide the conditional probability of a token; the
/// sentence and corpus measures are derived from it.
pub trait LM {
    fn get_name(&self) -> String;

    fn order(&self) -> usize;

    /// P(token | context) where `context` holds exactly `order - 1` tokens.
    fn get_probability(&self, token: &str, context: &[String]) -> f64;

    /// Probability of a sentence. Subject to underflow, use `sent_log_prob`
    /// for anything but short sentences.
    fn sent_prob(&self, sent: &[String]) -> f64 {
        let n = self.order();
        let padded = pad(sent, n - 1);
        let mut prob = 1.;
        for window in padded.windows(n) {
            prob *= self.get_probability(&window[n - 1], &window[..n - 1]);
        }
        prob
    }

    /// Base-2 log-probability of a sentence. Stops at the first impossible
    /// transition and returns negative infinity.
    fn sent_log_prob(&self, sent: &[String]) -> f64 {
        let n = self.order();
        let padded = pad(sent, n - 1);
        let mut log_prob = 0.;
        for window in padded.windows(n) {
            let prob = self.get_probability(&window[n - 1], &window[..n - 1]);
            if prob == 0. {
                return f64::NEG_INFINITY;
            }
            log_prob += log2_prob(prob);
        }
        log_prob
    }

    fn log_prob(&self, sents: &[Vec<String>]) -> f64 {
        sents.iter().map(|sent| self.sent_log_prob(sent)).sum()
    }

    fn cross_entropy(&self, sents: &[Vec<String>]) -> f64 {
        cross_entropy(self.log_prob(sents), word_count(sents))
    }

    fn perplexity(&self, sents: &[Vec<String>]) -> f64 {
        perplexity(self.cross_entropy(sents))
    }
}

/// A way of turning k-gram counts into conditional probabilities.
pub trait Smoother {
    fn get_name(&self) -> &str;

    fn cond_prob(&self, counts: &CountStore, token: &str, context: &[String]) -> f64;
}

/// Runtime-selected smoothing strategy. Each variant owns only the state it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Smoothing {
    Unsmoothed(Unsmoothed),
    AddOne(AddOne),
    Interpolated(Interpolated),
    BackOff(BackOff),
}

impl Smoother for Smoothing {
    fn get_name(&self) -> &str {
        match self {
            Smoothing::Unsmoothed(s) => s.get_name(),
            Smoothing::AddOne(s) => s.get_name(),
            Smoothing::Interpolated(s) => s.get_name(),
            Smoothing::BackOff(s) => s.get_name(),
        }
    }

    fn cond_prob(&self, counts: &CountStore, token: &str, context: &[String]) -> f64 {
        match self {
            Smoothing::Unsmoothed(s) => s.cond_prob(counts, token, context),
            Smoothing::AddOne(s) => s.cond_prob(counts, token, context),
            Smoothing::Interpolated(s) => s.cond_prob(counts, token, context),
            Smoothing::BackOff(s) => s.cond_prob(counts, token, context),
        }
    }
}

/// Borrowed pairing of counts and a smoother, scored without building a model.
pub struct Scorer<'a, S: Smoother> {
    pub counts: &'a CountStore,
    pub smoother: &'a S,
}

impl<'a, S: Smoother> Scorer<'a, S> {
    pub fn new(counts: &'a CountStore, smoother: &'a S) -> Self {
        Self { counts, smoother }
    }
}

impl<S: Smoother> LM for Scorer<'_, S> {
    fn get_name(&self) -> String {
        format!("{}gram-{}", self.counts.order(), self.smoother.get_name())
    }

    fn order(&self) -> usize {
        self.counts.order()
    }

    fn get_probability(&self, token: &str, context: &[String]) -> f64 {
        self.smoother.cond_prob(self.counts, token, context)
    }
}
