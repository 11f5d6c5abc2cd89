// Back-off with absolute discounting (Collins' formulation).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::counts::CountStore;
use crate::lms::addone::add_one_frequency;
use crate::lms::unsmoothed::relative_frequency;
use crate::lms::Smoother;
use crate::tokens::START_TOKEN;

// Leftover lower-order mass below this is rounding error, not mass.
const MASS_EPSILON: f64 = 1e-12;

/// Discounted back-off model.
///
/// Seen continuations of a context keep `(c(ctx + t) - beta) / c(ctx)`. The
/// discounted mass `alpha(ctx) = beta * |A(ctx)| / c(ctx)` is spread over the
/// unseen continuations in proportion to the lower-order model, normalized by
/// `denom(ctx) = 1 - sum_{t in A(ctx)} P(t | ctx[1:])`.
///
/// Both tables are computed once for every context of length `1..order`, so
/// `beta` is fixed for the lifetime of the smoother. Contexts with no seen
/// continuation are absent from the tables and use `alpha = denom = 1`. When
/// `A(ctx)` already holds all of the lower-order mass, `denom(ctx)` is 0 and
/// unseen continuations get probability 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackOff {
    beta: f64,
    addone: Option<usize>,
    alphas: HashMap<Vec<String>, f64>,
    denoms: HashMap<Vec<String>, f64>,
}

impl BackOff {
    pub fn new(counts: &CountStore, beta: f64, addone: Option<usize>) -> Self {
        let mut seen: HashMap<Vec<String>, Vec<String>> = HashMap::new();
        for (ngram, count) in counts.iter() {
            let k = ngram.len();
            // All-start keys are base counts for the start contexts, not continuations.
            if k < 2 || count == 0 || ngram[k - 1] == START_TOKEN {
                continue;
            }
            seen.entry(ngram[..k - 1].to_vec())
                .or_default()
                .push(ngram[k - 1].clone());
        }

        // Lower-order tables must be final before the higher orders read them.
        let mut contexts: Vec<(Vec<String>, Vec<String>)> = seen.into_iter().collect();
        for (_, tokens) in contexts.iter_mut() {
            tokens.sort();
        }
        contexts.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        let mut backoff = Self {
            beta,
            addone,
            alphas: HashMap::new(),
            denoms: HashMap::new(),
        };
        for (context, tokens) in contexts {
            let alpha = beta * (tokens.len() as f64) / (counts.count(&context) as f64);
            let seen_mass: f64 = tokens
                .iter()
                .map(|token| backoff.cond_prob(counts, token, &context[1..]))
                .sum();
            let denom = 1. - seen_mass;
            let denom = if denom < MASS_EPSILON { 0. } else { denom };
            backoff.alphas.insert(context.clone(), alpha);
            backoff.denoms.insert(context, denom);
        }
        backoff
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn addone(&self) -> Option<usize> {
        self.addone
    }

    /// Discounted mass of a context; 1 when it has no seen continuation.
    pub fn alpha(&self, context: &[String]) -> f64 {
        self.alphas.get(context).copied().unwrap_or(1.)
    }

    /// Lower-order mass left for the unseen continuations of a context.
    pub fn denom(&self, context: &[String]) -> f64 {
        self.denoms.get(context).copied().unwrap_or(1.)
    }

    fn unigram_prob(&self, counts: &CountStore, token: &str) -> f64 {
        match self.addone {
            Some(vocab_size) => add_one_frequency(counts, token, &[], vocab_size),
            None => relative_frequency(counts, token, &[]),
        }
    }
}

impl Smoother for BackOff {
    fn get_name(&self) -> &str {
        "backoff"
    }

    fn cond_prob(&self, counts: &CountStore, token: &str, context: &[String]) -> f64 {
        let mut weight = 1.;
        for i in 0..context.len() {
            let suffix = &context[i..];
            let count = counts.count_with(suffix, token);
            if count > 0 {
                let denom = counts.count(suffix) as f64;
                return weight * ((count as f64) - self.beta) / denom;
            }
            let alpha = self.alpha(suffix);
            if alpha == 0. {
                return 0.;
            }
            let denom = self.denom(suffix);
            if denom <= 0. {
                return 0.;
            }
            weight *= alpha / denom;
        }
        weight * self.unigram_prob(counts, token)
    }
}
