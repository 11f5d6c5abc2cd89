use serde::{Deserialize, Serialize};

use crate::counts::CountStore;
use crate::lms::addone::add_one_frequency;
use crate::lms::unsmoothed::relative_frequency;
use crate::lms::Smoother;

/// Linear interpolation of relative frequencies over every context suffix.
///
/// For a context `ctx` of length n-1 the weights are
///
/// ```text
/// lambda_i = (1 - sum_{j<i} lambda_j) * c(ctx[i:]) / (c(ctx[i:]) + gamma)   for i < n-1
/// lambda_{n-1} = 1 - sum_{j<n-1} lambda_j
/// ```
///
/// with `lambda_i = 0` whenever `c(ctx[i:]) == 0`. The last term conditions on
/// the empty context and is add-one smoothed when a vocabulary size is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interpolated {
    gamma: f64,
    addone: Option<usize>,
}

impl Interpolated {
    /// `addone` is the vocabulary size used to smooth the unigram term.
    pub fn new(gamma: f64, addone: Option<usize>) -> Self {
        Self { gamma, addone }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn addone(&self) -> Option<usize> {
        self.addone
    }

    pub fn lambdas(&self, counts: &CountStore, context: &[String]) -> Vec<f64> {
        let mut lambdas = Vec::with_capacity(context.len() + 1);
        let mut used = 0.;
        for i in 0..context.len() {
            let c = counts.count(&context[i..]) as f64;
            let lambda = if c == 0. {
                0.
            } else {
                (1. - used) * c / (c + self.gamma)
            };
            used += lambda;
            lambdas.push(lambda);
        }
        lambdas.push(1. - used);
        lambdas
    }
}

impl Smoother for Interpolated {
    fn get_name(&self) -> &str {
        "interpolated"
    }

    fn cond_prob(&self, counts: &CountStore, token: &str, context: &[String]) -> f64 {
        let lambdas = self.lambdas(counts, context);
        let mut prob = 0.;
        for (i, lambda) in lambdas.iter().enumerate() {
            if *lambda == 0. {
                continue;
            }
            let suffix = &context[i..];
            let estimate = match (suffix.is_empty(), self.addone) {
                (true, Some(vocab_size)) => add_one_frequency(counts, token, suffix, vocab_size),
                _ => relative_frequency(counts, token, suffix),
            };
            prob += lambda * estimate;
        }
        prob
    }
}
