use serde::{Deserialize, Serialize};

use crate::counts::CountStore;
use crate::lms::Smoother;

/// Laplace smoothing: (count(context + token) + 1) / (count(context) + V).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AddOne {
    vocab_size: usize,
}

impl AddOne {
    /// `vocab_size` counts the end sentinel. It must be positive.
    pub fn new(vocab_size: usize) -> Self {
        Self { vocab_size }
    }

    #[allow(non_snake_case)]
    pub fn V(&self) -> usize {
        self.vocab_size
    }
}

impl Smoother for AddOne {
    fn get_name(&self) -> &str {
        "addone"
    }

    fn cond_prob(&self, counts: &CountStore, token: &str, context: &[String]) -> f64 {
        add_one_frequency(counts, token, context, self.vocab_size)
    }
}

pub fn add_one_frequency(
    counts: &CountStore,
    token: &str,
    context: &[String],
    vocab_size: usize,
) -> f64 {
    let num = counts.count_with(context, token) + 1;
    let denom = counts.count(context) + vocab_size as u64;
    (num as f64) / (denom as f64)
}
