// Held-out grid search for the interpolation and back-off hyperparameters.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GridRange;
use crate::counts::CountStore;
use crate::error::{NgramError, Result};
use crate::lms::{BackOff, Interpolated, Scorer, Smoother, LM};

/// Outcome of a sweep: the winning value and the held-out perplexity of every candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearch {
    pub best: f64,
    pub best_perplexity: f64,
    pub scores: Vec<(f64, f64)>,
}

/// Split off the first `train_fraction` of the sentences for training.
pub fn split_held_out<T>(sents: &[T], train_fraction: f64) -> (&[T], &[T]) {
    let m = ((sents.len() as f64) * train_fraction).floor() as usize;
    sents.split_at(m.min(sents.len()))
}

/// Score every candidate on the held-out sentences and keep the lowest
/// perplexity. Candidates are evaluated in parallel, each with its own
/// smoother; ties keep the earliest candidate.
pub fn grid_search<S, F>(
    counts: &CountStore,
    held_out: &[Vec<String>],
    candidates: &[f64],
    build: F,
) -> Result<GridSearch>
where
    S: Smoother,
    F: Fn(f64) -> S + Sync + Send,
{
    if held_out.is_empty() {
        return Err(NgramError::InsufficientData(
            "grid search needs at least one held-out sentence".to_string(),
        ));
    }
    if candidates.is_empty() {
        return Err(NgramError::InvalidConfiguration(
            "grid search needs at least one candidate".to_string(),
        ));
    }

    let scores: Vec<(f64, f64)> = candidates
        .par_iter()
        .map(|&value| {
            let smoother = build(value);
            (value, Scorer::new(counts, &smoother).perplexity(held_out))
        })
        .collect();

    let mut best = 0;
    for (i, (_, ppl)) in scores.iter().enumerate().skip(1) {
        if *ppl < scores[best].1 {
            best = i;
        }
    }
    Ok(GridSearch {
        best: scores[best].0,
        best_perplexity: scores[best].1,
        scores,
    })
}

pub fn tune_gamma(
    counts: &CountStore,
    held_out: &[Vec<String>],
    addone: Option<usize>,
    grid: &GridRange,
) -> Result<GridSearch> {
    grid_search(counts, held_out, &grid.values(), |gamma| {
        Interpolated::new(gamma, addone)
    })
}

/// Back-off tables depend on beta, so each candidate rebuilds its own.
pub fn tune_beta(
    counts: &CountStore,
    held_out: &[Vec<String>],
    addone: Option<usize>,
    grid: &GridRange,
) -> Result<GridSearch> {
    grid_search(counts, held_out, &grid.values(), |beta| {
        BackOff::new(counts, beta, addone)
    })
}
