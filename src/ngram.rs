use serde::{Deserialize, Serialize};

use crate::config::{SmoothingKind, TrainConfig};
use crate::counts::CountStore;
use crate::error::{NgramError, Result};
use crate::lms::grid_search::{split_held_out, tune_beta, tune_gamma, GridSearch};
use crate::lms::{AddOne, BackOff, Interpolated, Smoother, Smoothing, Unsmoothed, LM};
use crate::vocab::Vocabulary;

/// A trained n-gram language model: k-gram counts plus a smoothing strategy.
///
/// Immutable after training, so one model can be queried from many threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NGramModel {
    counts: CountStore,
    smoothing: Smoothing,
}

impl NGramModel {
    pub fn from_parts(counts: CountStore, smoothing: Smoothing) -> Self {
        Self { counts, smoothing }
    }

    pub fn train(sents: &[Vec<String>], config: &TrainConfig) -> Result<Self> {
        Self::train_with_search(sents, config).map(|(model, _)| model)
    }

    /// Train a model, also returning the hyperparameter sweep when one was run.
    ///
    /// A searched hyperparameter is fit on the first `train_fraction` of the
    /// sentences (counts and vocabulary) and scored on the rest. Explicit
    /// hyperparameters use every sentence.
    pub fn train_with_search(
        sents: &[Vec<String>],
        config: &TrainConfig,
    ) -> Result<(Self, Option<GridSearch>)> {
        config.validate()?;
        let order = config.order;
        let searched = match config.smoothing {
            SmoothingKind::Interpolated => config.gamma.is_none() && order > 1,
            SmoothingKind::BackOff => config.beta.is_none() && order > 1,
            _ => false,
        };
        let (train, held_out) = if searched {
            split_held_out(sents, config.train_fraction)
        } else {
            (sents, &sents[sents.len()..])
        };
        if searched && train.is_empty() {
            return Err(NgramError::InsufficientData(
                "no training sentences left after holding out".to_string(),
            ));
        }

        let counts = CountStore::build(train, order)?;
        let vocab_size = Vocabulary::from_sents(train).len();
        let addone = if config.addone { Some(vocab_size) } else { None };

        let (smoothing, search) = match config.smoothing {
            SmoothingKind::None => (Smoothing::Unsmoothed(Unsmoothed), None),
            SmoothingKind::AddOne => (Smoothing::AddOne(AddOne::new(vocab_size)), None),
            SmoothingKind::Interpolated => match config.gamma {
                Some(gamma) => (Smoothing::Interpolated(Interpolated::new(gamma, addone)), None),
                // Only the unigram term remains, gamma never enters.
                None if order == 1 => (Smoothing::Interpolated(Interpolated::new(0., addone)), None),
                None => {
                    let search = tune_gamma(&counts, held_out, addone, &config.gamma_grid)?;
                    let smoother = Interpolated::new(search.best, addone);
                    (Smoothing::Interpolated(smoother), Some(search))
                }
            },
            SmoothingKind::BackOff => match config.beta {
                Some(beta) => (Smoothing::BackOff(BackOff::new(&counts, beta, addone)), None),
                None if order == 1 => (Smoothing::BackOff(BackOff::new(&counts, 0., addone)), None),
                None => {
                    let search = tune_beta(&counts, held_out, addone, &config.beta_grid)?;
                    let smoother = BackOff::new(&counts, search.best, addone);
                    (Smoothing::BackOff(smoother), Some(search))
                }
            },
        };
        Ok((Self::from_parts(counts, smoothing), search))
    }

    pub fn unsmoothed(order: usize, sents: &[Vec<String>]) -> Result<Self> {
        Self::train(sents, &TrainConfig::new(order, SmoothingKind::None))
    }

    pub fn add_one(order: usize, sents: &[Vec<String>]) -> Result<Self> {
        Self::train(sents, &TrainConfig::new(order, SmoothingKind::AddOne))
    }

    pub fn interpolated(
        order: usize,
        sents: &[Vec<String>],
        gamma: Option<f64>,
        addone: bool,
    ) -> Result<Self> {
        let config = TrainConfig {
            gamma,
            addone,
            ..TrainConfig::new(order, SmoothingKind::Interpolated)
        };
        Self::train(sents, &config)
    }

    pub fn back_off(
        order: usize,
        sents: &[Vec<String>],
        beta: Option<f64>,
        addone: bool,
    ) -> Result<Self> {
        let config = TrainConfig {
            beta,
            addone,
            ..TrainConfig::new(order, SmoothingKind::BackOff)
        };
        Self::train(sents, &config)
    }

    pub fn counts(&self) -> &CountStore {
        &self.counts
    }

    pub fn smoothing(&self) -> &Smoothing {
        &self.smoothing
    }

    pub fn count(&self, ngram: &[String]) -> u64 {
        self.counts.count(ngram)
    }

    /// P(token | context), rejecting contexts that are not `order - 1` tokens long.
    pub fn cond_prob(&self, token: &str, context: &[String]) -> Result<f64> {
        if context.len() + 1 != self.order() {
            return Err(NgramError::InvalidArgument(format!(
                "a {}-gram model needs {} context tokens, got {}",
                self.order(),
                self.order() - 1,
                context.len()
            )));
        }
        Ok(self.get_probability(token, context))
    }
}

impl LM for NGramModel {
    fn get_name(&self) -> String {
        format!("{}gram-{}", self.counts.order(), self.smoothing.get_name())
    }

    fn order(&self) -> usize {
        self.counts.order()
    }

    fn get_probability(&self, token: &str, context: &[String]) -> f64 {
        self.smoothing.cond_prob(&self.counts, token, context)
    }
}
