use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{NgramError, Result};
use crate::stat_utils::linspace;

// Grid search defaults for the interpolation and back-off hyperparameters.
pub const GAMMA_MIN: f64 = 30.;
pub const GAMMA_MAX: f64 = 130.;
pub const GAMMA_NUM: usize = 11;
pub const BETA_MIN: f64 = 0.3;
pub const BETA_MAX: f64 = 0.8;
pub const BETA_NUM: usize = 6;

pub const TRAIN_FRACTION: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingKind {
    None,
    #[value(name = "addone")]
    AddOne,
    Interpolated,
    #[value(name = "backoff")]
    BackOff,
}

/// Evenly spaced candidate values, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRange {
    pub min: f64,
    pub max: f64,
    pub num: usize,
}

impl GridRange {
    pub fn new(min: f64, max: f64, num: usize) -> Self {
        Self { min, max, num }
    }

    pub fn values(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.num)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.num == 0 || self.min > self.max || !self.min.is_finite() || !self.max.is_finite() {
            return Err(NgramError::InvalidConfiguration(format!(
                "bad {} grid: {:?}",
                name, self
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub order: usize,
    pub smoothing: SmoothingKind,
    /// Interpolation weight. Searched on held-out data when missing.
    pub gamma: Option<f64>,
    /// Back-off discount. Searched on held-out data when missing.
    pub beta: Option<f64>,
    /// Add-one smoothing of the unigram term (interpolated and back-off models).
    pub addone: bool,
    /// Share of the sentences used for training when searching a hyperparameter.
    pub train_fraction: f64,
    pub gamma_grid: GridRange,
    pub beta_grid: GridRange,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            order: 2,
            smoothing: SmoothingKind::None,
            gamma: None,
            beta: None,
            addone: true,
            train_fraction: TRAIN_FRACTION,
            gamma_grid: GridRange::new(GAMMA_MIN, GAMMA_MAX, GAMMA_NUM),
            beta_grid: GridRange::new(BETA_MIN, BETA_MAX, BETA_NUM),
        }
    }
}

impl TrainConfig {
    pub fn new(order: usize, smoothing: SmoothingKind) -> Self {
        Self {
            order,
            smoothing,
            ..Self::default()
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let blob = fs::read_to_string(path)
            .with_context(|| format!("could not read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&blob)
            .with_context(|| format!("could not parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.order == 0 {
            return Err(NgramError::InvalidConfiguration(
                "n-gram order must be at least 1".to_string(),
            ));
        }
        if !(self.train_fraction > 0. && self.train_fraction <= 1.) {
            return Err(NgramError::InvalidConfiguration(format!(
                "train fraction must be in (0, 1], got {}",
                self.train_fraction
            )));
        }
        if let Some(gamma) = self.gamma {
            if !(gamma >= 0. && gamma.is_finite()) {
                return Err(NgramError::InvalidConfiguration(format!(
                    "gamma must be non-negative, got {}",
                    gamma
                )));
            }
        }
        if let Some(beta) = self.beta {
            if !(0. ..1.).contains(&beta) {
                return Err(NgramError::InvalidConfiguration(format!(
                    "beta must be in [0, 1), got {}",
                    beta
                )));
            }
        }
        match self.smoothing {
            SmoothingKind::Interpolated if self.gamma.is_none() => {
                self.gamma_grid.validate("gamma")?;
            }
            SmoothingKind::BackOff if self.beta.is_none() => {
                self.beta_grid.validate("beta")?;
                if self.beta_grid.min < 0. || self.beta_grid.max >= 1. {
                    return Err(NgramError::InvalidConfiguration(format!(
                        "beta grid must lie in [0, 1): {:?}",
                        self.beta_grid
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
