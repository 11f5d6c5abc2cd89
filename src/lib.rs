pub mod config;
pub mod counts;
pub mod data_reader;
pub mod dp;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod io;
pub mod lms;
pub mod ngram;
pub mod sorter;
pub mod stat_utils;
pub mod tagging;
pub mod tokens;
pub mod vocab;

pub use error::{NgramError, Result};
