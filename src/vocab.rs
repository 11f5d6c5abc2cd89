use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tokens::END_TOKEN;

/// Interned set of token types observed in training data.
///
/// Indices are assigned in insertion order, so two vocabularies built from the
/// same sentences are identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    token_to_index: HashMap<String, usize>,
    index_to_token: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every token in `sents` plus the end sentinel.
    pub fn from_sents<S: AsRef<str>>(sents: &[Vec<S>]) -> Self {
        let mut vocab = Self::new();
        for sent in sents.iter() {
            for token in sent.iter() {
                vocab.add(token.as_ref());
            }
        }
        vocab.add(END_TOKEN);
        vocab
    }

    pub fn add(&mut self, token: &str) -> usize {
        match self.token_to_index.get(token) {
            Some(ptr) => *ptr,
            None => {
                let index = self.index_to_token.len();
                self.token_to_index.insert(token.to_string(), index);
                self.index_to_token.push(token.to_string());
                index
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.token_to_index.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.index_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_token.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.index_to_token.iter().map(|x| x.as_str())
    }
}
