use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::Result;
use crate::tagging::{TaggedSent, Tagger};

pub const DEFAULT_TAG: &str = "nc0s000";

/// Tags every known word with its most frequent training tag and every
/// unknown word with a fixed default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTagger {
    default_tag: String,
    word_tags: HashMap<String, String>,
}

impl BaselineTagger {
    pub fn new(tagged_sents: &[TaggedSent]) -> Self {
        Self::with_default(tagged_sents, DEFAULT_TAG)
    }

    pub fn with_default(tagged_sents: &[TaggedSent], default_tag: &str) -> Self {
        let mut counts: HashMap<&str, BTreeMap<&str, u64>> = HashMap::new();
        for sent in tagged_sents.iter() {
            for (word, tag) in sent.iter() {
                *counts.entry(word).or_default().entry(tag).or_insert(0) += 1;
            }
        }

        let mut word_tags = HashMap::with_capacity(counts.len());
        for (word, tags) in counts.into_iter() {
            // Ties go to the alphabetically first tag.
            let mut best: Option<(&str, u64)> = None;
            for (tag, count) in tags.into_iter() {
                match best {
                    Some((_, top)) if count <= top => {}
                    _ => best = Some((tag, count)),
                }
            }
            if let Some((tag, _)) = best {
                word_tags.insert(word.to_string(), tag.to_string());
            }
        }
        Self {
            default_tag: default_tag.to_string(),
            word_tags,
        }
    }

    pub fn tag_word(&self, word: &str) -> &str {
        self.word_tags
            .get(word)
            .map(|x| x.as_str())
            .unwrap_or(&self.default_tag)
    }
}

impl Tagger for BaselineTagger {
    fn tag(&self, sent: &[String]) -> Result<Vec<String>> {
        Ok(sent.iter().map(|word| self.tag_word(word).to_string()).collect())
    }

    fn unknown(&self, word: &str) -> bool {
        !self.word_tags.contains_key(word)
    }
}
