use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::counts::CountStore;
use crate::error::{NgramError, Result};
use crate::lms::addone::add_one_frequency;
use crate::lms::unsmoothed::relative_frequency;
use crate::tagging::{split_tagged, TagModel, TaggedSent};
use crate::vocab::Vocabulary;

/// Transition probabilities keyed by tag context, then by tag.
pub type TransTable = HashMap<Vec<String>, HashMap<String, f64>>;
/// Emission probabilities keyed by tag, then by word.
pub type OutTable = HashMap<String, HashMap<String, f64>>;

/// Hidden Markov model given by explicit probability tables. Missing entries
/// have probability 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hmm {
    order: usize,
    tagset: BTreeSet<String>,
    trans: TransTable,
    out: OutTable,
}

impl Hmm {
    pub fn new(order: usize, tagset: BTreeSet<String>, trans: TransTable, out: OutTable) -> Result<Self> {
        if order == 0 {
            return Err(NgramError::InvalidConfiguration(
                "HMM order must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            order,
            tagset,
            trans,
            out,
        })
    }
}

impl TagModel for Hmm {
    fn order(&self) -> usize {
        self.order
    }

    fn tagset(&self) -> &BTreeSet<String> {
        &self.tagset
    }

    fn trans_prob(&self, tag: &str, prev_tags: &[String]) -> f64 {
        self.trans
            .get(prev_tags)
            .and_then(|probs| probs.get(tag))
            .copied()
            .unwrap_or(0.)
    }

    fn out_prob(&self, word: &str, tag: &str) -> f64 {
        self.out
            .get(tag)
            .and_then(|probs| probs.get(word))
            .copied()
            .unwrap_or(0.)
    }
}

/// HMM estimated by counting a tagged corpus.
///
/// Transitions are relative frequencies over tag n-grams, add-one smoothed
/// with the tagset size when `addone` is set. Emissions are relative
/// frequencies of (word, tag) pairs; unknown words are uniform over the
/// training vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlHmm {
    addone: bool,
    tagset: BTreeSet<String>,
    vocab: Vocabulary,
    tag_counts: CountStore,
    out_counts: HashMap<String, HashMap<String, u64>>,
}

impl MlHmm {
    pub fn new(order: usize, tagged_sents: &[TaggedSent], addone: bool) -> Result<Self> {
        let mut tag_sents = Vec::with_capacity(tagged_sents.len());
        let mut tagset = BTreeSet::new();
        let mut vocab = Vocabulary::new();
        let mut out_counts: HashMap<String, HashMap<String, u64>> = HashMap::new();
        for sent in tagged_sents.iter() {
            let (words, tags) = split_tagged(sent);
            for (word, tag) in words.iter().zip(tags.iter()) {
                vocab.add(word);
                tagset.insert(tag.clone());
                *out_counts
                    .entry(tag.clone())
                    .or_default()
                    .entry(word.clone())
                    .or_insert(0) += 1;
            }
            tag_sents.push(tags);
        }
        let tag_counts = CountStore::build(&tag_sents, order)?;
        Ok(Self {
            addone,
            tagset,
            vocab,
            tag_counts,
            out_counts,
        })
    }

    /// Count of a tag n-gram, `0 <= len <= order`.
    pub fn tcount(&self, tags: &[String]) -> u64 {
        self.tag_counts.count(tags)
    }

    pub fn unknown(&self, word: &str) -> bool {
        !self.vocab.contains(word)
    }

    pub fn addone(&self) -> bool {
        self.addone
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }
}

impl TagModel for MlHmm {
    fn order(&self) -> usize {
        self.tag_counts.order()
    }

    fn tagset(&self) -> &BTreeSet<String> {
        &self.tagset
    }

    fn trans_prob(&self, tag: &str, prev_tags: &[String]) -> f64 {
        if self.addone {
            add_one_frequency(&self.tag_counts, tag, prev_tags, self.tagset.len())
        } else {
            relative_frequency(&self.tag_counts, tag, prev_tags)
        }
    }

    fn out_prob(&self, word: &str, tag: &str) -> f64 {
        if self.unknown(word) {
            return 1. / (self.vocab.len() as f64);
        }
        let tag_count = self.tag_counts.count(&[tag.to_string()]);
        if tag_count == 0 {
            return 0.;
        }
        let count = self
            .out_counts
            .get(tag)
            .and_then(|words| words.get(word))
            .copied()
            .unwrap_or(0);
        (count as f64) / (tag_count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(text: &str) -> TaggedSent {
        text.split_whitespace()
            .map(|pair| {
                let (word, tag) = pair.rsplit_once('/').unwrap();
                (word.to_string(), tag.to_string())
            })
            .collect()
    }

    fn tags(text: &str) -> Vec<String> {
        text.split_whitespace().map(|x| x.to_string()).collect()
    }

    fn sents() -> Vec<TaggedSent> {
        vec![tagged("el/D gato/N come/V pescado/N ./P"), tagged("la/D gata/N come/V salmón/N ./P")]
    }

    #[test]
    fn test_hmm_tables() {
        let tagset: BTreeSet<String> = ["D", "N", "V"].iter().map(|x| x.to_string()).collect();
        let mut trans = TransTable::new();
        trans.insert(tags("<s>"), HashMap::from([("D".to_string(), 1.)]));
        trans.insert(tags("D"), HashMap::from([("N".to_string(), 1.)]));
        trans.insert(tags("N"), HashMap::from([("</s>".to_string(), 1.)]));
        let mut out = OutTable::new();
        out.insert("D".to_string(), HashMap::from([("the".to_string(), 1.)]));
        out.insert(
            "N".to_string(),
            HashMap::from([("dog".to_string(), 0.4), ("cat".to_string(), 0.6)]),
        );
        let hmm = Hmm::new(2, tagset, trans, out).unwrap();

        assert_eq!(hmm.trans_prob("N", &tags("D")), 1.);
        assert_eq!(hmm.trans_prob("V", &tags("D")), 0.);
        assert_eq!(hmm.trans_prob("V", &tags("X")), 0.);
        assert_eq!(hmm.out_prob("dog", "N"), 0.4);
        assert_eq!(hmm.out_prob("dog", "D"), 0.);
        let x = tags("the dog");
        assert_eq!(hmm.tag_prob(&tags("D N")), 1.);
        assert_eq!(hmm.tag_log_prob(&tags("D N")), 0.);
        assert_eq!(hmm.tag_prob(&tags("N D")), 0.);
        assert_eq!(hmm.tag_log_prob(&tags("N D")), f64::NEG_INFINITY);
        assert_eq!(hmm.prob(&x, &tags("D N")), 0.4);
        assert_eq!(hmm.log_prob(&x, &tags("D N")), 0.4f64.log2());
        assert_eq!(hmm.log_prob(&tags("the cow"), &tags("D N")), f64::NEG_INFINITY);
    }

    #[test]
    fn test_hmm_zero_order() {
        let result = Hmm::new(0, BTreeSet::new(), TransTable::new(), OutTable::new());
        assert!(matches!(result, Err(NgramError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_ml_hmm_counts() {
        let hmm = MlHmm::new(2, &sents(), false).unwrap();
        assert_eq!(hmm.tcount(&tags("N")), 4);
        assert_eq!(hmm.tcount(&tags("D N")), 2);
        assert_eq!(hmm.tcount(&tags("<s> D")), 2);
        assert_eq!(hmm.tcount(&tags("P </s>")), 2);
        assert_eq!(hmm.tcount(&[]), 12);
        assert_eq!(hmm.tagset().len(), 4);
    }

    #[test]
    fn test_ml_hmm_unsmoothed_probs() {
        let hmm = MlHmm::new(2, &sents(), false).unwrap();
        assert_eq!(hmm.trans_prob("D", &tags("<s>")), 1.);
        assert_eq!(hmm.trans_prob("V", &tags("N")), 0.5);
        assert_eq!(hmm.trans_prob("P", &tags("N")), 0.5);
        assert_eq!(hmm.trans_prob("</s>", &tags("P")), 1.);
        assert_eq!(hmm.trans_prob("V", &tags("D")), 0.);
        assert_eq!(hmm.out_prob("gato", "N"), 0.25);
        assert_eq!(hmm.out_prob("come", "V"), 1.);
        assert_eq!(hmm.out_prob("come", "N"), 0.);
        assert_eq!(hmm.tag_prob(&tags("D N V N P")), 0.25);
    }

    #[test]
    fn test_ml_hmm_addone() {
        let hmm = MlHmm::new(2, &sents(), true).unwrap();
        assert!(hmm.addone());
        // (count + 1) / (context count + tagset size)
        assert_eq!(hmm.trans_prob("D", &tags("<s>")), 3. / 6.);
        assert_eq!(hmm.trans_prob("V", &tags("D")), 1. / 6.);
        assert_eq!(hmm.trans_prob("V", &tags("X")), 1. / 4.);
    }

    #[test]
    fn test_ml_hmm_unknown_words() {
        let hmm = MlHmm::new(2, &sents(), true).unwrap();
        assert!(hmm.unknown("perro"));
        assert!(!hmm.unknown("gato"));
        assert_eq!(hmm.vocab().len(), 8);
        for tag in ["D", "N", "V", "P"] {
            assert_eq!(hmm.out_prob("perro", tag), 1. / 8.);
        }
    }

    #[test]
    fn test_ml_hmm_trigram() {
        let hmm = MlHmm::new(3, &sents(), false).unwrap();
        assert_eq!(hmm.order(), 3);
        assert_eq!(hmm.trans_prob("D", &tags("<s> <s>")), 1.);
        assert_eq!(hmm.trans_prob("N", &tags("<s> D")), 1.);
        assert_eq!(hmm.trans_prob("V", &tags("D N")), 1.);
        assert_eq!(hmm.trans_prob("P", &tags("V N")), 1.);
        assert_eq!(hmm.tag_prob(&tags("D N V N P")), 1.);
    }
}
