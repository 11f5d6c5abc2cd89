// Accuracy and confusion counts for a tagger on gold-tagged sentences.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use crate::error::{NgramError, Result};
use crate::tagging::{split_tagged, TaggedSent, Tagger};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaggingReport {
    pub total: u64,
    pub hits: u64,
    pub known_total: u64,
    pub known_hits: u64,
    pub unknown_total: u64,
    pub unknown_hits: u64,
    /// Sentences the tagger could not tag at all.
    pub failures: u64,
    /// `confusion[gold][predicted]`.
    pub confusion: BTreeMap<String, BTreeMap<String, u64>>,
}

fn ratio(hits: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some((hits as f64) / (total as f64))
    }
}

impl TaggingReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag one gold sentence and tally the result. A sentence the tagger
    /// rejects is counted as a failure and every word in it as a miss.
    pub fn record<T: Tagger + ?Sized>(&mut self, tagger: &T, sent: &TaggedSent) -> Result<()> {
        let (words, gold) = split_tagged(sent);
        match tagger.tag(&words) {
            Ok(predicted) => {
                if predicted.len() != gold.len() {
                    return Err(NgramError::InvalidArgument(format!(
                        "tagger returned {} tags for {} words",
                        predicted.len(),
                        gold.len()
                    )));
                }
                for ((word, gold), predicted) in words.iter().zip(gold.iter()).zip(predicted.iter()) {
                    self.add(gold, predicted, tagger.unknown(word));
                }
            }
            Err(NgramError::NoViablePath) => {
                self.failures += 1;
                for (word, gold) in words.iter().zip(gold.iter()) {
                    self.add(gold, "", tagger.unknown(word));
                }
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    fn add(&mut self, gold: &str, predicted: &str, unknown: bool) {
        let hit = gold == predicted;
        self.total += 1;
        self.hits += hit as u64;
        if unknown {
            self.unknown_total += 1;
            self.unknown_hits += hit as u64;
        } else {
            self.known_total += 1;
            self.known_hits += hit as u64;
        }
        *self
            .confusion
            .entry(gold.to_string())
            .or_default()
            .entry(predicted.to_string())
            .or_insert(0) += 1;
    }

    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.hits, self.total)
    }

    pub fn known_accuracy(&self) -> Option<f64> {
        ratio(self.known_hits, self.known_total)
    }

    pub fn unknown_accuracy(&self) -> Option<f64> {
        ratio(self.unknown_hits, self.unknown_total)
    }

    /// The `k` most frequent gold tags, by descending count.
    pub fn top_tags(&self, k: usize) -> Vec<String> {
        let mut tags: Vec<(&String, u64)> = self
            .confusion
            .iter()
            .map(|(tag, row)| (tag, row.values().sum()))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tags.into_iter().take(k).map(|(tag, _)| tag.clone()).collect()
    }

    /// Confusion count as a share of all tagged words.
    pub fn confusion_rate(&self, gold: &str, predicted: &str) -> f64 {
        let count = self
            .confusion
            .get(gold)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0);
        ratio(count, self.total).unwrap_or(0.)
    }

    pub fn to_json(&self, file_path: &str) -> anyhow::Result<()> {
        let json_data = serde_json::to_string(self)?;
        let mut file = fs::File::create(file_path)
            .with_context(|| format!("could not create {}", file_path))?;
        file.write_all(json_data.as_bytes())?;
        Ok(())
    }
}

/// Tally a tagger over gold sentences. Takes any iterator so callers can wrap
/// it in a progress bar.
pub fn evaluate<'s, T, I>(tagger: &T, sents: I) -> Result<TaggingReport>
where
    T: Tagger + ?Sized,
    I: IntoIterator<Item = &'s TaggedSent>,
{
    let mut report = TaggingReport::new();
    for sent in sents {
        report.record(tagger, sent)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::BaselineTagger;
    use tempfile::NamedTempFile;

    fn tagged(pairs: &[(&str, &str)]) -> TaggedSent {
        pairs
            .iter()
            .map(|(w, t)| (w.to_string(), t.to_string()))
            .collect()
    }

    #[test]
    fn test_evaluate_baseline() {
        let train = vec![tagged(&[("el", "D"), ("gato", "N"), ("come", "V")])];
        let tagger = BaselineTagger::with_default(&train, "N");
        let test = vec![
            tagged(&[("el", "D"), ("perro", "N"), ("come", "V")]),
            tagged(&[("el", "D"), ("gato", "N"), ("duerme", "V")]),
        ];
        let report = evaluate(&tagger, &test).unwrap();
        assert_eq!(report.total, 6);
        assert_eq!(report.hits, 5);
        assert_eq!(report.accuracy(), Some(5. / 6.));
        assert_eq!(report.known_accuracy(), Some(1.));
        assert_eq!(report.unknown_accuracy(), Some(0.5));
        assert_eq!(report.confusion["V"]["N"], 1);
        assert_eq!(report.confusion_rate("V", "N"), 1. / 6.);
        assert_eq!(report.top_tags(2), vec!["D", "N"]);
    }

    #[test]
    fn test_evaluate_iterator() {
        let train = vec![tagged(&[("el", "D"), ("gato", "N")])];
        let tagger = BaselineTagger::new(&train);
        let test = vec![
            tagged(&[("el", "D"), ("gato", "N")]),
            tagged(&[("el", "D"), ("perro", "N")]),
        ];
        let report = evaluate(&tagger, test.iter().skip(1)).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.unknown_total, 1);
        assert_eq!(report, evaluate(&tagger, &test[1..]).unwrap());
    }

    #[test]
    fn test_empty_report() {
        let report = TaggingReport::new();
        assert_eq!(report.accuracy(), None);
        assert_eq!(report.confusion_rate("D", "N"), 0.);
    }

    #[test]
    fn test_report_to_json() {
        let train = vec![tagged(&[("el", "D")])];
        let tagger = BaselineTagger::new(&train);
        let report = evaluate(&tagger, &train).unwrap();
        let file = NamedTempFile::new().expect("Failed to create file");
        let path = file.path().to_str().unwrap();
        report.to_json(path).unwrap();
        let blob = std::fs::read_to_string(path).unwrap();
        let loaded: TaggingReport = serde_json::from_str(&blob).unwrap();
        assert_eq!(loaded, report);
    }
}
