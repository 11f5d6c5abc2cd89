use std::collections::HashMap;
use std::fs;
use std::io::Write;

// For serializing JSON.
use serde::Serialize;

use crate::lms::LM;
use crate::stat_utils::perplexity;
use crate::tokens::word_count;

/// Scores language models on a fixed test set. Every metric holds one value
/// per evaluated model, in the order of `names`.
#[derive(Serialize)]
pub struct Evaluator<'a> {
    #[serde(skip)]
    test: &'a [Vec<String>],
    n_sents: usize,
    n_words: usize,
    names: Vec<String>,
    metrics: HashMap<&'static str, Vec<f64>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(test: &'a [Vec<String>]) -> Self {
        let mut metrics = HashMap::new();
        metrics.insert("log_prob", Vec::new());
        metrics.insert("cross_entropy", Vec::new());
        metrics.insert("perplexity", Vec::new());
        Evaluator {
            test,
            n_sents: test.len(),
            n_words: word_count(test),
            names: Vec::new(),
            metrics,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, key: &str) -> &[f64] {
        self.metrics.get(key).map(|x| x.as_slice()).unwrap_or(&[])
    }

    fn push(&mut self, key: &'static str, value: f64) {
        self.metrics.entry(key).or_default().push(value);
    }

    pub fn evaluate(&mut self, lm: &dyn LM) {
        let log_prob = lm.log_prob(self.test);
        let cross_entropy = lm.cross_entropy(self.test);
        self.names.push(lm.get_name());
        self.push("log_prob", log_prob);
        self.push("cross_entropy", cross_entropy);
        self.push("perplexity", perplexity(cross_entropy));
    }

    pub fn to_json(&self, file_path: &str) -> anyhow::Result<()> {
        let json_data = serde_json::to_string(self)?;
        let mut file = fs::File::create(file_path)?;
        file.write_all(json_data.as_bytes())?;
        Ok(())
    }
}
