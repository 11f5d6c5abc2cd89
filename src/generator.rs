use rand::Rng;
use std::collections::HashMap;

use crate::error::{NgramError, Result};
use crate::lms::LM;
use crate::ngram::NGramModel;
use crate::tokens::{shift_context, start_context, END_TOKEN};

/// Samples sentences from a trained model.
///
/// For every observed context the continuations seen in training are stored
/// with their model probability, most probable first.
#[derive(Debug, Clone, PartialEq)]
pub struct NGramGenerator {
    order: usize,
    probs: HashMap<Vec<String>, Vec<(String, f64)>>,
}

impl NGramGenerator {
    pub fn new(model: &NGramModel) -> Self {
        let order = model.order();
        let mut probs: HashMap<Vec<String>, Vec<(String, f64)>> = HashMap::new();
        for (ngram, _) in model.counts().ngrams(order) {
            let (context, token) = ngram.split_at(order - 1);
            let prob = model.get_probability(&token[0], context);
            if prob > 0. {
                probs
                    .entry(context.to_vec())
                    .or_default()
                    .push((token[0].clone(), prob));
            }
        }
        for continuations in probs.values_mut() {
            continuations.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        }
        Self { order, probs }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Continuations of a context, most probable first.
    pub fn probs(&self, context: &[String]) -> Option<&[(String, f64)]> {
        self.probs.get(context).map(|x| x.as_slice())
    }

    /// Walk the continuations of `context` until the running mass exceeds
    /// `u`. `None` means the stored mass never got there.
    pub fn generate_token(&self, context: &[String], u: f64) -> Result<Option<&str>> {
        let continuations = self
            .probs(context)
            .ok_or_else(|| NgramError::UnreachableContext(context.to_vec()))?;
        let mut mass = 0.;
        for (token, prob) in continuations.iter() {
            mass += prob;
            if mass > u {
                return Ok(Some(token.as_str()));
            }
        }
        Ok(None)
    }

    /// Generate a sentence from a stream of uniform draws in [0, 1). A draw
    /// that falls past the stored mass is discarded and redrawn.
    pub fn generate_sent_with<F>(&self, mut draw: F) -> Result<Vec<String>>
    where
        F: FnMut() -> f64,
    {
        let mut sent = Vec::new();
        let mut context = start_context(self.order - 1);
        loop {
            let token = loop {
                if let Some(token) = self.generate_token(&context, draw())? {
                    break token;
                }
            };
            if token == END_TOKEN {
                return Ok(sent);
            }
            context = shift_context(&context, token);
            sent.push(token.to_string());
        }
    }

    pub fn generate_sent<R: Rng>(&self, rng: &mut R) -> Result<Vec<String>> {
        self.generate_sent_with(|| rng.gen::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::to_tokens;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_single_sentence_is_reproduced() {
        let sents = vec![to_tokens("el gato come pescado ."); 3];
        for order in 2..5 {
            let model = NGramModel::unsmoothed(order, &sents).unwrap();
            let generator = NGramGenerator::new(&model);
            for u in [0., 0.5, 0.999] {
                let sent = generator.generate_sent_with(|| u).unwrap();
                assert_eq!(sent, sents[0], "order {}", order);
            }
        }
    }

    #[test]
    fn test_probs_are_sorted() {
        let sents = vec![
            to_tokens("el gato come pescado ."),
            to_tokens("la gata come salmón ."),
            to_tokens("el perro come pescado ."),
        ];
        let model = NGramModel::unsmoothed(2, &sents).unwrap();
        let generator = NGramGenerator::new(&model);
        let probs = generator.probs(&to_tokens("come")).unwrap();
        assert_eq!(probs[0], ("pescado".to_string(), 2. / 3.));
        assert_eq!(probs[1], ("salmón".to_string(), 1. / 3.));
        // Ties are broken by token.
        let probs = generator.probs(&to_tokens("el")).unwrap();
        assert_eq!(probs[0].0, "gato");
        assert_eq!(probs[1].0, "perro");
    }

    #[test]
    fn test_generate_token() {
        let sents = vec![to_tokens("a b"), to_tokens("a c")];
        let model = NGramModel::unsmoothed(2, &sents).unwrap();
        let generator = NGramGenerator::new(&model);
        let context = to_tokens("a");
        assert_eq!(generator.generate_token(&context, 0.2), Ok(Some("b")));
        assert_eq!(generator.generate_token(&context, 0.7), Ok(Some("c")));
        assert_eq!(
            generator.generate_token(&to_tokens("z"), 0.2),
            Err(NgramError::UnreachableContext(to_tokens("z")))
        );
    }

    #[test]
    fn test_leftover_mass_is_redrawn() {
        let sents = vec![to_tokens("a b"), to_tokens("a c")];
        let model = NGramModel::back_off(2, &sents, Some(0.5), false).unwrap();
        let generator = NGramGenerator::new(&model);
        // Seen continuations of "a" keep (1 - 0.5) / 2 each.
        let context = to_tokens("a");
        assert_eq!(generator.generate_token(&context, 0.9), Ok(None));
        let mut draws = vec![0.3, 0.9, 0.4].into_iter();
        let sent = generator.generate_sent_with(|| draws.next().unwrap_or(0.)).unwrap();
        assert_eq!(sent, to_tokens("a c"));
    }

    #[test]
    fn test_generate_sent_with_rng() {
        let sents = vec![
            to_tokens("el gato come pescado ."),
            to_tokens("la gata come salmón ."),
        ];
        let model = NGramModel::unsmoothed(2, &sents).unwrap();
        let generator = NGramGenerator::new(&model);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let sent = generator.generate_sent(&mut rng).unwrap();
            assert_eq!(sent.len(), 5);
            assert_eq!(sent[2], "come");
            assert!(model.sent_prob(&sent) > 0.);
        }
    }
}
