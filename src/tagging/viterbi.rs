use crate::dp::{extend_path, BestPaths};
use crate::error::{NgramError, Result};
use crate::stat_utils::log2_prob;
use crate::tagging::{MlHmm, TagModel, Tagger};
use crate::tokens::{shift_context, start_context, END_TOKEN};

/// One DP column: best (log-probability, tags so far) per tag context.
pub type Column = BestPaths<Vec<String>, Vec<String>>;

/// Result of decoding one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct ViterbiPath {
    pub tags: Vec<String>,
    /// Joint log-probability of the sentence and `tags`, end transition included.
    pub log_prob: f64,
    /// `columns[i]` holds the surviving contexts after `i` words.
    pub columns: Vec<Column>,
}

/// Most probable tagging under an HMM.
///
/// States are the last `order - 1` tags. Transitions or emissions with
/// probability zero are never extended.
pub struct ViterbiTagger<'a, M: TagModel> {
    model: &'a M,
}

impl<'a, M: TagModel> ViterbiTagger<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    pub fn decode(&self, sent: &[String]) -> Result<ViterbiPath> {
        let mut first = Column::new();
        first.offer(start_context(self.model.order() - 1), 0., Vec::new);
        let mut columns = vec![first];

        for word in sent.iter() {
            let mut next = Column::new();
            if let Some(column) = columns.last() {
                for (context, score, path) in column.iter() {
                    for tag in self.model.tagset().iter() {
                        let trans = self.model.trans_prob(tag, context);
                        if trans == 0. {
                            continue;
                        }
                        let out = self.model.out_prob(word, tag);
                        if out == 0. {
                            continue;
                        }
                        next.offer(
                            shift_context(context, tag),
                            score + log2_prob(trans) + log2_prob(out),
                            || extend_path(path, tag.clone()),
                        );
                    }
                }
            }
            if next.is_empty() {
                return Err(NgramError::NoViablePath);
            }
            columns.push(next);
        }

        let mut best: Option<(f64, &Vec<String>)> = None;
        if let Some(column) = columns.last() {
            for (context, score, path) in column.iter() {
                let trans = self.model.trans_prob(END_TOKEN, context);
                if trans == 0. {
                    continue;
                }
                let total = score + log2_prob(trans);
                match best {
                    Some((top, _)) if total <= top => {}
                    _ => best = Some((total, path)),
                }
            }
        }
        let (log_prob, tags) = best
            .map(|(score, path)| (score, path.clone()))
            .ok_or(NgramError::NoViablePath)?;
        Ok(ViterbiPath {
            tags,
            log_prob,
            columns,
        })
    }
}

impl<M: TagModel> Tagger for ViterbiTagger<'_, M> {
    fn tag(&self, sent: &[String]) -> Result<Vec<String>> {
        self.decode(sent).map(|path| path.tags)
    }

    /// A generic HMM has no vocabulary, so every word counts as known.
    fn unknown(&self, _word: &str) -> bool {
        false
    }
}

/// Viterbi over a trained HMM, reporting the HMM's unknown words.
pub struct MlTagger<'a> {
    viterbi: ViterbiTagger<'a, MlHmm>,
}

impl<'a> MlTagger<'a> {
    pub fn new(hmm: &'a MlHmm) -> Self {
        Self {
            viterbi: ViterbiTagger::new(hmm),
        }
    }
}

impl Tagger for MlTagger<'_> {
    fn tag(&self, sent: &[String]) -> Result<Vec<String>> {
        self.viterbi.tag(sent)
    }

    fn unknown(&self, word: &str) -> bool {
        self.viterbi.model.unknown(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::hmm::{Hmm, OutTable, TransTable};
    use crate::tagging::TaggedSent;
    use std::collections::{BTreeSet, HashMap};

    fn tags(text: &str) -> Vec<String> {
        text.split_whitespace().map(|x| x.to_string()).collect()
    }

    fn hmm(trans: Vec<(&str, Vec<(&str, f64)>)>) -> Hmm {
        let tagset: BTreeSet<String> = ["D", "N", "V"].iter().map(|x| x.to_string()).collect();
        let trans: TransTable = trans
            .into_iter()
            .map(|(context, probs)| {
                let probs: HashMap<String, f64> =
                    probs.into_iter().map(|(t, p)| (t.to_string(), p)).collect();
                (tags(context), probs)
            })
            .collect();
        let mut out = OutTable::new();
        out.insert("D".to_string(), HashMap::from([("the".to_string(), 1.)]));
        out.insert(
            "N".to_string(),
            HashMap::from([("dog".to_string(), 0.4), ("barks".to_string(), 0.6)]),
        );
        out.insert(
            "V".to_string(),
            HashMap::from([("dog".to_string(), 0.1), ("barks".to_string(), 0.9)]),
        );
        Hmm::new(3, tagset, trans, out).unwrap()
    }

    fn assert_column(column: &Column, expected: Vec<(&str, f64, &str)>) {
        assert_eq!(column.len(), expected.len());
        for (context, prob, path) in expected {
            let (score, best) = column.get(&tags(context)).unwrap();
            assert!((score - prob.log2()).abs() < 1e-9, "{}: {} != {}", context, score, prob.log2());
            assert_eq!(*best, tags(path));
        }
    }

    #[test]
    fn test_tag() {
        let hmm = hmm(vec![
            ("<s> <s>", vec![("D", 1.)]),
            ("<s> D", vec![("N", 1.)]),
            ("D N", vec![("V", 1.)]),
            ("N V", vec![("</s>", 1.)]),
        ]);
        let tagger = ViterbiTagger::new(&hmm);
        let path = tagger.decode(&tags("the dog barks")).unwrap();
        assert_eq!(path.tags, tags("D N V"));
        assert!((path.log_prob - (0.4f64 * 0.9).log2()).abs() < 1e-9);
        assert_eq!(path.columns.len(), 4);
        assert_column(&path.columns[0], vec![("<s> <s>", 1., "")]);
        assert_column(&path.columns[1], vec![("<s> D", 1., "D")]);
        assert_column(&path.columns[2], vec![("D N", 0.4, "D N")]);
        assert_column(&path.columns[3], vec![("N V", 0.4 * 0.9, "D N V")]);
    }

    #[test]
    fn test_tag2() {
        let hmm = hmm(vec![
            ("<s> <s>", vec![("D", 1.)]),
            ("<s> D", vec![("N", 1.)]),
            ("D N", vec![("V", 0.8), ("N", 0.2)]),
            ("N N", vec![("V", 1.)]),
            ("N V", vec![("</s>", 1.)]),
        ]);
        let tagger = ViterbiTagger::new(&hmm);
        let path = tagger.decode(&tags("the dog barks")).unwrap();
        assert_column(&path.columns[2], vec![("D N", 0.4, "D N")]);
        assert_column(
            &path.columns[3],
            vec![("N V", 0.8 * 0.4 * 0.9, "D N V"), ("N N", 0.2 * 0.4 * 0.6, "D N N")],
        );
        assert_eq!(tagger.tag(&tags("the dog barks")), Ok(tags("D N V")));
    }

    #[test]
    fn test_tag3() {
        let hmm = hmm(vec![
            ("<s> <s>", vec![("D", 1.)]),
            ("<s> D", vec![("N", 0.8), ("V", 0.2)]),
            ("D N", vec![("V", 0.8), ("N", 0.2)]),
            ("D V", vec![("V", 0.8), ("N", 0.2)]),
            ("N N", vec![("V", 1.)]),
            ("N V", vec![("</s>", 1.)]),
            ("V N", vec![("</s>", 1.)]),
            ("V V", vec![("</s>", 1.)]),
        ]);
        let tagger = ViterbiTagger::new(&hmm);
        let path = tagger.decode(&tags("the dog barks")).unwrap();
        assert_column(
            &path.columns[2],
            vec![("D N", 0.8 * 0.4, "D N"), ("D V", 0.2 * 0.1, "D V")],
        );
        assert_column(
            &path.columns[3],
            vec![
                ("N V", 0.8 * 0.4 * 0.8 * 0.9, "D N V"),
                ("N N", 0.8 * 0.4 * 0.2 * 0.6, "D N N"),
                ("V V", 0.2 * 0.1 * 0.8 * 0.9, "D V V"),
                ("V N", 0.2 * 0.1 * 0.2 * 0.6, "D V N"),
            ],
        );
        assert_eq!(path.tags, tags("D N V"));
    }

    #[test]
    fn test_no_viable_path() {
        let hmm = hmm(vec![
            ("<s> <s>", vec![("D", 1.)]),
            ("<s> D", vec![("N", 1.)]),
            ("D N", vec![("V", 1.)]),
        ]);
        let tagger = ViterbiTagger::new(&hmm);
        // No word "cat" anywhere in the emissions.
        assert_eq!(tagger.tag(&tags("the cat")), Err(NgramError::NoViablePath));
        // Every path dies at the end transition.
        assert_eq!(tagger.tag(&tags("the dog barks")), Err(NgramError::NoViablePath));
    }

    #[test]
    fn test_empty_sentence() {
        let hmm = hmm(vec![("<s> <s>", vec![("</s>", 0.5)])]);
        let path = ViterbiTagger::new(&hmm).decode(&[]).unwrap();
        assert!(path.tags.is_empty());
        assert_eq!(path.log_prob, -1.);
    }

    #[test]
    fn test_ml_tagger() {
        let sents: Vec<TaggedSent> = ["el/D gato/N come/V pescado/N", "la/D gata/N come/V"]
            .iter()
            .map(|sent| {
                sent.split_whitespace()
                    .filter_map(|pair| pair.rsplit_once('/'))
                    .map(|(w, t)| (w.to_string(), t.to_string()))
                    .collect()
            })
            .collect();
        let hmm = MlHmm::new(2, &sents, true).unwrap();
        let tagger = MlTagger::new(&hmm);
        assert_eq!(tagger.tag(&tags("el gato come")), Ok(tags("D N V")));
        assert_eq!(tagger.tag(&tags("la perro come")), Ok(tags("D N V")));
        assert!(tagger.unknown("perro"));
        assert!(!tagger.unknown("gato"));
    }
}
