use std::collections::BTreeMap;

use crate::dp::{extend_path, BestPaths};
use crate::error::{NgramError, Result};
use crate::lms::LM;
use crate::stat_utils::log2_prob;
use crate::tokens::{shift_context, start_context, END_TOKEN};

/// Tokens not yet placed, with multiplicities.
type Bag = BTreeMap<String, usize>;

/// Recovers the most probable order of a bag of words under a language model.
///
/// The search is a dynamic program over (remaining tokens, last `order - 1`
/// placed tokens). Its size grows with the number of distinct sub-multisets
/// of the input, so callers should keep sentences short.
pub struct SentSorter<'a, M: LM> {
    lm: &'a M,
}

impl<'a, M: LM> SentSorter<'a, M> {
    pub fn new(lm: &'a M) -> Self {
        Self { lm }
    }

    pub fn sort_probable_sent(&self, tokens: &[String]) -> Result<Vec<String>> {
        self.decode(tokens).map(|(sent, _)| sent)
    }

    /// Best ordering and its log-probability, end sentinel included.
    pub fn decode(&self, tokens: &[String]) -> Result<(Vec<String>, f64)> {
        let mut bag = Bag::new();
        for token in tokens.iter() {
            *bag.entry(token.clone()).or_insert(0) += 1;
        }

        let mut column: BestPaths<(Bag, Vec<String>), Vec<String>> = BestPaths::new();
        column.offer((bag, start_context(self.lm.order() - 1)), 0., Vec::new);

        for _ in 0..tokens.len() {
            let mut next = BestPaths::new();
            for ((bag, context), score, path) in column.iter() {
                for token in bag.keys() {
                    let prob = self.lm.get_probability(token, context);
                    if prob == 0. {
                        continue;
                    }
                    next.offer(
                        (remove_one(bag, token), shift_context(context, token)),
                        score + log2_prob(prob),
                        || extend_path(path, token.clone()),
                    );
                }
            }
            if next.is_empty() {
                return Err(NgramError::NoViablePath);
            }
            column = next;
        }

        let mut best: Option<(f64, &Vec<String>)> = None;
        for ((_, context), score, path) in column.iter() {
            let prob = self.lm.get_probability(END_TOKEN, context);
            if prob == 0. {
                continue;
            }
            let total = score + log2_prob(prob);
            match best {
                Some((top, _)) if total <= top => {}
                _ => best = Some((total, path)),
            }
        }
        best.map(|(score, path)| (path.clone(), score))
            .ok_or(NgramError::NoViablePath)
    }

    pub fn sort_probable_sents(&self, sents: &[Vec<String>]) -> Vec<Result<Vec<String>>> {
        sents
            .iter()
            .map(|sent| self.sort_probable_sent(sent))
            .collect()
    }

    /// Greedy choice: the candidate with the highest probability after
    /// `context`. Ties keep the earliest candidate.
    pub fn most_probable_token<'b>(
        &self,
        candidates: &'b [String],
        context: &[String],
    ) -> Option<(&'b str, f64)> {
        let mut best: Option<(&'b str, f64)> = None;
        for token in candidates.iter() {
            let prob = self.lm.get_probability(token, context);
            match best {
                Some((_, top)) if prob <= top => {}
                _ => best = Some((token.as_str(), prob)),
            }
        }
        best
    }
}

fn remove_one(bag: &Bag, token: &str) -> Bag {
    let mut rest = bag.clone();
    if let Some(count) = rest.get_mut(token) {
        *count -= 1;
        if *count == 0 {
            rest.remove(token);
        }
    }
    rest
}

/// Levenshtein distance between two token sequences.
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        curr_row[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b.len()]
}
