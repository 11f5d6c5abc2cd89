// Keep-best-per-state table shared by the Viterbi tagger and the sentence sorter.

use std::collections::BTreeMap;

/// One column of a max-score dynamic program: for every state, the best
/// log-probability seen so far and the path that reached it.
///
/// States are ordered, so iterating a column is deterministic and a tie
/// always keeps the path that was offered first.
#[derive(Debug, Clone, PartialEq)]
pub struct BestPaths<S: Ord, T> {
    entries: BTreeMap<S, (f64, T)>,
}

impl<S: Ord, T> Default for BestPaths<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Ord, T> BestPaths<S, T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record `score` for `state` if it beats the current best. The path is
    /// only built when it is kept. Returns whether the entry was updated.
    pub fn offer<F>(&mut self, state: S, score: f64, path: F) -> bool
    where
        F: FnOnce() -> T,
    {
        match self.entries.get_mut(&state) {
            Some(entry) => {
                if score > entry.0 {
                    *entry = (score, path());
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.insert(state, (score, path()));
                true
            }
        }
    }

    pub fn get(&self, state: &S) -> Option<(f64, &T)> {
        self.entries.get(state).map(|(score, path)| (*score, path))
    }

    /// Highest-scoring entry; the smallest state wins a tie.
    pub fn best(&self) -> Option<(&S, f64, &T)> {
        let mut best: Option<(&S, f64, &T)> = None;
        for (state, (score, path)) in self.entries.iter() {
            match best {
                Some((_, top, _)) if *score <= top => {}
                _ => best = Some((state, *score, path)),
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, f64, &T)> {
        self.entries
            .iter()
            .map(|(state, (score, path))| (state, *score, path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append one element to a path, leaving the original untouched.
pub fn extend_path<T: Clone>(path: &[T], item: T) -> Vec<T> {
    let mut extended = Vec::with_capacity(path.len() + 1);
    extended.extend_from_slice(path);
    extended.push(item);
    extended
}
