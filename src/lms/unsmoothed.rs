use serde::{Deserialize, Serialize};

use crate::counts::CountStore;
use crate::lms::Smoother;

/// Maximum-likelihood relative frequencies. Unseen contexts get probability 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Unsmoothed;

impl Smoother for Unsmoothed {
    fn get_name(&self) -> &str {
        "unsmoothed"
    }

    fn cond_prob(&self, counts: &CountStore, token: &str, context: &[String]) -> f64 {
        relative_frequency(counts, token, context)
    }
}

/// count(context + token) / count(context), or 0 when the context is unseen.
pub fn relative_frequency(counts: &CountStore, token: &str, context: &[String]) -> f64 {
    let denom = counts.count(context);
    if denom == 0 {
        return 0.;
    }
    (counts.count_with(context, token) as f64) / (denom as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::to_tokens;

    #[test]
    fn test_unsmoothed_cond_prob() {
        let sents = vec![to_tokens("el gato come pescado ."), to_tokens("la gata come salmón .")];
        let counts = CountStore::build(&sents, 2).unwrap();
        let lm = Unsmoothed;
        assert_eq!(lm.cond_prob(&counts, "el", &to_tokens("<s>")), 0.5);
        assert_eq!(lm.cond_prob(&counts, "pescado", &to_tokens("come")), 0.5);
        assert_eq!(lm.cond_prob(&counts, "</s>", &to_tokens(".")), 1.);
        assert_eq!(lm.cond_prob(&counts, "gato", &to_tokens("la")), 0.);
        // Unseen context is defined as probability 0, not an error.
        assert_eq!(lm.cond_prob(&counts, "gato", &to_tokens("perro")), 0.);
    }

    #[test]
    fn test_unsmoothed_unigram() {
        let sents = vec![to_tokens("a b a")];
        let counts = CountStore::build(&sents, 1).unwrap();
        assert_eq!(Unsmoothed.cond_prob(&counts, "a", &[]), 0.5);
        assert_eq!(Unsmoothed.cond_prob(&counts, "</s>", &[]), 0.25);
    }
}
