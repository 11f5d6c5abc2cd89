// Numeric helpers. All log-probabilities in this crate are base 2.

/// log2 of a probability, with log2(0) = -inf.
pub fn log2_prob(prob: f64) -> f64 {
    if prob <= 0. {
        f64::NEG_INFINITY
    } else {
        prob.log2()
    }
}

/// Per-word cross-entropy of a corpus with total `log_prob` over `n_words`
/// predicted events. An empty corpus has cross-entropy 0.
pub fn cross_entropy(log_prob: f64, n_words: usize) -> f64 {
    if n_words == 0 {
        return 0.;
    }
    -log_prob / (n_words as f64)
}

/// 2^cross_entropy. Infinite cross-entropy gives infinite perplexity.
pub fn perplexity(cross_entropy: f64) -> f64 {
    2f64.powf(cross_entropy)
}

/// `num` evenly spaced values over `[min, max]`, both ends included.
pub fn linspace(min: f64, max: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / ((num - 1) as f64);
            (0..num)
                .map(|i| if i == num - 1 { max } else { min + step * (i as f64) })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2_prob() {
        assert_eq!(log2_prob(1.), 0.);
        assert_eq!(log2_prob(0.25), -2.);
        assert_eq!(log2_prob(0.), f64::NEG_INFINITY);
    }

    #[test]
    fn test_cross_entropy_and_perplexity() {
        assert_eq!(cross_entropy(-8., 4), 2.);
        assert_eq!(perplexity(2.), 4.);
        assert_eq!(cross_entropy(0., 0), 0.);
        let ce = cross_entropy(f64::NEG_INFINITY, 3);
        assert_eq!(ce, f64::INFINITY);
        assert_eq!(perplexity(ce), f64::INFINITY);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(
            linspace(30., 130., 11),
            vec![30., 40., 50., 60., 70., 80., 90., 100., 110., 120., 130.]
        );
        assert_eq!(linspace(0.5, 0.5, 1), vec![0.5]);
        assert!(linspace(0., 1., 0).is_empty());
        let betas = linspace(0.3, 0.8, 6);
        assert_eq!(betas.len(), 6);
        assert_eq!(betas[5], 0.8);
        assert!((betas[2] - 0.5).abs() < 1e-12);
    }
}
