use anyhow::{Context, Result};
use bincode::deserialize_from;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::BufReader;

use crate::ngram::NGramModel;
use crate::tagging::{BaselineTagger, MlHmm};

pub trait Load {
    fn load(load_path: &str) -> Result<Self>
    where
        Self: Sized;
}

// load_path should be a file written by `Save::save` for the same type.
fn load_bincode<T: DeserializeOwned>(load_path: &str) -> Result<T> {
    let file = fs::OpenOptions::new()
        .read(true)
        .open(load_path)
        .with_context(|| format!("could not open {}", load_path))?;
    Ok(deserialize_from(BufReader::new(file))?)
}

impl Load for NGramModel {
    fn load(load_path: &str) -> Result<Self> {
        load_bincode(load_path)
    }
}

impl Load for MlHmm {
    fn load(load_path: &str) -> Result<Self> {
        load_bincode(load_path)
    }
}

impl Load for BaselineTagger {
    fn load(load_path: &str) -> Result<Self> {
        load_bincode(load_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Save;
    use crate::lms::LM;
    use crate::tagging::{TagModel, Tagger};
    use crate::tokens::to_tokens;
    use tempfile::NamedTempFile;

    fn sents() -> Vec<Vec<String>> {
        let mut sents = Vec::new();
        for _ in 0..4 {
            sents.push(to_tokens("el gato come pescado ."));
            sents.push(to_tokens("la gata come salmón ."));
        }
        sents.push(to_tokens("el perro come carne ."));
        sents.push(to_tokens("la gata bebe leche ."));
        sents
    }

    #[test]
    fn test_save_load_ngram_models() {
        let sents = sents();
        let models = vec![
            NGramModel::unsmoothed(2, &sents).unwrap(),
            NGramModel::add_one(3, &sents).unwrap(),
            NGramModel::interpolated(3, &sents, None, true).unwrap(),
            NGramModel::back_off(3, &sents, None, true).unwrap(),
        ];
        let queries = vec![
            ("come", to_tokens("el gato")),
            ("salmón", to_tokens("gata come")),
            ("leche", to_tokens("perro come")),
            ("</s>", to_tokens("carne .")),
        ];
        for model in models.iter() {
            let file = NamedTempFile::new().expect("Failed to create file");
            let path = file.path().to_str().unwrap();
            model.save(path).unwrap();
            let loaded = NGramModel::load(path).unwrap();
            assert_eq!(&loaded, model);
            for (token, context) in queries.iter() {
                let context = &context[2 - (model.order() - 1)..];
                assert_eq!(
                    loaded.cond_prob(token, context).unwrap(),
                    model.cond_prob(token, context).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_save_load_taggers() {
        let tagged: Vec<Vec<(String, String)>> = vec![
            vec![("el".into(), "D".into()), ("gato".into(), "N".into())],
            vec![("la".into(), "D".into()), ("gata".into(), "N".into())],
        ];
        let hmm = MlHmm::new(2, &tagged, true).unwrap();
        let file = NamedTempFile::new().expect("Failed to create file");
        let path = file.path().to_str().unwrap();
        hmm.save(path).unwrap();
        let loaded = MlHmm::load(path).unwrap();
        assert_eq!(loaded.trans_prob("N", &to_tokens("D")), hmm.trans_prob("N", &to_tokens("D")));
        assert_eq!(loaded.out_prob("perro", "N"), hmm.out_prob("perro", "N"));

        let baseline = BaselineTagger::new(&tagged);
        baseline.save(path).unwrap();
        let loaded = BaselineTagger::load(path).unwrap();
        assert_eq!(loaded, baseline);
        assert_eq!(loaded.tag(&to_tokens("el perro")).unwrap(), vec!["D", "nc0s000"]);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(NGramModel::load("/nonexistent/model.bin").is_err());
    }
}
