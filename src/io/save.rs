use anyhow::{Context, Result};
use bincode::serialize_into;
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};

use crate::ngram::NGramModel;
use crate::tagging::{BaselineTagger, MlHmm};

pub trait Save {
    fn save(&self, save_path: &str) -> Result<()>;
}

fn save_bincode<T: Serialize>(value: &T, save_path: &str) -> Result<()> {
    let save_file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(save_path)
        .with_context(|| format!("could not open {} for writing", save_path))?;
    let mut writer = BufWriter::new(save_file);
    serialize_into(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

impl Save for NGramModel {
    fn save(&self, save_path: &str) -> Result<()> {
        save_bincode(self, save_path)
    }
}

impl Save for MlHmm {
    fn save(&self, save_path: &str) -> Result<()> {
        save_bincode(self, save_path)
    }
}

impl Save for BaselineTagger {
    fn save(&self, save_path: &str) -> Result<()> {
        save_bincode(self, save_path)
    }
}
