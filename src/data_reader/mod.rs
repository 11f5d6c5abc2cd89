// Corpus files: one sentence per line, tokens separated by whitespace.
// Tagged tokens are written `word/tag`, split on the last slash.

mod buf_reader;

use anyhow::{anyhow, Result};
use std::path::Path;

use self::buf_reader::LineReader;
use crate::tagging::TaggedSent;

pub fn read_sents(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let mut sents = Vec::new();
    for line in LineReader::open(path)? {
        let tokens: Vec<String> = line?.split_whitespace().map(|x| x.to_string()).collect();
        if !tokens.is_empty() {
            sents.push(tokens);
        }
    }
    Ok(sents)
}

pub fn parse_tagged(line: &str) -> Result<TaggedSent> {
    line.split_whitespace()
        .map(|pair| match pair.rsplit_once('/') {
            Some((word, tag)) if !word.is_empty() && !tag.is_empty() => {
                Ok((word.to_string(), tag.to_string()))
            }
            _ => Err(anyhow!("malformed tagged token {:?}", pair)),
        })
        .collect()
}

pub fn read_tagged_sents(path: impl AsRef<Path>) -> Result<Vec<TaggedSent>> {
    let mut sents = Vec::new();
    for (i, line) in LineReader::open(path)?.enumerate() {
        let sent = parse_tagged(&line?).map_err(|e| e.context(format!("line {}", i + 1)))?;
        if !sent.is_empty() {
            sents.push(sent);
        }
    }
    Ok(sents)
}
