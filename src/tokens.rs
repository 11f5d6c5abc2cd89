// Sentence boundary handling shared by the language models and the tagger.

pub const START_TOKEN: &str = "<s>";
pub const END_TOKEN: &str = "</s>";

/// Pad a sentence with `n_start` start sentinels and a single end sentinel.
pub fn pad<S: AsRef<str>>(sent: &[S], n_start: usize) -> Vec<String> {
    let mut padded = Vec::with_capacity(n_start + sent.len() + 1);
    padded.extend(std::iter::repeat(START_TOKEN.to_string()).take(n_start));
    padded.extend(sent.iter().map(|token| token.as_ref().to_string()));
    padded.push(END_TOKEN.to_string());
    padded
}

/// The all-start context of length `len`.
pub fn start_context(len: usize) -> Vec<String> {
    vec![START_TOKEN.to_string(); len]
}

/// Slide a fixed-width context one token to the right. The empty context stays empty.
pub fn shift_context(context: &[String], token: &str) -> Vec<String> {
    if context.is_empty() {
        return Vec::new();
    }
    let mut shifted = Vec::with_capacity(context.len());
    shifted.extend_from_slice(&context[1..]);
    shifted.push(token.to_string());
    shifted
}

/// Number of predicted events in a corpus: every token plus one end sentinel per sentence.
pub fn word_count<S>(sents: &[Vec<S>]) -> usize {
    sents.iter().map(|sent| sent.len()).sum::<usize>() + sents.len()
}

/// Convenience for tests and callers holding string slices.
pub fn to_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(|x| x.to_string()).collect()
}
