use std::io;
use std::path::{Path, PathBuf};

use tokenizers::{Tokenizer, TruncationParams};

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolves `tokenizer.json` for a checkpoint.
///
/// Accepts the model directory itself, the tokenizer file, or any other file
/// inside the directory (the tokenizer is then looked up next to it).
pub(super) fn tokenizer_file(model_path: &Path) -> io::Result<PathBuf> {
    if model_path.is_dir() {
        return Ok(model_path.join(TOKENIZER_FILE));
    }
    if model_path.ends_with(TOKENIZER_FILE) {
        return Ok(model_path.to_path_buf());
    }
    match model_path.parent() {
        Some(dir) => Ok(dir.join(TOKENIZER_FILE)),
        None => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("cannot locate {TOKENIZER_FILE} for {}", model_path.display()),
        )),
    }
}

/// Loads the checkpoint tokenizer, dropping tokens past `max_len`.
///
/// Long articles exceed the encoder's positional range; they are cut, not rejected.
pub fn load_tokenizer_with_truncation(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let path = tokenizer_file(model_path)?;
    let mut tokenizer = Tokenizer::from_file(&path).map_err(io::Error::other)?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..TruncationParams::default()
        }))
        .map_err(|e| io::Error::other(format!("truncation to {max_len} tokens rejected: {e}")))?;

    Ok(tokenizer)
}

/// Numerically stable softmax. Returns an empty vector for empty input.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let Some(max) = logits.iter().copied().reduce(f32::max) else {
        return Vec::new();
    };

    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first index wins on ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
