//! Content transformation: apply a resolved glossary to an exercise's blocks.
//!
//! Keys are applied one after another in the glossary's authored order and
//! every occurrence of a key is replaced, so a later key sees the output of
//! earlier replacements. Only markdown blocks with string values change.

use crate::content::{ContentBlock, ExerciseContent};
use crate::glossary::index::Glossary;
use serde_json::Value;

/// Replace every glossary key occurring in `text` with its value.
///
/// Empty keys are skipped.
pub fn substitute(text: &str, glossary: &Glossary) -> String {
    glossary
        .entries()
        .filter(|(key, _)| !key.is_empty())
        .fold(text.to_string(), |acc, (key, value)| acc.replace(key, value))
}

/// Localize a block list. With no glossary the blocks come back unchanged.
pub fn transform_blocks(blocks: &[ContentBlock], glossary: Option<&Glossary>) -> Vec<ContentBlock> {
    let Some(glossary) = glossary else {
        return blocks.to_vec();
    };

    blocks
        .iter()
        .map(|block| match block.text() {
            Some(text) => ContentBlock {
                value: Some(Value::String(substitute(text, glossary))),
                ..block.clone()
            },
            None => block.clone(),
        })
        .collect()
}

/// Localize decoded exercise content. Raw content passes through.
pub fn transform(content: &ExerciseContent, glossary: Option<&Glossary>) -> ExerciseContent {
    match content {
        ExerciseContent::Blocks(blocks) => {
            ExerciseContent::Blocks(transform_blocks(blocks, glossary))
        }
        ExerciseContent::Raw(raw) => ExerciseContent::Raw(raw.clone()),
    }
}
