//! Exercise content blocks and their storage encoding.
//!
//! Exercise content is stored as JSON text: an array whose elements are
//! either block objects or strings holding a JSON-encoded block object.
//! Content that does not decode is kept verbatim instead of failing the
//! exercise.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Block type whose text is subject to glossary substitution.
pub const MARKDOWN: &str = "markdown";

/// One unit of exercise content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,

    /// `None` when the stored block has no `value` field; a stored `null`
    /// is `Some(Value::Null)`
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,

    /// Any other fields the block carries, kept as stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentBlock {
    pub fn new(kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
            extra: Map::new(),
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self::new(MARKDOWN, text.into())
    }

    /// The block's text if it is a textual block eligible for substitution.
    pub fn text(&self) -> Option<&str> {
        if self.kind == MARKDOWN {
            self.value.as_ref().and_then(Value::as_str)
        } else {
            None
        }
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Decoded exercise content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExerciseContent {
    Blocks(Vec<ContentBlock>),
    /// Stored content that could not be decoded
    Raw(String),
}

impl ExerciseContent {
    /// Decode stored content, keeping it raw on any failure.
    pub fn decode(stored: &str) -> Self {
        match decode_blocks(stored) {
            Some(blocks) => ExerciseContent::Blocks(blocks),
            None => ExerciseContent::Raw(stored.to_string()),
        }
    }

    pub fn blocks(&self) -> Option<&[ContentBlock]> {
        match self {
            ExerciseContent::Blocks(blocks) => Some(blocks),
            ExerciseContent::Raw(_) => None,
        }
    }
}

fn decode_blocks(stored: &str) -> Option<Vec<ContentBlock>> {
    let elements: Vec<Value> = serde_json::from_str(stored).ok()?;
    elements
        .into_iter()
        .map(|element| match element {
            Value::String(encoded) => serde_json::from_str(&encoded).ok(),
            object @ Value::Object(_) => serde_json::from_value(object).ok(),
            _ => None,
        })
        .collect()
}
