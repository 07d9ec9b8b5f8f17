//! Language type: validated language representation backed by the registry.

use crate::i18n::LanguageRegistry;
use anyhow::{bail, Result};

/// A language known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is supported
    /// * `Err` if the code is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Map a caller-supplied `lang` value onto a supported language.
    ///
    /// The value is trimmed and lowercased first; anything still unknown,
    /// including a missing value, becomes the fallback language.
    pub fn coerce(code: Option<&str>) -> Language {
        code.map(|c| c.trim().to_lowercase())
            .and_then(|c| Language::from_code(&c).ok())
            .unwrap_or_else(Language::fallback)
    }

    /// Get the fallback language glossaries default to.
    pub fn fallback() -> Language {
        Language {
            code: LanguageRegistry::get().fallback().code,
        }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }
}
