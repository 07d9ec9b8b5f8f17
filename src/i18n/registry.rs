//! Language registry: Single source of truth for the languages courses are served in.
//!
//! The registry is built once on first access through `OnceLock` and is
//! immutable afterwards, so lookups need no locking.

use serde::Serialize;
use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "hi", "te")
    pub code: &'static str,

    /// English name of the language (e.g., "Hindi", "Telugu")
    pub name: &'static str,

    /// Native name of the language (e.g., "हिन्दी", "తెలుగు")
    pub native_name: &'static str,

    /// Whether this is the fallback language glossaries default to (only one should be true)
    #[serde(rename = "fallback")]
    pub is_fallback: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language is supported
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all supported languages.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the fallback language configuration.
    ///
    /// This is the language used when no glossary exists for the requested
    /// language, and the language unsupported requests are coerced to.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one fallback language
    /// (a programming error in `default_languages`).
    pub fn fallback(&self) -> &LanguageConfig {
        let fallbacks: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_fallback)
            .collect();

        match fallbacks.len() {
            0 => panic!("No fallback language found in registry"),
            1 => fallbacks[0],
            _ => panic!("Multiple fallback languages found in registry"),
        }
    }
}

/// Languages accepted by the platform's `lang` parameter.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
            is_fallback: false,
        },
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_fallback: true,
        },
        LanguageConfig {
            code: "te",
            name: "Telugu",
            native_name: "తెలుగు",
            is_fallback: false,
        },
        LanguageConfig {
            code: "ta",
            name: "Tamil",
            native_name: "தமிழ்",
            is_fallback: false,
        },
    ]
}
