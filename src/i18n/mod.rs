//! Internationalization (i18n) module: the languages course content is served in.
//!
//! - `registry`: Single source of truth for supported languages and the fallback
//! - `language`: Type-safe `Language` validated against the registry
//!
//! # Example
//!
//! ```rust,ignore
//! use course_localizer::i18n::Language;
//!
//! // Unsupported or missing values become the fallback language
//! let lang = Language::coerce(query.lang.as_deref());
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
