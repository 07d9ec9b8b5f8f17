//! Path resolution: which glossary governs an exercise in a given language.
//!
//! An exercise slug is either `unit` or `prefix__group/unit`. The glossary for
//! it is expected at a path containing
//!
//! - `/PROPERTIES_FILES/{group}/{course}_{unit}_{lang}` when the slug has a group
//! - `/PROPERTIES_FILES/{course}_{unit}_{lang}` when it does not
//!
//! If nothing matches the requested language the fallback language is tried.
//! Among several matches the lexicographically smallest path wins.

use crate::error::SlugError;
use crate::glossary::index::{Glossary, GlossaryIndex, GLOSSARY_DIR};
use crate::i18n::Language;
use tracing::debug;

const SLUG_SEPARATOR: char = '/';
const GROUP_DELIMITER: &str = "__";

/// A parsed exercise slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slug<'a> {
    pub group: Option<&'a str>,
    pub unit: &'a str,
}

impl<'a> Slug<'a> {
    /// Split a slug into its resource group (if any) and unit name.
    ///
    /// The group is the part of the first segment after `__` and the unit is
    /// the second segment; an ungrouped slug takes its unit name the same way
    /// as a group. A segment without `__` is used whole.
    pub fn parse(slug: &'a str) -> Result<Self, SlugError> {
        let invalid = |reason| SlugError::InvalidSlug {
            slug: slug.to_string(),
            reason,
        };

        if slug.is_empty() {
            return Err(invalid("slug is empty"));
        }

        // Segments past the second play no part in the glossary path
        let segments: Vec<&str> = slug.split(SLUG_SEPARATOR).collect();
        let parsed = match segments.as_slice() {
            &[single] => Slug {
                group: None,
                unit: after_delimiter(single),
            },
            &[first, second, ..] => Slug {
                group: Some(after_delimiter(first)),
                unit: second,
            },
            [] => return Err(invalid("slug is empty")),
        };

        if parsed.unit.is_empty() || parsed.group == Some("") {
            return Err(invalid("slug names an empty group or unit"));
        }
        Ok(parsed)
    }

    /// The path fragment a glossary for this slug must contain.
    pub fn fragment(&self, course_name: &str, language: &str) -> String {
        match self.group {
            Some(group) => format!(
                "/{}/{}/{}_{}_{}",
                GLOSSARY_DIR, group, course_name, self.unit, language
            ),
            None => format!("/{}/{}_{}_{}", GLOSSARY_DIR, course_name, self.unit, language),
        }
    }
}

fn after_delimiter(segment: &str) -> &str {
    segment.split(GROUP_DELIMITER).nth(1).unwrap_or(segment)
}

/// The glossary chosen for one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGlossary<'a> {
    pub path: &'a str,
    pub glossary: &'a Glossary,
    /// Language of the selected glossary
    pub language: &'a str,
    /// Whether the requested language had no glossary and the fallback was used
    pub fallback: bool,
}

/// Outcome of resolving an exercise's glossary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Resolved(ResolvedGlossary<'a>),
    /// Neither the requested nor the fallback language has a glossary.
    NoGlossary,
}

impl<'a> Resolution<'a> {
    pub fn glossary(&self) -> Option<&'a Glossary> {
        match self {
            Resolution::Resolved(resolved) => Some(resolved.glossary),
            Resolution::NoGlossary => None,
        }
    }
}

/// Resolves exercise glossaries against a read-only index.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    index: &'a GlossaryIndex,
    fallback_language: &'a str,
}

impl<'a> PathResolver<'a> {
    /// A resolver falling back to the registry's fallback language.
    pub fn new(index: &'a GlossaryIndex) -> Self {
        Self::with_fallback(index, Language::fallback().code())
    }

    pub fn with_fallback(index: &'a GlossaryIndex, fallback_language: &'a str) -> Self {
        Self {
            index,
            fallback_language,
        }
    }

    /// Resolve the glossary for `slug` of `course_name` in `language`.
    ///
    /// `language` is tried as given, whether or not it is supported.
    pub fn resolve(
        &self,
        course_name: &str,
        slug: &str,
        language: &'a str,
    ) -> Result<Resolution<'a>, SlugError> {
        let parsed = Slug::parse(slug)?;

        if let Some(resolved) = self.lookup(&parsed, course_name, language, false) {
            return Ok(Resolution::Resolved(resolved));
        }

        if language != self.fallback_language {
            if let Some(resolved) = self.lookup(&parsed, course_name, self.fallback_language, true)
            {
                return Ok(Resolution::Resolved(resolved));
            }
        }

        debug!(
            "No glossary for course '{}' slug '{}' in '{}' or '{}'",
            course_name, slug, language, self.fallback_language
        );
        Ok(Resolution::NoGlossary)
    }

    fn lookup(
        &self,
        slug: &Slug<'_>,
        course_name: &str,
        language: &'a str,
        fallback: bool,
    ) -> Option<ResolvedGlossary<'a>> {
        let fragment = slug.fragment(course_name, language);
        let (path, glossary) = self.index.first_containing(&fragment)?;
        debug!(
            "Resolved '{}' to {}{}",
            fragment,
            path,
            if fallback { " (fallback)" } else { "" }
        );
        Some(ResolvedGlossary {
            path,
            glossary,
            language,
            fallback,
        })
    }
}
