//! Glossary-driven localization of exercise content.
//!
//! - `index`: glossary files discovered on disk, parsed once and held in memory
//! - `resolver`: which glossary governs an exercise, with language fallback
//! - `transformer`: ordered placeholder substitution over content blocks

mod index;
mod resolver;
mod transformer;

pub use index::{Glossary, GlossaryIndex, GLOSSARY_DIR, GLOSSARY_EXTENSION};
pub use resolver::{PathResolver, Resolution, ResolvedGlossary, Slug};
pub use transformer::{substitute, transform, transform_blocks};
