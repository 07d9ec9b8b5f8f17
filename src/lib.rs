//! Course content localization.
//!
//! Exercise content embeds placeholder keys; per-language glossary files map
//! them to localized text. This crate indexes those glossaries, resolves the
//! one governing each exercise (falling back to English) and renders a
//! course's exercises with every placeholder substituted.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod glossary;
pub mod i18n;
pub mod renderer;
pub mod repository;
pub mod server;
