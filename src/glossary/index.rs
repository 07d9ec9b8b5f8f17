//! Glossary index: every glossary file under a content root, parsed and held in memory.
//!
//! Glossaries live in JSON files somewhere below a directory named
//! `PROPERTIES_FILES` (the glob `**/PROPERTIES_FILES/**/*.json`). Each one is
//! a flat object mapping placeholder keys to localized text. The index is
//! built once, synchronously, and is read-only afterwards.

use crate::error::{GlossaryParseError, IndexError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name that marks a subtree as holding glossary files.
pub const GLOSSARY_DIR: &str = "PROPERTIES_FILES";

/// Extension of glossary files.
pub const GLOSSARY_EXTENSION: &str = "json";

/// A flat placeholder → localized text mapping.
///
/// Entries keep the order they were authored in. Substitution walks them in
/// that order, so a later key can act on text an earlier replacement produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: Vec<(String, String)>,
}

impl Glossary {
    /// Build a glossary from ordered pairs.
    ///
    /// A repeated key keeps its first position and takes the last value,
    /// matching how a JSON object with duplicate keys is read.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Self { entries }
    }

    /// Parse the contents of a glossary file.
    pub fn parse(text: &str) -> Result<Self, GlossaryParseError> {
        let value: Value = serde_json::from_str(text)?;
        let object = match value {
            Value::Object(object) => object,
            _ => return Err(GlossaryParseError::NotAnObject),
        };
        Self::from_object(object)
    }

    fn from_object(object: Map<String, Value>) -> Result<Self, GlossaryParseError> {
        let mut entries = Vec::with_capacity(object.len());
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => return Err(not_flat(key, "null")),
                Value::Array(_) => return Err(not_flat(key, "an array")),
                Value::Object(_) => return Err(not_flat(key, "an object")),
            };
            entries.push((key, text));
        }
        Ok(Self { entries })
    }

    /// Entries in authored order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn not_flat(key: String, kind: &'static str) -> GlossaryParseError {
    GlossaryParseError::NotFlat { key, kind }
}

/// All glossaries found under a content root, keyed by path.
///
/// Keys are paths relative to the root, `/`-separated with a leading `/`
/// (e.g. `/course/PROPERTIES_FILES/unit1/algebra-101_step2_te.json`).
/// A `BTreeMap` keeps them unique and in lexicographic order, which is the
/// order every lookup reports matches in.
#[derive(Debug, Clone, Default)]
pub struct GlossaryIndex {
    root: Option<PathBuf>,
    entries: BTreeMap<String, Glossary>,
}

impl GlossaryIndex {
    /// Scan `root` and index every glossary file below it.
    ///
    /// Files that cannot be read or parsed are logged and skipped; they never
    /// abort the scan. A missing root gives an empty index.
    pub fn build(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let entries = scan(&root);
        Self {
            root: Some(root),
            entries,
        }
    }

    /// Build an index from in-memory `(path, glossary)` pairs.
    ///
    /// A later pair with the same path replaces the earlier one.
    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, Glossary)>,
        P: Into<String>,
    {
        Self {
            root: None,
            entries: entries.into_iter().map(|(p, g)| (p.into(), g)).collect(),
        }
    }

    /// Re-scan the root this index was built from, replacing its contents.
    ///
    /// Indexes built with `from_entries` have no root and are left as is.
    pub fn rebuild(&mut self) {
        if let Some(root) = &self.root {
            self.entries = scan(root);
        }
    }

    pub fn get(&self, path: &str) -> Option<&Glossary> {
        self.entries.get(path)
    }

    /// Every indexed path containing `fragment`, in lexicographic order.
    pub fn find_paths_containing(&self, fragment: &str) -> Vec<&str> {
        self.entries
            .keys()
            .filter(|path| path.contains(fragment))
            .map(String::as_str)
            .collect()
    }

    /// The lexicographically smallest path containing `fragment`, with its glossary.
    pub fn first_containing(&self, fragment: &str) -> Option<(&str, &Glossary)> {
        self.entries
            .iter()
            .find(|(path, _)| path.contains(fragment))
            .map(|(path, glossary)| (path.as_str(), glossary))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scan(root: &Path) -> BTreeMap<String, Glossary> {
    let mut entries = BTreeMap::new();

    if !root.is_dir() {
        warn!(
            "Glossary root '{}' is not a directory, index is empty",
            root.display()
        );
        return entries;
    }

    let mut files = Vec::new();
    collect_glossary_files(root, false, &mut files);

    let mut skipped = 0;
    for file in files {
        let Some(key) = index_key(root, &file) else {
            skipped += 1;
            warn!("Skipping glossary with non-UTF-8 path '{}'", file.display());
            continue;
        };
        match load_glossary(&file, &key) {
            Ok(glossary) => {
                debug!("Indexed {} ({} keys)", key, glossary.len());
                entries.insert(key, glossary);
            }
            Err(e) => {
                skipped += 1;
                warn!("Skipping glossary: {}", e);
            }
        }
    }

    info!(
        "Indexed {} glossaries under '{}' ({} skipped)",
        entries.len(),
        root.display(),
        skipped
    );
    entries
}

/// Walk `dir`, collecting `.json` files that sit below a `PROPERTIES_FILES` directory.
///
/// Symlinked directories are not followed.
fn collect_glossary_files(dir: &Path, inside_glossary_dir: bool, out: &mut Vec<PathBuf>) {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            warn!("Cannot read directory '{}': {}", dir.display(), e);
            return;
        }
    };

    for entry in read_dir.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            let marks_glossaries = entry.file_name() == GLOSSARY_DIR;
            collect_glossary_files(&path, inside_glossary_dir || marks_glossaries, out);
        } else if inside_glossary_dir
            && path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(GLOSSARY_EXTENSION)
        {
            out.push(path);
        }
    }
}

/// The index key of `file`: its path below `root`, `/`-joined with a leading `/`.
///
/// `None` when a component is not valid UTF-8.
fn index_key(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut key = String::new();
    for component in relative.components() {
        key.push('/');
        key.push_str(component.as_os_str().to_str()?);
    }
    Some(key)
}

fn load_glossary(file: &Path, key: &str) -> Result<Glossary, IndexError> {
    let text = fs::read_to_string(file).map_err(|source| IndexError::Io {
        path: key.to_string(),
        source,
    })?;
    Glossary::parse(&text).map_err(|source| IndexError::Parse {
        path: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    // ==================== Glossary Parsing Tests ====================

    #[test]
    fn test_parse_preserves_authored_order() {
        let glossary = Glossary::parse(r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#).unwrap();
        let keys: Vec<&str> = glossary.entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_scalars_become_text() {
        let glossary = Glossary::parse(r#"{"COUNT": 3, "FLAG": true, "NAME": "x"}"#).unwrap();
        assert_eq!(glossary.get("COUNT"), Some("3"));
        assert_eq!(glossary.get("FLAG"), Some("true"));
        assert_eq!(glossary.get("NAME"), Some("x"));
    }

    #[test]
    fn test_parse_rejects_nested_values() {
        let err = Glossary::parse(r#"{"A": "ok", "B": {"nested": "no"}}"#).unwrap_err();
        assert!(matches!(err, GlossaryParseError::NotFlat { ref key, .. } if key == "B"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = Glossary::parse(r#"["a", "b"]"#).unwrap_err();
        assert!(matches!(err, GlossaryParseError::NotAnObject));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(matches!(
            Glossary::parse("{not json").unwrap_err(),
            GlossaryParseError::Json(_)
        ));
    }

    #[test]
    fn test_from_pairs_duplicate_keeps_position_takes_last_value() {
        let glossary = Glossary::from_pairs([("A", "1"), ("B", "2"), ("A", "3")]);
        let entries: Vec<(&str, &str)> = glossary.entries().collect();
        assert_eq!(entries, vec![("A", "3"), ("B", "2")]);
    }

    // ==================== Index Build Tests ====================

    #[test]
    fn test_build_indexes_only_files_below_marker_dir() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "c/PROPERTIES_FILES/unit1/a_b_te.json", r#"{"K": "V"}"#);
        write(dir.path(), "c/PROPERTIES_FILES/a_c_en.json", r#"{"K": "V"}"#);
        write(dir.path(), "c/other/a_b_te.json", r#"{"K": "V"}"#);
        write(dir.path(), "c/PROPERTIES_FILES/notes.txt", "ignored");

        let index = GlossaryIndex::build(dir.path());

        let paths: Vec<&str> = index.paths().collect();
        assert_eq!(
            paths,
            vec![
                "/c/PROPERTIES_FILES/a_c_en.json",
                "/c/PROPERTIES_FILES/unit1/a_b_te.json",
            ]
        );
    }

    #[test]
    fn test_build_skips_unparseable_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "PROPERTIES_FILES/good.json", r#"{"K": "V"}"#);
        write(dir.path(), "PROPERTIES_FILES/broken.json", "{ nope");
        write(dir.path(), "PROPERTIES_FILES/nested.json", r#"{"K": ["V"]}"#);

        let index = GlossaryIndex::build(dir.path());

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get("/PROPERTIES_FILES/good.json").unwrap().get("K"),
            Some("V")
        );
    }

    #[test]
    fn test_build_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = GlossaryIndex::build(dir.path().join("does-not-exist"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_key_joins_components_below_root() {
        let root = Path::new("/content");
        assert_eq!(
            index_key(root, Path::new("/content/c/PROPERTIES_FILES/a_b_te.json")),
            Some("/c/PROPERTIES_FILES/a_b_te.json".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "PROPERTIES_FILES/good.json", r#"{"K": "V"}"#);
        let bad = dir
            .path()
            .join("PROPERTIES_FILES")
            .join(OsStr::from_bytes(b"bad\xff.json"));
        fs::write(&bad, r#"{"K": "V"}"#).unwrap();

        assert_eq!(index_key(dir.path(), &bad), None);

        let index = GlossaryIndex::build(dir.path());
        let paths: Vec<&str> = index.paths().collect();
        assert_eq!(paths, vec!["/PROPERTIES_FILES/good.json"]);
    }

    #[test]
    fn test_rebuild_replaces_instead_of_accumulating() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "PROPERTIES_FILES/a.json", r#"{"K": "old"}"#);
        let mut index = GlossaryIndex::build(dir.path());

        fs::remove_file(dir.path().join("PROPERTIES_FILES/a.json")).unwrap();
        write(dir.path(), "PROPERTIES_FILES/b.json", r#"{"K": "new"}"#);
        index.rebuild();

        let paths: Vec<&str> = index.paths().collect();
        assert_eq!(paths, vec!["/PROPERTIES_FILES/b.json"]);

        index.rebuild();
        assert_eq!(index.len(), 1);
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_find_paths_containing_is_sorted_regardless_of_insertion() {
        let index = GlossaryIndex::from_entries([
            ("/z/PROPERTIES_FILES/c_u_te.json", Glossary::default()),
            ("/a/PROPERTIES_FILES/c_u_te.json", Glossary::default()),
            ("/m/PROPERTIES_FILES/c_v_te.json", Glossary::default()),
        ]);

        assert_eq!(
            index.find_paths_containing("/PROPERTIES_FILES/c_u_te"),
            vec![
                "/a/PROPERTIES_FILES/c_u_te.json",
                "/z/PROPERTIES_FILES/c_u_te.json",
            ]
        );
        assert_eq!(
            index.first_containing("/PROPERTIES_FILES/c_u_te").map(|(p, _)| p),
            Some("/a/PROPERTIES_FILES/c_u_te.json")
        );
    }

    #[test]
    fn test_find_paths_containing_no_match() {
        let index = GlossaryIndex::from_entries([("/PROPERTIES_FILES/x.json", Glossary::default())]);
        assert!(index.find_paths_containing("/PROPERTIES_FILES/y").is_empty());
        assert!(index.first_containing("/PROPERTIES_FILES/y").is_none());
    }

    #[test]
    fn test_from_entries_same_path_keeps_one_entry() {
        let index = GlossaryIndex::from_entries([
            ("/p.json", Glossary::from_pairs([("K", "first")])),
            ("/p.json", Glossary::from_pairs([("K", "second")])),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("/p.json").unwrap().get("K"), Some("second"));
    }
}
