//! Source file loading and source-name expansion (spec §6).
//!
//! File loading is idempotent: loading the same path twice returns
//! `already_loaded = true` and the caller (the driver) must not re-parse.
//! Source-name expansion turns the CLI's raw input list (literal `.c3`
//! paths, one-level wildcards, recursive wildcards) into a concrete,
//! sorted file list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::DriverError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub u32);

/// Implicit standard-library sources prepended to the source list when a
/// library directory is configured (spec §6), in this fixed order.
pub const IMPLICIT_STDLIB_SOURCES: &[&str] = &[
    "std/runtime",
    "std/builtin",
    "std/io",
    "std/mem",
    "std/array",
    "std/math",
];

pub const SOURCE_EXTENSION: &str = "c3";

pub struct SourceLoader {
    loaded: HashSet<PathBuf>,
    files: Vec<(PathBuf, String)>,
}

impl SourceLoader {
    pub fn new() -> Self {
        SourceLoader {
            loaded: HashSet::new(),
            files: Vec::new(),
        }
    }

    /// `load(path) -> (file_handle, already_loaded_flag)`. Idempotent: a
    /// path already loaded is not re-read from disk.
    pub fn load(&mut self, path: &Path) -> std::io::Result<(FileId, bool)> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if self.loaded.contains(&canonical) {
            let index = self
                .files
                .iter()
                .position(|(p, _)| *p == canonical)
                .expect("loaded set and files vec must stay in sync");
            return Ok((FileId(index as u32), true));
        }
        let contents = std::fs::read_to_string(path)?;
        let index = self.files.len() as u32;
        self.files.push((canonical.clone(), contents));
        self.loaded.insert(canonical);
        Ok((FileId(index), false))
    }

    pub fn path(&self, id: FileId) -> &Path {
        &self.files[id.0 as usize].0
    }

    pub fn contents(&self, id: FileId) -> &str {
        &self.files[id.0 as usize].1
    }

    pub fn loaded_count(&self) -> usize {
        self.files.len()
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand the CLI's raw source-name list into concrete `.c3` file paths.
/// Any non-`.c3`, non-wildcard name is a fatal configuration error (spec
/// §6/§8).
pub fn expand_source_names(names: &[String]) -> Result<Vec<PathBuf>, DriverError> {
    let mut result = Vec::new();
    for name in names {
        if let Some(dir) = name.strip_suffix("/**") {
            expand_recursive(Path::new(if dir.is_empty() { "." } else { dir }), &mut result);
        } else if name == "**" {
            expand_recursive(Path::new("."), &mut result);
        } else if let Some(dir) = name.strip_suffix("/*") {
            expand_one_level(Path::new(if dir.is_empty() { "." } else { dir }), &mut result);
        } else if name == "*" {
            expand_one_level(Path::new("."), &mut result);
        } else if name.ends_with(&format!(".{SOURCE_EXTENSION}")) {
            result.push(PathBuf::from(name));
        } else {
            return Err(DriverError::NotASourceFile(name.clone()));
        }
    }
    result.sort();
    result.dedup();
    Ok(result)
}

fn expand_one_level(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && has_source_extension(&path) {
            out.push(path);
        }
    }
}

fn expand_recursive(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            expand_recursive(&path, out);
        } else if path.is_file() && has_source_extension(&path) {
            out.push(path);
        }
    }
}

fn has_source_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

/// Platform-specific search for a standard-library directory when none is
/// given explicitly (spec §4.C step 4). This is deliberately modest: check
/// an environment override, then a couple of conventional locations.
pub fn search_platform_stdlib_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("C3C_STDLIB") {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return Some(path);
        }
    }
    for candidate in ["./std", "/usr/local/share/c3c/std", "/usr/share/c3c/std"] {
        let path = PathBuf::from(candidate);
        if path.is_dir() {
            return Some(path);
        }
    }
    None
}

/// Prepend the implicit standard-library sources to `sources`, in the
/// fixed order spec §6 lists, when `lib_dir` is set.
pub fn with_implicit_stdlib_sources(lib_dir: Option<&Path>, sources: Vec<PathBuf>) -> Vec<PathBuf> {
    let Some(lib_dir) = lib_dir else {
        return sources;
    };
    let mut full = Vec::with_capacity(IMPLICIT_STDLIB_SOURCES.len() + sources.len());
    for relative in IMPLICIT_STDLIB_SOURCES {
        full.push(lib_dir.join(format!("{relative}.{SOURCE_EXTENSION}")));
    }
    full.extend(sources);
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn literal_non_source_name_is_fatal() {
        let err = expand_source_names(&["notes.txt".to_string()]).unwrap_err();
        assert_eq!(err, DriverError::NotASourceFile("notes.txt".to_string()));
    }

    #[test]
    fn literal_source_name_passes_through() {
        let result = expand_source_names(&["a.c3".to_string()]).unwrap();
        assert_eq!(result, vec![PathBuf::from("a.c3")]);
    }

    #[test]
    fn one_level_wildcard_expands_only_direct_children() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.c3"), "").unwrap();
        std::fs::write(dir.path().join("b.c3"), "").unwrap();
        std::fs::write(dir.path().join("ignore.txt"), "").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("c.c3"), "").unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let result = expand_source_names(&[pattern]).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn recursive_wildcard_expands_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.c3"), "").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("c.c3"), "").unwrap();

        let pattern = format!("{}/**", dir.path().display());
        let result = expand_source_names(&[pattern]).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn loading_same_path_twice_reports_already_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "module a;").unwrap();
        let mut loader = SourceLoader::new();
        let (first_id, first_loaded) = loader.load(file.path()).unwrap();
        let (second_id, second_loaded) = loader.load(file.path()).unwrap();
        assert!(!first_loaded);
        assert!(second_loaded);
        assert_eq!(first_id, second_id);
        assert_eq!(loader.loaded_count(), 1);
    }
}
