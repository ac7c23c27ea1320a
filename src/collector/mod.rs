//! File collection: extract an archive and pick the JS/TS files worth
//! analyzing.
//!
//! Each collection pass extracts into a fresh scratch directory, walks it in
//! a stable order, keeps files with a JS/TS extension, and drops anything the
//! ignore rules match. Rules are re-read from disk on every pass so edits to
//! the list take effect immediately.

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use walkdir::WalkDir;

use crate::models::SourceFile;
use crate::rules::{RuleError, RuleStore};

/// Extensions considered analyzable source code.
pub const SOURCE_EXTENSIONS: &[&str] = &[".js", ".mjs", ".jsx", ".ts", ".tsx"];

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("archive at {path} is not a readable ZIP: {source}")]
    CorruptArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("collection I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// Result of a collection pass. Holds the scratch directory alive so the
/// collected paths stay readable until the analysis is done.
#[derive(Debug)]
pub struct Collection {
    pub files: Vec<SourceFile>,
    /// Candidate source files excluded by ignore rules.
    pub skipped: usize,
    _scratch: TempDir,
}

/// Extracts archives and filters their contents.
#[derive(Debug, Clone)]
pub struct FileCollector {
    rules: RuleStore,
}

impl FileCollector {
    pub fn new(rules: RuleStore) -> Self {
        Self { rules }
    }

    /// Extract `archive_path` and collect eligible source files in a
    /// deterministic order. An empty `files` vec means the archive simply
    /// contained nothing to analyze.
    pub fn collect(&self, archive_path: &Path) -> Result<Collection, CollectError> {
        let rules = self.rules.load()?;

        let scratch = TempDir::with_prefix("ecolens-extract-")?;
        let file = File::open(archive_path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|source| CollectError::CorruptArchive {
                path: archive_path.to_path_buf(),
                source,
            })?;
        archive
            .extract(scratch.path())
            .map_err(|source| CollectError::CorruptArchive {
                path: archive_path.to_path_buf(),
                source,
            })?;

        let mut files = Vec::new();
        let mut skipped = 0usize;
        for entry in WalkDir::new(scratch.path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !has_source_extension(name) {
                continue;
            }
            if rules.matches(name) {
                skipped += 1;
                continue;
            }
            let display_name = entry
                .path()
                .strip_prefix(scratch.path())
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            files.push(SourceFile::new(entry.path().to_path_buf(), display_name));
        }

        tracing::debug!(collected = files.len(), skipped, "collection pass done");
        Ok(Collection {
            files,
            skipped,
            _scratch: scratch,
        })
    }
}

fn has_source_extension(name: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::FileOptions;

    fn build_zip(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join("fixture.zip");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(*name, FileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn collector(dir: &Path) -> FileCollector {
        FileCollector::new(RuleStore::new(dir.join("ignore_list.txt")))
    }

    #[test]
    fn collects_only_source_extensions() {
        let dir = tempdir().unwrap();
        let zip_path = build_zip(
            dir.path(),
            &[
                ("repo/app.js", "let x = 1;"),
                ("repo/index.tsx", "export {};"),
                ("repo/README.md", "# readme"),
                ("repo/styles.css", "body {}"),
            ],
        );
        let collection = collector(dir.path()).collect(&zip_path).unwrap();
        let names: Vec<&str> = collection
            .files
            .iter()
            .map(|f| f.file_name())
            .collect();
        assert_eq!(names, vec!["app.js", "index.tsx"]);
        assert_eq!(collection.skipped, 0);
    }

    #[test]
    fn ignore_rules_exclude_build_configs() {
        let dir = tempdir().unwrap();
        let zip_path = build_zip(
            dir.path(),
            &[
                ("repo/vite.config.js", "export default {};"),
                ("repo/src/main.ts", "console.log('hi');"),
            ],
        );
        let collection = collector(dir.path()).collect(&zip_path).unwrap();
        let names: Vec<&str> = collection
            .files
            .iter()
            .map(|f| f.file_name())
            .collect();
        assert_eq!(names, vec!["main.ts"]);
        assert_eq!(collection.skipped, 1);
    }

    #[test]
    fn rules_are_reloaded_each_pass() {
        let dir = tempdir().unwrap();
        let zip_path = build_zip(dir.path(), &[("repo/app.js", "let x = 1;")]);
        let collector = collector(dir.path());

        let first = collector.collect(&zip_path).unwrap();
        assert_eq!(first.files.len(), 1);

        std::fs::write(dir.path().join("ignore_list.txt"), "app.js\n").unwrap();
        let second = collector.collect(&zip_path).unwrap();
        assert!(second.files.is_empty());
        assert_eq!(second.skipped, 1);
    }

    #[test]
    fn empty_archive_yields_no_files() {
        let dir = tempdir().unwrap();
        let zip_path = build_zip(dir.path(), &[("repo/readme.txt", "nothing here")]);
        let collection = collector(dir.path()).collect(&zip_path).unwrap();
        assert!(collection.files.is_empty());
        assert_eq!(collection.skipped, 0);
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.zip");
        std::fs::write(&path, b"definitely not a zip").unwrap();
        let result = collector(dir.path()).collect(&path);
        assert!(matches!(
            result,
            Err(CollectError::CorruptArchive { .. })
        ));
    }

    #[test]
    fn walk_order_is_stable() {
        let dir = tempdir().unwrap();
        let zip_path = build_zip(
            dir.path(),
            &[
                ("repo/b.js", ""),
                ("repo/a.js", ""),
                ("repo/sub/c.ts", ""),
            ],
        );
        let collector = collector(dir.path());
        let first: Vec<String> = collector
            .collect(&zip_path)
            .unwrap()
            .files
            .iter()
            .map(|f| f.display_name.clone())
            .collect();
        let second: Vec<String> = collector
            .collect(&zip_path)
            .unwrap()
            .files
            .iter()
            .map(|f| f.display_name.clone())
            .collect();
        assert_eq!(first, second);
    }
}
